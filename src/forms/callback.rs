use crate::models::JobStatus;
use serde::{Deserialize, Serialize};
use serde_valid::Validate;
use uuid::Uuid;

/// Terminal result delivered by the estimate engine to
/// `POST /estimate/callback`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CallbackForm {
    #[serde(rename = "jobId")]
    pub job_id: Uuid,
    pub status: String, // "completed" or "error"
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(rename = "pdfUrl", default)]
    pub pdf_url: Option<String>,
}

impl CallbackForm {
    /// Maps the reported status onto a terminal [`JobStatus`]. Anything other
    /// than the two terminal states is rejected by the receiver.
    pub fn terminal_status(&self) -> Option<JobStatus> {
        match self.status.as_str() {
            "completed" => Some(JobStatus::Completed),
            "error" => Some(JobStatus::Error),
            _ => None,
        }
    }
}
