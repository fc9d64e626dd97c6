use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle of an estimate job as seen by pollers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    #[serde(rename = "processing")]
    Processing,
    #[serde(rename = "completed")]
    Completed,
    #[serde(rename = "error")]
    Error,
    #[serde(rename = "expired")]
    Expired,
}

impl JobStatus {
    /// Terminal states never change again; pollers can stop on them.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::Completed | JobStatus::Error | JobStatus::Expired
        )
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobStatus::Processing => write!(f, "processing"),
            JobStatus::Completed => write!(f, "completed"),
            JobStatus::Error => write!(f, "error"),
            JobStatus::Expired => write!(f, "expired"),
        }
    }
}

/// Acknowledgement returned by the submission endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobAccepted {
    #[serde(rename = "jobId")]
    pub job_id: Uuid,
}

/// What a poller sees for a job: its status plus whichever payload fields the
/// engine delivered with the terminal callback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobResult {
    pub status: JobStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(rename = "pdfUrl", skip_serializing_if = "Option::is_none")]
    pub pdf_url: Option<String>,
}

impl JobResult {
    pub fn processing() -> Self {
        Self {
            status: JobStatus::Processing,
            response: None,
            error: None,
            pdf_url: None,
        }
    }

    pub fn expired() -> Self {
        Self {
            status: JobStatus::Expired,
            response: None,
            error: None,
            pdf_url: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&JobStatus::Processing).unwrap(),
            r#""processing""#
        );
        assert_eq!(JobStatus::Completed.to_string(), "completed");
    }

    #[test]
    fn terminal_statuses() {
        assert!(!JobStatus::Processing.is_terminal());
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Error.is_terminal());
        assert!(JobStatus::Expired.is_terminal());
    }

    #[test]
    fn processing_result_omits_payload_fields() {
        let body = serde_json::to_value(JobResult::processing()).unwrap();
        assert_eq!(body, serde_json::json!({"status": "processing"}));
    }
}
