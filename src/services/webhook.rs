//! Estimate Engine Dispatch
//!
//! Hands submitted estimate requests to the external engine over its inbound
//! webhook. Delivery is fire-and-forget: the send runs in its own task which
//! logs the outcome, and the submitting request waits only briefly so the
//! POST has a chance to leave before the job id is returned to the client.

use serde::Serialize;
use std::time::Duration;
use uuid::Uuid;

/// Job request as the engine expects it, camelCase on the wire. `pdfUrl` is
/// serialized even when null.
#[derive(Debug, Clone, Serialize)]
pub struct WebhookPayload {
    pub message: String,
    #[serde(rename = "sessionId")]
    pub session_id: String,
    #[serde(rename = "pdfUrl")]
    pub pdf_url: Option<String>,
    #[serde(rename = "jobId")]
    pub job_id: Uuid,
    #[serde(rename = "callbackUrl")]
    pub callback_url: String,
}

pub struct WebhookClient {
    url: String,
    callback_url: String,
    dispatch_wait: Duration,
    http: reqwest::Client,
}

impl WebhookClient {
    pub fn new(
        http: reqwest::Client,
        url: impl Into<String>,
        callback_url: impl Into<String>,
        dispatch_wait: Duration,
    ) -> Self {
        Self {
            url: url.into(),
            callback_url: callback_url.into(),
            dispatch_wait,
            http,
        }
    }

    /// Sends the job to the engine. Returns once the send task has finished
    /// or `dispatch_wait` has elapsed, whichever comes first; a slow or
    /// unreachable engine never blocks or fails the submission.
    pub async fn dispatch_estimate(
        &self,
        job_id: Uuid,
        message: String,
        session_id: String,
        pdf_url: Option<String>,
    ) {
        let payload = WebhookPayload {
            message,
            session_id,
            pdf_url,
            job_id,
            callback_url: self.callback_url.clone(),
        };

        tracing::info!(job_id = %job_id, url = %self.url, "Dispatching estimate request to engine");

        let http = self.http.clone();
        let url = self.url.clone();
        let send = tokio::spawn(async move {
            match http.post(&url).json(&payload).send().await {
                Ok(resp) => {
                    tracing::info!(job_id = %job_id, status = %resp.status(), "Estimate request delivered to engine");
                }
                Err(err) => {
                    tracing::error!(job_id = %job_id, "Failed to reach estimate engine: {:?}", err);
                }
            }
        });

        // Dropping the handle on timeout detaches the task; the send keeps
        // running and logs its own outcome.
        let _ = tokio::time::timeout(self.dispatch_wait, send).await;
    }
}
