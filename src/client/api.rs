//! HTTP client for the estimator server.
//!
//! Mirrors the server's JSON envelope and exposes one typed method per
//! endpoint: job submission and polling on the estimate side, listing,
//! transcript retrieval, message saves and deletion on the session side.

use crate::client::error::ChatError;
use crate::forms;
use crate::models::{JobAccepted, JobResult, Message, MessageRole, Session};
use serde::Deserialize;
use uuid::Uuid;

/// Default server address for local use.
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000";

/// The server wraps every response in
/// `{ "status": ..., "message": ..., "code": ..., "id": ..., "item": ..., "list": [...] }`.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    pub status: Option<String>,
    pub message: Option<String>,
    pub code: Option<u32>,
    pub id: Option<String>,
    pub item: Option<T>,
    pub list: Option<Vec<T>>,
}

pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        }
    }

    /// Reads an envelope, turning non-2xx answers into [`ChatError::Rejected`]
    /// carrying the server's message when the body parses as an envelope.
    async fn parse<T: serde::de::DeserializeOwned>(
        resp: reqwest::Response,
    ) -> Result<Envelope<T>, ChatError> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<Envelope<serde_json::Value>>(&body)
                .ok()
                .and_then(|envelope| envelope.message)
                .unwrap_or(body);
            return Err(ChatError::Rejected {
                status: status.as_u16(),
                message,
            });
        }
        Ok(resp.json::<Envelope<T>>().await?)
    }

    /// `POST /estimate`. Returns the job id the server minted.
    pub async fn submit_estimate(
        &self,
        message: &str,
        session_id: &str,
        attachment_url: Option<&str>,
    ) -> Result<Uuid, ChatError> {
        let url = format!("{}/estimate", self.base_url);
        let form = forms::SubmitEstimateForm {
            message: message.to_string(),
            session_id: session_id.to_string(),
            attachment_url: attachment_url.map(|s| s.to_string()),
        };
        let resp = self.http.post(&url).json(&form).send().await?;
        let envelope: Envelope<JobAccepted> = Self::parse(resp).await?;
        envelope
            .item
            .map(|accepted| accepted.job_id)
            .ok_or(ChatError::MissingPayload)
    }

    /// `GET /estimate/status/{job_id}`.
    pub async fn job_status(&self, job_id: Uuid) -> Result<JobResult, ChatError> {
        let url = format!("{}/estimate/status/{}", self.base_url, job_id);
        let resp = self.http.get(&url).send().await?;
        let envelope: Envelope<JobResult> = Self::parse(resp).await?;
        envelope.item.ok_or(ChatError::MissingPayload)
    }

    /// `POST /sessions/{id}/messages`.
    pub async fn save_message(
        &self,
        session_id: &str,
        role: MessageRole,
        content: &str,
    ) -> Result<Message, ChatError> {
        let url = format!("{}/sessions/{}/messages", self.base_url, session_id);
        let form = forms::SaveMessageForm {
            role,
            content: content.to_string(),
        };
        let resp = self.http.post(&url).json(&form).send().await?;
        let envelope: Envelope<Message> = Self::parse(resp).await?;
        envelope.item.ok_or(ChatError::MissingPayload)
    }

    /// `GET /sessions`.
    pub async fn list_sessions(&self) -> Result<Vec<Session>, ChatError> {
        let url = format!("{}/sessions", self.base_url);
        let resp = self.http.get(&url).send().await?;
        let envelope: Envelope<Session> = Self::parse(resp).await?;
        Ok(envelope.list.unwrap_or_default())
    }

    /// `GET /sessions/{id}/messages`.
    pub async fn session_messages(&self, session_id: &str) -> Result<Vec<Message>, ChatError> {
        let url = format!("{}/sessions/{}/messages", self.base_url, session_id);
        let resp = self.http.get(&url).send().await?;
        let envelope: Envelope<Message> = Self::parse(resp).await?;
        Ok(envelope.list.unwrap_or_default())
    }

    /// `DELETE /sessions/{id}`.
    pub async fn delete_session(&self, session_id: &str) -> Result<(), ChatError> {
        let url = format!("{}/sessions/{}", self.base_url, session_id);
        let resp = self.http.delete(&url).send().await?;
        Self::parse::<serde_json::Value>(resp).await?;
        Ok(())
    }
}
