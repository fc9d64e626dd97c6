//! Chat-style front end over the estimate job protocol.
//!
//! One exchange runs submit, placeholder append, poll-until-terminal,
//! placeholder replacement, persistence. Every failure path resolves to
//! readable text in the transcript; the caller only ever renders bubbles.

use crate::client::api::ApiClient;
use crate::client::error::ChatError;
use crate::models::{JobStatus, MessageRole};
use std::sync::Arc;
use std::time::Duration;

pub const POLL_INTERVAL: Duration = Duration::from_secs(3);
pub const MAX_POLL_ATTEMPTS: u32 = 200;

const PROCESSING_PLACEHOLDER: &str = "⏳ Processing your request...";
const COMPLETED_DEFAULT_TEXT: &str = "Processing completed";
const ERROR_DEFAULT_TEXT: &str = "Processing failed";
const TIMEOUT_TEXT: &str = "Request timed out. Please try again.";
const POLL_FAILED_TEXT: &str = "Error checking results. Please try again.";
const SUBMIT_FAILED_TEXT: &str = "Sorry, I encountered an error. Please try again.";

/// One transcript bubble.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// How an exchange ended from the user's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    Completed,
    Failed,
    TimedOut,
}

pub struct ChatClient {
    api: Arc<ApiClient>,
    session_id: String,
    transcript: Vec<ChatMessage>,
    busy: bool,
    poll_interval: Duration,
    max_attempts: u32,
}

impl ChatClient {
    pub fn new(api: Arc<ApiClient>, session_id: impl Into<String>) -> Self {
        Self {
            api,
            session_id: session_id.into(),
            transcript: Vec::new(),
            busy: false,
            poll_interval: POLL_INTERVAL,
            max_attempts: MAX_POLL_ATTEMPTS,
        }
    }

    /// Overrides the polling cadence.
    pub fn with_polling(mut self, interval: Duration, max_attempts: u32) -> Self {
        self.poll_interval = interval;
        self.max_attempts = max_attempts;
        self
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Runs one full exchange. A message consisting only of an attachment is
    /// sent as `Uploaded PDF: {url}`. Only a busy client or an empty
    /// submission produce an error; every server-side failure ends up as
    /// assistant text in the transcript instead.
    pub async fn send_message(
        &mut self,
        text: &str,
        attachment_url: Option<&str>,
    ) -> Result<RequestOutcome, ChatError> {
        if self.busy {
            return Err(ChatError::Busy);
        }
        if text.is_empty() && attachment_url.is_none() {
            return Err(ChatError::EmptyMessage);
        }

        self.busy = true;
        let outcome = self.run_exchange(text, attachment_url).await;
        self.busy = false;
        Ok(outcome)
    }

    async fn run_exchange(&mut self, text: &str, attachment_url: Option<&str>) -> RequestOutcome {
        let content = match attachment_url {
            Some(url) if text.is_empty() => format!("Uploaded PDF: {}", url),
            _ => text.to_string(),
        };

        // Optimistic append of both sides; the placeholder slot is replaced
        // in place once the job resolves.
        self.transcript.push(ChatMessage::user(content.clone()));
        let placeholder_index = self.transcript.len();
        self.transcript
            .push(ChatMessage::assistant(PROCESSING_PLACEHOLDER));

        // The user side is persisted off the request path; a failed save is
        // logged and never surfaced.
        let api = self.api.clone();
        let session_id = self.session_id.clone();
        let user_content = content.clone();
        tokio::spawn(async move {
            if let Err(err) = api
                .save_message(&session_id, MessageRole::User, &user_content)
                .await
            {
                tracing::error!("Failed to persist user message: {}", err);
            }
        });

        let job_id = match self
            .api
            .submit_estimate(&content, &self.session_id, attachment_url)
            .await
        {
            Ok(job_id) => job_id,
            Err(err) => {
                tracing::error!("Submission failed: {}", err);
                self.replace(placeholder_index, SUBMIT_FAILED_TEXT);
                return RequestOutcome::Failed;
            }
        };

        for _attempt in 0..self.max_attempts {
            tokio::time::sleep(self.poll_interval).await;

            let result = match self.api.job_status(job_id).await {
                Ok(result) => result,
                Err(err) => {
                    tracing::error!("Polling failed for job {}: {}", job_id, err);
                    self.replace(placeholder_index, POLL_FAILED_TEXT);
                    return RequestOutcome::Failed;
                }
            };

            match result.status {
                JobStatus::Processing => continue,
                JobStatus::Completed => {
                    let response = result
                        .response
                        .unwrap_or_else(|| String::from(COMPLETED_DEFAULT_TEXT));
                    self.replace(placeholder_index, &response);
                    if let Err(err) = self
                        .api
                        .save_message(&self.session_id, MessageRole::Assistant, &response)
                        .await
                    {
                        tracing::error!("Failed to persist assistant message: {}", err);
                    }
                    return RequestOutcome::Completed;
                }
                JobStatus::Error => {
                    let message = result
                        .error
                        .unwrap_or_else(|| String::from(ERROR_DEFAULT_TEXT));
                    self.replace(placeholder_index, &format!("Error: {}", message));
                    return RequestOutcome::Failed;
                }
                JobStatus::Expired => {
                    self.replace(placeholder_index, TIMEOUT_TEXT);
                    return RequestOutcome::TimedOut;
                }
            }
        }

        self.replace(placeholder_index, TIMEOUT_TEXT);
        RequestOutcome::TimedOut
    }

    fn replace(&mut self, index: usize, content: &str) {
        if let Some(slot) = self.transcript.get_mut(index) {
            slot.content = content.to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unreachable_client() -> ChatClient {
        let api = Arc::new(ApiClient::new("http://127.0.0.1:9"));
        ChatClient::new(api, "s-test").with_polling(Duration::from_millis(10), 3)
    }

    #[tokio::test]
    async fn busy_client_rejects_submissions() {
        let mut chat = unreachable_client();
        chat.busy = true;
        let err = chat.send_message("hello", None).await.unwrap_err();
        assert!(matches!(err, ChatError::Busy));
        assert!(chat.transcript().is_empty());
    }

    #[tokio::test]
    async fn empty_submission_is_rejected() {
        let mut chat = unreachable_client();
        let err = chat.send_message("", None).await.unwrap_err();
        assert!(matches!(err, ChatError::EmptyMessage));
    }

    #[tokio::test]
    async fn attachment_only_message_gets_upload_text() {
        let mut chat = unreachable_client();
        let outcome = chat
            .send_message("", Some("https://storage.example.com/plans.pdf"))
            .await
            .unwrap();
        // The server is unreachable, so the exchange fails after the
        // optimistic append.
        assert_eq!(outcome, RequestOutcome::Failed);
        assert_eq!(
            chat.transcript()[0].content,
            "Uploaded PDF: https://storage.example.com/plans.pdf"
        );
        assert_eq!(chat.transcript()[1].content, SUBMIT_FAILED_TEXT);
        assert!(!chat.is_busy());
    }
}
