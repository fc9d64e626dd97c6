use thiserror::Error;

/// Failures the chat front end has to resolve into something readable.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("server response missing expected payload")]
    MissingPayload,
    #[error("a request is already in flight")]
    Busy,
    #[error("nothing to send")]
    EmptyMessage,
}
