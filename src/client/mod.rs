pub mod api;
pub mod chat;
pub mod error;

pub use api::{ApiClient, DEFAULT_SERVER_URL};
pub use chat::{ChatClient, ChatMessage, RequestOutcome};
pub use error::ChatError;
