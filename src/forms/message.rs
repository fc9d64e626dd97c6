use crate::models::MessageRole;
use serde::{Deserialize, Serialize};
use serde_valid::Validate;

/// Body of `POST /sessions/{id}/messages`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SaveMessageForm {
    pub role: MessageRole,
    #[validate(min_length = 1)]
    pub content: String,
}
