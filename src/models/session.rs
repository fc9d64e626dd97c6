use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A chat conversation. Rows are created lazily the first time a message is
/// stored under a client-generated id.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Session {
    pub id: String,
    pub title: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
