//! Session Title Generation
//!
//! Produces a short human-readable title for a session from its opening
//! exchange. The real provider calls the Anthropic Messages API with a tight
//! token budget; any provider failure degrades to a prefix of the user's
//! first message so a session never ends up blocking on a title.

use async_trait::async_trait;
use std::sync::Arc;

/// Characters of each message included in the title prompt.
const PROMPT_SLICE_CHARS: usize = 200;

/// Characters of the user message used for the fallback title.
const FALLBACK_TITLE_CHARS: usize = 50;

/// Token budget for the generated title.
const TITLE_MAX_TOKENS: u32 = 20;

#[derive(thiserror::Error, Debug)]
pub enum TitleError {
    #[error("title request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("title provider returned HTTP {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },
}

#[async_trait]
pub trait TitleProvider: Send + Sync {
    /// Completes `prompt` into a short title.
    async fn generate(&self, prompt: &str) -> Result<String, TitleError>;
}

/// Calls the Anthropic Messages API.
pub struct AnthropicTitleProvider {
    endpoint: String,
    api_key: String,
    model: String,
    http: reqwest::Client,
}

impl AnthropicTitleProvider {
    pub fn new(
        http: reqwest::Client,
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            model: model.into(),
            http,
        }
    }
}

#[async_trait]
impl TitleProvider for AnthropicTitleProvider {
    async fn generate(&self, prompt: &str) -> Result<String, TitleError> {
        let body = serde_json::json!({
            "model": self.model,
            "max_tokens": TITLE_MAX_TOKENS,
            "messages": [
                { "role": "user", "content": prompt }
            ]
        });

        let response = self
            .http
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(TitleError::Api { status, body });
        }

        let json: serde_json::Value = response.json().await?;
        // A successful response without a leading text block still yields a
        // usable title.
        let title = json["content"][0]["text"]
            .as_str()
            .map(|text| text.trim().to_string())
            .unwrap_or_else(|| String::from("Untitled Conversation"));
        Ok(title)
    }
}

pub struct TitleGenerator {
    provider: Arc<dyn TitleProvider>,
}

impl TitleGenerator {
    pub fn new(provider: Arc<dyn TitleProvider>) -> Self {
        Self { provider }
    }

    fn build_prompt(user_message: &str, assistant_message: &str) -> String {
        format!(
            "Generate a brief 3-5 word title for this construction estimate conversation:\n\nUser: \"{}\"\nAssistant: \"{}\"\n\nTitle (3-5 words only):",
            truncate_chars(user_message, PROMPT_SLICE_CHARS),
            truncate_chars(assistant_message, PROMPT_SLICE_CHARS),
        )
    }

    /// Titles the opening exchange. Provider failures fall back to a prefix
    /// of the user's message, so this always produces something to store.
    pub async fn title_for_exchange(&self, user_message: &str, assistant_message: &str) -> String {
        let prompt = Self::build_prompt(user_message, assistant_message);
        match self.provider.generate(&prompt).await {
            Ok(title) => title,
            Err(err) => {
                tracing::error!("Title generation failed, using fallback: {:?}", err);
                fallback_title(user_message)
            }
        }
    }
}

/// First characters of the user message, with an ellipsis when truncated.
fn fallback_title(user_message: &str) -> String {
    let prefix: String = user_message.chars().take(FALLBACK_TITLE_CHARS).collect();
    let mut title = prefix.trim().to_string();
    if user_message.chars().count() > FALLBACK_TITLE_CHARS {
        title.push_str("...");
    }
    title
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
