pub mod result_cache;
pub mod title;
pub mod webhook;

pub use result_cache::{spawn_sweeper, ResultCache};
pub use title::{AnthropicTitleProvider, TitleGenerator, TitleProvider};
pub use webhook::{WebhookClient, WebhookPayload};
