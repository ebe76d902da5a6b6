//! Wire-format request/response types.

pub mod chat;
pub mod generate;
pub mod tags;

pub use chat::{ChatMessage, ChatRequest, ChatResponse};
pub use generate::{GenerateRequest, GenerateResponse};
pub use tags::{ModelDetails, ModelEntry, TagsResponse};

use llamagate_config::DEFAULT_CONFIG_NAME;

/// API timestamp: `yyyy-MM-ddTHH:mm:ss.SSSZ`, UTC.
pub fn now_timestamp() -> String {
    chrono::Utc::now()
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string()
}

pub(crate) fn default_model() -> String {
    DEFAULT_CONFIG_NAME.to_string()
}

pub(crate) fn default_stream() -> bool {
    true
}
