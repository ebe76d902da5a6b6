//! Single-prompt completion request/response types.

use serde::{Deserialize, Serialize};

use super::{default_model, default_stream};

/// `POST /api/generate` request. `model` falls back to the default
/// configuration and `stream` defaults to true, per the protocol.
#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub prompt: String,
    #[serde(default = "default_stream")]
    pub stream: bool,
}

/// Completion payload; identical fields whether buffered or delivered as
/// the single NDJSON line of a chunked body.
#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub model: String,
    pub created_at: String,
    pub response: String,
    pub done: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply() {
        let req: GenerateRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req.model, "default");
        assert_eq!(req.prompt, "");
        assert!(req.stream);
    }

    #[test]
    fn explicit_fields_win() {
        let req: GenerateRequest =
            serde_json::from_str(r#"{"model":"fast","prompt":"Hi","stream":false}"#).unwrap();
        assert_eq!(req.model, "fast");
        assert_eq!(req.prompt, "Hi");
        assert!(!req.stream);
    }
}
