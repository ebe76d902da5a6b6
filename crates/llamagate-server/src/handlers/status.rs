//! Liveness probe.

use crate::response::Response;

/// `GET /` and `GET /api` — the fixed banner clients use to detect a
/// running server.
pub fn handle() -> Response {
    Response::json(200, r#"{"status":"Ollama is running"}"#.to_string())
}
