//! HTTP error handling and status mapping.

use llamagate_engine::EngineError;

use crate::response::Response;

/// Everything a handler can fail with. Each variant maps to one HTTP
/// status, and the display string becomes the `{"error": "..."}` envelope.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid JSON: {0}")]
    MalformedRequest(String),

    #[error("No messages provided")]
    EmptyMessages,

    #[error("Not Found")]
    NotFound,

    #[error("Method Not Allowed")]
    MethodNotAllowed,

    #[error("Model is busy processing another request")]
    ModelBusy,

    #[error("Failed to load configuration: {0}")]
    ConfigurationLoad(String),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("Internal Server Error")]
    Internal,
}

impl ServerError {
    /// HTTP status code for this error.
    pub fn status(&self) -> u16 {
        match self {
            ServerError::MalformedRequest(_) | ServerError::EmptyMessages => 400,
            ServerError::NotFound => 404,
            ServerError::MethodNotAllowed => 405,
            ServerError::ModelBusy => 503,
            ServerError::ConfigurationLoad(_)
            | ServerError::Engine(_)
            | ServerError::Internal => 500,
        }
    }

    /// Wrap this error in the JSON error envelope.
    pub fn into_response(self) -> Response {
        Response::error(self.status(), &self.to_string())
    }
}

// Serializing one of our own response types cannot realistically fail;
// if it ever does, the client sees a plain 500.
impl From<serde_json::Error> for ServerError {
    fn from(_: serde_json::Error) -> Self {
        ServerError::Internal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(ServerError::MalformedRequest("x".into()).status(), 400);
        assert_eq!(ServerError::EmptyMessages.status(), 400);
        assert_eq!(ServerError::NotFound.status(), 404);
        assert_eq!(ServerError::MethodNotAllowed.status(), 405);
        assert_eq!(ServerError::ModelBusy.status(), 503);
        assert_eq!(
            ServerError::ConfigurationLoad("fast".into()).status(),
            500
        );
        assert_eq!(
            ServerError::Engine(EngineError::Download("x".into())).status(),
            500
        );
    }

    #[test]
    fn busy_message_is_the_retryable_contract() {
        // Clients key off this exact string; it is part of the API.
        assert_eq!(
            ServerError::ModelBusy.to_string(),
            "Model is busy processing another request"
        );
    }

    #[test]
    fn engine_errors_pass_through_their_message() {
        let e = ServerError::Engine(EngineError::ModelLoad("bad magic".into()));
        assert_eq!(e.to_string(), "Model init failed: bad magic");
    }
}
