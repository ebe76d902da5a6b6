//! Multi-message completion handler.

use llamagate_config::ConfigStore;

use crate::models::{now_timestamp, ChatMessage, ChatRequest, ChatResponse};
use crate::prompt;
use crate::response::Response;
use crate::state::AppState;
use crate::ServerError;

/// `POST /api/chat`.
///
/// Same shape as generate, with the message sequence flattened into a
/// single prompt. An empty or absent `messages` array is rejected before
/// the gate is touched.
pub async fn handle(
    state: &AppState,
    request: &crate::http::Request,
) -> Result<Response, ServerError> {
    let req: ChatRequest = request.json()?;
    if req.messages.is_empty() {
        return Err(ServerError::EmptyMessages);
    }

    let guard = state.session.try_acquire().ok_or(ServerError::ModelBusy)?;

    let store = state.store.clone();
    let model = req.model.clone();
    let messages = req.messages;
    let response_text = tokio::task::spawn_blocking(move || {
        guard.ensure_loaded(&model)?;
        let template = store.load(&model).ok().map(|c| c.prompt_template);
        let full_prompt = prompt::build_from_messages(&messages, template.as_deref());
        guard.infer(&full_prompt)
    })
    .await
    .map_err(|_| ServerError::Internal)??;

    let payload = ChatResponse {
        model: req.model,
        created_at: now_timestamp(),
        message: ChatMessage::assistant(response_text),
        done: true,
    };
    let body = serde_json::to_string(&payload)?;
    Ok(if req.stream {
        Response::Chunked { body }
    } else {
        Response::json(200, body)
    })
}
