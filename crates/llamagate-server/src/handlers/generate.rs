//! Single-prompt completion handler.

use llamagate_config::ConfigStore;

use crate::models::{now_timestamp, GenerateRequest, GenerateResponse};
use crate::prompt;
use crate::response::Response;
use crate::state::AppState;
use crate::ServerError;

/// `POST /api/generate`.
///
/// Acquires the single-flight gate before any expensive work — a busy
/// session answers 503 immediately with nothing mutated. The guarded
/// section (configuration load, prompt assembly, inference) runs on a
/// blocking thread because the engine is synchronous; the guard moves in
/// with it and releases the gate on every exit path.
pub async fn handle(
    state: &AppState,
    request: &crate::http::Request,
) -> Result<Response, ServerError> {
    let req: GenerateRequest = request.json()?;

    let guard = state.session.try_acquire().ok_or(ServerError::ModelBusy)?;

    let store = state.store.clone();
    let model = req.model.clone();
    let user_prompt = req.prompt;
    let response_text = tokio::task::spawn_blocking(move || {
        guard.ensure_loaded(&model)?;
        let template = store.load(&model).ok().map(|c| c.prompt_template);
        let full_prompt = prompt::build_single_turn(&user_prompt, template.as_deref());
        guard.infer(&full_prompt)
    })
    .await
    .map_err(|_| ServerError::Internal)??;

    let payload = GenerateResponse {
        model: req.model,
        created_at: now_timestamp(),
        response: response_text,
        done: true,
    };
    let body = serde_json::to_string(&payload)?;
    Ok(if req.stream {
        Response::Chunked { body }
    } else {
        Response::json(200, body)
    })
}
