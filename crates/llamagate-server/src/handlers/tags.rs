//! Model listing handler: stored configurations presented as "models".

use llamagate_config::ConfigStore;
use tracing::error;

use crate::models::{now_timestamp, ModelEntry, TagsResponse};
use crate::response::Response;
use crate::state::AppState;
use crate::ServerError;

/// `GET|POST /api/tags`.
pub fn handle(state: &AppState) -> Result<Response, ServerError> {
    let names = state.store.list().map_err(|e| {
        error!(error = %e, "failed to enumerate configurations");
        ServerError::Internal
    })?;

    let timestamp = now_timestamp();
    let models = names
        .into_iter()
        .map(|name| ModelEntry::for_configuration(name, &timestamp))
        .collect();

    let body = serde_json::to_string(&TagsResponse { models })?;
    Ok(Response::json(200, body))
}
