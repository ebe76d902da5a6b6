//! Request routing and endpoint handlers.

pub mod chat;
pub mod generate;
pub mod status;
pub mod tags;

use crate::http::Request;
use crate::response::Response;
use crate::state::AppState;
use crate::ServerError;

/// Route one parsed request to its handler and fold any failure into the
/// JSON error envelope. Path decides 404, then method decides 405; OPTIONS
/// short-circuits to the CORS preflight for every path.
pub async fn route(state: &AppState, request: &Request) -> Response {
    if request.method == "OPTIONS" {
        return Response::NoContent;
    }

    let result = match request.path.as_str() {
        "/api/generate" => match request.method.as_str() {
            "POST" => generate::handle(state, request).await,
            _ => Err(ServerError::MethodNotAllowed),
        },
        "/api/chat" => match request.method.as_str() {
            "POST" => chat::handle(state, request).await,
            _ => Err(ServerError::MethodNotAllowed),
        },
        "/api/tags" | "/api/tags/" => match request.method.as_str() {
            "GET" | "POST" => tags::handle(state),
            _ => Err(ServerError::MethodNotAllowed),
        },
        "/" | "/api" => match request.method.as_str() {
            "GET" => Ok(status::handle()),
            _ => Err(ServerError::MethodNotAllowed),
        },
        _ => Err(ServerError::NotFound),
    };

    result.unwrap_or_else(ServerError::into_response)
}
