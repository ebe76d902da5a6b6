//! # llamagate-server
//!
//! Ollama-compatible HTTP API (`/api/generate`, `/api/chat`, `/api/tags`)
//! in front of a single loaded model, with runtime model swap by named
//! configuration.
//!
//! There is no HTTP framework here on purpose: the server parses requests
//! off raw socket bytes and writes responses (including chunked transfer
//! framing) itself. One connection carries exactly one request and is
//! closed after the response — no keep-alive, no TLS, no routing table
//! beyond the fixed Ollama surface.
//!
//! The other half of the crate is the serialization core: [`ModelSession`]
//! guards a non-reentrant inference engine behind a single-flight busy
//! lock, so concurrent clients either proceed alone or fail fast with 503.

pub mod error;
pub mod events;
pub mod handlers;
pub mod http;
pub mod models;
pub mod prompt;
pub mod response;
pub mod server;
pub mod session_manager;
pub mod state;

pub use error::ServerError;
pub use events::SessionEvent;
pub use response::Response;
pub use server::{preload_default, run_server, ServerHandle};
pub use session_manager::{ModelSession, SessionGuard};
pub use state::AppState;

/// Default listen port, matching the protocol this server mimics.
pub const DEFAULT_PORT: u16 = 11434;
