//! Listener loop: accept, dispatch one task per connection, stop on
//! cancellation.
//!
//! One connection carries one request. A connection task parses the
//! request, routes it, writes the response, and lets the socket close on
//! drop. Failures inside a task are logged and end that connection only —
//! they never reach the accept loop.

use std::net::SocketAddr;

use tokio::io::BufReader;
use tokio::net::{TcpListener, TcpStream};
use tokio::task::{JoinHandle, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use llamagate_config::DEFAULT_CONFIG_NAME;

use crate::http::{self, ParseError};
use crate::response::{self, Response};
use crate::state::AppState;
use crate::handlers;

/// A running server. Dropping the handle leaves the server running;
/// call [`ServerHandle::shutdown`] to stop it.
pub struct ServerHandle {
    shutdown: CancellationToken,
    task: JoinHandle<()>,
    local_addr: SocketAddr,
}

impl ServerHandle {
    /// The address the listener actually bound (useful with port 0).
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stop accepting and force-terminate outstanding connection tasks.
    /// There is no graceful drain — in-flight requests are dropped.
    pub async fn shutdown(self) {
        self.shutdown.cancel();
        let _ = self.task.await;
    }
}

/// Bind `addr` and start serving in a background task.
pub async fn run_server(state: AppState, addr: SocketAddr) -> std::io::Result<ServerHandle> {
    let listener = TcpListener::bind(addr).await?;
    let local_addr = listener.local_addr()?;
    let shutdown = CancellationToken::new();

    let token = shutdown.clone();
    let task = tokio::spawn(accept_loop(listener, state, token));
    info!(%local_addr, "API server listening");

    Ok(ServerHandle {
        shutdown,
        task,
        local_addr,
    })
}

/// Load the default configuration in the background so the first request
/// does not pay the cold-start cost. Best-effort: skipped when the session
/// is busy, and a failure only logs.
pub fn preload_default(state: &AppState) {
    let session = state.session.clone();
    tokio::task::spawn_blocking(move || match session.try_acquire() {
        Some(guard) => match guard.ensure_loaded(DEFAULT_CONFIG_NAME) {
            Ok(()) => info!("preloaded default configuration"),
            Err(e) => warn!(error = %e, "preload of default configuration failed"),
        },
        None => warn!("session busy, skipping preload"),
    });
}

async fn accept_loop(listener: TcpListener, state: AppState, shutdown: CancellationToken) {
    let mut connections = JoinSet::new();
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            accepted = listener.accept() => match accepted {
                Ok((stream, peer)) => {
                    debug!(%peer, "accepted connection");
                    let state = state.clone();
                    connections.spawn(async move {
                        if let Err(e) = handle_connection(stream, state).await {
                            warn!(%peer, error = %e, "connection failed");
                        }
                    });
                }
                Err(e) => {
                    error!(error = %e, "error accepting connection");
                }
            },
        }
    }
    // No graceful drain: abort whatever is still in flight.
    connections.abort_all();
    info!("API server stopped");
}

async fn handle_connection(stream: TcpStream, state: AppState) -> std::io::Result<()> {
    let (read_half, mut write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);

    let request = match http::read_request(&mut reader).await {
        Ok(request) => request,
        // Closed or blank connection: nothing to answer.
        Err(ParseError::Empty) => return Ok(()),
        Err(ParseError::Io(e)) => return Err(e),
        Err(e) => {
            debug!(error = %e, "malformed request");
            let response = Response::error(400, "Bad Request");
            return response::write_response(&mut write_half, response).await;
        }
    };

    debug!(method = %request.method, path = %request.path, "request");
    let response = handlers::route(&state, &request).await;
    response::write_response(&mut write_half, response).await
    // Socket closes when the halves drop: one request per connection.
}
