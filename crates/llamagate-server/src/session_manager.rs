//! Model session lifecycle: the single-flight busy lock and the
//! configuration-driven hot-swap protocol.
//!
//! The inference engine tolerates exactly one in-flight operation, and
//! reinitializing it is expensive (possibly a network fetch), so the
//! session manager guarantees mutual exclusion, short-circuits reloading
//! an already-active configuration, and makes "busy" observable before any
//! expensive work starts so contenders can fail fast instead of queueing.
//!
//! Holding the lock is a type-level fact: `try_acquire` hands out a
//! [`SessionGuard`], the lock-requiring operations live on the guard, and
//! dropping the guard releases the lock on every exit path.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use llamagate_config::ConfigStore;
use llamagate_engine::InferenceEngine;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::error::ServerError;
use crate::events::SessionEvent;

/// Returned by [`SessionGuard::infer`] when no model is loaded.
pub const NOT_LOADED_SENTINEL: &str = "Model not loaded";

#[derive(Default)]
struct LoadedState {
    config_name: Option<String>,
    model_path: Option<PathBuf>,
    ready: bool,
}

/// Owns the engine handle and the busy gate. Constructed once by the
/// process entry point and shared as `Arc` with the server and any other
/// caller (a UI would go through the same object).
pub struct ModelSession {
    engine: Arc<dyn InferenceEngine>,
    store: Arc<dyn ConfigStore>,
    models_dir: PathBuf,
    busy: AtomicBool,
    state: Mutex<LoadedState>,
    events: broadcast::Sender<SessionEvent>,
}

impl ModelSession {
    pub fn new(
        engine: Arc<dyn InferenceEngine>,
        store: Arc<dyn ConfigStore>,
        models_dir: PathBuf,
    ) -> Arc<Self> {
        let (events, _) = broadcast::channel(32);
        Arc::new(Self {
            engine,
            store,
            models_dir,
            busy: AtomicBool::new(false),
            state: Mutex::new(LoadedState::default()),
            events,
        })
    }

    /// Try to take the single-flight gate. Fails immediately when another
    /// holder exists — never blocks, never queues.
    pub fn try_acquire(self: &Arc<Self>) -> Option<SessionGuard> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
            .then(|| SessionGuard {
                session: Arc::clone(self),
            })
    }

    /// Release the engine and reset the session to unloaded. Best-effort:
    /// a no-op if an operation is in flight.
    pub fn release_model(self: &Arc<Self>) {
        let Some(_guard) = self.try_acquire() else {
            debug!("session busy, skipping model release");
            return;
        };
        self.engine.release();
        *self.state.lock().unwrap() = LoadedState::default();
        self.publish(SessionEvent::Unloaded);
        info!("model released");
    }

    /// Watch session lifecycle events.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub fn is_ready(&self) -> bool {
        self.state.lock().unwrap().ready
    }

    /// Name of the currently loaded configuration, if any.
    pub fn loaded_configuration(&self) -> Option<String> {
        self.state.lock().unwrap().config_name.clone()
    }

    fn publish(&self, event: SessionEvent) {
        // Best-effort: no subscribers is fine.
        let _ = self.events.send(event);
    }
}

/// Exclusive access to the session. Lock-requiring operations live here;
/// dropping the guard releases the busy gate unconditionally.
pub struct SessionGuard {
    session: Arc<ModelSession>,
}

impl SessionGuard {
    /// Make `name` the active configuration, swapping models if needed.
    ///
    /// Fast path: the configuration is already loaded and ready. Cold
    /// path: load the record, fetch the model file if the derived
    /// destination is missing or empty, release + initialize the engine
    /// when the model path changes, and push sampling parameters
    /// unconditionally.
    ///
    /// A fetch failure leaves the previous model loaded and usable. An
    /// initialize failure resets the session to unloaded — the old engine
    /// instance is already gone at that point, and a half-initialized
    /// session must never look ready.
    pub fn ensure_loaded(&self, name: &str) -> Result<(), ServerError> {
        let session = &self.session;
        {
            let state = session.state.lock().unwrap();
            if state.ready && state.config_name.as_deref() == Some(name) {
                debug!(config = name, "configuration already loaded");
                return Ok(());
            }
        }

        let config = session.store.load(name).map_err(|e| {
            warn!(config = name, error = %e, "configuration record unavailable");
            session.publish(SessionEvent::Error {
                message: format!("Failed to load configuration: {name}"),
            });
            ServerError::ConfigurationLoad(name.to_string())
        })?;

        session.publish(SessionEvent::Loading {
            config: name.to_string(),
        });

        let Some(filename) = filename_from_url(&config.model_url) else {
            warn!(config = name, url = %config.model_url, "cannot derive a file name from model URL");
            return Err(ServerError::ConfigurationLoad(name.to_string()));
        };
        let model_path = session.models_dir.join(filename);

        let needs_fetch = std::fs::metadata(&model_path)
            .map(|m| m.len() == 0)
            .unwrap_or(true);
        if needs_fetch {
            info!(config = name, url = %config.model_url, "fetching model");
            session
                .engine
                .fetch_model(&config.model_url, &model_path)
                .map_err(|e| {
                    session.publish(SessionEvent::Error {
                        message: e.to_string(),
                    });
                    ServerError::from(e)
                })?;
        }

        let path_changed = {
            let state = session.state.lock().unwrap();
            state.model_path.as_deref() != Some(model_path.as_path())
        };
        if path_changed {
            if session.state.lock().unwrap().model_path.is_some() {
                session.engine.release();
            }
            if let Err(e) = session.engine.initialize(&model_path) {
                *session.state.lock().unwrap() = LoadedState::default();
                session.publish(SessionEvent::Error {
                    message: e.to_string(),
                });
                return Err(e.into());
            }
        }

        session.engine.configure_sampling(&config.sampling_params());

        {
            let mut state = session.state.lock().unwrap();
            state.config_name = Some(name.to_string());
            state.model_path = Some(model_path);
            state.ready = true;
        }
        session.publish(SessionEvent::Loaded {
            config: name.to_string(),
        });
        info!(config = name, "configuration loaded");
        Ok(())
    }

    /// Run one inference. Returns the engine output verbatim, or the
    /// not-loaded sentinel when nothing is ready.
    pub fn infer(&self, prompt: &str) -> Result<String, ServerError> {
        let session = &self.session;
        let config = {
            let state = session.state.lock().unwrap();
            if !state.ready {
                return Ok(NOT_LOADED_SENTINEL.to_string());
            }
            state.config_name.clone().unwrap_or_default()
        };

        session.publish(SessionEvent::Generating {
            config: config.clone(),
        });
        let text = session.engine.infer(prompt).map_err(|e| {
            session.publish(SessionEvent::Error {
                message: e.to_string(),
            });
            ServerError::from(e)
        })?;
        session.publish(SessionEvent::Completed { config });
        Ok(text)
    }

    /// The session this guard locks.
    pub fn session(&self) -> &Arc<ModelSession> {
        &self.session
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.session.busy.store(false, Ordering::Release);
    }
}

/// The model file name is the URL's last path segment, with any query
/// string stripped.
fn filename_from_url(url: &str) -> Option<&str> {
    let pure = url.split('?').next().unwrap_or(url);
    let (_, name) = pure.rsplit_once('/')?;
    (!name.is_empty()).then_some(name)
}
