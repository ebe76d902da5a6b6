//! Session lifecycle events.
//!
//! The session manager publishes these on a broadcast channel instead of
//! calling back into registered listeners — any number of subscribers (the
//! binary's logging task, a UI, tests) can watch the model lifecycle
//! without the manager knowing who they are. Sends are best-effort: with
//! no subscribers the events are simply dropped.

/// Lifecycle event published by [`crate::ModelSession`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A configuration (and possibly its model file) is being loaded.
    Loading { config: String },
    /// The configuration is loaded and the engine is ready.
    Loaded { config: String },
    /// An inference call is about to run.
    Generating { config: String },
    /// The inference call returned.
    Completed { config: String },
    /// The engine was released and the session reset.
    Unloaded,
    /// A load or inference step failed.
    Error { message: String },
}
