//! # llamagate-engine
//!
//! The "narrow waist" of the llamagate stack. Defines the core
//! [`InferenceEngine`] trait and associated types that all other crates
//! depend on. Implementations can swap a real llama.cpp binding for the
//! in-process mock without changing application code.
//!
//! ## Design Notes
//!
//! ### Interior Mutability
//! `InferenceEngine` methods take `&self` (not `&mut self`) so the engine
//! can be shared as `Arc<dyn InferenceEngine>` across tasks. Backends using
//! interior mutability (e.g., `Mutex`) are responsible for their own state
//! management. The trait makes NO reentrancy promise: callers must hold the
//! session busy lock around every operation. The engine is a stateful
//! native resource — `initialize` replaces whatever model was loaded, and
//! `infer` mutates internal context state.
//!
//! ### Synchronous API
//! All methods block the calling thread. A real binding wraps a foreign
//! library that cannot be polled; async callers run these under
//! `spawn_blocking`.

use std::path::Path;

pub type Result<T> = std::result::Result<T, EngineError>;

/// Top-level error type for all engine operations.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Download failed: {0}")]
    Download(String),
    #[error("Model init failed: {0}")]
    ModelLoad(String),
    #[error("Inference failed: {0}")]
    Inference(String),
}

/// Sampling parameters pushed into the engine before generation.
///
/// A closed set of named numeric controls consumed opaquely by the backend;
/// the server never interprets them. Field names follow llama.cpp's
/// sampling chain.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplingParams {
    pub temp: f32,
    pub top_p: f32,
    pub top_k: i32,
    pub min_p: f32,
    pub typical_p: f32,
    pub penalty_last_n: i32,
    pub penalty_repeat: f32,
    pub penalty_freq: f32,
    pub penalty_present: f32,
    pub mirostat: i32,
    pub mirostat_tau: f32,
    pub mirostat_eta: f32,
    pub dynatemp_range: f32,
    pub dynatemp_exponent: f32,
    pub xtc_probability: f32,
    pub xtc_threshold: f32,
    pub top_n_sigma: f32,
    pub dry_multiplier: f32,
    pub dry_base: f32,
    pub dry_allowed_length: i32,
    pub dry_penalty_last_n: i32,
    pub dry_sequence_breakers: String,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            temp: 0.7,
            top_p: 0.9,
            top_k: 40,
            min_p: 0.05,
            typical_p: 1.0,
            penalty_last_n: 64,
            penalty_repeat: 1.1,
            penalty_freq: 0.0,
            penalty_present: 0.0,
            mirostat: 0,
            mirostat_tau: 5.0,
            mirostat_eta: 0.1,
            dynatemp_range: 0.0,
            dynatemp_exponent: 1.0,
            xtc_probability: 0.0,
            xtc_threshold: 0.1,
            top_n_sigma: -1.0,
            dry_multiplier: 0.0,
            dry_base: 1.75,
            dry_allowed_length: 2,
            dry_penalty_last_n: -1,
            dry_sequence_breakers: "\n:\"*".to_string(),
        }
    }
}

/// The core engine trait — everything else plugs into this.
///
/// Five capabilities: fetch a model file, initialize from a path, push
/// sampling parameters, run one inference, release the loaded model.
/// Server code depends on *engine behavior*, not implementation details;
/// swap the mock for an FFI binding without changing application code.
pub trait InferenceEngine: Send + Sync {
    /// Download a model file to `dest`. Called only when the destination
    /// does not already hold a usable file.
    fn fetch_model(&self, url: &str, dest: &Path) -> Result<()>;

    /// Load the model at `model_path`, replacing any previously loaded one.
    fn initialize(&self, model_path: &Path) -> Result<()>;

    /// Push sampling parameters. Cheap and idempotent; safe to call on
    /// every configuration (re)load.
    fn configure_sampling(&self, params: &SamplingParams);

    /// Run one full generation and return the produced text.
    fn infer(&self, prompt: &str) -> Result<String>;

    /// Free the loaded model and its native resources.
    fn release(&self);
}
