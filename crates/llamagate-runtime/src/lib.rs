//! # llamagate-runtime
//!
//! Backend side of the engine trait. Today this is [`MockEngine`], a
//! deterministic in-process engine the binary and the test suites run
//! against; a llama.cpp FFI binding implements the same trait and slots in
//! without touching server code.
//!
//! The mock honors the trait's lifecycle contract faithfully — `fetch_model`
//! materializes a file at the destination, `initialize` replaces the loaded
//! model, `infer` fails until a model is loaded — so the session manager's
//! swap/skip logic is fully observable in tests. Call counters expose how
//! many times each expensive operation actually ran.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use llamagate_engine::{EngineError, InferenceEngine, Result, SamplingParams};
use tracing::debug;

/// Placeholder bytes written by the mock's `fetch_model`.
const MOCK_MODEL_BYTES: &[u8] = b"GGUF\x00mock model weights\n";

#[derive(Default)]
struct MockState {
    model_path: Option<PathBuf>,
    params: Option<SamplingParams>,
    fetch_calls: u32,
    init_calls: u32,
    infer_calls: u32,
    release_calls: u32,
}

/// Deterministic in-process engine.
///
/// `failing_fetch()` / `failing_init()` build engines whose expensive
/// operations fail, for exercising the server's 500 paths and the session
/// manager's state-preservation rules.
pub struct MockEngine {
    state: Mutex<MockState>,
    fail_fetch: bool,
    fail_init: bool,
}

impl MockEngine {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MockState::default()),
            fail_fetch: false,
            fail_init: false,
        }
    }

    /// An engine whose `fetch_model` always fails.
    pub fn failing_fetch() -> Self {
        Self {
            fail_fetch: true,
            ..Self::new()
        }
    }

    /// An engine whose `initialize` always fails.
    pub fn failing_init() -> Self {
        Self {
            fail_init: true,
            ..Self::new()
        }
    }

    /// Path of the currently loaded model, if any.
    pub fn loaded_model(&self) -> Option<PathBuf> {
        self.state.lock().unwrap().model_path.clone()
    }

    /// Most recently pushed sampling parameters.
    pub fn last_params(&self) -> Option<SamplingParams> {
        self.state.lock().unwrap().params.clone()
    }

    pub fn fetch_calls(&self) -> u32 {
        self.state.lock().unwrap().fetch_calls
    }

    pub fn init_calls(&self) -> u32 {
        self.state.lock().unwrap().init_calls
    }

    pub fn infer_calls(&self) -> u32 {
        self.state.lock().unwrap().infer_calls
    }

    pub fn release_calls(&self) -> u32 {
        self.state.lock().unwrap().release_calls
    }
}

impl Default for MockEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl InferenceEngine for MockEngine {
    fn fetch_model(&self, url: &str, dest: &Path) -> Result<()> {
        self.state.lock().unwrap().fetch_calls += 1;
        if self.fail_fetch {
            return Err(EngineError::Download(format!(
                "simulated download failure for {url}"
            )));
        }
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| EngineError::Download(e.to_string()))?;
        }
        std::fs::write(dest, MOCK_MODEL_BYTES)
            .map_err(|e| EngineError::Download(e.to_string()))?;
        debug!(url, dest = %dest.display(), "mock fetch complete");
        Ok(())
    }

    fn initialize(&self, model_path: &Path) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.init_calls += 1;
        if self.fail_init {
            return Err(EngineError::ModelLoad(format!(
                "simulated init failure for {}",
                model_path.display()
            )));
        }
        state.model_path = Some(model_path.to_path_buf());
        debug!(path = %model_path.display(), "mock model initialized");
        Ok(())
    }

    fn configure_sampling(&self, params: &SamplingParams) {
        self.state.lock().unwrap().params = Some(params.clone());
    }

    fn infer(&self, prompt: &str) -> Result<String> {
        let mut state = self.state.lock().unwrap();
        state.infer_calls += 1;
        if state.model_path.is_none() {
            return Err(EngineError::Inference("no model loaded".to_string()));
        }
        Ok(format!("Mock completion ({} prompt bytes)", prompt.len()))
    }

    fn release(&self) {
        let mut state = self.state.lock().unwrap();
        state.release_calls += 1;
        state.model_path = None;
        state.params = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn fetch_writes_destination_file() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("models").join("m.gguf");
        let engine = MockEngine::new();

        engine.fetch_model("https://example.com/m.gguf", &dest).unwrap();
        assert!(dest.exists());
        assert!(std::fs::metadata(&dest).unwrap().len() > 0);
        assert_eq!(engine.fetch_calls(), 1);
    }

    #[test]
    fn infer_requires_initialized_model() {
        let engine = MockEngine::new();
        assert!(engine.infer("hi").is_err());

        engine.initialize(Path::new("m.gguf")).unwrap();
        let out = engine.infer("hi").unwrap();
        assert!(!out.is_empty());
    }

    #[test]
    fn release_unloads() {
        let engine = MockEngine::new();
        engine.initialize(Path::new("m.gguf")).unwrap();
        assert!(engine.loaded_model().is_some());

        engine.release();
        assert!(engine.loaded_model().is_none());
        assert_eq!(engine.release_calls(), 1);
    }

    #[test]
    fn failure_injection() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("m.gguf");

        let engine = MockEngine::failing_fetch();
        assert!(matches!(
            engine.fetch_model("u", &dest),
            Err(EngineError::Download(_))
        ));
        assert!(!dest.exists());

        let engine = MockEngine::failing_init();
        assert!(matches!(
            engine.initialize(Path::new("m.gguf")),
            Err(EngineError::ModelLoad(_))
        ));
    }

    #[test]
    fn sampling_params_are_recorded() {
        let engine = MockEngine::new();
        let mut params = SamplingParams::default();
        params.temp = 0.123;
        engine.configure_sampling(&params);
        assert_eq!(engine.last_params().unwrap().temp, 0.123);
    }
}
