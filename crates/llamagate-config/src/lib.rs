//! # llamagate-config
//!
//! Named model configurations and the store that persists them.
//!
//! A [`Configuration`] bundles a model source URL, context/threading knobs,
//! the full sampling-parameter set, and a prompt template. The configuration
//! *name* doubles as the externally visible "model name" on the API: asking
//! the server for model `fast` means "load whatever the `fast` configuration
//! points at".
//!
//! Records serialize as camelCase JSON (`modelUrl`, `nCtx`, ...), one file
//! per configuration. Every field except the identity has a default, so
//! records written before a parameter existed keep parsing.

use std::fs;
use std::path::PathBuf;

use llamagate_engine::SamplingParams;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Name of the configuration that always exists and cannot be deleted.
pub const DEFAULT_CONFIG_NAME: &str = "default";

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors from configuration persistence.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration not found: {0}")]
    NotFound(String),
    #[error("Configuration name cannot be empty")]
    EmptyName,
    #[error("Cannot delete the default configuration")]
    DefaultProtected,
    #[error("Invalid configuration record: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A named model configuration.
///
/// `name` is the identity: lookup key in the store and "model name" on the
/// wire. The sampling fields mirror [`SamplingParams`] and are pushed into
/// the engine opaquely on every load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Configuration {
    pub name: String,
    pub model_url: String,
    pub n_ctx: u32,
    pub n_threads: u32,
    pub n_batch: u32,
    pub temp: f32,
    pub top_p: f32,
    pub top_k: i32,
    /// Template with a `{USER_INPUT}` substitution marker.
    pub prompt_template: String,

    // Extended sampling set, consumed opaquely by the engine.
    pub penalty_last_n: i32,
    pub penalty_repeat: f32,
    pub penalty_freq: f32,
    pub penalty_present: f32,
    pub mirostat: i32,
    pub mirostat_tau: f32,
    pub mirostat_eta: f32,
    pub min_p: f32,
    pub typical_p: f32,
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

impl Default for Configuration {
    fn default() -> Self {
        let sampling = SamplingParams::default();
        Self {
            name: DEFAULT_CONFIG_NAME.to_string(),
            model_url: "https://huggingface.co/TheBloke/TinyLlama-1.1B-Chat-v1.0-GGUF/resolve/main/tinyllama-1.1b-chat-v1.0.Q4_K_M.gguf".to_string(),
            n_ctx: 2048,
            n_threads: 2,
            n_batch: 16,
            temp: sampling.temp,
            top_p: sampling.top_p,
            top_k: sampling.top_k,
            prompt_template: "<|system|>\nYou are a helpful assistant.\n<|user|>\n{USER_INPUT}\n<|assistant|>\n".to_string(),
            penalty_last_n: sampling.penalty_last_n,
            penalty_repeat: sampling.penalty_repeat,
            penalty_freq: sampling.penalty_freq,
            penalty_present: sampling.penalty_present,
            mirostat: sampling.mirostat,
            mirostat_tau: sampling.mirostat_tau,
            mirostat_eta: sampling.mirostat_eta,
            min_p: sampling.min_p,
            typical_p: sampling.typical_p,
            dynatemp_range: sampling.dynatemp_range,
            dynatemp_exponent: sampling.dynatemp_exponent,
            xtc_probability: sampling.xtc_probability,
            xtc_threshold: sampling.xtc_threshold,
            top_n_sigma: sampling.top_n_sigma,
            dry_multiplier: sampling.dry_multiplier,
            dry_base: sampling.dry_base,
            dry_allowed_length: sampling.dry_allowed_length,
            dry_penalty_last_n: sampling.dry_penalty_last_n,
            dry_sequence_breakers: sampling.dry_sequence_breakers,
        }
    }
}

impl Configuration {
    /// Create a configuration with the given name and default values.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Collect the sampling fields into the engine's parameter struct.
    pub fn sampling_params(&self) -> SamplingParams {
        SamplingParams {
            temp: self.temp,
            top_p: self.top_p,
            top_k: self.top_k,
            min_p: self.min_p,
            typical_p: self.typical_p,
            penalty_last_n: self.penalty_last_n,
            penalty_repeat: self.penalty_repeat,
            penalty_freq: self.penalty_freq,
            penalty_present: self.penalty_present,
            mirostat: self.mirostat,
            mirostat_tau: self.mirostat_tau,
            mirostat_eta: self.mirostat_eta,
            dynatemp_range: self.dynatemp_range,
            dynatemp_exponent: self.dynatemp_exponent,
            xtc_probability: self.xtc_probability,
            xtc_threshold: self.xtc_threshold,
            top_n_sigma: self.top_n_sigma,
            dry_multiplier: self.dry_multiplier,
            dry_base: self.dry_base,
            dry_allowed_length: self.dry_allowed_length,
            dry_penalty_last_n: self.dry_penalty_last_n,
            dry_sequence_breakers: self.dry_sequence_breakers.clone(),
        }
    }
}

/// Persistence interface for named configurations.
///
/// The server only ever uses these four operations; anything that can map a
/// name to a record (files, a settings database, a remote registry) can sit
/// behind this.
pub trait ConfigStore: Send + Sync {
    /// Load the record for `name`.
    fn load(&self, name: &str) -> Result<Configuration>;

    /// Persist a record under its own name, overwriting any existing one.
    fn save(&self, config: &Configuration) -> Result<()>;

    /// All stored configuration names.
    fn list(&self) -> Result<Vec<String>>;

    /// Delete the record for `name`. The default record is protected.
    fn delete(&self, name: &str) -> Result<()>;
}

/// File-backed store: one pretty-printed `<name>.json` per configuration.
///
/// Opening the store creates the directory and guarantees the `default`
/// record exists, so a fresh install can serve requests immediately.
pub struct FileConfigStore {
    dir: PathBuf,
}

impl FileConfigStore {
    /// Open (and if necessary create) a store rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        let store = Self { dir };
        store.ensure_default()?;
        Ok(store)
    }

    /// Directory holding the configuration records.
    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }

    fn record_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.json"))
    }

    fn ensure_default(&self) -> Result<()> {
        if !self.record_path(DEFAULT_CONFIG_NAME).exists() {
            self.save(&Configuration::default())?;
            debug!("created default configuration");
        }
        Ok(())
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self, name: &str) -> Result<Configuration> {
        let path = self.record_path(name);
        if !path.exists() {
            return Err(ConfigError::NotFound(name.to_string()));
        }
        let raw = fs::read_to_string(&path)?;
        let config = serde_json::from_str(&raw)?;
        debug!(name, "loaded configuration");
        Ok(config)
    }

    fn save(&self, config: &Configuration) -> Result<()> {
        if config.name.trim().is_empty() {
            return Err(ConfigError::EmptyName);
        }
        let raw = serde_json::to_string_pretty(config)?;
        fs::write(self.record_path(&config.name), raw)?;
        debug!(name = %config.name, "saved configuration");
        Ok(())
    }

    fn list(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) == Some("json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    names.push(stem.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    fn delete(&self, name: &str) -> Result<()> {
        if name == DEFAULT_CONFIG_NAME {
            warn!("refusing to delete the default configuration");
            return Err(ConfigError::DefaultProtected);
        }
        let path = self.record_path(name);
        if !path.exists() {
            return Err(ConfigError::NotFound(name.to_string()));
        }
        fs::remove_file(path)?;
        debug!(name, "deleted configuration");
        Ok(())
    }
}
