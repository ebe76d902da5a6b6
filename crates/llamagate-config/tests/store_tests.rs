//! Integration tests for the file-backed configuration store.
//!
//! Validates:
//! - A fresh store always contains a loadable `default` record
//! - Save → load round-trips every field, including the extended sampling set
//! - Partial records (older format) parse with defaults filled in
//! - The default record cannot be deleted; other records can
//! - Empty names are rejected on save

use llamagate_config::*;
use tempfile::TempDir;

fn open_store() -> (TempDir, FileConfigStore) {
    let dir = TempDir::new().unwrap();
    let store = FileConfigStore::open(dir.path().join("configs")).unwrap();
    (dir, store)
}

#[test]
fn fresh_store_has_default() {
    let (_dir, store) = open_store();
    let config = store.load(DEFAULT_CONFIG_NAME).unwrap();
    assert_eq!(config.name, "default");
    assert!(!config.model_url.is_empty());
    assert!(config.prompt_template.contains("{USER_INPUT}"));
    assert_eq!(store.list().unwrap(), vec!["default".to_string()]);
}

#[test]
fn save_load_round_trip() {
    let (_dir, store) = open_store();

    let mut config = Configuration::named("fast");
    config.model_url = "https://example.com/models/fast.gguf?download=true".to_string();
    config.n_ctx = 4096;
    config.n_threads = 8;
    config.n_batch = 64;
    config.temp = 0.2;
    config.top_p = 0.85;
    config.top_k = 20;
    config.prompt_template = "<|user|>{USER_INPUT}<|end|>".to_string();
    config.mirostat = 2;
    config.mirostat_tau = 4.0;
    config.xtc_probability = 0.5;
    config.dry_multiplier = 0.8;
    config.dry_sequence_breakers = "\n".to_string();

    store.save(&config).unwrap();
    let loaded = store.load("fast").unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn partial_record_parses_with_defaults() {
    let (_dir, store) = open_store();

    // Original record format, before the extended sampling set existed.
    let raw = r#"{
        "name": "legacy",
        "modelUrl": "https://example.com/legacy.gguf",
        "nCtx": 1024,
        "nThreads": 4,
        "nBatch": 32,
        "temp": 0.5,
        "topP": 0.95,
        "topK": 50,
        "promptTemplate": "{USER_INPUT}"
    }"#;
    std::fs::write(store.dir().join("legacy.json"), raw).unwrap();

    let config = store.load("legacy").unwrap();
    assert_eq!(config.name, "legacy");
    assert_eq!(config.n_ctx, 1024);
    assert_eq!(config.temp, 0.5);
    // Missing fields come from defaults.
    assert_eq!(config.penalty_repeat, 1.1);
    assert_eq!(config.mirostat, 0);
    assert_eq!(config.dry_base, 1.75);
}

#[test]
fn load_missing_is_not_found() {
    let (_dir, store) = open_store();
    assert!(matches!(
        store.load("missing"),
        Err(ConfigError::NotFound(_))
    ));
}

#[test]
fn delete_default_is_refused() {
    let (_dir, store) = open_store();
    assert!(matches!(
        store.delete(DEFAULT_CONFIG_NAME),
        Err(ConfigError::DefaultProtected)
    ));
    // Still there.
    assert!(store.load(DEFAULT_CONFIG_NAME).is_ok());
}

#[test]
fn delete_removes_record() {
    let (_dir, store) = open_store();
    store.save(&Configuration::named("scratch")).unwrap();
    assert!(store.list().unwrap().contains(&"scratch".to_string()));

    store.delete("scratch").unwrap();
    assert!(!store.list().unwrap().contains(&"scratch".to_string()));
    assert!(matches!(
        store.delete("scratch"),
        Err(ConfigError::NotFound(_))
    ));
}

#[test]
fn empty_name_rejected() {
    let (_dir, store) = open_store();
    let config = Configuration::named("   ");
    assert!(matches!(store.save(&config), Err(ConfigError::EmptyName)));
}

#[test]
fn list_is_sorted() {
    let (_dir, store) = open_store();
    store.save(&Configuration::named("zeta")).unwrap();
    store.save(&Configuration::named("alpha")).unwrap();
    assert_eq!(
        store.list().unwrap(),
        vec![
            "alpha".to_string(),
            "default".to_string(),
            "zeta".to_string()
        ]
    );
}

#[test]
fn sampling_params_mirror_record_fields() {
    let mut config = Configuration::named("tuned");
    config.temp = 0.33;
    config.top_k = 7;
    config.mirostat = 1;
    config.dry_allowed_length = 5;

    let params = config.sampling_params();
    assert_eq!(params.temp, 0.33);
    assert_eq!(params.top_k, 7);
    assert_eq!(params.mirostat, 1);
    assert_eq!(params.dry_allowed_length, 5);
}
