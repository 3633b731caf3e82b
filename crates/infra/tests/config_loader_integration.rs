//! Integration tests for configuration loader
//!
//! Tests the end-to-end behavior of loading configuration from files and
//! turning it into a working client and credential store.

use std::io::Write;
use std::sync::Mutex;

use lifeos_domain::{LifeosError, StorageBackend};
use lifeos_infra::config::loader::{
    ENV_API_BASE_URL, ENV_API_TIMEOUT_SECS, ENV_STORAGE_BACKEND, ENV_VARS,
};
use lifeos_infra::{config, open_credential_store, ApiClient, ApiClientConfig, CredentialStore};
use once_cell::sync::Lazy;
use tempfile::NamedTempFile;

static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

/// Runs `f` with exactly the given `LIFEOS_*` variables set.
fn with_env<T>(vars: &[(&str, &str)], f: impl FnOnce() -> T) -> T {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    for key in ENV_VARS {
        std::env::remove_var(key);
    }
    for (key, value) in vars {
        std::env::set_var(key, value);
    }

    let result = f();

    for key in ENV_VARS {
        std::env::remove_var(key);
    }
    result
}

fn write_config(suffix: &str, contents: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::with_suffix(suffix).expect("Failed to create temp file");
    temp_file.write_all(contents.as_bytes()).expect("Failed to write to temp file");
    temp_file
}

#[test]
fn test_load_config_from_json_file() {
    let json_content = r#"{
        "api": {
            "base_url": "https://lifeos.example.com/api",
            "timeout_secs": 12,
            "user_agent": "lifeos-desktop/2.0"
        },
        "storage": {
            "backend": "keychain",
            "service_name": "LifeOS.integration"
        }
    }"#;
    let file = write_config(".json", json_content);

    let config = config::load_from_file(Some(file.path().to_path_buf()))
        .expect("Failed to load config from JSON file");

    assert_eq!(config.api.base_url, "https://lifeos.example.com/api");
    assert_eq!(config.api.timeout_secs, 12);
    assert_eq!(config.api.user_agent.as_deref(), Some("lifeos-desktop/2.0"));
    assert_eq!(config.storage.backend, StorageBackend::Keychain);
    assert_eq!(config.storage.service_name, "LifeOS.integration");
}

#[test]
fn test_load_config_from_toml_file() {
    let toml_content = r#"
[api]
base_url = "http://127.0.0.1:8000/api"

[storage]
backend = "file"
path = "/tmp/lifeos-integration/session.json"
"#;
    let file = write_config(".toml", toml_content);

    let config = config::load_from_file(Some(file.path().to_path_buf()))
        .expect("Failed to load config from TOML file");

    assert_eq!(config.api.base_url, "http://127.0.0.1:8000/api");
    assert_eq!(config.api.timeout_secs, 30);
    assert_eq!(config.storage.backend, StorageBackend::File);
    assert_eq!(config.storage.path.as_deref(), Some("/tmp/lifeos-integration/session.json"));
}

#[test]
fn test_partial_file_uses_defaults() {
    let file = write_config(".json", "{}");

    let config = config::load_from_file(Some(file.path().to_path_buf())).unwrap();
    assert_eq!(config.api.base_url, "http://localhost:8000/api");
    assert_eq!(config.storage.backend, StorageBackend::File);
}

#[test]
fn test_invalid_json_is_config_error() {
    let file = write_config(".json", "{ this is not json }");

    let result = config::load_from_file(Some(file.path().to_path_buf()));
    assert!(matches!(result, Err(LifeosError::Config(ref m)) if m.contains("JSON")));
}

#[test]
fn test_invalid_base_url_is_config_error() {
    let file = write_config(".toml", "[api]\nbase_url = \"localhost without scheme\"\n");

    let result = config::load_from_file(Some(file.path().to_path_buf()));
    assert!(matches!(result, Err(LifeosError::Config(_))));
}

#[tokio::test]
async fn test_loaded_config_builds_client_and_store() {
    let dir = tempfile::tempdir().unwrap();
    let session_path = dir.path().join("session.json");
    let json_content = format!(
        r#"{{
            "api": {{ "base_url": "http://localhost:8000/api/" }},
            "storage": {{ "backend": "file", "path": {} }}
        }}"#,
        serde_json::to_string(&session_path.to_string_lossy()).unwrap()
    );
    let file = write_config(".json", &json_content);

    let config = config::load_from_file(Some(file.path().to_path_buf())).unwrap();
    let store = open_credential_store(&config.storage).unwrap();
    let client = ApiClient::new(ApiClientConfig::from(&config.api), store.clone()).unwrap();

    assert_eq!(client.base_url(), "http://localhost:8000/api");

    store.set_token("from-config").await.unwrap();
    assert!(session_path.exists());
    assert_eq!(client.credential_store().token().await.unwrap().as_deref(), Some("from-config"));
}

#[test]
fn test_load_reports_invalid_env_value() {
    let result = with_env(
        &[(ENV_API_BASE_URL, "http://127.0.0.1:9/api"), (ENV_API_TIMEOUT_SECS, "soon")],
        config::load,
    );

    assert!(
        matches!(result, Err(LifeosError::Config(ref m)) if m.contains("timeout")),
        "invalid env value must not fall back to defaults, got {:?}",
        result
    );
}

#[test]
fn test_load_requires_base_url_when_other_env_vars_set() {
    let result = with_env(&[(ENV_STORAGE_BACKEND, "memory")], config::load);

    assert!(
        matches!(result, Err(LifeosError::Config(ref m)) if m.contains(ENV_API_BASE_URL)),
        "got {:?}",
        result
    );
}

#[test]
fn test_load_uses_env_when_set() {
    let config = with_env(
        &[(ENV_API_BASE_URL, "http://127.0.0.1:9/api"), (ENV_STORAGE_BACKEND, "memory")],
        config::load,
    )
    .expect("env configuration should load");

    assert_eq!(config.api.base_url, "http://127.0.0.1:9/api");
    assert_eq!(config.storage.backend, StorageBackend::Memory);
}

#[test]
fn test_load_without_env_or_file_uses_defaults() {
    let config = with_env(&[], config::load).expect("defaults should load");

    assert_eq!(config.api.base_url, "http://localhost:8000/api");
    assert_eq!(config.api.timeout_secs, 30);
}
