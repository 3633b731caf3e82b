//! Configuration loader
//!
//! Loads client configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. Reads a `.env` file from the working directory if one exists
//! 2. If any `LIFEOS_*` variable is set, loads from the environment and
//!    returns its errors as-is
//! 3. Otherwise falls back to a config file
//! 4. If no config file exists either, uses built-in defaults
//!
//! ## Environment Variables
//! - `LIFEOS_API_BASE_URL`: API base URL (required for env loading)
//! - `LIFEOS_API_TIMEOUT_SECS`: Request timeout in seconds
//! - `LIFEOS_STORAGE_BACKEND`: `memory`, `file` or `keychain`
//! - `LIFEOS_STORAGE_PATH`: Session file path for the `file` backend
//! - `LIFEOS_KEYCHAIN_SERVICE`: Keychain service name
//!
//! ## File Locations
//! The loader searches the following paths (in order):
//! 1. `./config.{json,toml}` and `./lifeos.{json,toml}` (working directory)
//! 2. `../config.{json,toml}` (parent directory)
//! 3. The same names next to the executable

use std::path::{Path, PathBuf};
use std::str::FromStr;

use lifeos_domain::{ApiConfig, Config, LifeosError, Result, StorageBackend, StorageConfig};
use url::Url;

pub const ENV_API_BASE_URL: &str = "LIFEOS_API_BASE_URL";
pub const ENV_API_TIMEOUT_SECS: &str = "LIFEOS_API_TIMEOUT_SECS";
pub const ENV_STORAGE_BACKEND: &str = "LIFEOS_STORAGE_BACKEND";
pub const ENV_STORAGE_PATH: &str = "LIFEOS_STORAGE_PATH";
pub const ENV_KEYCHAIN_SERVICE: &str = "LIFEOS_KEYCHAIN_SERVICE";

/// Every variable the loader reads.
pub const ENV_VARS: [&str; 5] = [
    ENV_API_BASE_URL,
    ENV_API_TIMEOUT_SECS,
    ENV_STORAGE_BACKEND,
    ENV_STORAGE_PATH,
    ENV_KEYCHAIN_SERVICE,
];

/// Load configuration with automatic fallback strategy
///
/// # Errors
/// Returns `LifeosError::Config` if a source is present but invalid, including
/// `LIFEOS_*` variables set without `LIFEOS_API_BASE_URL`. Missing sources are
/// not errors; defaults are used instead.
pub fn load() -> Result<Config> {
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!(path = %path.display(), "Loaded .env file");
    }

    // Once any LIFEOS_* variable is set the environment is the source, and
    // its errors (including a missing base URL) are reported, not skipped.
    if let Some(key) = first_env_var_present() {
        tracing::debug!(variable = key, "Environment configuration detected");
        let config = load_from_env()?;
        tracing::info!("Configuration loaded from environment variables");
        return Ok(config);
    }

    tracing::debug!("No LIFEOS_* environment variables set, trying file");
    match find_config_file() {
        Some(path) => load_from_file(Some(path)),
        None => {
            tracing::info!("No configuration found; using defaults");
            Ok(Config::default())
        }
    }
}

/// Load configuration from environment variables
///
/// `LIFEOS_API_BASE_URL` must be present; every other variable is optional
/// and falls back to its default.
///
/// # Errors
/// Returns `LifeosError::Config` if the base URL is missing or any variable
/// has an invalid value.
pub fn load_from_env() -> Result<Config> {
    let base_url = env_var(ENV_API_BASE_URL)?;

    let mut api = ApiConfig { base_url, ..ApiConfig::default() };
    if let Some(timeout) = optional_env_var(ENV_API_TIMEOUT_SECS) {
        api.timeout_secs = timeout
            .parse::<u64>()
            .map_err(|e| LifeosError::Config(format!("Invalid request timeout: {}", e)))?;
    }

    let mut storage = StorageConfig::default();
    if let Some(backend) = optional_env_var(ENV_STORAGE_BACKEND) {
        storage.backend = StorageBackend::from_str(&backend).map_err(|_| {
            LifeosError::Config(format!("Unknown storage backend: {}", backend))
        })?;
    }
    storage.path = optional_env_var(ENV_STORAGE_PATH);
    if let Some(service) = optional_env_var(ENV_KEYCHAIN_SERVICE) {
        storage.service_name = service;
    }

    let config = Config { api, storage };
    validate(&config)?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, searches multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `LifeosError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(LifeosError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => find_config_file().ok_or_else(|| {
            LifeosError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| LifeosError::Config(format!("Failed to read config file: {}", e)))?;

    let config = parse_config(&contents, &config_path)?;
    validate(&config)?;
    Ok(config)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| LifeosError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| LifeosError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(LifeosError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Check values serde cannot: the base URL must be an absolute http(s) URL
/// and the timeout must be non-zero.
pub fn validate(config: &Config) -> Result<()> {
    let url = Url::parse(&config.api.base_url).map_err(|e| {
        LifeosError::Config(format!("Invalid API base URL '{}': {}", config.api.base_url, e))
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(LifeosError::Config(format!(
            "API base URL must use http or https, got '{}'",
            url.scheme()
        )));
    }

    if config.api.timeout_secs == 0 {
        return Err(LifeosError::Config("Request timeout must be greater than zero".to_string()));
    }

    Ok(())
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn find_config_file() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(candidate_files(&cwd));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(candidate_files(exe_dir));
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

fn candidate_files(dir: &Path) -> Vec<PathBuf> {
    vec![
        dir.join("config.json"),
        dir.join("config.toml"),
        dir.join("lifeos.json"),
        dir.join("lifeos.toml"),
        dir.join("../config.json"),
        dir.join("../config.toml"),
    ]
}

/// Get required environment variable
///
/// # Errors
/// Returns `LifeosError::Config` if the variable is not set.
fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        LifeosError::Config(format!("Missing required environment variable: {}", key))
    })
}

fn first_env_var_present() -> Option<&'static str> {
    ENV_VARS.into_iter().find(|key| optional_env_var(key).is_some())
}

/// Optional variable; blank values count as unset.
fn optional_env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
