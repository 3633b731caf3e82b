//! Logging setup
//!
//! Installs a `tracing-subscriber` fmt subscriber filtered by `RUST_LOG`
//! (default `info`). The library only emits events; binaries and demos call
//! [`init_tracing`] once at startup.

use std::str::FromStr;

use lifeos_domain::{impl_domain_enum_conversions, LifeosError};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Environment variable selecting the output format.
pub const ENV_LOG_FORMAT: &str = "LIFEOS_LOG_FORMAT";

const DEFAULT_FILTER: &str = "info";

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable multi-line output
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

impl_domain_enum_conversions!(LogFormat {
    Pretty => "pretty",
    Json => "json",
});

impl LogFormat {
    /// Read `LIFEOS_LOG_FORMAT`; unset or unknown values give `Pretty`.
    pub fn from_env() -> Self {
        std::env::var(ENV_LOG_FORMAT)
            .ok()
            .and_then(|v| LogFormat::from_str(&v).ok())
            .unwrap_or_default()
    }
}

/// Install the global subscriber.
///
/// # Errors
/// Returns `LifeosError::Internal` if a global subscriber is already set.
pub fn init_tracing(format: LogFormat) -> Result<(), LifeosError> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).try_init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer().pretty()).try_init(),
    };

    result.map_err(|e| LifeosError::Internal(format!("Failed to initialize tracing: {}", e)))
}
