//! # LifeOS Infrastructure
//!
//! I/O side of the LifeOS API client.
//!
//! This crate contains:
//! - The API access layer (login, register, token verification, health)
//! - The shared HTTP transport
//! - Credential storage backends (memory, session file, platform keychain)
//! - Configuration loading and logging setup
//!
//! ## Architecture
//! - Wire types and configuration structures come from `lifeos-domain`
//! - Contains all "impure" code (network, filesystem, keychain)

pub mod api;
pub mod config;
pub mod errors;
pub mod http;
pub mod observability;
pub mod storage;

// Re-export commonly used items
pub use api::{ApiClient, ApiClientBuilder, ApiClientConfig, ApiError, ApiErrorKind};
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
pub use observability::{init_tracing, LogFormat};
pub use storage::{
    open_credential_store, CredentialStore, FileCredentialStore, KeychainCredentialStore,
    MemoryCredentialStore,
};
