//! LifeOS API access layer
//!
//! Typed operations against the LifeOS backend (login, register, token
//! verification, health) over one configured HTTP client.
//!
//! # Architecture
//!
//! - Uses the crate's [`HttpClient`](crate::http::HttpClient) (no direct
//!   reqwest construction)
//! - Bearer token read from an injected [`CredentialStore`](crate::storage::CredentialStore)
//!   on every request
//! - A 401 from any endpoint evicts the stored token and user record
//! - Every failure is normalized to [`ApiError`]; no retries

pub mod auth;
pub mod client;
pub mod errors;

pub use auth::BearerAuth;
pub use client::{ApiClient, ApiClientBuilder, ApiClientConfig};
pub use errors::{ApiError, ApiErrorKind};
