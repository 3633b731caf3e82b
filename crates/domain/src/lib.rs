//! # LifeOS Domain
//!
//! Wire types and models shared by the LifeOS API client.
//!
//! This crate contains:
//! - Request/response DTOs for the auth and health endpoints
//! - The normalized API error body every failure is converted into
//! - Session types kept in client-held storage
//! - Configuration structures and the domain error type
//! - Client-side form validation mirroring the server's schema rules
//!
//! ## Architecture
//! - No dependencies on other LifeOS crates
//! - No I/O; transport and storage live in `lifeos-infra`

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
pub use validation::{validate_login, validate_registration, FormErrors};
