//! Wire types exchanged with the LifeOS API

pub mod auth;
pub mod error;
pub mod health;
pub mod session;

pub use auth::{AuthResponse, LoginRequest, RegisterRequest, VerifyResponse};
pub use error::{ApiErrorBody, ErrorDetails};
pub use health::HealthStatus;
pub use session::{StoredSession, StoredUser};
