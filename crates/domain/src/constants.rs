//! Application constants
//!
//! Centralized location for wire-level and storage constants used by the
//! API client.

// API defaults
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_KEYCHAIN_SERVICE: &str = "LifeOS.api";

// Routes, relative to the base URL
pub const LOGIN_PATH: &str = "/auth/login";
pub const REGISTER_PATH: &str = "/auth/register";
pub const VERIFY_PATH: &str = "/auth/verify";
pub const HEALTH_PATH: &str = "/health";

// Credential storage slots
pub const AUTH_TOKEN_KEY: &str = "authToken";
pub const USER_KEY: &str = "user";

// Error normalization
pub const NETWORK_ERROR_CODE: &str = "network_error";
pub const FALLBACK_ERROR_MESSAGE: &str = "An unexpected error occurred";
pub const DEFAULT_TOKEN_TYPE: &str = "bearer";
