//! Session types held in client-side storage
//!
//! The UI layer owns the session lifecycle. The API client only reads the
//! token and evicts both slots on an unauthorized response.

use serde::{Deserialize, Serialize};
#[cfg(feature = "ts-gen")]
use ts_rs::TS;

use super::auth::AuthResponse;

/// User record stored next to the token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct StoredUser {
    #[cfg_attr(feature = "ts-gen", ts(type = "number"))]
    pub id: i64,
    pub username: String,
    pub email: String,
}

/// Token plus user record
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    pub token: String,
    pub user: StoredUser,
}

impl StoredSession {
    /// Build the session a caller persists after a successful login/register.
    /// The server does not echo the email, so the caller supplies it.
    pub fn from_auth(auth: &AuthResponse, email: impl Into<String>) -> Self {
        Self {
            token: auth.token.clone(),
            user: StoredUser {
                id: auth.user_id,
                username: auth.username.clone(),
                email: email.into(),
            },
        }
    }
}

impl std::fmt::Debug for StoredSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoredSession")
            .field("token", &"<redacted>")
            .field("user", &self.user)
            .finish()
    }
}
