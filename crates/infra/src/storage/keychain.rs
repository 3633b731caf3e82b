//! Platform keychain credential store
//!
//! Persists the token and the serialized user record as two keychain entries
//! under one service name (macOS Keychain Access, Windows Credential Manager,
//! Linux Secret Service). Accounts are the browser slot names `authToken` and
//! `user`.

use async_trait::async_trait;
use keyring::Entry;
use lifeos_domain::constants::{AUTH_TOKEN_KEY, USER_KEY};
use lifeos_domain::{LifeosError, Result, StoredUser};
use tracing::debug;

use super::CredentialStore;
use crate::errors::InfraError;

/// Credential store backed by the platform keychain.
pub struct KeychainCredentialStore {
    service_name: String,
}

impl KeychainCredentialStore {
    /// # Arguments
    /// * `service_name` - Keychain service identifier (e.g., "LifeOS.api")
    pub fn new(service_name: impl Into<String>) -> Self {
        Self { service_name: service_name.into() }
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    fn entry(&self, account: &str) -> Result<Entry> {
        Entry::new(&self.service_name, account).map_err(|e| LifeosError::from(InfraError::from(e)))
    }

    fn get_secret(&self, account: &str) -> Result<Option<String>> {
        debug!(service = %self.service_name, account = %account, "Reading keychain entry");

        match self.entry(account)?.get_password() {
            Ok(secret) => Ok(Some(secret)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(InfraError::from(e).into()),
        }
    }

    fn set_secret(&self, account: &str, value: &str) -> Result<()> {
        debug!(service = %self.service_name, account = %account, "Writing keychain entry");

        self.entry(account)?.set_password(value).map_err(|e| LifeosError::from(InfraError::from(e)))
    }

    /// Delete an entry; a missing entry is not an error.
    fn delete_secret(&self, account: &str) -> Result<()> {
        match self.entry(account)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => {
                debug!(service = %self.service_name, account = %account, "Keychain entry removed");
                Ok(())
            }
            Err(e) => Err(InfraError::from(e).into()),
        }
    }
}

#[async_trait]
impl CredentialStore for KeychainCredentialStore {
    async fn token(&self) -> Result<Option<String>> {
        self.get_secret(AUTH_TOKEN_KEY)
    }

    async fn set_token(&self, token: &str) -> Result<()> {
        self.set_secret(AUTH_TOKEN_KEY, token)
    }

    async fn user(&self) -> Result<Option<StoredUser>> {
        let Some(raw) = self.get_secret(USER_KEY)? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| LifeosError::Storage(format!("Stored user record is corrupt: {}", e)))
    }

    async fn set_user(&self, user: &StoredUser) -> Result<()> {
        let raw = serde_json::to_string(user).map_err(|e| LifeosError::from(InfraError::from(e)))?;
        self.set_secret(USER_KEY, &raw)
    }

    async fn clear(&self) -> Result<()> {
        // Attempt both slots even if the first fails.
        let token = self.delete_secret(AUTH_TOKEN_KEY);
        let user = self.delete_secret(USER_KEY);
        token.and(user)
    }
}
