//! Client-held credential storage
//!
//! The API client never knows where the token lives. It only sees the
//! [`CredentialStore`] capability injected at construction time.
//!
//! # Backends
//!
//! - [`MemoryCredentialStore`]: process-local, for tests and ephemeral sessions
//! - [`FileCredentialStore`]: JSON document with `authToken`/`user` slots
//! - [`KeychainCredentialStore`]: platform keychain entries

pub mod file;
pub mod keychain;
pub mod memory;

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use lifeos_domain::{LifeosError, Result, StorageBackend, StorageConfig, StoredSession, StoredUser};
use tracing::info;

pub use file::FileCredentialStore;
pub use keychain::KeychainCredentialStore;
pub use memory::MemoryCredentialStore;

/// Get/set/clear access to the stored token and user record.
///
/// Implementations must make [`clear`](CredentialStore::clear) idempotent:
/// overlapping requests may all observe a 401 and evict concurrently.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Current bearer token, if any.
    async fn token(&self) -> Result<Option<String>>;

    async fn set_token(&self, token: &str) -> Result<()>;

    /// Current user record, if any.
    async fn user(&self) -> Result<Option<StoredUser>>;

    async fn set_user(&self, user: &StoredUser) -> Result<()>;

    /// Evict both the token and the user record.
    async fn clear(&self) -> Result<()>;

    /// Persist token and user together after a successful login.
    async fn save_session(&self, session: &StoredSession) -> Result<()> {
        self.set_token(&session.token).await?;
        self.set_user(&session.user).await
    }

    /// Both slots, or `None` when either is missing.
    async fn session(&self) -> Result<Option<StoredSession>> {
        let Some(token) = self.token().await? else {
            return Ok(None);
        };
        Ok(self.user().await?.map(|user| StoredSession { token, user }))
    }
}

/// Build the credential store selected by configuration.
///
/// # Errors
/// Returns `LifeosError::Config` if the file backend has no path and no
/// platform config directory can be determined.
pub fn open_credential_store(config: &StorageConfig) -> Result<Arc<dyn CredentialStore>> {
    let store: Arc<dyn CredentialStore> = match config.backend {
        StorageBackend::Memory => Arc::new(MemoryCredentialStore::new()),
        StorageBackend::File => {
            let path = match &config.path {
                Some(path) => PathBuf::from(path),
                None => default_session_path().ok_or_else(|| {
                    LifeosError::Config("Could not determine config directory".to_string())
                })?,
            };
            Arc::new(FileCredentialStore::new(path))
        }
        StorageBackend::Keychain => {
            Arc::new(KeychainCredentialStore::new(config.service_name.clone()))
        }
    };

    info!(backend = %config.backend, "Credential store opened");
    Ok(store)
}

/// Default session file: `<config dir>/lifeos/session.json`.
pub fn default_session_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("lifeos").join("session.json"))
}
