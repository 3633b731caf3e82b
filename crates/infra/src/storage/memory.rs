//! In-process credential store

use async_trait::async_trait;
use lifeos_domain::{Result, StoredSession, StoredUser};
use parking_lot::RwLock;

use super::CredentialStore;

#[derive(Debug, Default)]
struct Slots {
    token: Option<String>,
    user: Option<StoredUser>,
}

/// Credential store that lives for the lifetime of the process.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    slots: RwLock<Slots>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a session.
    pub fn with_session(session: StoredSession) -> Self {
        Self { slots: RwLock::new(Slots { token: Some(session.token), user: Some(session.user) }) }
    }

    /// Store pre-seeded with a token only.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self { slots: RwLock::new(Slots { token: Some(token.into()), user: None }) }
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn token(&self) -> Result<Option<String>> {
        Ok(self.slots.read().token.clone())
    }

    async fn set_token(&self, token: &str) -> Result<()> {
        self.slots.write().token = Some(token.to_string());
        Ok(())
    }

    async fn user(&self) -> Result<Option<StoredUser>> {
        Ok(self.slots.read().user.clone())
    }

    async fn set_user(&self, user: &StoredUser) -> Result<()> {
        self.slots.write().user = Some(user.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        let mut slots = self.slots.write();
        slots.token = None;
        slots.user = None;
        Ok(())
    }
}
