//! Session file storage
//!
//! Reads/writes a small JSON document (0600 on Unix) using the same slot names
//! as browser storage:
//!
//! ```json
//! { "authToken": "...", "user": { "id": 1, "username": "...", "email": "..." } }
//! ```

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use lifeos_domain::constants::{AUTH_TOKEN_KEY, USER_KEY};
use lifeos_domain::{LifeosError, Result, StoredUser};
use serde::{Deserialize, Serialize};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::debug;

use super::CredentialStore;
use crate::errors::InfraError;

#[derive(Debug, Default, Serialize, Deserialize)]
struct SessionDocument {
    #[serde(rename = "authToken", default, skip_serializing_if = "Option::is_none")]
    auth_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user: Option<StoredUser>,
}

/// Credential store persisted to a JSON file.
///
/// Writes are serialized within the process; a missing file reads as empty.
#[derive(Debug)]
pub struct FileCredentialStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), write_lock: Mutex::new(()) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_document(&self) -> Result<SessionDocument> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(SessionDocument::default());
            }
            Err(err) => return Err(LifeosError::from(InfraError::from(err))),
        };

        if contents.trim().is_empty() {
            return Ok(SessionDocument::default());
        }

        serde_json::from_str(&contents).map_err(|err| {
            LifeosError::Storage(format!(
                "Session file {} is corrupt: {}",
                self.path.display(),
                err
            ))
        })
    }

    async fn write_document(&self, document: &SessionDocument) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                LifeosError::Storage(format!("Failed to create session directory: {}", e))
            })?;
        }

        let contents = serde_json::to_vec_pretty(document)
            .map_err(|e| LifeosError::from(InfraError::from(e)))?;

        // Readers never take the lock, so the target is only ever replaced
        // whole: write a private temp file, then rename it over.
        let temp_path = self.temp_path();
        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        options.mode(0o600);

        // A stale temp file from an interrupted write would keep its old mode.
        let _ = tokio::fs::remove_file(&temp_path).await;

        let written: std::io::Result<()> = async {
            let mut file = options.open(&temp_path).await?;
            file.write_all(&contents).await?;
            file.sync_all().await?;
            drop(file);
            tokio::fs::rename(&temp_path, &self.path).await
        }
        .await;

        if let Err(e) = written {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(LifeosError::Storage(format!("Failed to write session file: {}", e)));
        }

        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    async fn update<F>(&self, apply: F) -> Result<()>
    where
        F: FnOnce(&mut SessionDocument) + Send,
    {
        let _guard = self.write_lock.lock().await;
        let mut document = self.read_document().await?;
        apply(&mut document);
        self.write_document(&document).await
    }
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn token(&self) -> Result<Option<String>> {
        Ok(self.read_document().await?.auth_token)
    }

    async fn set_token(&self, token: &str) -> Result<()> {
        debug!(path = %self.path.display(), slot = AUTH_TOKEN_KEY, "Writing session slot");
        let token = token.to_string();
        self.update(move |doc| doc.auth_token = Some(token)).await
    }

    async fn user(&self) -> Result<Option<StoredUser>> {
        Ok(self.read_document().await?.user)
    }

    async fn set_user(&self, user: &StoredUser) -> Result<()> {
        debug!(path = %self.path.display(), slot = USER_KEY, "Writing session slot");
        let user = user.clone();
        self.update(move |doc| doc.user = Some(user)).await
    }

    async fn clear(&self) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                debug!(path = %self.path.display(), "Session file removed");
                Ok(())
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => {
                Err(LifeosError::Storage(format!("Failed to delete session file: {}", err)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().join("session.json"));
        assert!(store.token().await.unwrap().is_none());
        assert!(store.user().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn uses_browser_slot_names() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let store = FileCredentialStore::new(&path);

        store.set_token("tok123").await.unwrap();
        store
            .set_user(&StoredUser { id: 5, username: "eve".into(), email: "eve@x.io".into() })
            .await
            .unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["authToken"], "tok123");
        assert_eq!(raw["user"]["username"], "eve");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        FileCredentialStore::new(&path).set_token("t").await.unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[tokio::test]
    async fn corrupt_file_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = FileCredentialStore::new(&path);
        assert!(matches!(store.token().await, Err(LifeosError::Storage(_))));
    }

    #[tokio::test]
    async fn clear_removes_file_and_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let store = FileCredentialStore::new(&path);

        store.set_token("t").await.unwrap();
        store.clear().await.unwrap();
        assert!(!path.exists());
        store.clear().await.unwrap();
    }

    #[tokio::test]
    async fn write_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let store = FileCredentialStore::new(&path);

        store.set_token("first").await.unwrap();
        store.set_token("second").await.unwrap();

        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["session.json".to_string()]);
        assert_eq!(store.token().await.unwrap().as_deref(), Some("second"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn stale_temp_file_does_not_leak_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let store = FileCredentialStore::new(&path);

        let stale = store.temp_path();
        std::fs::write(&stale, "leftover").unwrap();
        std::fs::set_permissions(&stale, std::fs::Permissions::from_mode(0o644)).unwrap();

        store.set_token("t").await.unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert!(!stale.exists());
    }
}
