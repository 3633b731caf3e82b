//! Bearer-token request hook and unauthorized-response hook
//!
//! Both hooks go through the injected [`CredentialStore`]; neither can fail a
//! request. Store errors are logged and treated as "no token" / "nothing
//! evicted".

use std::sync::Arc;

use reqwest::RequestBuilder;
use tracing::{debug, info, warn};

use crate::storage::CredentialStore;

/// Attaches the stored token to outgoing requests and evicts the stored
/// session when the server rejects it.
#[derive(Clone)]
pub struct BearerAuth {
    store: Arc<dyn CredentialStore>,
}

impl BearerAuth {
    /// Hooks reading from and evicting `store`.
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    /// The credential store this hook reads from.
    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.store
    }

    /// Token read fresh from the store. Empty tokens count as absent.
    pub async fn current_token(&self) -> Option<String> {
        match self.store.token().await {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                warn!(error = %e, "Failed to read stored token; sending request unauthenticated");
                None
            }
        }
    }

    /// Outgoing-request hook: add `Authorization: Bearer <token>` when a token
    /// is stored, otherwise leave the request untouched.
    pub async fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.current_token().await {
            Some(token) => request.bearer_auth(token),
            None => {
                debug!("No stored token; sending request unauthenticated");
                request
            }
        }
    }

    /// Incoming-response hook for 401: evict token and user record.
    pub async fn evict_session(&self) {
        match self.store.clear().await {
            Ok(()) => info!("Cleared stored session after unauthorized response"),
            Err(e) => warn!(error = %e, "Failed to clear stored session"),
        }
    }
}
