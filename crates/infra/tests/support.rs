use std::net::TcpListener;
use std::sync::Arc;

use lifeos_domain::{StoredSession, StoredUser};
use lifeos_infra::{ApiClient, ApiClientConfig, CredentialStore, MemoryCredentialStore};
use wiremock::MockServer;

pub const TEST_TOKEN: &str = "t1";

/// Client wired to a mock server and an in-memory store the test can inspect.
pub struct TestClient {
    pub client: ApiClient,
    pub store: Arc<MemoryCredentialStore>,
}

impl TestClient {
    /// Client with an empty credential store.
    pub fn anonymous(base_url: &str) -> Self {
        Self::with_store(base_url, MemoryCredentialStore::new())
    }

    /// Client whose store already holds a token and user record.
    pub fn signed_in(base_url: &str) -> Self {
        Self::with_store(base_url, MemoryCredentialStore::with_session(test_session()))
    }

    fn with_store(base_url: &str, store: MemoryCredentialStore) -> Self {
        let store = Arc::new(store);
        let config = ApiClientConfig { base_url: base_url.to_string(), ..Default::default() };
        let client =
            ApiClient::new(config, store.clone()).expect("api client should be created");
        Self { client, store }
    }

    /// Whether both session slots are empty.
    pub async fn session_cleared(&self) -> bool {
        let token = self.store.token().await.expect("token slot should be readable");
        let user = self.store.user().await.expect("user slot should be readable");
        token.is_none() && user.is_none()
    }
}

pub fn test_session() -> StoredSession {
    StoredSession {
        token: TEST_TOKEN.to_string(),
        user: StoredUser { id: 1, username: "a".into(), email: "a@b.com".into() },
    }
}

/// Base URL (with the `/api` prefix) of a running mock server.
pub fn api_url(server: &MockServer) -> String {
    format!("{}/api", server.uri())
}

/// Base URL pointing at a local port nothing listens on.
pub fn unreachable_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("ephemeral port should bind");
    let port = listener.local_addr().expect("listener should have an address").port();
    drop(listener);
    format!("http://127.0.0.1:{}/api", port)
}

/// Authorization header of every request the mock server received, in order.
pub async fn authorization_headers(server: &MockServer) -> Vec<Option<String>> {
    server
        .received_requests()
        .await
        .expect("request recording should be enabled")
        .iter()
        .map(|req| {
            req.headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        })
        .collect()
}
