//! API client for the LifeOS auth and health endpoints
//!
//! One client is built at startup and passed (cloned) to whoever needs it.
//! Every call is attempted exactly once and either resolves with the declared
//! payload or fails with a normalized [`ApiError`].

use std::sync::Arc;
use std::time::Duration;

use lifeos_domain::constants::{
    DEFAULT_API_BASE_URL, DEFAULT_TIMEOUT_SECS, HEALTH_PATH, LOGIN_PATH, REGISTER_PATH,
    VERIFY_PATH,
};
use lifeos_domain::{
    ApiConfig, AuthResponse, HealthStatus, LifeosError, LoginRequest, RegisterRequest,
    VerifyResponse,
};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use super::auth::BearerAuth;
use super::errors::ApiError;
use crate::http::HttpClient;
use crate::storage::CredentialStore;

/// Configuration for API client
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    /// Base URL for API (e.g., "http://localhost:8000/api")
    pub base_url: String,
    /// Timeout for API requests
    pub timeout: Duration,
    /// `User-Agent` header; `None` leaves reqwest's default
    pub user_agent: Option<String>,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: Some(format!("lifeos-client/{}", env!("CARGO_PKG_VERSION"))),
        }
    }
}

impl From<&ApiConfig> for ApiClientConfig {
    fn from(config: &ApiConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
            user_agent: config.user_agent.clone().or_else(|| Self::default().user_agent),
        }
    }
}

/// API client with bearer-token injection and error normalization
#[derive(Clone)]
pub struct ApiClient {
    http_client: HttpClient,
    auth: BearerAuth,
    base_url: Arc<str>,
}

impl ApiClient {
    /// Create a new API client
    ///
    /// # Arguments
    ///
    /// * `config` - Client configuration
    /// * `store` - Credential store the token is read from and evicted from
    ///
    /// # Errors
    ///
    /// Returns `LifeosError::Config` if the underlying HTTP client cannot be
    /// built
    pub fn new(
        config: ApiClientConfig,
        store: Arc<dyn CredentialStore>,
    ) -> Result<Self, LifeosError> {
        let mut builder = HttpClient::builder().timeout(config.timeout);
        if let Some(agent) = config.user_agent {
            builder = builder.user_agent(agent);
        }

        let http_client = builder
            .build()
            .map_err(|e| LifeosError::Config(format!("Failed to build HttpClient: {}", e)))?;

        Ok(Self {
            http_client,
            auth: BearerAuth::new(store),
            base_url: Arc::from(config.base_url.trim_end_matches('/')),
        })
    }

    /// Create a builder for fluent configuration
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// Base URL with any trailing slash removed
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The injected credential store.
    pub fn credential_store(&self) -> &Arc<dyn CredentialStore> {
        self.auth.store()
    }

    /// Authenticate with email and password.
    ///
    /// The returned token is not persisted here; the caller decides whether to
    /// store it.
    #[instrument(skip_all, fields(email = %credentials.email))]
    pub async fn login(&self, credentials: &LoginRequest) -> Result<AuthResponse, ApiError> {
        self.post(LOGIN_PATH, credentials).await
    }

    /// Create an account and receive its first token.
    #[instrument(skip_all, fields(username = %registration.username))]
    pub async fn register(&self, registration: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        self.post(REGISTER_PATH, registration).await
    }

    /// Check the stored token with the server.
    ///
    /// Sent even when no token is stored; the server then decides.
    #[instrument(skip(self))]
    pub async fn verify_token(&self) -> Result<VerifyResponse, ApiError> {
        self.get(VERIFY_PATH).await
    }

    /// Server and database health.
    #[instrument(skip(self))]
    pub async fn health_check(&self) -> Result<HealthStatus, ApiError> {
        self.get(HEALTH_PATH).await
    }

    /// Execute a GET request against `path` (relative to the base URL)
    ///
    /// # Errors
    ///
    /// Returns a normalized [`ApiError`] for any failure
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.execute(Method::GET, path, None).await
    }

    /// Execute a POST request with a JSON body
    ///
    /// # Errors
    ///
    /// Returns a normalized [`ApiError`] for any failure, including a body
    /// that cannot be serialized
    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let body = serde_json::to_value(body)
            .map_err(|e| ApiError::network(format!("Failed to serialize request body: {}", e)))?;
        self.execute(Method::POST, path, Some(body)).await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        debug!(%method, url = %url, "API request");

        let mut request = self.http_client.request(method.clone(), url.as_str());
        if let Some(body) = &body {
            request = request.json(body);
        }
        let request = self.auth.authorize(request).await;

        let response = self.http_client.send(request).await.map_err(|err| {
            warn!(%method, url = %url, error = %err, "API request failed before a response");
            ApiError::from_transport(&err)
        })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            self.auth.evict_session().await;
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = ApiError::from_status(status, &body);
            warn!(
                %method,
                url = %url,
                %status,
                error = %err.body().error,
                "API request rejected"
            );
            return Err(err);
        }

        let bytes = response.bytes().await.map_err(|e| {
            warn!(%method, url = %url, error = %e, "Failed to read API response body");
            ApiError::network(format!("Failed to read response: {}", e))
        })?;

        let result = serde_json::from_slice::<T>(&bytes).map_err(|e| {
            warn!(%method, url = %url, error = %e, "API response did not match expected shape");
            ApiError::network(format!("Failed to parse response: {}", e))
        })?;

        info!(%method, path = %path, %status, "API request successful");
        Ok(result)
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

/// Builder for API client
#[derive(Default)]
pub struct ApiClientBuilder {
    config: Option<ApiClientConfig>,
    store: Option<Arc<dyn CredentialStore>>,
}

impl ApiClientBuilder {
    /// Set the API configuration
    pub fn config(mut self, config: ApiClientConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the credential store
    pub fn credential_store(mut self, store: Arc<dyn CredentialStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Build the API client
    ///
    /// # Errors
    ///
    /// Returns error if the credential store is missing or client creation
    /// fails
    pub fn build(self) -> Result<ApiClient, LifeosError> {
        let config = self.config.unwrap_or_default();
        let store = self
            .store
            .ok_or_else(|| LifeosError::Config("Credential store not set".to_string()))?;

        ApiClient::new(config, store)
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::storage::MemoryCredentialStore;

    #[derive(Debug, serde::Serialize, serde::Deserialize, PartialEq)]
    struct TestResponse {
        message: String,
    }

    fn client_for(server: &MockServer) -> ApiClient {
        let config = ApiClientConfig { base_url: server.uri(), ..Default::default() };
        ApiClient::new(config, Arc::new(MemoryCredentialStore::new())).unwrap()
    }

    #[test]
    fn url_joins_with_and_without_slash() {
        let config =
            ApiClientConfig { base_url: "http://localhost:8000/api/".into(), ..Default::default() };
        let client = ApiClient::new(config, Arc::new(MemoryCredentialStore::new())).unwrap();

        assert_eq!(client.base_url(), "http://localhost:8000/api");
        assert_eq!(client.url("/health"), "http://localhost:8000/api/health");
        assert_eq!(client.url("auth/verify"), "http://localhost:8000/api/auth/verify");
    }

    #[test]
    fn default_base_url() {
        assert_eq!(ApiClientConfig::default().base_url, "http://localhost:8000/api");
    }

    #[test]
    fn config_conversion_keeps_timeout() {
        let api = ApiConfig { timeout_secs: 5, ..Default::default() };
        let config = ApiClientConfig::from(&api);
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert!(config.user_agent.unwrap().starts_with("lifeos-client/"));
    }

    #[tokio::test]
    async fn test_builder_pattern() {
        let store: Arc<dyn CredentialStore> = Arc::new(MemoryCredentialStore::new());
        let client = ApiClient::builder().credential_store(store).build();
        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn test_builder_missing_store() {
        let result = ApiClient::builder().build();
        assert!(matches!(result, Err(LifeosError::Config(_))));
    }

    #[tokio::test]
    async fn test_get_with_json_response() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/test"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(TestResponse { message: "success".to_string() }),
            )
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let result: Result<TestResponse, ApiError> = client.get("/test").await;
        assert_eq!(result.unwrap().message, "success");
    }

    #[tokio::test]
    async fn test_post_sends_json_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/create"))
            .and(wiremock::matchers::body_json(serde_json::json!({"message": "hi"})))
            .respond_with(
                ResponseTemplate::new(201)
                    .set_body_json(TestResponse { message: "created".to_string() }),
            )
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let request = TestResponse { message: "hi".to_string() };
        let result: Result<TestResponse, ApiError> = client.post("/create", &request).await;
        assert_eq!(result.unwrap().message, "created");
    }

    #[tokio::test]
    async fn test_success_with_wrong_shape_is_network_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/test"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let err = client.get::<TestResponse>("/test").await.unwrap_err();
        assert_eq!(err.body().error, "network_error");
        assert!(err.body().message.starts_with("Failed to parse response"));
        assert_eq!(err.status(), None);
    }

    #[tokio::test]
    async fn test_get_with_500_plain_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/error"))
            .respond_with(ResponseTemplate::new(500).set_body_string("Internal server error"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let err = client.get::<TestResponse>("/error").await.unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.body().message, "Request failed with status code 500");
    }
}
