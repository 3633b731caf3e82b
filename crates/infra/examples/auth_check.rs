//! Example: probing a LifeOS API server
//!
//! Loads configuration (env, `.env`, config file or defaults), opens the
//! configured credential store and runs a health check followed by token
//! verification. If `LIFEOS_EMAIL` and `LIFEOS_PASSWORD` are set, logs in
//! first and saves the session.
//!
//! # Usage
//!
//! ```bash
//! LIFEOS_API_BASE_URL=http://localhost:8000/api \
//! LIFEOS_STORAGE_BACKEND=memory \
//! cargo run -p lifeos-infra --example auth_check
//! ```

use anyhow::Context;
use lifeos_domain::{validate_login, LoginRequest, StoredSession};
use lifeos_infra::{config, init_tracing, open_credential_store, ApiClient, ApiClientConfig, LogFormat};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing(LogFormat::from_env())?;

    let config = config::load().context("loading configuration")?;
    let store = open_credential_store(&config.storage)?;
    let client = ApiClient::new(ApiClientConfig::from(&config.api), store.clone())?;

    println!("LifeOS API check");
    println!("================");
    println!("Base URL: {}\n", client.base_url());

    match client.health_check().await {
        Ok(health) => println!(
            "health: {} (database: {})",
            health.status,
            health.database.as_deref().unwrap_or("n/a")
        ),
        Err(err) => println!("health: failed ({})", err),
    }

    if let (Ok(email), Ok(password)) =
        (std::env::var("LIFEOS_EMAIL"), std::env::var("LIFEOS_PASSWORD"))
    {
        let request = LoginRequest::new(email.clone(), password);
        let problems = validate_login(&request);
        if !problems.is_empty() {
            for (field, problem) in &problems {
                println!("login form: {}: {}", field, problem);
            }
        } else {
            match client.login(&request).await {
                Ok(auth) => {
                    println!("login: ok as {} (user {})", auth.username, auth.user_id);
                    store.save_session(&StoredSession::from_auth(&auth, email)).await?;
                }
                Err(err) => println!("login: failed ({})", err),
            }
        }
    }

    match client.verify_token().await {
        Ok(verify) => println!("verify: valid={} user={}", verify.valid, verify.username),
        Err(err) if err.is_unauthorized() => println!("verify: token rejected, session cleared"),
        Err(err) => println!("verify: failed ({})", err),
    }

    Ok(())
}
