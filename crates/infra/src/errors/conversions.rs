//! Conversions from external infrastructure errors into domain errors.

use keyring::Error as KeyringError;
use lifeos_domain::LifeosError;
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub LifeosError);

impl From<InfraError> for LifeosError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<LifeosError> for InfraError {
    fn from(value: LifeosError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoLifeosError {
    fn into_lifeos(self) -> LifeosError;
}

/* -------------------------------------------------------------------------- */
/* keyring::Error → LifeosError */
/* -------------------------------------------------------------------------- */

impl IntoLifeosError for KeyringError {
    fn into_lifeos(self) -> LifeosError {
        use KeyringError::*;

        let description = self.to_string();

        match self {
            NoEntry => LifeosError::Storage("keychain entry not found".into()),
            BadEncoding(_) => {
                LifeosError::Storage("credential in keychain is not valid UTF-8".into())
            }
            TooLong(name, limit) => LifeosError::Storage(format!(
                "keychain attribute '{name}' exceeds platform limit ({limit})"
            )),
            Invalid(attr, reason) => {
                LifeosError::Storage(format!("keychain attribute '{attr}' is invalid: {reason}"))
            }
            PlatformFailure(err) => LifeosError::Storage(format!("keychain platform error: {err}")),
            NoStorageAccess(err) => {
                LifeosError::Storage(format!("unable to access secure storage: {err}"))
            }
            _ => LifeosError::Storage(description),
        }
    }
}

impl From<KeyringError> for InfraError {
    fn from(value: KeyringError) -> Self {
        InfraError(value.into_lifeos())
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → LifeosError */
/* -------------------------------------------------------------------------- */

impl IntoLifeosError for HttpError {
    fn into_lifeos(self) -> LifeosError {
        let target = self.url().map(|url| format!(" ({url})")).unwrap_or_default();

        if self.is_builder() {
            return LifeosError::InvalidInput(format!("invalid HTTP request{target}: {self}"));
        }

        if self.is_timeout() {
            return LifeosError::Network(format!("HTTP request timed out{target}"));
        }

        #[cfg(not(target_arch = "wasm32"))]
        if self.is_connect() {
            return LifeosError::Network(format!("HTTP connection failure{target}"));
        }

        if self.is_decode() || self.is_body() {
            return LifeosError::Network(format!("failed to read HTTP response body{target}"));
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            return LifeosError::Network(format!(
                "HTTP {} {}",
                code,
                status.canonical_reason().unwrap_or("unknown status")
            ));
        }

        LifeosError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_lifeos())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json / io → LifeosError */
/* -------------------------------------------------------------------------- */

impl From<serde_json::Error> for InfraError {
    fn from(value: serde_json::Error) -> Self {
        InfraError(LifeosError::Storage(format!("invalid JSON document: {value}")))
    }
}

impl From<std::io::Error> for InfraError {
    fn from(value: std::io::Error) -> Self {
        InfraError(LifeosError::Storage(format!("I/O failure: {value}")))
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
