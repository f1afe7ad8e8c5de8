//! Error types for the Tweetsweep SDK.

use thiserror::Error;
use tweetsweep_domain::AuthError;

/// SDK operation errors
#[derive(Debug, Error)]
pub enum SdkError {
    /// HTTP client could not be built or a request failed to go out
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The API answered with something unexpected
    #[error("API error: {0}")]
    ApiError(String),

    /// Authentication or authorization error
    #[error("Authentication error: {0}")]
    AuthError(String),

    /// Request signing failed
    #[error("Signing error: {0}")]
    SigningError(String),
}

impl From<reqwest::Error> for SdkError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_connect() || e.is_timeout() {
            SdkError::ConnectionError(e.to_string())
        } else if e.is_status() {
            match e.status() {
                Some(status) if status.as_u16() == 401 || status.as_u16() == 403 => {
                    SdkError::AuthError(format!("HTTP {}", status))
                }
                Some(status) => SdkError::ApiError(format!("HTTP {}: {}", status, e)),
                None => SdkError::ApiError(e.to_string()),
            }
        } else {
            SdkError::ConnectionError(e.to_string())
        }
    }
}

impl From<hmac::digest::InvalidLength> for SdkError {
    fn from(e: hmac::digest::InvalidLength) -> Self {
        SdkError::SigningError(e.to_string())
    }
}

impl From<SdkError> for AuthError {
    fn from(e: SdkError) -> Self {
        match e {
            SdkError::AuthError(msg) => AuthError(msg),
            other => AuthError(other.to_string()),
        }
    }
}
