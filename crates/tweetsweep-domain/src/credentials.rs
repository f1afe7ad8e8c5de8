//! API credentials

use std::fmt;

/// OAuth 1.0a user-context credentials for the remote API
///
/// The secrets are shown to the user exactly once, when they type them in.
/// `Debug` is implemented by hand so that they cannot end up in a log line.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Application (consumer) key
    pub consumer_key: String,

    /// Application (consumer) secret
    pub consumer_secret: String,

    /// User access token
    pub access_key: String,

    /// User access token secret
    pub access_secret: String,
}

impl Credentials {
    /// Field names in prompt order
    pub const FIELDS: [&'static str; 4] = ["consumer_key", "consumer_secret", "access_key", "access_secret"];

    /// Create credentials from the four values
    pub fn new(
        consumer_key: impl Into<String>,
        consumer_secret: impl Into<String>,
        access_key: impl Into<String>,
        access_secret: impl Into<String>,
    ) -> Self {
        Self {
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
            access_key: access_key.into(),
            access_secret: access_secret.into(),
        }
    }

    /// True when every field carries a non-blank value
    pub fn is_complete(&self) -> bool {
        [&self.consumer_key, &self.consumer_secret, &self.access_key, &self.access_secret]
            .iter()
            .all(|v| !v.trim().is_empty())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("consumer_key", &"<redacted>")
            .field("consumer_secret", &"<redacted>")
            .field("access_key", &"<redacted>")
            .field("access_secret", &"<redacted>")
            .finish()
    }
}
