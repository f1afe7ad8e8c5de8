//! Authenticated session and API response shapes.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::Deserialize;
use tweetsweep_domain::{Credentials, DeleteOutcome};

/// Fallback wait when a 429 carries no usable reset header (one rate window)
pub const DEFAULT_RATE_WINDOW_SECS: i64 = 15 * 60;

/// Error code Twitter uses for "No status found with that ID"
pub const CODE_NO_STATUS: u32 = 144;

/// Session established by `verify_credentials`
///
/// Holds the credentials so every later request can be signed.
#[derive(Debug, Clone)]
pub struct TwitterSession {
    pub(crate) credentials: Credentials,
    /// Account the credentials belong to
    pub screen_name: String,
}

impl TwitterSession {
    /// Session for already verified credentials
    pub fn new(credentials: Credentials, screen_name: impl Into<String>) -> Self {
        Self {
            credentials,
            screen_name: screen_name.into(),
        }
    }

    /// Account handle, without the leading `@`
    pub fn screen_name(&self) -> &str {
        &self.screen_name
    }
}

/// Subset of the `verify_credentials` response
#[derive(Debug, Deserialize)]
pub struct AccountResponse {
    /// Account handle
    pub screen_name: String,
}

/// Error body shape: `{"errors":[{"code":144,"message":"..."}]}`
#[derive(Debug, Default, Deserialize)]
pub struct ErrorResponse {
    /// Reported errors
    #[serde(default)]
    pub errors: Vec<ApiErrorEntry>,
}

/// One reported error
#[derive(Debug, Deserialize)]
pub struct ApiErrorEntry {
    /// Numeric error code
    pub code: u32,
    /// Human-readable message
    #[serde(default)]
    pub message: String,
}

impl ErrorResponse {
    /// Parse an error body, tolerating anything that is not the expected JSON
    pub fn parse(body: &str) -> Self {
        serde_json::from_str(body).unwrap_or_default()
    }

    fn has_code(&self, code: u32) -> bool {
        self.errors.iter().any(|e| e.code == code)
    }

    fn message(&self, status: u16) -> String {
        self.errors
            .first()
            .map(|e| format!("HTTP {} (code {}): {}", status, e.code, e.message))
            .unwrap_or_else(|| format!("HTTP {}", status))
    }
}

/// Map a `statuses/destroy` response to a delete outcome
///
/// `rate_reset` is the raw `x-rate-limit-reset` header (epoch seconds).
pub fn classify_delete(status: u16, rate_reset: Option<&str>, body: &str, now: DateTime<Utc>) -> DeleteOutcome {
    if (200..300).contains(&status) {
        return DeleteOutcome::Deleted;
    }

    let errors = ErrorResponse::parse(body);
    match status {
        401 => DeleteOutcome::Unauthorized,
        403 => DeleteOutcome::PermissionDenied,
        404 if errors.has_code(CODE_NO_STATUS) => DeleteOutcome::AlreadyDeleted,
        404 => DeleteOutcome::NotFound,
        429 => DeleteOutcome::RateLimited {
            reset_at: parse_reset(rate_reset).unwrap_or_else(|| now + Duration::seconds(DEFAULT_RATE_WINDOW_SECS)),
        },
        408 | 500..=599 => DeleteOutcome::Transient(errors.message(status)),
        _ => DeleteOutcome::Rejected(errors.message(status)),
    }
}

fn parse_reset(header: Option<&str>) -> Option<DateTime<Utc>> {
    let secs: i64 = header?.trim().parse().ok()?;
    Utc.timestamp_opt(secs, 0).single()
}
