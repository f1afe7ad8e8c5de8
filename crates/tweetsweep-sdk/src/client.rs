//! Twitter REST client implementation.

use crate::error::SdkError;
use crate::oauth::{self, Nonce};
use crate::session::{classify_delete, AccountResponse, ErrorResponse, TwitterSession};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::AUTHORIZATION;
use std::time::Duration;
use tracing::debug;
use tweetsweep_domain::{AuthError, Credentials, DeleteOutcome, DeletionApi, RecordId};

/// Default API endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.twitter.com/1.1";

/// Default timeout for API requests (30 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Header carrying the rate window reset instant
const RATE_LIMIT_RESET: &str = "x-rate-limit-reset";

/// Blocking Twitter API client
pub struct TwitterClient {
    base_url: String,
    http: Client,
}

impl TwitterClient {
    /// Create a client for the given API base URL
    pub fn new(base_url: &str) -> Result<Self, SdkError> {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a client with a custom request timeout
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, SdkError> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("tweetsweep/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SdkError::ConnectionError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// API base URL without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Verify credentials and return the account's session
    pub fn verify_credentials(&self, credentials: &Credentials) -> Result<TwitterSession, SdkError> {
        let url = format!("{}/account/verify_credentials.json", self.base_url);
        let request = self.signed(self.http.get(&url), credentials, "GET", &url)?;

        let response = request.send()?;
        let status = response.status().as_u16();
        if status == 401 || status == 403 {
            let body = response.text().unwrap_or_default();
            let detail = ErrorResponse::parse(&body)
                .errors
                .first()
                .map(|e| e.message.clone())
                .unwrap_or_else(|| format!("HTTP {}", status));
            return Err(SdkError::AuthError(detail));
        }
        let response = response.error_for_status()?;

        let account: AccountResponse = response
            .json()
            .map_err(|e| SdkError::ApiError(format!("Invalid account response: {}", e)))?;
        debug!("Authenticated as @{}", account.screen_name);

        Ok(TwitterSession {
            credentials: credentials.clone(),
            screen_name: account.screen_name,
        })
    }

    /// Delete one status and classify the answer
    pub fn destroy_status(&self, session: &TwitterSession, id: &RecordId) -> DeleteOutcome {
        let url = format!("{}/statuses/destroy/{}.json", self.base_url, oauth::encode(id.as_str()));

        let request = match self.signed(self.http.post(&url), &session.credentials, "POST", &url) {
            Ok(request) => request,
            Err(e) => return DeleteOutcome::Rejected(e.to_string()),
        };

        debug!("POST {}", url);
        match request.send() {
            Ok(response) => classify_response(response),
            Err(e) => DeleteOutcome::Transient(SdkError::from(e).to_string()),
        }
    }

    fn signed(
        &self,
        request: RequestBuilder,
        credentials: &Credentials,
        method: &str,
        url: &str,
    ) -> Result<RequestBuilder, SdkError> {
        let header = oauth::authorization_header(credentials, method, url, &[], &Nonce::generate())?;
        Ok(request.header(AUTHORIZATION, header))
    }
}

fn classify_response(response: Response) -> DeleteOutcome {
    let status = response.status().as_u16();
    let reset = response
        .headers()
        .get(RATE_LIMIT_RESET)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = response.text().unwrap_or_default();
    debug!("Delete answered HTTP {}", status);

    classify_delete(status, reset.as_deref(), &body, chrono::Utc::now())
}

impl DeletionApi for TwitterClient {
    type Session = TwitterSession;

    fn authenticate(&self, credentials: &Credentials) -> Result<Self::Session, AuthError> {
        self.verify_credentials(credentials).map_err(AuthError::from)
    }

    fn delete(&self, session: &Self::Session, id: &RecordId) -> DeleteOutcome {
        self.destroy_status(session, id)
    }
}
