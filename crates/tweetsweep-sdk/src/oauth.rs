//! OAuth 1.0a request signing (HMAC-SHA1)

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use hmac::digest::InvalidLength;
use hmac::{Hmac, Mac};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use sha1::Sha1;
use tweetsweep_domain::Credentials;

/// RFC 3986 unreserved characters stay as they are
const UNRESERVED: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');

/// Percent-encode a value the way OAuth 1.0a requires
pub fn encode(value: &str) -> String {
    utf8_percent_encode(value, UNRESERVED).to_string()
}

/// Per-request values that vary between calls
#[derive(Debug, Clone)]
pub struct Nonce {
    /// Random string, unique per request
    pub nonce: String,
    /// Seconds since the Unix epoch
    pub timestamp: i64,
}

impl Nonce {
    /// Fresh nonce for the current instant
    pub fn generate() -> Self {
        Self {
            nonce: uuid::Uuid::new_v4().simple().to_string(),
            timestamp: chrono::Utc::now().timestamp(),
        }
    }
}

/// Build the `Authorization` header value for a request
///
/// `params` are the query or form parameters of the request; they take part
/// in the signature but are not repeated in the header.
pub fn authorization_header(
    credentials: &Credentials,
    method: &str,
    url: &str,
    params: &[(&str, &str)],
    nonce: &Nonce,
) -> Result<String, InvalidLength> {
    let timestamp = nonce.timestamp.to_string();
    let mut oauth_params: Vec<(&str, &str)> = vec![
        ("oauth_consumer_key", credentials.consumer_key.as_str()),
        ("oauth_nonce", nonce.nonce.as_str()),
        ("oauth_signature_method", "HMAC-SHA1"),
        ("oauth_timestamp", timestamp.as_str()),
        ("oauth_token", credentials.access_key.as_str()),
        ("oauth_version", "1.0"),
    ];

    let mut all_params = oauth_params.clone();
    all_params.extend_from_slice(params);
    let signature = sign(credentials, method, url, &all_params)?;
    oauth_params.push(("oauth_signature", signature.as_str()));
    oauth_params.sort();

    let fields: Vec<String> = oauth_params
        .iter()
        .map(|(k, v)| format!("{}=\"{}\"", encode(k), encode(v)))
        .collect();
    Ok(format!("OAuth {}", fields.join(", ")))
}

/// Compute the base64 HMAC-SHA1 signature over all request parameters
pub fn sign(
    credentials: &Credentials,
    method: &str,
    url: &str,
    params: &[(&str, &str)],
) -> Result<String, InvalidLength> {
    let base = signature_base(method, url, params);
    let key = format!(
        "{}&{}",
        encode(&credentials.consumer_secret),
        encode(&credentials.access_secret)
    );

    let mut mac = Hmac::<Sha1>::new_from_slice(key.as_bytes())?;
    mac.update(base.as_bytes());
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

/// `METHOD&url&params`, each part percent-encoded, params sorted after encoding
pub fn signature_base(method: &str, url: &str, params: &[(&str, &str)]) -> String {
    let mut encoded: Vec<(String, String)> = params.iter().map(|(k, v)| (encode(k), encode(v))).collect();
    encoded.sort();

    let param_string = encoded
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{}&{}&{}",
        method.to_uppercase(),
        encode(url),
        encode(&param_string)
    )
}
