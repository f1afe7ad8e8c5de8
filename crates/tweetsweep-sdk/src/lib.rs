//! Tweetsweep Rust SDK
//!
//! Blocking client for the parts of the Twitter REST API the destruction
//! engine needs: verifying credentials and deleting statuses.
//!
//! # Example
//!
//! ```no_run
//! use tweetsweep_domain::{Credentials, DeletionApi, RecordId};
//! use tweetsweep_sdk::TwitterClient;
//!
//! let client = TwitterClient::new(tweetsweep_sdk::DEFAULT_BASE_URL).expect("client");
//! let creds = Credentials::new("ck", "cs", "ak", "as");
//! let session = client.authenticate(&creds).expect("credentials accepted");
//!
//! let outcome = client.delete(&session, &RecordId::parse("1049375622408339456").unwrap());
//! println!("{:?}", outcome);
//! ```

#![warn(missing_docs)]

mod client;
mod error;
pub mod oauth;
mod session;

pub use client::{TwitterClient, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
pub use error::SdkError;
pub use session::{classify_delete, TwitterSession};
