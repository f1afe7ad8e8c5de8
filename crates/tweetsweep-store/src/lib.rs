//! Tweetsweep Storage Layer
//!
//! File-backed persistence for everything a review session needs.
//!
//! # Architecture
//!
//! - [`Archive`]: read-only record store loaded from the exported `tweets.csv`
//! - [`DecisionLedger`]: three newline-delimited id files (kept, marked,
//!   destroyed), flushed after every decision
//! - [`credentials`]: TOML credentials file, created with restrictive
//!   permissions, with an interactive fallback behind [`CredentialPrompt`]
//!
//! # Examples
//!
//! ```no_run
//! use tweetsweep_store::{Archive, DecisionLedger};
//!
//! let archive = Archive::load("archive-dir").unwrap();
//! let ledger = DecisionLedger::load("archive-dir").unwrap();
//! let pending = ledger.pending(archive.records()).count();
//! println!("{} records left to review", pending);
//! ```

#![warn(missing_docs)]

pub mod archive;
pub mod credentials;
mod error;
pub mod ledger;

pub use archive::Archive;
pub use credentials::CredentialPrompt;
pub use error::{ArchiveError, CredentialError, LedgerError};
pub use ledger::{DecisionLedger, LedgerCounts};
