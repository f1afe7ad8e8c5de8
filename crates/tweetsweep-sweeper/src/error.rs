//! Error types for review and destruction runs

use thiserror::Error;
use tweetsweep_domain::AuthError;
use tweetsweep_store::{ArchiveError, LedgerError};

/// Errors that end a review or destruction run
///
/// Per-item destruction failures are not errors; they are collected in the
/// run report instead.
#[derive(Error, Debug)]
pub enum SweepError {
    /// Archive could not be loaded
    #[error("Startup error: {0}")]
    Archive(#[from] ArchiveError),

    /// Ledger could not be read or written
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// Remote API refused the credentials
    #[error("{0}")]
    Auth(#[from] AuthError),

    /// Reading the reviewer's answer failed
    #[error("Input error: {0}")]
    Input(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
