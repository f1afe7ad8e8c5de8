//! Error types for storage operations

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The archive could not be loaded; fatal at startup
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// Working directory does not exist
    #[error("Directory {0} does not exist")]
    DirectoryNotFound(PathBuf),

    /// Archive file could not be opened or read
    #[error("Cannot read archive {path}: {source}")]
    Io {
        /// Archive file path
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },

    /// CSV structure is broken
    #[error("Malformed archive {path}: {source}")]
    Csv {
        /// Archive file path
        path: PathBuf,
        /// Underlying CSV error
        source: csv::Error,
    },

    /// A row parsed but carries an invalid value
    #[error("Malformed archive row {row}: {reason}")]
    InvalidRow {
        /// 1-based data row number
        row: usize,
        /// What was wrong with it
        reason: String,
    },
}

/// Ledger storage failure
#[derive(Error, Debug)]
pub enum LedgerError {
    /// A ledger file exists but cannot be read
    #[error("Cannot read ledger file {path}: {source}")]
    Read {
        /// Ledger file path
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },

    /// A decision could not be persisted
    #[error("Cannot write ledger file {path}: {source}")]
    Write {
        /// Ledger file path
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },

    /// The record already carries a decision
    #[error("Record {id} is already {disposition}")]
    AlreadyDecided {
        /// Record id
        id: String,
        /// Current ledger set
        disposition: tweetsweep_domain::Disposition,
    },

    /// Only marked records can be moved to destroyed
    #[error("Record {0} is not marked for destruction")]
    NotMarked(String),
}

/// Credentials file failure
#[derive(Error, Debug)]
pub enum CredentialError {
    /// File missing
    #[error("Credentials file {0} not found")]
    NotFound(PathBuf),

    /// File exists but cannot be read
    #[error("Cannot read credentials file {path}: {source}")]
    Read {
        /// Credentials file path
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },

    /// File is not valid credentials TOML
    #[error("Cannot parse credentials file {path}: {source}")]
    Parse {
        /// Credentials file path
        path: PathBuf,
        /// Underlying TOML error
        source: toml::de::Error,
    },

    /// Serialization failed
    #[error("Cannot serialize credentials: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// File cannot be written
    #[error("Cannot write credentials file {path}: {source}")]
    Write {
        /// Credentials file path
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },

    /// Interactive input failed
    #[error("Credential prompt failed: {0}")]
    Prompt(#[source] io::Error),

    /// The user left a field empty
    #[error("No value given for {0}")]
    Incomplete(&'static str),
}
