//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Credentials could not be loaded or saved
    #[error("Configuration error: {0}")]
    Credentials(#[from] tweetsweep_store::CredentialError),

    /// Review or destruction failed
    #[error("{0}")]
    Sweep(#[from] tweetsweep_sweeper::SweepError),

    /// SDK error
    #[error("{0}")]
    Sdk(#[from] tweetsweep_sdk::SdkError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Terminal error
    #[error("Terminal error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
}
