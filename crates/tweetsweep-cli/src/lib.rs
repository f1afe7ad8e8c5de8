//! Tweetsweep CLI library.
//!
//! This library provides the interactive front end of tweetsweep: argument
//! parsing, settings, the menu loop, terminal prompts and output formatting.

pub mod cli;
pub mod config;
pub mod console;
pub mod error;
pub mod menu;
pub mod output;

pub use cli::Cli;
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
