//! Command-line argument parsing.

use clap::Parser;
use std::path::PathBuf;

/// Tweetsweep - Review an exported tweet archive and delete what you no longer want.
///
/// Without a credentials file the tool runs offline: tweets can be reviewed and
/// marked, but nothing is deleted.
#[derive(Debug, Parser)]
#[command(name = "tweetsweep")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Working directory holding tweets.csv and the decision files
    pub workdir: PathBuf,

    /// Credentials file; enables deletion (created on first use)
    pub credentials: Option<PathBuf>,

    /// Account handle used for links in offline mode
    #[arg(short, long, env = "TWEETSWEEP_USER")]
    pub user: Option<String>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// True when a credentials file was given
    pub fn is_online(&self) -> bool {
        self.credentials.is_some()
    }
}
