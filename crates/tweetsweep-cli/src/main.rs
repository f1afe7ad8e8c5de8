//! Tweetsweep CLI - Review an exported tweet archive and delete what you no longer want.

use clap::Parser;
use std::path::Path;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tweetsweep_cli::console::{Console, ConsoleCredentialPrompt};
use tweetsweep_cli::menu::{Menu, Remote};
use tweetsweep_cli::{Cli, Config, Formatter};
use tweetsweep_store::credentials;
use tweetsweep_sweeper::Session;

fn main() {
    // Log to stderr; warnings only unless RUST_LOG says otherwise
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> tweetsweep_cli::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let color_enabled = !cli.no_color && config.settings.color;
    let mut formatter = Formatter::new(color_enabled, cli.user.clone());

    info!(
        "Starting in {} mode",
        if cli.is_online() { "online" } else { "offline" }
    );
    let mut session = Session::open(&cli.workdir)?;
    let mut console = Console::new()?;

    let remote = match &cli.credentials {
        Some(path) => {
            let remote = connect(path, &config, &mut console, &formatter)?;
            formatter.set_screen_name(remote.session.screen_name());
            println!(
                "{}",
                formatter.success(&format!("Authenticated as @{}", remote.session.screen_name()))
            );
            Some(remote)
        }
        None => {
            if formatter.screen_name().is_none() {
                println!("Please enter your Twitter username (to display links):");
                if let Some(name) = console.read_line("> ")? {
                    formatter.set_screen_name(name);
                }
            }
            None
        }
    };

    Menu::new(&mut session, &mut console, &formatter, &config, remote).run()
}

fn connect(path: &Path, config: &Config, console: &mut Console, formatter: &Formatter) -> tweetsweep_cli::Result<Remote> {
    if !path.exists() {
        println!(
            "{}",
            formatter.info(&format!("No credentials at {}, please enter your API keys", path.display()))
        );
    }
    let credentials = credentials::load_or_prompt(path, &mut ConsoleCredentialPrompt::new(console))?;
    Remote::connect(config, &credentials)
}
