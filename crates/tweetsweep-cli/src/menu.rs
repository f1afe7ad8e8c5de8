//! Interactive main menu.

use crate::config::Config;
use crate::console::{Console, ConsoleDecisionSource};
use crate::error::Result;
use crate::output::Formatter;
use tweetsweep_domain::Credentials;
use tweetsweep_sdk::{TwitterClient, TwitterSession};
use tweetsweep_sweeper::{run_review, Destroyer, KindFilter, Scope, Selection, Session};

/// Main menu entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    /// Read all tweets chronologically
    All,
    /// Read tweets by time span
    TimeSpan,
    /// Search tweets for text
    Search,
    /// Delete marked tweets
    Destroy,
    /// Quit
    Quit,
}

/// Parse a menu choice
pub fn parse_menu(input: &str) -> Option<MenuAction> {
    match input.trim().to_ascii_uppercase().as_str() {
        "A" => Some(MenuAction::All),
        "T" => Some(MenuAction::TimeSpan),
        "S" => Some(MenuAction::Search),
        "X" => Some(MenuAction::Destroy),
        "Q" => Some(MenuAction::Quit),
        _ => None,
    }
}

/// Authenticated client for online mode
pub struct Remote {
    /// HTTP client
    pub client: TwitterClient,
    /// Verified session
    pub session: TwitterSession,
}

impl Remote {
    /// Build the client from settings and log in
    ///
    /// A rejected login surfaces as an authentication error.
    pub fn connect(config: &Config, credentials: &Credentials) -> Result<Self> {
        let client = TwitterClient::with_timeout(&config.settings.api_base_url, config.settings.request_timeout())?;
        let session = Destroyer::new(&client, config.destruction.clone()).authenticate(credentials)?;
        Ok(Self { client, session })
    }
}

/// Menu loop over one working directory
pub struct Menu<'a> {
    session: &'a mut Session,
    console: &'a mut Console,
    formatter: &'a Formatter,
    config: &'a Config,
    remote: Option<Remote>,
}

impl<'a> Menu<'a> {
    /// Create the menu; `remote` is `None` in offline mode
    pub fn new(
        session: &'a mut Session,
        console: &'a mut Console,
        formatter: &'a Formatter,
        config: &'a Config,
        remote: Option<Remote>,
    ) -> Self {
        Self {
            session,
            console,
            formatter,
            config,
            remote,
        }
    }

    /// Run until the user quits
    pub fn run(&mut self) -> Result<()> {
        loop {
            println!();
            println!("{}", self.formatter.status(&self.session.status()));
            print_menu(self.remote.is_some());

            let Some(line) = self.console.read_line("> ")? else {
                break;
            };
            match parse_menu(&line) {
                Some(MenuAction::Quit) => break,
                Some(MenuAction::All) => self.review(Scope::All)?,
                Some(MenuAction::TimeSpan) => {
                    println!("Available: {}", self.session.archive.months().join(", "));
                    if let Some(span) = self.ask("Select (YYYY, YYYY-MM or YYYY-MM-DD)")? {
                        self.review(Scope::Span(span))?;
                    }
                }
                Some(MenuAction::Search) => {
                    if let Some(term) = self.ask("Search")? {
                        self.review(Scope::Search(term))?;
                    }
                }
                Some(MenuAction::Destroy) => self.destroy()?,
                None => {
                    if !line.is_empty() {
                        println!("{}", self.formatter.warning(&format!("Unknown choice: {}", line)));
                    }
                }
            }
        }

        println!("{}", self.formatter.info("Cheers!"));
        Ok(())
    }

    fn ask(&mut self, label: &str) -> Result<Option<String>> {
        println!("{}", label);
        Ok(self.console.read_line("? ")?.filter(|answer| !answer.is_empty()))
    }

    fn ask_filters(&mut self) -> Result<KindFilter> {
        let defaults = self.config.review;
        Ok(KindFilter {
            hide_retweets: self.console.confirm("Filter retweets?", defaults.hide_retweets)?,
            hide_replies: self.console.confirm("Filter replies?", defaults.hide_replies)?,
            hide_posts: self.console.confirm("Filter tweets?", defaults.hide_posts)?,
        })
    }

    fn review(&mut self, scope: Scope) -> Result<()> {
        let selection = Selection::new(scope, self.ask_filters()?);
        let count = self.session.pending().filter(|r| selection.matches(r)).count();
        if count == 0 {
            println!("{}", self.formatter.info("No tweets to read."));
            return Ok(());
        }

        let prompt = format!("{} tweets to read, hit ENTER to start...", count);
        if self.console.read_line(&prompt)?.is_none() {
            return Ok(());
        }

        let mut source = ConsoleDecisionSource::new(self.console, self.formatter);
        let outcome = run_review(self.session, &selection, &mut source)?;
        println!("{}", self.formatter.review_outcome(&outcome));
        Ok(())
    }

    fn destroy(&mut self) -> Result<()> {
        let Some(remote) = &self.remote else {
            println!(
                "{}",
                self.formatter
                    .warning("Offline: restart with a credentials file to delete marked tweets.")
            );
            return Ok(());
        };

        let marked = self.session.ledger.counts().marked;
        if marked == 0 {
            println!("{}", self.formatter.info("No tweets marked for deletion."));
            return Ok(());
        }

        let question = format!("Delete {} marked tweet(s) from @{}?", marked, remote.session.screen_name());
        if !self.console.confirm(&question, false)? {
            println!("{}", self.formatter.info("Operation cancelled"));
            return Ok(());
        }

        let formatter = self.formatter;
        let mut destroyer = Destroyer::new(&remote.client, self.config.destruction.clone());
        let report = destroyer.run_with(&remote.session, &mut self.session.ledger, |event| {
            if let Some(line) = formatter.destruction_event(event) {
                println!("{}", line);
            }
        })?;

        println!("{}", formatter.destruction_report(&report));
        Ok(())
    }
}

fn print_menu(online: bool) {
    println!("Menu:");
    println!();
    println!("  A - Read all tweets chronologically");
    println!("  T - Read tweets by time span");
    println!("  S - Search tweets for text");
    if online {
        println!("  X - Delete marked tweets");
    } else {
        println!("  X - Delete marked tweets (needs credentials)");
    }
    println!("  Q - Quit");
    println!();
}
