//! Output formatting for the CLI.

use colored::*;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};
use tweetsweep_domain::{Record, RecordId, RecordKind};
use tweetsweep_sweeper::{DestructionEvent, DestructionReport, ReviewItem, ReviewOutcome, SessionStatus};

/// Timestamp layout used when showing a tweet
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";

/// Output formatter.
pub struct Formatter {
    color_enabled: bool,
    screen_name: Option<String>,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(color_enabled: bool, screen_name: Option<String>) -> Self {
        Self {
            color_enabled,
            screen_name: screen_name.filter(|name| !name.trim().is_empty()),
        }
    }

    /// Account handle links point at, if known
    pub fn screen_name(&self) -> Option<&str> {
        self.screen_name.as_deref()
    }

    /// Set the account handle links point at
    pub fn set_screen_name(&mut self, screen_name: impl Into<String>) {
        let name = screen_name.into();
        let name = name.trim().trim_start_matches('@');
        self.screen_name = (!name.is_empty()).then(|| name.to_string());
    }

    /// Web link to a tweet
    pub fn permalink(&self, id: &RecordId) -> String {
        match &self.screen_name {
            Some(name) => format!("https://twitter.com/{}/status/{}", name, id),
            None => format!("https://twitter.com/i/web/status/{}", id),
        }
    }

    /// Status table for the working directory
    pub fn status(&self, status: &SessionStatus) -> String {
        let mut builder = Builder::default();
        builder.push_record(["Total", "Todo", "Done", "Kept", "Marked", "Destroyed"]);
        builder.push_record([
            status.total.to_string(),
            status.pending.to_string(),
            (status.total - status.pending).to_string(),
            status.kept.to_string(),
            status.marked.to_string(),
            status.destroyed.to_string(),
        ]);

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        let title = match &self.screen_name {
            Some(name) => format!("@{}'s tweet archive", name),
            None => "Tweet archive".to_string(),
        };
        format!("{}\n{}", self.colorize(&title, "cyan"), table)
    }

    /// Pretty representation of a tweet, followed by its parent when known
    pub fn record(&self, record: &Record, parent: Option<&Record>) -> String {
        let mut lines = vec![format!(
            "{} {}",
            self.colorize(&record.created_at.format(TIMESTAMP_FORMAT).to_string(), "blue"),
            self.permalink(&record.id)
        )];

        match record.kind() {
            RecordKind::Retweet => {
                if let Some(original) = &record.retweet_of {
                    lines.push(format!("  retweeted: {}", original));
                }
            }
            RecordKind::Reply => {
                if let Some(target) = &record.in_reply_to {
                    lines.push(format!("  replies to: {}", target));
                }
            }
            RecordKind::Post => {}
        }

        lines.push(String::new());
        lines.push(record.text.clone());

        if let Some(parent) = parent {
            lines.push(String::new());
            lines.push(self.colorize("In reply to:", "magenta"));
            lines.push(self.record(parent, None));
        }

        lines.join("\n")
    }

    /// Screen shown for one review decision
    pub fn review_item(&self, item: &ReviewItem<'_>) -> String {
        [
            self.colorize(
                &format!(
                    "[{}/{}]  kept {}  marked {}",
                    item.position, item.total, item.counts.kept, item.counts.marked
                ),
                "cyan",
            ),
            String::new(),
            self.record(item.record, item.parent),
            String::new(),
            "------------------------------------------".to_string(),
            " ENTER - Keep tweet and read next".to_string(),
            "     X - Mark tweet to be deleted".to_string(),
            "     C - Continue without decision".to_string(),
            "     Q - Quit reading".to_string(),
        ]
        .join("\n")
    }

    /// One-line tally of a review session
    pub fn review_outcome(&self, outcome: &ReviewOutcome) -> String {
        let message = format!(
            "Reviewed {} tweet(s): {} kept, {} marked, {} skipped",
            outcome.decided() + outcome.skipped,
            outcome.kept,
            outcome.marked,
            outcome.skipped
        );
        self.success(&message)
    }

    /// Progress line for a destruction event
    pub fn destruction_event(&self, event: &DestructionEvent) -> Option<String> {
        match event {
            DestructionEvent::Attempt { .. } => None,
            DestructionEvent::Destroyed(id) => Some(self.success(&format!("Deleted {}", id))),
            DestructionEvent::Failed(id, reason) => Some(self.error(&format!("{}: {}", id, reason))),
            DestructionEvent::Waiting { duration, .. } => Some(self.warning(&format!(
                "Rate limited, waiting {}s",
                duration.as_secs()
            ))),
            DestructionEvent::Retrying { id, attempt, error } => {
                Some(self.warning(&format!("{}: {} (attempt {})", id, error, attempt)))
            }
        }
    }

    /// Summary of a destruction run
    pub fn destruction_report(&self, report: &DestructionReport) -> String {
        let summary = report.summary();
        if report.is_complete() {
            self.colorize(&summary, "green")
        } else {
            self.colorize(&summary, "yellow")
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            "magenta" => text.magenta().to_string(),
            _ => text.to_string(),
        }
    }
}
