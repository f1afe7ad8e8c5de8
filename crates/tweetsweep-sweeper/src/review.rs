//! Review driver
//!
//! Walks the pending records of a selection in archive order and asks a
//! [`DecisionSource`] about each one. Keep and destroy answers are flushed to
//! the ledger before the next record is shown.

use crate::{Result, Session};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use tweetsweep_domain::{Decision, Record, RecordKind};
use tweetsweep_store::LedgerCounts;

/// Which records a review session walks through
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Scope {
    /// Every record, oldest first
    #[default]
    All,
    /// Records created within a `YYYY`, `YYYY-MM` or `YYYY-MM-DD` prefix
    Span(String),
    /// Records whose text contains a term, ignoring case
    Search(String),
}

/// Kind filters applied on top of a [`Scope`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindFilter {
    /// Hide retweets
    #[serde(default = "default_true")]
    pub hide_retweets: bool,
    /// Hide replies
    #[serde(default)]
    pub hide_replies: bool,
    /// Hide plain posts
    #[serde(default)]
    pub hide_posts: bool,
}

fn default_true() -> bool {
    true
}

impl Default for KindFilter {
    fn default() -> Self {
        Self {
            hide_retweets: true,
            hide_replies: false,
            hide_posts: false,
        }
    }
}

impl KindFilter {
    /// Check whether a record kind is visible
    pub fn shows(&self, kind: RecordKind) -> bool {
        match kind {
            RecordKind::Post => !self.hide_posts,
            RecordKind::Reply => !self.hide_replies,
            RecordKind::Retweet => !self.hide_retweets,
        }
    }
}

/// Scope plus kind filters
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selection {
    /// Records to walk through
    pub scope: Scope,
    /// Kinds to hide
    pub filter: KindFilter,
}

impl Selection {
    /// Selection over a scope with the given filters
    pub fn new(scope: Scope, filter: KindFilter) -> Self {
        Self { scope, filter }
    }

    /// Check whether a record belongs to the selection
    pub fn matches(&self, record: &Record) -> bool {
        let in_scope = match &self.scope {
            Scope::All => true,
            Scope::Span(span) => record.created_in(span),
            Scope::Search(term) => record.mentions(term),
        };
        in_scope && self.filter.shows(record.kind())
    }
}

/// What the decision source is shown
#[derive(Debug, Clone)]
pub struct ReviewItem<'a> {
    /// Record under review
    pub record: &'a Record,
    /// Replied-to record, when it is in the archive
    pub parent: Option<&'a Record>,
    /// 1-based position within this session
    pub position: usize,
    /// Records this session started with
    pub total: usize,
    /// Ledger counts before this decision
    pub counts: LedgerCounts,
}

/// Supplies one decision per presented record
///
/// An `Err` ends the session as an error. Sources that read a terminal
/// should map an interrupt or end of input to [`Decision::Quit`].
pub trait DecisionSource {
    /// Decide about one record
    fn decide(&mut self, item: &ReviewItem<'_>) -> std::io::Result<Decision>;
}

/// Tally of one review session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReviewOutcome {
    /// Records decided as keep
    pub kept: usize,
    /// Records marked for deletion
    pub marked: usize,
    /// Records left pending
    pub skipped: usize,
    /// The reviewer quit before the end
    pub quit: bool,
}

impl ReviewOutcome {
    /// Records that received a decision
    pub fn decided(&self) -> usize {
        self.kept + self.marked
    }
}

/// Run one review session
///
/// Only undecided records matching `selection` are presented. A ledger write
/// failure or an input error aborts the session; decisions flushed before
/// that point stay on disk.
pub fn run_review<S: DecisionSource + ?Sized>(
    session: &mut Session,
    selection: &Selection,
    source: &mut S,
) -> Result<ReviewOutcome> {
    let Session { archive, ledger } = session;

    let queue: Vec<&Record> = archive
        .records()
        .iter()
        .filter(|r| selection.matches(r) && !ledger.is_decided(&r.id))
        .collect();
    let total = queue.len();
    info!("Reviewing {} records", total);

    let mut outcome = ReviewOutcome::default();
    for (index, record) in queue.into_iter().enumerate() {
        if ledger.is_decided(&record.id) {
            continue;
        }

        let item = ReviewItem {
            record,
            parent: archive.parent_of(record),
            position: index + 1,
            total,
            counts: ledger.counts(),
        };

        match source.decide(&item)? {
            Decision::Keep => {
                ledger.record_keep(&record.id)?;
                outcome.kept += 1;
            }
            Decision::Destroy => {
                ledger.record_destroy(&record.id)?;
                outcome.marked += 1;
            }
            Decision::Skip => {
                debug!("Skipped {}", record.id);
                outcome.skipped += 1;
            }
            Decision::Quit => {
                outcome.quit = true;
                break;
            }
        }
    }

    info!(
        "Review finished: {} kept, {} marked, {} skipped{}",
        outcome.kept,
        outcome.marked,
        outcome.skipped,
        if outcome.quit { " (quit)" } else { "" }
    );
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use tweetsweep_domain::RecordId;

    fn record(id: &str, y: i32, m: u32, text: &str) -> Record {
        Record::new(
            RecordId::parse(id).unwrap(),
            text,
            Utc.with_ymd_and_hms(y, m, 1, 0, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_scope_matching() {
        let r = record("1", 2014, 3, "Coffee with Alice");

        assert!(Selection::new(Scope::All, KindFilter::default()).matches(&r));
        assert!(Selection::new(Scope::Span("2014".into()), KindFilter::default()).matches(&r));
        assert!(Selection::new(Scope::Span("2014-03".into()), KindFilter::default()).matches(&r));
        assert!(!Selection::new(Scope::Span("2014-04".into()), KindFilter::default()).matches(&r));
        assert!(Selection::new(Scope::Search("alice".into()), KindFilter::default()).matches(&r));
        assert!(!Selection::new(Scope::Search("bob".into()), KindFilter::default()).matches(&r));
    }

    #[test]
    fn test_kind_filters() {
        let post = record("1", 2014, 3, "post");
        let mut reply = record("2", 2014, 3, "@bob hi");
        reply.in_reply_to = Some(RecordId::parse("1").unwrap());
        let mut retweet = record("3", 2014, 3, "RT @bob: hi");
        retweet.retweet_of = Some(RecordId::parse("99").unwrap());

        let default = Selection::default();
        assert!(default.matches(&post));
        assert!(default.matches(&reply));
        assert!(!default.matches(&retweet));

        let replies_only = Selection::new(
            Scope::All,
            KindFilter {
                hide_retweets: true,
                hide_replies: false,
                hide_posts: true,
            },
        );
        assert!(!replies_only.matches(&post));
        assert!(replies_only.matches(&reply));
        assert!(!replies_only.matches(&retweet));

        let everything = KindFilter {
            hide_retweets: false,
            hide_replies: false,
            hide_posts: false,
        };
        assert!(Selection::new(Scope::All, everything).matches(&retweet));
    }

    #[test]
    fn test_outcome_decided() {
        let outcome = ReviewOutcome {
            kept: 2,
            marked: 3,
            skipped: 4,
            quit: false,
        };
        assert_eq!(outcome.decided(), 5);
    }
}
