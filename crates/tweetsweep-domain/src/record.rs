//! Record module - one archived post

use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::fmt;

/// Opaque identifier of an archived post
///
/// Ids are kept as strings so that any archive format can be carried through
/// the ledger files untouched. Purely numeric ids (what Twitter hands out) are
/// ordered numerically, which keeps them in posting order; anything else sorts
/// after them lexicographically.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordId(String);

impl RecordId {
    /// Parse an id from a single token
    ///
    /// Surrounding whitespace is ignored. The id itself must be non-empty and
    /// contain neither whitespace nor control characters, since it has to
    /// survive a round trip through a line-oriented file.
    ///
    /// # Examples
    ///
    /// ```
    /// use tweetsweep_domain::RecordId;
    ///
    /// let id = RecordId::parse(" 1049375622408339456 ").unwrap();
    /// assert_eq!(id.as_str(), "1049375622408339456");
    /// assert!(RecordId::parse("two words").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, String> {
        let token = s.trim();
        if token.is_empty() {
            return Err("Record id is empty".to_string());
        }
        if let Some(c) = token.chars().find(|c| c.is_whitespace() || c.is_control()) {
            return Err(format!("Record id {:?} contains invalid character {:?}", token, c));
        }
        Ok(Self(token.to_string()))
    }

    /// Get the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn is_numeric(&self) -> bool {
        self.0.bytes().all(|b| b.is_ascii_digit())
    }
}

impl Ord for RecordId {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.is_numeric(), other.is_numeric()) {
            (true, true) => {
                let a = self.0.trim_start_matches('0');
                let b = other.0.trim_start_matches('0');
                a.len()
                    .cmp(&b.len())
                    .then_with(|| a.cmp(b))
                    .then_with(|| self.0.cmp(&other.0))
            }
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for RecordId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for RecordId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// What kind of post a record is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    /// An original post
    Post,

    /// A reply to another post
    Reply,

    /// A retweet of someone else's post
    Retweet,
}

impl RecordKind {
    /// Get the kind name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Post => "post",
            RecordKind::Reply => "reply",
            RecordKind::Retweet => "retweet",
        }
    }
}

/// An archived post
///
/// Records are loaded once from the archive and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Unique identifier
    pub id: RecordId,

    /// Post text as exported
    pub text: String,

    /// When the post was created
    pub created_at: DateTime<Utc>,

    /// Client the post was sent from (HTML anchor in Twitter exports)
    pub source: String,

    /// Post this one replies to
    pub in_reply_to: Option<RecordId>,

    /// Original post if this is a retweet
    pub retweet_of: Option<RecordId>,

    /// Expanded link targets, comma separated as exported
    pub expanded_urls: String,
}

impl Record {
    /// Create a plain post record
    pub fn new(id: RecordId, text: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            text: text.into(),
            created_at,
            source: String::new(),
            in_reply_to: None,
            retweet_of: None,
            expanded_urls: String::new(),
        }
    }

    /// Classify the record
    ///
    /// A retweet that also carries a reply reference is still a retweet.
    pub fn kind(&self) -> RecordKind {
        if self.retweet_of.is_some() {
            RecordKind::Retweet
        } else if self.in_reply_to.is_some() {
            RecordKind::Reply
        } else {
            RecordKind::Post
        }
    }

    /// Month bucket of the record, formatted as `YYYY-MM`
    pub fn month(&self) -> String {
        self.created_at.format("%Y-%m").to_string()
    }

    /// Check whether the `YYYY-MM-DD HH:MM:SS` creation time starts with `span`
    pub fn created_in(&self, span: &str) -> bool {
        let span = span.trim();
        !span.is_empty() && self.created_at.format("%Y-%m-%d %H:%M:%S").to_string().starts_with(span)
    }

    /// Case-insensitive substring match on the text
    pub fn mentions(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        !needle.is_empty() && self.text.to_lowercase().contains(&needle)
    }
}
