//! Decisions made about records during review

/// Answer given for a single record during review
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Keep the record; it is never offered for deletion
    Keep,

    /// Mark the record for remote deletion
    Destroy,

    /// Leave the record pending and move on
    Skip,

    /// End the review session
    Quit,
}

/// Where a decided record lives in the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Disposition {
    /// Reviewed and kept
    Kept,

    /// Marked for deletion, not yet confirmed deleted remotely
    Marked,

    /// Confirmed deleted remotely
    Destroyed,
}

impl Disposition {
    /// All dispositions, in ledger file order
    pub const ALL: [Disposition; 3] = [Disposition::Kept, Disposition::Marked, Disposition::Destroyed];

    /// Get the disposition name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Disposition::Kept => "kept",
            Disposition::Marked => "marked",
            Disposition::Destroyed => "destroyed",
        }
    }
}

impl std::fmt::Display for Disposition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
