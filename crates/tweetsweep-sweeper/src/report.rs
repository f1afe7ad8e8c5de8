//! Results of a destruction run

use std::fmt;
use std::time::Duration;
use tweetsweep_domain::RecordId;

/// Why a marked record was not destroyed this run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// The remote does not know the id
    NotFound,

    /// The account may not delete the record
    PermissionDenied,

    /// Every attempt hit a transient error
    TransientExhausted {
        /// Attempts made
        attempts: u32,
        /// Message of the last failure
        last_error: String,
    },

    /// Refused for another reason
    Rejected(String),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::NotFound => write!(f, "not found"),
            FailureReason::PermissionDenied => write!(f, "permission denied"),
            FailureReason::TransientExhausted { attempts, last_error } => {
                write!(f, "gave up after {} attempts: {}", attempts, last_error)
            }
            FailureReason::Rejected(message) => write!(f, "rejected: {}", message),
        }
    }
}

/// Tally of one destruction run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DestructionReport {
    /// Ids destroyed this run, in processing order
    pub destroyed: Vec<RecordId>,

    /// Ids that failed this run; they stay marked
    pub failed: Vec<(RecordId, FailureReason)>,

    /// Marked ids left after the run
    pub remaining: usize,

    /// Number of rate-limit waits
    pub rate_limit_waits: usize,

    /// Total time spent waiting for rate windows
    pub waited: Duration,
}

impl DestructionReport {
    /// Create an empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of failed ids
    pub fn total_failed(&self) -> usize {
        self.failed.len()
    }

    /// True when nothing failed and nothing is left
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty() && self.remaining == 0
    }

    /// Generate a printable summary
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Destruction Summary".to_string(),
            "===================".to_string(),
            format!("Destroyed: {}", self.destroyed.len()),
            format!("Failed: {}", self.total_failed()),
            format!("Still marked: {}", self.remaining),
        ];

        if self.rate_limit_waits > 0 {
            lines.push(format!(
                "Rate limit waits: {} ({}s)",
                self.rate_limit_waits,
                self.waited.as_secs()
            ));
        }

        if !self.failed.is_empty() {
            lines.push(String::new());
            lines.push("Failures:".to_string());
            for (id, reason) in &self.failed {
                lines.push(format!("  {}: {}", id, reason));
            }
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> RecordId {
        RecordId::parse(s).unwrap()
    }

    #[test]
    fn test_empty_report() {
        let report = DestructionReport::new();
        assert_eq!(report.total_failed(), 0);
        assert!(report.is_complete());
        assert!(!report.summary().contains("Failures:"));
    }

    #[test]
    fn test_summary() {
        let report = DestructionReport {
            destroyed: vec![id("1"), id("2")],
            failed: vec![
                (id("3"), FailureReason::PermissionDenied),
                (
                    id("4"),
                    FailureReason::TransientExhausted {
                        attempts: 3,
                        last_error: "HTTP 503".to_string(),
                    },
                ),
            ],
            remaining: 2,
            rate_limit_waits: 1,
            waited: Duration::from_secs(61),
        };

        let summary = report.summary();
        assert!(summary.contains("Destroyed: 2"));
        assert!(summary.contains("Failed: 2"));
        assert!(summary.contains("Still marked: 2"));
        assert!(summary.contains("Rate limit waits: 1 (61s)"));
        assert!(summary.contains("3: permission denied"));
        assert!(summary.contains("4: gave up after 3 attempts: HTTP 503"));
        assert!(!report.is_complete());
    }
}
