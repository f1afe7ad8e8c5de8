//! Explicit session context shared by both drivers

use crate::Result;
use std::path::Path;
use tracing::info;
use tweetsweep_domain::Record;
use tweetsweep_store::{Archive, DecisionLedger};

/// Archive and ledger for one working directory
#[derive(Debug)]
pub struct Session {
    /// Records loaded at startup, oldest first
    pub archive: Archive,
    /// Decisions made so far
    pub ledger: DecisionLedger,
}

/// Snapshot of where the working directory stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionStatus {
    /// Records in the archive
    pub total: usize,
    /// Records without a decision
    pub pending: usize,
    /// Records decided as keep
    pub kept: usize,
    /// Records waiting for remote deletion
    pub marked: usize,
    /// Records deleted remotely
    pub destroyed: usize,
}

impl Session {
    /// Load the archive and ledger from `workdir`
    pub fn open<P: AsRef<Path>>(workdir: P) -> Result<Self> {
        let workdir = workdir.as_ref();
        let archive = Archive::load(workdir)?;
        let ledger = DecisionLedger::load(workdir)?;

        let session = Self::new(archive, ledger);
        let status = session.status();
        info!(
            "Opened {}: {} records, {} pending",
            workdir.display(),
            status.total,
            status.pending
        );
        Ok(session)
    }

    /// Session over an already loaded archive and ledger
    pub fn new(archive: Archive, ledger: DecisionLedger) -> Self {
        Self { archive, ledger }
    }

    /// Records still waiting for a decision, oldest first
    pub fn pending(&self) -> impl Iterator<Item = &Record> {
        self.ledger.pending(self.archive.records())
    }

    /// Current counts
    pub fn status(&self) -> SessionStatus {
        let counts = self.ledger.counts();
        SessionStatus {
            total: self.archive.len(),
            pending: self.pending().count(),
            kept: counts.kept,
            marked: counts.marked,
            destroyed: counts.destroyed,
        }
    }
}
