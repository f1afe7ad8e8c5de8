//! Decision ledger: three durable id sets
//!
//! Every decision is appended to its file and synced before the call returns,
//! so a crash loses at most the decision in flight. Files hold one id per line
//! and nothing else, which keeps them easy to inspect and fix by hand.

use crate::error::LedgerError;
use std::collections::BTreeSet;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use tweetsweep_domain::{Disposition, Record, RecordId};

/// File holding kept ids
pub const KEPT_FILE: &str = "kept.ids";

/// File holding ids marked for destruction
pub const MARKED_FILE: &str = "marked.ids";

/// File holding ids confirmed destroyed
pub const DESTROYED_FILE: &str = "destroyed.ids";

/// Per-disposition counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LedgerCounts {
    /// Kept records
    pub kept: usize,
    /// Records waiting for remote deletion
    pub marked: usize,
    /// Records deleted remotely
    pub destroyed: usize,
}

impl LedgerCounts {
    /// Total number of decided records
    pub fn decided(&self) -> usize {
        self.kept + self.marked + self.destroyed
    }
}

/// Durable record of keep / destroy / destroyed decisions
///
/// The three sets are pairwise disjoint at all times.
#[derive(Debug, Clone)]
pub struct DecisionLedger {
    dir: PathBuf,
    kept: BTreeSet<RecordId>,
    marked: BTreeSet<RecordId>,
    destroyed: BTreeSet<RecordId>,
}

impl DecisionLedger {
    /// Load the ledger files from the working directory
    ///
    /// Missing files yield empty sets. Blank lines are ignored and malformed
    /// lines are skipped with a warning. Ids found in several files are
    /// resolved with precedence destroyed, then kept, then marked.
    ///
    /// # Errors
    ///
    /// Fails only if a file exists but cannot be read.
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self, LedgerError> {
        let dir = dir.as_ref().to_path_buf();

        let destroyed = read_id_file(&dir.join(DESTROYED_FILE))?;
        let mut kept = read_id_file(&dir.join(KEPT_FILE))?;
        let mut marked = read_id_file(&dir.join(MARKED_FILE))?;

        kept.retain(|id| {
            let clash = destroyed.contains(id);
            if clash {
                warn!("Record {} is both kept and destroyed, treating it as destroyed", id);
            }
            !clash
        });
        marked.retain(|id| {
            if destroyed.contains(id) {
                debug!("Record {} already destroyed, dropping it from marked", id);
                false
            } else if kept.contains(id) {
                warn!("Record {} is both kept and marked, treating it as kept", id);
                false
            } else {
                true
            }
        });

        Ok(Self {
            dir,
            kept,
            marked,
            destroyed,
        })
    }

    /// Record a keep decision
    pub fn record_keep(&mut self, id: &RecordId) -> Result<(), LedgerError> {
        self.record(id, Disposition::Kept)
    }

    /// Record a destroy decision (the id becomes marked)
    pub fn record_destroy(&mut self, id: &RecordId) -> Result<(), LedgerError> {
        self.record(id, Disposition::Marked)
    }

    fn record(&mut self, id: &RecordId, disposition: Disposition) -> Result<(), LedgerError> {
        if let Some(existing) = self.disposition_of(id) {
            return Err(LedgerError::AlreadyDecided {
                id: id.to_string(),
                disposition: existing,
            });
        }

        append_id(&self.path_of(disposition), id)?;
        self.set_mut(disposition).insert(id.clone());
        debug!("Recorded {} as {}", id, disposition);
        Ok(())
    }

    /// Move a marked id to destroyed
    ///
    /// The id is appended to the destroyed file first, then the marked file is
    /// rewritten without it. Calling this for an id that is already destroyed
    /// is a no-op.
    pub fn mark_destroyed(&mut self, id: &RecordId) -> Result<(), LedgerError> {
        if self.destroyed.contains(id) {
            return Ok(());
        }
        if !self.marked.contains(id) {
            return Err(LedgerError::NotMarked(id.to_string()));
        }

        append_id(&self.path_of(Disposition::Destroyed), id)?;
        self.destroyed.insert(id.clone());
        self.marked.remove(id);
        rewrite_ids(&self.path_of(Disposition::Marked), &self.marked)?;
        debug!("Record {} moved to destroyed", id);
        Ok(())
    }

    /// Which set an id belongs to, if any
    pub fn disposition_of(&self, id: &RecordId) -> Option<Disposition> {
        Disposition::ALL.into_iter().find(|&d| self.set(d).contains(id))
    }

    /// True if the id carries any decision
    pub fn is_decided(&self, id: &RecordId) -> bool {
        self.disposition_of(id).is_some()
    }

    /// Ids in one set, in sorted order
    pub fn ids(&self, disposition: Disposition) -> &BTreeSet<RecordId> {
        self.set(disposition)
    }

    /// Ids still waiting for remote deletion, in sorted order
    pub fn marked(&self) -> impl Iterator<Item = &RecordId> {
        self.marked.iter()
    }

    /// Set sizes
    pub fn counts(&self) -> LedgerCounts {
        LedgerCounts {
            kept: self.kept.len(),
            marked: self.marked.len(),
            destroyed: self.destroyed.len(),
        }
    }

    /// Records not yet decided, in the order given
    pub fn pending<'a>(&'a self, records: &'a [Record]) -> impl Iterator<Item = &'a Record> + 'a {
        records.iter().filter(move |r| !self.is_decided(&r.id))
    }

    /// Path of the file backing one set
    pub fn path_of(&self, disposition: Disposition) -> PathBuf {
        self.dir.join(match disposition {
            Disposition::Kept => KEPT_FILE,
            Disposition::Marked => MARKED_FILE,
            Disposition::Destroyed => DESTROYED_FILE,
        })
    }

    fn set(&self, disposition: Disposition) -> &BTreeSet<RecordId> {
        match disposition {
            Disposition::Kept => &self.kept,
            Disposition::Marked => &self.marked,
            Disposition::Destroyed => &self.destroyed,
        }
    }

    fn set_mut(&mut self, disposition: Disposition) -> &mut BTreeSet<RecordId> {
        match disposition {
            Disposition::Kept => &mut self.kept,
            Disposition::Marked => &mut self.marked,
            Disposition::Destroyed => &mut self.destroyed,
        }
    }
}

/// Read an id file, tolerating absence, blank lines and garbage
fn read_id_file(path: &Path) -> Result<BTreeSet<RecordId>, LedgerError> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(BTreeSet::new()),
        Err(source) => {
            return Err(LedgerError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let mut ids = BTreeSet::new();
    for (n, raw) in bytes.split(|&b| b == b'\n').enumerate() {
        let Ok(line) = std::str::from_utf8(raw) else {
            warn!("Skipping non UTF-8 line {} in {}", n + 1, path.display());
            continue;
        };
        if line.trim().is_empty() {
            continue;
        }
        match RecordId::parse(line) {
            Ok(id) => {
                ids.insert(id);
            }
            Err(e) => warn!("Skipping line {} in {}: {}", n + 1, path.display(), e),
        }
    }
    Ok(ids)
}

/// Append `id\n` with a single write, then sync
///
/// If the file does not end with a newline (hand edit, torn write) one is
/// written first so the new id never fuses with the previous line.
fn append_id(path: &Path, id: &RecordId) -> Result<(), LedgerError> {
    let write_err = |source| LedgerError::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut file = OpenOptions::new()
        .read(true)
        .append(true)
        .create(true)
        .open(path)
        .map_err(write_err)?;

    let mut line = String::with_capacity(id.as_str().len() + 2);
    if !ends_with_newline(&mut file).map_err(write_err)? {
        line.push('\n');
    }
    line.push_str(id.as_str());
    line.push('\n');

    file.write_all(line.as_bytes()).map_err(write_err)?;
    file.sync_data().map_err(write_err)
}

fn ends_with_newline(file: &mut File) -> io::Result<bool> {
    let len = file.metadata()?.len();
    if len == 0 {
        return Ok(true);
    }
    file.seek(SeekFrom::Start(len - 1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

/// Replace the file contents via a synced temp file and a rename
fn rewrite_ids(path: &Path, ids: &BTreeSet<RecordId>) -> Result<(), LedgerError> {
    let write_err = |source| LedgerError::Write {
        path: path.to_path_buf(),
        source,
    };

    let tmp = path.with_extension("ids.tmp");
    let mut contents = String::new();
    for id in ids {
        contents.push_str(id.as_str());
        contents.push('\n');
    }

    let mut file = File::create(&tmp).map_err(write_err)?;
    file.write_all(contents.as_bytes()).map_err(write_err)?;
    file.sync_all().map_err(write_err)?;
    fs::rename(&tmp, path).map_err(write_err)
}
