//! Record store backed by the exported `tweets.csv`

use crate::error::ArchiveError;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use tweetsweep_domain::{Record, RecordId};

/// Archive file name inside the working directory
pub const ARCHIVE_FILE: &str = "tweets.csv";

/// One row of the archive, as exported
///
/// Columns other than these are ignored; optional ones may be missing.
#[derive(Debug, Deserialize)]
struct ArchiveRow {
    tweet_id: String,
    timestamp: String,
    text: String,
    #[serde(default)]
    source: String,
    #[serde(default)]
    in_reply_to_status_id: String,
    #[serde(default)]
    retweeted_status_id: String,
    #[serde(default)]
    expanded_urls: String,
}

/// The archived records, loaded once per run
///
/// Records are kept in chronological order, oldest first. Records with the same
/// timestamp keep their file order.
#[derive(Debug, Clone, Default)]
pub struct Archive {
    records: Vec<Record>,
    index: HashMap<RecordId, usize>,
}

impl Archive {
    /// Load `tweets.csv` from the working directory
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file is missing, or if any row is
    /// malformed. Nothing is loaded partially.
    pub fn load<P: AsRef<Path>>(workdir: P) -> Result<Self, ArchiveError> {
        let workdir = workdir.as_ref();
        if !workdir.is_dir() {
            return Err(ArchiveError::DirectoryNotFound(workdir.to_path_buf()));
        }

        let path = workdir.join(ARCHIVE_FILE);
        let file = File::open(&path).map_err(|source| ArchiveError::Io {
            path: path.clone(),
            source,
        })?;

        let archive = Self::from_reader(file, &path)?;
        debug!("Loaded {} records from {}", archive.len(), path.display());
        Ok(archive)
    }

    /// Parse an archive from any CSV source
    ///
    /// `origin` is only used in error messages.
    pub fn from_reader<R: Read>(reader: R, origin: &Path) -> Result<Self, ArchiveError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::Headers)
            .from_reader(reader);

        let mut records = Vec::new();
        for (idx, row) in csv_reader.deserialize::<ArchiveRow>().enumerate() {
            let row = row.map_err(|source| ArchiveError::Csv {
                path: PathBuf::from(origin),
                source,
            })?;
            records.push(parse_row(row, idx + 1)?);
        }

        Ok(Self::from_records(records))
    }

    /// Build an archive from records already in memory
    ///
    /// Duplicate ids keep their first occurrence in input order.
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut seen = HashSet::with_capacity(records.len());
        let mut unique = Vec::with_capacity(records.len());
        for record in records {
            if !seen.insert(record.id.clone()) {
                warn!("Duplicate record {} in archive, keeping the first one", record.id);
                continue;
            }
            unique.push(record);
        }
        unique.sort_by_key(|r| r.created_at);

        let index = unique
            .iter()
            .enumerate()
            .map(|(i, r)| (r.id.clone(), i))
            .collect();

        Self { records: unique, index }
    }

    /// All records, oldest first
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if the archive holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up a record by id
    pub fn find(&self, id: &RecordId) -> Option<&Record> {
        self.index.get(id).map(|&i| &self.records[i])
    }

    /// The archived post a reply answers, if it is in the archive
    pub fn parent_of(&self, record: &Record) -> Option<&Record> {
        record.in_reply_to.as_ref().and_then(|id| self.find(id))
    }

    /// Months (`YYYY-MM`) that contain at least one record, sorted
    pub fn months(&self) -> Vec<String> {
        self.records
            .iter()
            .map(Record::month)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

fn parse_row(row: ArchiveRow, line: usize) -> Result<Record, ArchiveError> {
    let invalid = |reason: String| ArchiveError::InvalidRow { row: line, reason };

    let id = RecordId::parse(&row.tweet_id).map_err(invalid)?;
    let created_at = parse_timestamp(&row.timestamp)
        .ok_or_else(|| invalid(format!("Invalid timestamp {:?}", row.timestamp)))?;

    Ok(Record {
        id,
        text: row.text,
        created_at,
        source: row.source,
        in_reply_to: optional_id(&row.in_reply_to_status_id).map_err(invalid)?,
        retweet_of: optional_id(&row.retweeted_status_id).map_err(invalid)?,
        expanded_urls: row.expanded_urls,
    })
}

fn optional_id(value: &str) -> Result<Option<RecordId>, String> {
    if value.trim().is_empty() {
        Ok(None)
    } else {
        RecordId::parse(value).map(Some)
    }
}

/// Parse the timestamp formats found in archive exports
///
/// Twitter writes `2018-03-04 12:34:56 +0000`; RFC 3339 and offset-less
/// timestamps (taken as UTC) are accepted as well.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    DateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S %z")
        .or_else(|_| DateTime::parse_from_rfc3339(value))
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|naive| naive.and_utc())
        })
}
