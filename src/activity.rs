//! Activity log storage for dz.
//!
//! Append-only record of human-readable mutation messages, stored as
//! JSON lines in `activity.jsonl`. Display-only: never replayed and
//! never used for undo.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::lock::{self, FileLock, DEFAULT_LOCK_TIMEOUT_MS};

/// One activity log entry, ordered by insertion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActivityEntry {
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Append-only activity recorder backed by a JSONL file.
#[derive(Debug, Clone)]
pub struct ActivityLog {
    path: PathBuf,
    /// Optional cap on retained entries; `None` keeps the full history.
    retain: Option<usize>,
}

impl ActivityLog {
    pub fn new(path: PathBuf) -> Self {
        Self { path, retain: None }
    }

    pub fn with_retention(path: PathBuf, retain: Option<usize>) -> Self {
        Self { path, retain }
    }

    /// Append a message with the current timestamp.
    pub fn record(&self, message: impl Into<String>) -> Result<ActivityEntry> {
        let entry = ActivityEntry {
            message: message.into(),
            timestamp: Utc::now(),
        };

        let _lock = FileLock::acquire(lock_path(&self.path), DEFAULT_LOCK_TIMEOUT_MS)?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let line = serde_json::to_vec(&entry)?;
        file.write_all(&line)?;
        file.write_all(b"\n")?;
        file.flush()?;
        drop(file);

        if let Some(cap) = self.retain {
            self.prune(cap)?;
        }

        Ok(entry)
    }

    /// The last `n` entries, most recent first. Re-reads the log each
    /// call, so repeated queries see the same underlying history.
    pub fn recent(&self, n: usize) -> Result<Vec<ActivityEntry>> {
        let mut entries = self.read_all()?;
        let skip = entries.len().saturating_sub(n);
        entries.drain(..skip);
        entries.reverse();
        Ok(entries)
    }

    /// All entries in insertion order. Lines that fail to parse are
    /// skipped rather than failing the whole read.
    pub fn read_all(&self) -> Result<Vec<ActivityEntry>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.path)?;
        Ok(content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect())
    }

    /// Drop the oldest entries past the retention cap. Caller holds the
    /// append lock already, so this rewrite races with nothing.
    fn prune(&self, cap: usize) -> Result<()> {
        let entries = self.read_all()?;
        if entries.len() <= cap {
            return Ok(());
        }

        let keep = &entries[entries.len() - cap..];
        let mut buffer = Vec::new();
        for entry in keep {
            buffer.extend_from_slice(&serde_json::to_vec(entry)?);
            buffer.push(b'\n');
        }
        lock::write_atomic(&self.path, &buffer)
    }
}

fn lock_path(path: &Path) -> PathBuf {
    PathBuf::from(format!("{}.lock", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn log_in(temp: &TempDir) -> ActivityLog {
        ActivityLog::new(temp.path().join("activity.jsonl"))
    }

    #[test]
    fn record_appends_in_insertion_order() {
        let temp = TempDir::new().unwrap();
        let log = log_in(&temp);

        log.record("first").unwrap();
        log.record("second").unwrap();

        let entries = log.read_all().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].message, "first");
        assert_eq!(entries[1].message, "second");
        assert!(entries[0].timestamp <= entries[1].timestamp);
    }

    #[test]
    fn recent_returns_last_n_most_recent_first() {
        let temp = TempDir::new().unwrap();
        let log = log_in(&temp);
        for i in 0..5 {
            log.record(format!("entry {i}")).unwrap();
        }

        let recent = log.recent(2).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].message, "entry 4");
        assert_eq!(recent[1].message, "entry 3");
    }

    #[test]
    fn recent_is_restartable() {
        let temp = TempDir::new().unwrap();
        let log = log_in(&temp);
        log.record("only").unwrap();

        assert_eq!(log.recent(10).unwrap(), log.recent(10).unwrap());
    }

    #[test]
    fn empty_log_reads_as_empty() {
        let temp = TempDir::new().unwrap();
        let log = log_in(&temp);
        assert!(log.read_all().unwrap().is_empty());
        assert!(log.recent(5).unwrap().is_empty());
    }

    #[test]
    fn retention_cap_drops_oldest_entries() {
        let temp = TempDir::new().unwrap();
        let log = ActivityLog::with_retention(temp.path().join("activity.jsonl"), Some(3));
        for i in 0..5 {
            log.record(format!("entry {i}")).unwrap();
        }

        let entries = log.read_all().unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].message, "entry 2");
        assert_eq!(entries[2].message, "entry 4");
    }

    #[test]
    fn unparseable_lines_are_skipped() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("activity.jsonl");
        let log = ActivityLog::new(path.clone());
        log.record("good").unwrap();
        {
            let mut file = OpenOptions::new().append(true).open(&path).unwrap();
            file.write_all(b"not json\n").unwrap();
        }
        log.record("also good").unwrap();

        let entries = log.read_all().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].message, "also good");
    }
}
