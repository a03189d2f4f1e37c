// src/seen.rs
//! Durable ledger of postings already surfaced to the user.
//!
//! Backed by a single JSON object `{ job_id: SeenRecord }`. Records are keep-first:
//! marking an already-seen posting again never touches its timestamp.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::PersistenceError;
use crate::models::{Posting, SeenRecord};

#[derive(Debug, Default)]
pub struct SeenStore {
    path: Option<PathBuf>,
    records: BTreeMap<String, SeenRecord>,
    dirty: bool,
}

impl SeenStore {
    /// Store without a backing file; `save` is a no-op.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load the ledger from `path`. A missing or blank file is an empty ledger.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, PersistenceError> {
        let path = path.into();
        let content = match fs::read_to_string(&path) {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "seen store absent, starting empty");
                return Ok(Self {
                    path: Some(path),
                    ..Self::default()
                });
            }
            Err(source) => return Err(PersistenceError::Io { path, source }),
        };

        let records: BTreeMap<String, SeenRecord> = if content.trim().is_empty() {
            BTreeMap::new()
        } else {
            serde_json::from_str(&content).map_err(|source| PersistenceError::Corrupt {
                path: path.clone(),
                source,
            })?
        };

        tracing::debug!(path = %path.display(), records = records.len(), "seen store loaded");
        Ok(Self {
            path: Some(path),
            records,
            dirty: false,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_seen(&self, posting: &Posting) -> bool {
        self.records.contains_key(&posting.dedup_id())
    }

    /// Record the posting as seen now. Returns `false` when it was already present.
    pub fn mark_seen(&mut self, posting: &Posting) -> bool {
        self.mark_seen_at(posting, Utc::now())
    }

    pub fn mark_seen_at(&mut self, posting: &Posting, seen_at: DateTime<Utc>) -> bool {
        let job_id = posting.dedup_id();
        if self.records.contains_key(&job_id) {
            return false;
        }
        self.records.insert(
            job_id.clone(),
            SeenRecord {
                job_id,
                url: posting.url.clone(),
                seen_at,
                source: posting.source.clone(),
            },
        );
        self.dirty = true;
        true
    }

    pub fn get(&self, job_id: &str) -> Option<&SeenRecord> {
        self.records.get(job_id)
    }

    pub fn records(&self) -> &BTreeMap<String, SeenRecord> {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// True when records were added since the last load/save.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Write the ledger atomically (temp file + rename).
    pub fn save(&mut self) -> Result<(), PersistenceError> {
        let Some(path) = self.path.clone() else {
            return Ok(());
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| PersistenceError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let body = serde_json::to_vec_pretty(&self.records).map_err(|source| {
            PersistenceError::Corrupt {
                path: path.clone(),
                source,
            }
        })?;

        let tmp = tmp_path(&path);
        fs::write(&tmp, body).map_err(|source| PersistenceError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &path).map_err(|source| PersistenceError::Io {
            path: path.clone(),
            source,
        })?;

        self.dirty = false;
        tracing::debug!(path = %path.display(), records = self.records.len(), "seen store saved");
        Ok(())
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "seen_jobs.json".into());
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn keep_first_timestamp() {
        let mut store = SeenStore::in_memory();
        let p = Posting::new("SRE", "Acme", "Remote", "https://acme.test/1", "board");
        let t0 = Utc::now() - Duration::days(3);
        assert!(store.mark_seen_at(&p, t0));
        assert!(!store.mark_seen_at(&p, Utc::now()));
        assert_eq!(store.get(&p.dedup_id()).unwrap().seen_at, t0);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn in_memory_save_is_noop() {
        let mut store = SeenStore::in_memory();
        store.mark_seen(&Posting::new("a", "b", "", "", "c"));
        store.save().unwrap();
        assert!(store.is_dirty());
    }

    #[test]
    fn blank_file_is_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("seen.json");
        fs::write(&p, "  \n").unwrap();
        let store = SeenStore::load(&p).unwrap();
        assert!(store.is_empty());
    }
}
