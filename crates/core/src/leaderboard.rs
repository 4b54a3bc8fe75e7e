//! Leaderboard - persisted, score-sorted result list
//!
//! The control loop is the only writer; the collaborator only reads. Entries
//! sit behind an `RwLock`, and every insertion rewrites the whole file through
//! a sibling temp file plus rename, so a reader of the file never sees a
//! partial write.
//!
//! # File Format
//!
//! A JSON array of records, highest score first:
//!
//! ```text
//! [{"username":"ann","score":12,"photo":"static/photos/ann_12.jpg"},
//!  {"username":"bob","score":3,"photo":"No Photo"}]
//! ```

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::LeaderboardError;

/// Stored in the `photo` field when a result has no image
pub const NO_PHOTO: &str = "No Photo";

/// One game result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub username: String,
    pub score: u32,
    #[serde(rename = "photo", default, with = "photo_field")]
    pub photo_path: Option<String>,
}

impl LeaderboardEntry {
    pub fn new(username: impl Into<String>, score: u32, photo_path: Option<String>) -> Self {
        Self {
            username: username.into(),
            score,
            photo_path,
        }
    }
}

mod photo_field {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::NO_PHOTO;

    pub fn serialize<S>(photo: &Option<String>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(photo.as_deref().unwrap_or(NO_PHOTO))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.filter(|p| !p.is_empty() && p != NO_PHOTO))
    }
}

/// Score-sorted leaderboard backed by a JSON file
#[derive(Debug)]
pub struct LeaderboardStore {
    path: PathBuf,
    entries: RwLock<Vec<LeaderboardEntry>>,
}

impl LeaderboardStore {
    /// Open the store at `path`, loading whatever is already persisted.
    ///
    /// A missing file is an empty leaderboard. A file that exists but cannot be
    /// parsed is an error, so existing scores are never overwritten.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, LeaderboardError> {
        let path = path.into();
        let entries = Self::load(&path)?;
        info!(path = %path.display(), entries = entries.len(), "leaderboard loaded");
        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    /// Read the persisted records in file order.
    pub fn load(path: &Path) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "no leaderboard file yet");
                return Ok(Vec::new());
            }
            Err(e) => return Err(LeaderboardError::io(path, e)),
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        serde_json::from_slice(&bytes).map_err(|source| LeaderboardError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Copy of the current entries, highest score first
    pub fn entries(&self) -> Vec<LeaderboardEntry> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append `entry`, re-sort by descending score and persist.
    ///
    /// The sort is stable: equal scores keep insertion order. If the write
    /// fails the entry stays in memory and the error is returned.
    pub fn record(&self, entry: LeaderboardEntry) -> Result<(), LeaderboardError> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        info!(username = %entry.username, score = entry.score, "recording result");
        entries.push(entry);
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.persist(&entries)
    }

    fn persist(&self, entries: &[LeaderboardEntry]) -> Result<(), LeaderboardError> {
        let bytes = serde_json::to_vec_pretty(entries)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| LeaderboardError::io(parent, e))?;
        }

        let tmp = temp_path(&self.path);
        let mut file = File::create(&tmp).map_err(|e| LeaderboardError::io(&tmp, e))?;
        file.write_all(&bytes)
            .and_then(|_| file.sync_all())
            .map_err(|e| LeaderboardError::io(&tmp, e))?;
        drop(file);

        fs::rename(&tmp, &self.path).map_err(|e| LeaderboardError::io(&self.path, e))?;
        debug!(path = %self.path.display(), entries = entries.len(), "leaderboard persisted");
        Ok(())
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = LeaderboardStore::open(dir.path().join("scores.json")).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn blank_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.json");
        fs::write(&path, "\n").unwrap();
        assert!(LeaderboardStore::load(&path).unwrap().is_empty());
    }

    #[test]
    fn corrupt_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.json");
        fs::write(&path, "{not json").unwrap();
        let err = LeaderboardStore::open(&path).unwrap_err();
        assert!(matches!(err, LeaderboardError::Parse { .. }));
    }

    #[test]
    fn photo_placeholder_round_trips() {
        let entry = LeaderboardEntry::new("ann", 2, None);
        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(json, r#"{"username":"ann","score":2,"photo":"No Photo"}"#);

        let back: LeaderboardEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }

    #[test]
    fn photo_path_is_kept() {
        let json = r#"{"username":"bob","score":7,"photo":"static/photos/bob_7.jpg"}"#;
        let entry: LeaderboardEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.photo_path.as_deref(), Some("static/photos/bob_7.jpg"));
    }

    #[test]
    fn null_or_missing_photo_means_none() {
        let a: LeaderboardEntry =
            serde_json::from_str(r#"{"username":"a","score":1,"photo":null}"#).unwrap();
        let b: LeaderboardEntry = serde_json::from_str(r#"{"username":"b","score":1}"#).unwrap();
        assert_eq!(a.photo_path, None);
        assert_eq!(b.photo_path, None);
    }

    #[test]
    fn record_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.json");
        let store = LeaderboardStore::open(&path).unwrap();
        store.record(LeaderboardEntry::new("ann", 3, None)).unwrap();

        assert!(path.exists());
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn record_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("scores.json");
        let store = LeaderboardStore::open(&path).unwrap();
        store.record(LeaderboardEntry::new("ann", 3, None)).unwrap();
        assert_eq!(LeaderboardStore::load(&path).unwrap().len(), 1);
    }
}
