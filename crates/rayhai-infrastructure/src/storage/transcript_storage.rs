//! Capped chat transcript storage.
//!
//! The front-end keeps the last entries of the conversation on disk and
//! replays them on start. This is independent from the engine's session
//! context, which lives in memory only.

use rayhai_core::session::Exchange;
use std::fs;
use std::path::{Path, PathBuf};

/// Number of entries kept on disk.
pub const DEFAULT_TRANSCRIPT_CAP: usize = 50;

/// Errors that can occur during transcript storage operations.
#[derive(Debug)]
pub enum TranscriptStorageError {
    IoError(std::io::Error),
    ParseError(serde_json::Error),
}

impl std::fmt::Display for TranscriptStorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TranscriptStorageError::IoError(e) => write!(f, "I/O error: {}", e),
            TranscriptStorageError::ParseError(e) => write!(f, "JSON parse error: {}", e),
        }
    }
}

impl std::error::Error for TranscriptStorageError {}

impl From<std::io::Error> for TranscriptStorageError {
    fn from(e: std::io::Error) -> Self {
        TranscriptStorageError::IoError(e)
    }
}

impl From<serde_json::Error> for TranscriptStorageError {
    fn from(e: serde_json::Error) -> Self {
        TranscriptStorageError::ParseError(e)
    }
}

/// JSON file holding the most recent transcript entries.
pub struct TranscriptStorage {
    path: PathBuf,
    cap: usize,
}

impl TranscriptStorage {
    pub fn new(path: PathBuf) -> Self {
        Self::with_cap(path, DEFAULT_TRANSCRIPT_CAP)
    }

    pub fn with_cap(path: PathBuf, cap: usize) -> Self {
        Self { path, cap }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the stored entries, oldest first. A missing file is empty.
    pub fn load(&self) -> Result<Vec<Exchange>, TranscriptStorageError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    /// Replaces the stored entries, keeping only the last `cap`.
    pub fn save(&self, entries: &[Exchange]) -> Result<(), TranscriptStorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let start = entries.len().saturating_sub(self.cap);
        let json = serde_json::to_string_pretty(&entries[start..])?;
        fs::write(&self.path, json)?;
        Ok(())
    }

    /// Appends entries to the stored transcript.
    pub fn append(&self, new_entries: &[Exchange]) -> Result<(), TranscriptStorageError> {
        let mut entries = self.load()?;
        entries.extend_from_slice(new_entries);
        self.save(&entries)
    }

    pub fn clear(&self) -> Result<(), TranscriptStorageError> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rayhai_core::intent::Intent;
    use rayhai_core::session::ExchangeRole;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let storage = TranscriptStorage::new(temp_dir.path().join("transcript.json"));
        assert!(storage.load().unwrap().is_empty());
        storage.clear().unwrap();
    }

    #[test]
    fn test_cap_keeps_most_recent() {
        let temp_dir = TempDir::new().unwrap();
        let storage = TranscriptStorage::new(temp_dir.path().join("transcript.json"));

        for i in 0..60 {
            storage
                .append(&[Exchange::user(format!("message {i}"))])
                .unwrap();
        }

        let entries = storage.load().unwrap();
        assert_eq!(entries.len(), DEFAULT_TRANSCRIPT_CAP);
        assert_eq!(entries.first().unwrap().text, "message 10");
        assert_eq!(entries.last().unwrap().text, "message 59");
    }

    #[test]
    fn test_round_trip_and_clear() {
        let temp_dir = TempDir::new().unwrap();
        let storage = TranscriptStorage::with_cap(temp_dir.path().join("t.json"), 4);
        storage
            .append(&[
                Exchange::user("merci"),
                Exchange::assistant("Avec plaisir !", Intent::Thanks),
            ])
            .unwrap();

        let entries = storage.load().unwrap();
        assert_eq!(entries[1].role, ExchangeRole::Assistant);
        assert_eq!(entries[1].intent, Some(Intent::Thanks));

        storage.clear().unwrap();
        assert!(storage.load().unwrap().is_empty());
    }
}
