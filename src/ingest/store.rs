// src/ingest/store.rs
//
// Durable store seam. The pipeline never talks to a store; the ingest
// service hands it fully built records.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::records::{AudioFileRecord, AudioFileSummary, User, UserId};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("email already exists: {0}")]
    DuplicateEmail(String),

    #[error("user already exists: {0}")]
    DuplicateUser(UserId),

    #[error("unknown user: {0}")]
    UnknownUser(UserId),

    #[error("store I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt record at {path}:{line}: {source}")]
    Corrupt {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode record: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Persists users and accepted uploads. Records are append-only.
pub trait RecordStore {
    fn create_user(&mut self, user: User) -> Result<(), StoreError>;

    fn find_user(&self, id: &UserId) -> Option<&User>;

    fn insert_audio_file(&mut self, record: AudioFileRecord) -> Result<(), StoreError>;

    fn audio_files_for_user(&self, id: &UserId) -> Vec<AudioFileSummary>;
}

/// In-memory tables shared by both store implementations
#[derive(Debug, Default)]
struct Tables {
    users: HashMap<UserId, User>,
    audio_files: Vec<AudioFileRecord>,
}

impl Tables {
    fn check_user(&self, user: &User) -> Result<(), StoreError> {
        if self.users.contains_key(&user.id) {
            return Err(StoreError::DuplicateUser(user.id.clone()));
        }
        if self.users.values().any(|u| u.email == user.email) {
            return Err(StoreError::DuplicateEmail(user.email.clone()));
        }
        Ok(())
    }

    fn check_audio_file(&self, record: &AudioFileRecord) -> Result<(), StoreError> {
        if !self.users.contains_key(&record.user_id) {
            return Err(StoreError::UnknownUser(record.user_id.clone()));
        }
        Ok(())
    }

    fn summaries(&self, id: &UserId) -> Vec<AudioFileSummary> {
        self.audio_files
            .iter()
            .filter(|r| &r.user_id == id)
            .map(AudioFileSummary::from)
            .collect()
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Tables,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn audio_files(&self) -> &[AudioFileRecord] {
        &self.tables.audio_files
    }
}

impl RecordStore for MemoryStore {
    fn create_user(&mut self, user: User) -> Result<(), StoreError> {
        self.tables.check_user(&user)?;
        self.tables.users.insert(user.id.clone(), user);
        Ok(())
    }

    fn find_user(&self, id: &UserId) -> Option<&User> {
        self.tables.users.get(id)
    }

    fn insert_audio_file(&mut self, record: AudioFileRecord) -> Result<(), StoreError> {
        self.tables.check_audio_file(&record)?;
        self.tables.audio_files.push(record);
        Ok(())
    }

    fn audio_files_for_user(&self, id: &UserId) -> Vec<AudioFileSummary> {
        self.tables.summaries(id)
    }
}

/// Line format of the JSON-lines store
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum StoredRecord {
    User(User),
    AudioFile(AudioFileRecord),
}

/// File-backed store: one JSON record per line, appended on insert
#[derive(Debug)]
pub struct JsonLinesStore {
    path: PathBuf,
    tables: Tables,
}

impl JsonLinesStore {
    /// Open the store at `path`, loading existing records. A missing file
    /// is an empty store; it is created on the first insert.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let mut tables = Tables::default();

        if path.exists() {
            let file = File::open(&path).map_err(|source| io_error(&path, source))?;
            for (index, line) in BufReader::new(file).lines().enumerate() {
                let line = line.map_err(|source| io_error(&path, source))?;
                if line.trim().is_empty() {
                    continue;
                }
                let record: StoredRecord =
                    serde_json::from_str(&line).map_err(|source| StoreError::Corrupt {
                        path: path.clone(),
                        line: index + 1,
                        source,
                    })?;
                match record {
                    // Users are never updated; a repeated id keeps the first line
                    StoredRecord::User(user) => {
                        tables.users.entry(user.id.clone()).or_insert(user);
                    }
                    StoredRecord::AudioFile(file) => tables.audio_files.push(file),
                }
            }
            log::debug!(
                "Loaded {} users and {} audio files from {}",
                tables.users.len(),
                tables.audio_files.len(),
                path.display()
            );
        }

        Ok(Self { path, tables })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, record: &StoredRecord) -> Result<(), StoreError> {
        let mut line = serde_json::to_string(record)?;
        line.push('\n');

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| io_error(parent, source))?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| io_error(&self.path, source))?;
        file.write_all(line.as_bytes())
            .map_err(|source| io_error(&self.path, source))
    }
}

impl RecordStore for JsonLinesStore {
    fn create_user(&mut self, user: User) -> Result<(), StoreError> {
        self.tables.check_user(&user)?;
        let record = StoredRecord::User(user);
        self.append(&record)?;
        if let StoredRecord::User(user) = record {
            self.tables.users.insert(user.id.clone(), user);
        }
        Ok(())
    }

    fn find_user(&self, id: &UserId) -> Option<&User> {
        self.tables.users.get(id)
    }

    fn insert_audio_file(&mut self, record: AudioFileRecord) -> Result<(), StoreError> {
        self.tables.check_audio_file(&record)?;
        let record = StoredRecord::AudioFile(record);
        self.append(&record)?;
        if let StoredRecord::AudioFile(file) = record {
            self.tables.audio_files.push(file);
        }
        Ok(())
    }

    fn audio_files_for_user(&self, id: &UserId) -> Vec<AudioFileSummary> {
        self.tables.summaries(id)
    }
}

fn io_error(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}
