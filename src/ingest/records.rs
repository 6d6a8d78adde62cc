// src/ingest/records.rs
//
// Records handed to the durable store. Created once per accepted upload
// and never updated.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use uuid::Uuid;

use super::device::DeviceSnapshot;
use crate::core::{AudioCharacterization, ConversionStatus};

/// Identifier supplied by the identity service. Trusted as given.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        UserId(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(id: UserId, username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            email: email.into(),
            created_at: Utc::now(),
        }
    }
}

/// Stored form of a characterization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioMetadataRecord {
    pub original_sample_rate: u32,
    pub resampled_sample_rate: u32,
    pub conversion: ConversionStatus,
    pub duration: f64,
    pub channels: u16,
    pub bits_per_sample: u16,
    pub processing_time: f64,
    pub integrity_message: String,
    pub duration_message: String,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub genre: Option<String>,
    pub year: Option<u32>,
    pub bitrate: u64,
    /// Size of the upload as received
    pub filesize: u64,
}

impl AudioMetadataRecord {
    pub fn from_characterization(characterization: &AudioCharacterization, filesize: u64) -> Self {
        let tags = characterization.tags.clone();
        Self {
            original_sample_rate: characterization.original_sample_rate,
            resampled_sample_rate: characterization.resampled_sample_rate,
            conversion: characterization.rate_decision.status,
            duration: characterization.duration_secs,
            channels: characterization.channels,
            bits_per_sample: characterization.bits_per_sample,
            processing_time: characterization.processing_time_secs,
            integrity_message: characterization.integrity_message.clone(),
            duration_message: characterization.duration_message.clone(),
            title: tags.title,
            artist: tags.artist,
            album: tags.album,
            genre: tags.genre,
            year: tags.year,
            bitrate: characterization.bitrate,
            filesize,
        }
    }
}

/// One accepted upload: owner, storage location, characterization, device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioFileRecord {
    pub id: Uuid,
    /// Stored blob name
    pub name: String,
    pub path: PathBuf,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub metadata: AudioMetadataRecord,
    pub device: DeviceSnapshot,
}

impl AudioFileRecord {
    pub fn new(
        user_id: UserId,
        path: PathBuf,
        metadata: AudioMetadataRecord,
        device: DeviceSnapshot,
    ) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            id: Uuid::new_v4(),
            name,
            path,
            user_id,
            created_at: Utc::now(),
            metadata,
            device,
        }
    }
}

/// Listing entry for a user's uploads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioFileSummary {
    pub id: Uuid,
    pub name: String,
}

impl From<&AudioFileRecord> for AudioFileSummary {
    fn from(record: &AudioFileRecord) -> Self {
        Self {
            id: record.id,
            name: record.name.clone(),
        }
    }
}
