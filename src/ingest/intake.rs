// src/ingest/intake.rs
//
// Upload admission checks and blob placement, applied before any bytes
// reach the pipeline.

use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::IngestConfig;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IntakeError {
    #[error("file size exceeds the limit ({size} > {limit} bytes)")]
    FileTooLarge { size: u64, limit: u64 },

    #[error("file type not allowed: {name}")]
    ExtensionNotAllowed { name: String },
}

/// Lowercased extension of `file_name`, if any
pub fn extension_of(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty())
        .map(|e| e.to_lowercase())
}

/// Admit or refuse an upload by size, then by extension.
pub fn check_upload(file_name: &str, size: u64, config: &IngestConfig) -> Result<(), IntakeError> {
    if size > config.max_content_length {
        return Err(IntakeError::FileTooLarge {
            size,
            limit: config.max_content_length,
        });
    }

    match extension_of(file_name) {
        Some(ext) if config.is_extension_allowed(&ext) => Ok(()),
        _ => Err(IntakeError::ExtensionNotAllowed {
            name: file_name.to_string(),
        }),
    }
}

/// Unique stored location for an upload: `<folder>/<unix nanos>.<ext>`.
pub fn place_upload(upload_folder: &Path, file_name: &str, now: DateTime<Utc>) -> PathBuf {
    let nanos = now
        .timestamp_nanos_opt()
        .unwrap_or_else(|| now.timestamp_micros().saturating_mul(1000));
    let stored = match extension_of(file_name) {
        Some(ext) => format!("{}.{}", nanos, ext),
        None => nanos.to_string(),
    };
    upload_folder.join(stored)
}
