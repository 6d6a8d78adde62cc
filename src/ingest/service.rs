// src/ingest/service.rs
//
// Upload handler flow: admit, place, characterize, record.

use chrono::Utc;
use std::fs::{self, File, OpenOptions};
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::device::DeviceSnapshot;
use super::intake::{check_upload, place_upload, IntakeError};
use super::records::{AudioFileRecord, AudioMetadataRecord, UserId};
use super::store::{RecordStore, StoreError};
use crate::config::{IngestConfig, PipelineConfig};
use crate::core::{characterize_path, PipelineError};

#[derive(Debug, Error)]
pub enum IngestError {
    #[error(transparent)]
    Intake(#[from] IntakeError),

    #[error("could not save file to {path}: {source}")]
    Placement {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not process audio: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("could not save file info: {0}")]
    Store(#[from] StoreError),
}

impl IngestError {
    /// Reason code for client-facing messaging
    pub fn reason_code(&self) -> &'static str {
        match self {
            IngestError::Intake(IntakeError::FileTooLarge { .. }) => "file_too_large",
            IngestError::Intake(IntakeError::ExtensionNotAllowed { .. }) => "extension_not_allowed",
            IngestError::Placement { .. } => "placement_failed",
            IngestError::Pipeline(err) => err.reason_code(),
            IngestError::Store(_) => "store_failed",
        }
    }
}

/// Accepts uploads on behalf of an authenticated caller
pub struct IngestService<S: RecordStore> {
    config: IngestConfig,
    pipeline: PipelineConfig,
    store: S,
}

impl<S: RecordStore> IngestService<S> {
    pub fn new(config: IngestConfig, store: S) -> Self {
        let pipeline = config.pipeline();
        Self {
            config,
            pipeline,
            store,
        }
    }

    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Ingest the file at `upload` for `user_id`.
    ///
    /// `original_name` is the client-side file name used for admission.
    /// The bytes are copied to a freshly placed location in the upload
    /// folder and characterized from there. A record is written only when
    /// every step succeeds.
    pub fn ingest(
        &mut self,
        user_id: &UserId,
        upload: &Path,
        original_name: &str,
        device: DeviceSnapshot,
    ) -> Result<AudioFileRecord, IngestError> {
        let size = fs::metadata(upload)
            .map_err(|e| IngestError::Pipeline(PipelineError::SourceUnavailable(e)))?
            .len();
        check_upload(original_name, size, &self.config)?;

        let stored_path = self.place(upload, original_name)?;

        let characterization = match characterize_path(&stored_path, &self.pipeline) {
            Ok(c) => c,
            Err(err) => {
                log::warn!(
                    "Rejected upload {} for {}: {}",
                    original_name,
                    user_id,
                    err
                );
                return Err(err.into());
            }
        };

        let metadata = AudioMetadataRecord::from_characterization(&characterization, size);
        let record = AudioFileRecord::new(user_id.clone(), stored_path, metadata, device);
        self.store.insert_audio_file(record.clone())?;

        log::info!(
            "Stored {} for {} ({} Hz -> {} Hz, {:.2}s)",
            record.name,
            user_id,
            characterization.original_sample_rate,
            characterization.resampled_sample_rate,
            characterization.duration_secs
        );
        Ok(record)
    }

    fn place(&self, upload: &Path, original_name: &str) -> Result<PathBuf, IngestError> {
        let folder = &self.config.upload_folder;
        fs::create_dir_all(folder).map_err(|source| IngestError::Placement {
            path: folder.clone(),
            source,
        })?;

        let base = place_upload(folder, original_name, Utc::now());
        let (stored, mut target) = claim_path(&base).map_err(|source| IngestError::Placement {
            path: base.clone(),
            source,
        })?;

        File::open(upload)
            .and_then(|mut src| io::copy(&mut src, &mut target))
            .map_err(|source| IngestError::Placement {
                path: stored.clone(),
                source,
            })?;
        log::debug!("Placed {} at {}", original_name, stored.display());
        Ok(stored)
    }
}

/// Create `base`, or `<stem>-N.<ext>` for the first free N, without ever
/// opening an existing file.
fn claim_path(base: &Path) -> io::Result<(PathBuf, File)> {
    let stem = base
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut candidate = base.to_path_buf();
    let mut attempt = 1;
    loop {
        match OpenOptions::new().write(true).create_new(true).open(&candidate) {
            Ok(file) => return Ok((candidate, file)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                let mut name = format!("{}-{}", stem, attempt);
                if let Some(ext) = base.extension() {
                    name.push('.');
                    name.push_str(&ext.to_string_lossy());
                }
                candidate = base.with_file_name(name);
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
