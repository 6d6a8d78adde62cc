// src/core/synthesizer.rs
//
// Builds the final characterization record from the validated header.

use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::negotiator::RateDecision;
use super::policy::{RejectReason, ValidationOutcome};
use super::reader::WaveformHeader;

/// Integrity message for a header that passed validation
pub const INTEGRITY_VALID: &str = "WAV file is valid";

/// Descriptive tags. Extraction from embedded tag chunks is not performed,
/// so every field is `None` ("unknown", not an error).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioTags {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub genre: Option<String>,
    pub year: Option<u32>,
}

/// Complete derived description of an uploaded recording
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioCharacterization {
    pub original_sample_rate: u32,
    /// Intended output rate; see `rate_decision.status` for whether it was applied
    pub resampled_sample_rate: u32,
    pub rate_decision: RateDecision,
    pub duration_secs: f64,
    pub channels: u16,
    pub bits_per_sample: u16,
    /// Wall-clock seconds spent in the pipeline
    pub processing_time_secs: f64,
    pub integrity_message: String,
    pub duration_message: String,
    pub tags: AudioTags,
    /// sample_rate x bits_per_sample x channels, in bits per second
    pub bitrate: u64,
    pub file_size_bytes: u64,
}

impl AudioCharacterization {
    /// Compare every field except `processing_time_secs`.
    pub fn same_content(&self, other: &Self) -> bool {
        Self {
            processing_time_secs: other.processing_time_secs,
            ..self.clone()
        } == *other
    }
}

/// Definitional bitrate of uncompressed PCM. Not a measured encoded bitrate.
pub fn derived_bitrate(sample_rate: u32, bits_per_sample: u16, channels: u16) -> u64 {
    sample_rate as u64 * bits_per_sample as u64 * channels as u64
}

pub fn duration_message(duration_secs: f64) -> String {
    format!("Audio duration: {:.2} seconds", duration_secs)
}

/// Assemble the characterization for a header that passed validation.
///
/// `started` is the instant the pipeline began; the elapsed time is read
/// once, as the last step, and stored as is.
pub fn synthesize(
    outcome: ValidationOutcome,
    header: &WaveformHeader,
    decision: RateDecision,
    file_size_bytes: u64,
    started: Instant,
) -> Result<AudioCharacterization, RejectReason> {
    if let ValidationOutcome::Failed(reason) = outcome {
        return Err(reason);
    }

    let mut characterization = AudioCharacterization {
        original_sample_rate: header.sample_rate,
        resampled_sample_rate: decision.resampled_rate,
        rate_decision: decision,
        duration_secs: header.duration_secs,
        channels: header.channels,
        bits_per_sample: header.bits_per_sample,
        processing_time_secs: 0.0,
        integrity_message: INTEGRITY_VALID.to_string(),
        duration_message: duration_message(header.duration_secs),
        tags: AudioTags::default(),
        bitrate: derived_bitrate(header.sample_rate, header.bits_per_sample, header.channels),
        file_size_bytes,
    };
    characterization.processing_time_secs = started.elapsed().as_secs_f64();

    Ok(characterization)
}
