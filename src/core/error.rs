// src/core/error.rs
//
// Typed failures of the characterization pipeline.

use std::io;
use thiserror::Error;

use super::pipeline::PipelineStage;
use super::policy::RejectReason;

/// Why a single `characterize` invocation stopped.
///
/// Every variant terminates the pipeline at the step that discovered it;
/// no partial characterization is ever produced alongside an error.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The bytes could not be parsed as a waveform container
    #[error("unreadable container: {reason}")]
    UnreadableContainer { reason: String },

    /// The header sample rate is not in the configured allowed set
    #[error("unsupported sample rate: {sample_rate} Hz")]
    UnsupportedSampleRate { sample_rate: u32 },

    /// The duration falls outside the accepted bounds
    #[error("audio duration is out of accepted range ({min}-{max} seconds): {duration_secs:.6}s")]
    DurationOutOfRange {
        duration_secs: f64,
        min: f64,
        max: f64,
    },

    /// The byte source could not be opened or read at all
    #[error("source unavailable: {0}")]
    SourceUnavailable(#[source] io::Error),
}

impl PipelineError {
    pub(crate) fn unreadable(reason: impl Into<String>) -> Self {
        PipelineError::UnreadableContainer {
            reason: reason.into(),
        }
    }

    /// Stable machine-readable code for client-facing messaging.
    pub fn reason_code(&self) -> &'static str {
        match self {
            PipelineError::UnreadableContainer { .. } => RejectReason::UnreadableContainer.code(),
            PipelineError::UnsupportedSampleRate { .. } => {
                RejectReason::UnsupportedSampleRate.code()
            }
            PipelineError::DurationOutOfRange { .. } => RejectReason::DurationOutOfRange.code(),
            PipelineError::SourceUnavailable(_) => "source_unavailable",
        }
    }

    /// Orchestrator state in which the failure was discovered.
    pub fn failed_stage(&self) -> PipelineStage {
        match self {
            PipelineError::SourceUnavailable(_) => PipelineStage::Opening,
            PipelineError::UnreadableContainer { .. } => PipelineStage::HeaderRead,
            PipelineError::UnsupportedSampleRate { .. }
            | PipelineError::DurationOutOfRange { .. } => PipelineStage::Validating,
        }
    }
}

impl From<hound::Error> for PipelineError {
    fn from(err: hound::Error) -> Self {
        match err {
            // A header that ends early is a malformed container, not a storage failure
            hound::Error::IoError(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                PipelineError::unreadable("container ended before the header was complete")
            }
            hound::Error::IoError(e) => PipelineError::SourceUnavailable(e),
            hound::Error::FormatError(msg) => PipelineError::unreadable(msg),
            hound::Error::Unsupported => {
                PipelineError::unreadable("unsupported waveform encoding")
            }
            other => PipelineError::unreadable(other.to_string()),
        }
    }
}
