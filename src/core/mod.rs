//! Core characterization pipeline

pub mod error;
pub mod negotiator;
pub mod pipeline;
pub mod policy;
pub mod reader;
pub mod synthesizer;

pub use error::PipelineError;
pub use negotiator::{negotiate, ConversionStatus, RateDecision};
pub use pipeline::{characterize, characterize_path, PipelineStage};
pub use policy::{
    validate, DurationBounds, RejectReason, ValidationOutcome, MAX_DURATION_SECS,
    MIN_DURATION_SECS,
};
pub use reader::{read_header, WaveformHeader};
pub use synthesizer::{
    derived_bitrate, duration_message, synthesize, AudioCharacterization, AudioTags,
    INTEGRITY_VALID,
};
