// src/core/pipeline.rs
//
// Orchestrates one characterization: measure the source, read the header,
// validate, negotiate the output rate, synthesize the record. Each call is
// independent; nothing is cached or shared between invocations.

use std::fmt;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;
use std::time::Instant;

use super::error::PipelineError;
use super::negotiator::negotiate;
use super::policy::{validate, RejectReason, ValidationOutcome};
use super::reader::{read_header, WaveformHeader};
use super::synthesizer::{synthesize, AudioCharacterization};
use crate::config::PipelineConfig;

/// Orchestrator states for a single invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Opening,
    HeaderRead,
    Validating,
    Negotiating,
    Synthesizing,
    Done,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::Opening => "opening",
            PipelineStage::HeaderRead => "header_read",
            PipelineStage::Validating => "validating",
            PipelineStage::Negotiating => "negotiating",
            PipelineStage::Synthesizing => "synthesizing",
            PipelineStage::Done => "done",
        };
        f.write_str(name)
    }
}

fn enter(stage: PipelineStage) {
    log::debug!("pipeline -> {}", stage);
}

/// Characterize the waveform container in `source`.
///
/// `source` must be positioned at the first byte of the container. The
/// remaining length of the source is reported as the file size. The
/// sequence runs exactly once; the first failure ends it and no partial
/// characterization is returned.
pub fn characterize<R: Read + Seek>(
    source: R,
    config: &PipelineConfig,
) -> Result<AudioCharacterization, PipelineError> {
    enter(PipelineStage::Opening);
    characterize_from(Instant::now(), source, config)
}

/// Runs the sequence with processing time counted from `started`
fn characterize_from<R: Read + Seek>(
    started: Instant,
    mut source: R,
    config: &PipelineConfig,
) -> Result<AudioCharacterization, PipelineError> {
    let file_size_bytes = measure_remaining(&mut source)?;

    enter(PipelineStage::HeaderRead);
    let header = read_header(&mut source)?;
    log::debug!(
        "Header: {} Hz, {} ch, {} bit, {:.3}s, {} bytes",
        header.sample_rate,
        header.channels,
        header.bits_per_sample,
        header.duration_secs,
        file_size_bytes
    );

    enter(PipelineStage::Validating);
    let outcome = validate(
        &header,
        header.duration_secs,
        &config.allowed_rates,
        config.duration_bounds,
    );
    if let ValidationOutcome::Failed(reason) = outcome {
        return Err(rejection(reason, &header, config));
    }

    enter(PipelineStage::Negotiating);
    let decision = negotiate(header.sample_rate, config.target_rate);

    enter(PipelineStage::Synthesizing);
    let characterization = synthesize(outcome, &header, decision, file_size_bytes, started)
        .map_err(|reason| rejection(reason, &header, config))?;

    enter(PipelineStage::Done);
    Ok(characterization)
}

/// Open `path` and characterize it. The file handle is released on every
/// exit path, including validation and parse failures.
pub fn characterize_path(
    path: &Path,
    config: &PipelineConfig,
) -> Result<AudioCharacterization, PipelineError> {
    let started = Instant::now();
    enter(PipelineStage::Opening);
    let file = File::open(path).map_err(PipelineError::SourceUnavailable)?;
    characterize_from(started, file, config)
}

/// Bytes between the current position and the end; leaves the position unchanged.
fn measure_remaining<S: Seek>(source: &mut S) -> Result<u64, PipelineError> {
    let start = source
        .stream_position()
        .map_err(PipelineError::SourceUnavailable)?;
    let end = source
        .seek(SeekFrom::End(0))
        .map_err(PipelineError::SourceUnavailable)?;
    source
        .seek(SeekFrom::Start(start))
        .map_err(PipelineError::SourceUnavailable)?;
    Ok(end.saturating_sub(start))
}

fn rejection(reason: RejectReason, header: &WaveformHeader, config: &PipelineConfig) -> PipelineError {
    match reason {
        RejectReason::UnsupportedSampleRate => PipelineError::UnsupportedSampleRate {
            sample_rate: header.sample_rate,
        },
        RejectReason::DurationOutOfRange => PipelineError::DurationOutOfRange {
            duration_secs: header.duration_secs,
            min: config.duration_bounds.min_secs,
            max: config.duration_bounds.max_secs,
        },
        RejectReason::UnreadableContainer => {
            PipelineError::unreadable("container rejected during validation")
        }
    }
}
