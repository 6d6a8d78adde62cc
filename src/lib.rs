//! wavintake - Validate and characterize uploaded WAV recordings
//!
//! Runs every uploaded waveform through a short, stateless pipeline before
//! it is accepted into storage:
//!
//! 1. **Format reader**: parses the RIFF/WAVE header only (sample rate,
//!    channels, bit depth, duration), never the sample payload
//! 2. **Validation policy**: allowed sample rates, then a 0.1s - 600s
//!    duration window (both bounds inclusive)
//! 3. **Sample-rate negotiation**: records the intended output rate.
//!    Conversion is declared, not performed
//! 4. **Metadata synthesis**: derived bitrate, status messages, empty tags
//!
//! ## Module Structure
//!
//! - `core` - The characterization pipeline
//! - `config` - Service and pipeline configuration
//! - `ingest` - Upload admission, placement, device snapshots and record stores
//! - `cli` - Command-line interface
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use wavintake::{characterize, PipelineConfig};
//! use std::fs::File;
//!
//! let config = PipelineConfig::new(8000, [8000, 16000, 44100, 48000]);
//! let characterization = characterize(File::open("take.wav")?, &config)?;
//!
//! println!("{}", characterization.duration_message);
//! println!("Bitrate: {} bps", characterization.bitrate);
//! ```
//!
//! ## Rejection Reasons
//!
//! | Code                      | Meaning                                  |
//! |---------------------------|------------------------------------------|
//! | `unreadable_container`    | Truncated, corrupt or not a WAV file     |
//! | `unsupported_sample_rate` | Sample rate outside the allowed set      |
//! | `duration_out_of_range`   | Shorter than 0.1s or longer than 600s    |
//! | `source_unavailable`      | The bytes could not be opened or read    |

// Characterization pipeline
pub mod core;

// Command-line interface
pub mod cli;

// Configuration
pub mod config;

// Upload handling and records
pub mod ingest;

pub use config::{IngestConfig, IngestConfigBuilder, PipelineConfig};
pub use self::core::{
    characterize, characterize_path, negotiate, read_header, validate, AudioCharacterization,
    AudioTags, ConversionStatus, DurationBounds, PipelineError, PipelineStage, RateDecision,
    RejectReason, ValidationOutcome, WaveformHeader,
};
pub use ingest::{
    AudioFileRecord, DeviceSnapshot, IngestError, IngestService, JsonLinesStore, MemoryStore,
    RecordStore, UserId,
};
