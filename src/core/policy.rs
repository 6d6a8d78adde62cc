// src/core/policy.rs
//
// Acceptance rules evaluated on a parsed header before anything is derived.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::reader::WaveformHeader;

/// Shortest accepted recording, in seconds (inclusive)
pub const MIN_DURATION_SECS: f64 = 0.1;
/// Longest accepted recording, in seconds (inclusive)
pub const MAX_DURATION_SECS: f64 = 600.0;

/// Reason a waveform was not accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    UnsupportedSampleRate,
    DurationOutOfRange,
    UnreadableContainer,
}

impl RejectReason {
    pub fn code(&self) -> &'static str {
        match self {
            RejectReason::UnsupportedSampleRate => "unsupported_sample_rate",
            RejectReason::DurationOutOfRange => "duration_out_of_range",
            RejectReason::UnreadableContainer => "unreadable_container",
        }
    }
}

/// Result of evaluating the acceptance rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum ValidationOutcome {
    Passed,
    Failed(RejectReason),
}

impl ValidationOutcome {
    pub fn is_passed(&self) -> bool {
        matches!(self, ValidationOutcome::Passed)
    }

    pub fn reason(&self) -> Option<RejectReason> {
        match self {
            ValidationOutcome::Passed => None,
            ValidationOutcome::Failed(reason) => Some(*reason),
        }
    }
}

/// Inclusive duration window, in seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DurationBounds {
    pub min_secs: f64,
    pub max_secs: f64,
}

impl Default for DurationBounds {
    fn default() -> Self {
        Self {
            min_secs: MIN_DURATION_SECS,
            max_secs: MAX_DURATION_SECS,
        }
    }
}

impl DurationBounds {
    pub fn contains(&self, duration_secs: f64) -> bool {
        duration_secs >= self.min_secs && duration_secs <= self.max_secs
    }
}

/// Evaluate the acceptance rules.
///
/// The sample rate is checked first, then the duration; only the first
/// failing reason is reported. Rate membership is exact integer equality.
pub fn validate(
    header: &WaveformHeader,
    duration_secs: f64,
    allowed_rates: &BTreeSet<u32>,
    bounds: DurationBounds,
) -> ValidationOutcome {
    if !allowed_rates.contains(&header.sample_rate) {
        return ValidationOutcome::Failed(RejectReason::UnsupportedSampleRate);
    }

    // NaN fails both comparisons and is rejected here
    if !bounds.contains(duration_secs) {
        return ValidationOutcome::Failed(RejectReason::DurationOutOfRange);
    }

    ValidationOutcome::Passed
}
