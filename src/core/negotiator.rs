// src/core/negotiator.rs
//
// Output sample-rate decision. No sample data is converted here: when the
// source and target rates differ, the target is recorded as the intended
// rate for a downstream converter and the decision is flagged as such.

use serde::{Deserialize, Serialize};

/// Whether the negotiated rate implies work that has not been done
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionStatus {
    /// Source already at the target rate
    NotRequired,
    /// Target rate recorded as intent; samples are still at the source rate
    NegotiatedNotExecuted,
}

/// Recorded outcome of sample-rate negotiation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateDecision {
    pub source_rate: u32,
    pub target_rate: u32,
    pub resampled_rate: u32,
    pub status: ConversionStatus,
}

impl RateDecision {
    /// True when a downstream converter still has to act on this decision
    pub fn conversion_pending(&self) -> bool {
        self.status == ConversionStatus::NegotiatedNotExecuted
    }
}

/// Decide the output rate for `source_rate` given the configured target.
pub fn negotiate(source_rate: u32, target_rate: u32) -> RateDecision {
    if source_rate == target_rate {
        RateDecision {
            source_rate,
            target_rate,
            resampled_rate: source_rate,
            status: ConversionStatus::NotRequired,
        }
    } else {
        log::debug!(
            "Declaring {} Hz -> {} Hz conversion (not executed)",
            source_rate,
            target_rate
        );
        RateDecision {
            source_rate,
            target_rate,
            resampled_rate: target_rate,
            status: ConversionStatus::NegotiatedNotExecuted,
        }
    }
}
