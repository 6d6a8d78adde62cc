//! Output formatting for CLI results

use colorful::Colorful;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::core::{AudioCharacterization, ConversionStatus, PipelineError};
use crate::ingest::{AudioFileRecord, AudioFileSummary, IngestError};

/// Outcome of checking one file
#[derive(Debug)]
pub struct CheckReport {
    pub path: PathBuf,
    pub result: Result<AudioCharacterization, PipelineError>,
}

impl CheckReport {
    pub fn is_accepted(&self) -> bool {
        self.result.is_ok()
    }
}

#[derive(Serialize)]
struct JsonRejection<'a> {
    reason: &'a str,
    stage: String,
    message: String,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    file: String,
    accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    characterization: Option<&'a AudioCharacterization>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rejection: Option<JsonRejection<'a>>,
}

impl<'a> From<&'a CheckReport> for JsonReport<'a> {
    fn from(report: &'a CheckReport) -> Self {
        let (characterization, rejection) = match &report.result {
            Ok(c) => (Some(c), None),
            Err(e) => (
                None,
                Some(JsonRejection {
                    reason: e.reason_code(),
                    stage: e.failed_stage().to_string(),
                    message: e.to_string(),
                }),
            ),
        };
        Self {
            file: report.path.display().to_string(),
            accepted: report.result.is_ok(),
            characterization,
            rejection,
        }
    }
}

/// Format a check report for terminal output
pub fn format_report(report: &CheckReport, verbose: bool) -> String {
    let mut output = String::new();
    let file = report.path.display().to_string();

    match &report.result {
        Ok(c) => {
            output.push_str(&format!("{} {}\n", "✓".green(), file.cyan()));
            output.push_str(&format!("  {}\n", c.integrity_message));
            output.push_str(&format!("  {}\n", c.duration_message));
            output.push_str(&format!(
                "  Sample Rate: {} Hz{}\n",
                c.original_sample_rate,
                format_rate_decision(c)
            ));
            output.push_str(&format!("  Channels: {}\n", c.channels));
            output.push_str(&format!("  Bit Depth: {} bit\n", c.bits_per_sample));
            output.push_str(&format!("  Bitrate: {} bps\n", c.bitrate));

            if verbose {
                output.push_str(&format!("  File Size: {} bytes\n", c.file_size_bytes));
                output.push_str(&format!(
                    "  Processing Time: {:.3} ms\n",
                    c.processing_time_secs * 1000.0
                ));
            }
        }
        Err(e) => {
            output.push_str(&format!("{} {}\n", "✗".red(), file.cyan()));
            output.push_str(&format!(
                "  {} {}\n",
                format!("[{}]", e.reason_code()).yellow(),
                e
            ));
            if verbose {
                output.push_str(&format!("  Failed while {}\n", e.failed_stage()));
            }
        }
    }

    output
}

fn format_rate_decision(c: &AudioCharacterization) -> String {
    match c.rate_decision.status {
        ConversionStatus::NotRequired => String::new(),
        ConversionStatus::NegotiatedNotExecuted => format!(
            " (target {} Hz, conversion not performed)",
            c.resampled_sample_rate
        ),
    }
}

/// Format check reports as a JSON array
pub fn format_json(reports: &[CheckReport]) -> Result<String, serde_json::Error> {
    let entries: Vec<JsonReport<'_>> = reports.iter().map(JsonReport::from).collect();
    serde_json::to_string_pretty(&entries)
}

/// Summary counts, with rejections grouped by reason code
pub fn format_summary(reports: &[CheckReport]) -> String {
    let mut output = String::new();

    let accepted = reports.iter().filter(|r| r.is_accepted()).count();
    let mut rejected: BTreeMap<&'static str, usize> = BTreeMap::new();
    for report in reports {
        if let Err(e) = &report.result {
            *rejected.entry(e.reason_code()).or_insert(0) += 1;
        }
    }

    output.push_str(&format!("\n{}\n", "Summary:".bold()));
    output.push_str(&format!("  {} files checked\n", reports.len()));
    if accepted > 0 {
        output.push_str(&format!("  {}\n", format!("✓ {} accepted", accepted).green()));
    }
    for (reason, count) in rejected {
        output.push_str(&format!(
            "  {}\n",
            format!("✗ {} rejected ({})", count, reason).red()
        ));
    }

    output
}

pub fn format_ingested(source: &Path, record: &AudioFileRecord) -> String {
    format!(
        "{} {} -> {} ({})",
        "✓".green(),
        source.display(),
        record.path.display(),
        record.metadata.duration_message
    )
}

pub fn format_ingest_error(source: &Path, err: &IngestError) -> String {
    format!(
        "{} {} {} {}",
        "✗".red(),
        source.display(),
        format!("[{}]", err.reason_code()).yellow(),
        err
    )
}

pub fn format_listing(user: &str, files: &[AudioFileSummary]) -> String {
    let mut output = format!("{} file(s) for {}\n", files.len(), user);
    for file in files {
        output.push_str(&format!("  {}  {}\n", file.id, file.name));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{negotiate, AudioTags};

    fn characterization() -> AudioCharacterization {
        AudioCharacterization {
            original_sample_rate: 44100,
            resampled_sample_rate: 8000,
            rate_decision: negotiate(44100, 8000),
            duration_secs: 2.0,
            channels: 1,
            bits_per_sample: 16,
            processing_time_secs: 0.0002,
            integrity_message: "WAV file is valid".to_string(),
            duration_message: "Audio duration: 2.00 seconds".to_string(),
            tags: AudioTags::default(),
            bitrate: 705_600,
            file_size_bytes: 176_444,
        }
    }

    #[test]
    fn test_format_accepted() {
        let report = CheckReport {
            path: PathBuf::from("take.wav"),
            result: Ok(characterization()),
        };
        let output = format_report(&report, false);
        assert!(output.contains("take.wav"));
        assert!(output.contains("Audio duration: 2.00 seconds"));
        assert!(output.contains("conversion not performed"));
        assert!(output.contains("705600"));
    }

    #[test]
    fn test_format_rejected() {
        let report = CheckReport {
            path: PathBuf::from("odd.wav"),
            result: Err(PipelineError::UnsupportedSampleRate { sample_rate: 11025 }),
        };
        let output = format_report(&report, true);
        assert!(output.contains("unsupported_sample_rate"));
        assert!(output.contains("11025"));
        assert!(output.contains("validating"));
    }

    #[test]
    fn test_format_json() {
        let reports = vec![
            CheckReport {
                path: PathBuf::from("take.wav"),
                result: Ok(characterization()),
            },
            CheckReport {
                path: PathBuf::from("broken.wav"),
                result: Err(PipelineError::UnreadableContainer {
                    reason: "no RIFF tag found".to_string(),
                }),
            },
        ];
        let json = format_json(&reports).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value[0]["accepted"], true);
        assert_eq!(value[0]["characterization"]["bitrate"], 705_600);
        assert_eq!(
            value[0]["characterization"]["rate_decision"]["status"],
            "negotiated_not_executed"
        );
        assert_eq!(value[1]["accepted"], false);
        assert_eq!(value[1]["rejection"]["reason"], "unreadable_container");
        assert!(value[1].get("characterization").is_none());
    }

    #[test]
    fn test_summary_groups_reasons() {
        let reports = vec![
            CheckReport {
                path: PathBuf::from("a.wav"),
                result: Ok(characterization()),
            },
            CheckReport {
                path: PathBuf::from("b.wav"),
                result: Err(PipelineError::UnsupportedSampleRate { sample_rate: 1 }),
            },
            CheckReport {
                path: PathBuf::from("c.wav"),
                result: Err(PipelineError::UnsupportedSampleRate { sample_rate: 2 }),
            },
        ];
        let summary = format_summary(&reports);
        assert!(summary.contains("3 files checked"));
        assert!(summary.contains("1 accepted"));
        assert!(summary.contains("2 rejected (unsupported_sample_rate)"));
    }
}
