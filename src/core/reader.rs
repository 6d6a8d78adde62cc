// src/core/reader.rs
//
// Waveform header reader. Parses the RIFF/WAVE header with hound and
// stops at the start of the data chunk, so the cost is independent of
// how much sample data follows.

use hound::{SampleFormat, WavReader};
use serde::{Deserialize, Serialize};
use std::io::{self, Read};

use super::error::PipelineError;

/// Header fields of a waveform container
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaveformHeader {
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of interleaved channels
    pub channels: u16,
    /// Bits used per sample
    pub bits_per_sample: u16,
    /// Duration implied by the data chunk length, in seconds
    pub duration_secs: f64,
}

/// Read the container header from `source`.
///
/// The source must be positioned at the first byte of the container.
/// Nothing past the data chunk header is consumed. Truncated or
/// non-conforming headers yield `UnreadableContainer`, never a header
/// with zero fields.
pub fn read_header<R: Read>(source: R) -> Result<WaveformHeader, PipelineError> {
    let mut source = TrackedSource::new(source);
    let parsed = WavReader::new(&mut source).map(|reader| (reader.spec(), reader.duration()));

    let (spec, frames) = match parsed {
        Ok(parsed) => parsed,
        // Only a failing read is a storage problem; running out of bytes
        // means the header itself is incomplete
        Err(hound::Error::IoError(e)) if source.failed => {
            return Err(PipelineError::SourceUnavailable(e))
        }
        Err(hound::Error::IoError(_)) => {
            return Err(PipelineError::unreadable(
                "container ended before the header was complete",
            ))
        }
        Err(e) => return Err(e.into()),
    };

    if spec.sample_rate == 0 {
        return Err(PipelineError::unreadable("header reports a sample rate of 0 Hz"));
    }
    if spec.channels == 0 {
        return Err(PipelineError::unreadable("header reports 0 audio channels"));
    }
    if spec.bits_per_sample == 0 {
        return Err(PipelineError::unreadable("header reports 0 bits per sample"));
    }
    if spec.sample_format == SampleFormat::Float && spec.bits_per_sample != 32 {
        return Err(PipelineError::unreadable(format!(
            "float samples must be 32 bits wide, header reports {}",
            spec.bits_per_sample
        )));
    }

    let duration_secs = frames as f64 / spec.sample_rate as f64;

    Ok(WaveformHeader {
        sample_rate: spec.sample_rate,
        channels: spec.channels,
        bits_per_sample: spec.bits_per_sample,
        duration_secs,
    })
}

/// Remembers whether the wrapped source itself returned an error.
/// Interrupted reads are retried and do not count as failures.
struct TrackedSource<R> {
    inner: R,
    failed: bool,
}

impl<R> TrackedSource<R> {
    fn new(inner: R) -> Self {
        Self {
            inner,
            failed: false,
        }
    }
}

impl<R: Read> Read for TrackedSource<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        loop {
            match self.inner.read(buf) {
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.failed = true;
                    return Err(e);
                }
                ok => return ok,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hound::{WavSpec, WavWriter};
    use std::io::Cursor;

    fn wav_bytes(spec: WavSpec, frames: usize) -> Vec<u8> {
        let mut buf = Vec::new();
        {
            let mut writer =
                WavWriter::new(Cursor::new(&mut buf), spec).expect("create WAV writer");
            for _ in 0..frames * spec.channels as usize {
                writer.write_sample(0i16).expect("write sample");
            }
            writer.finalize().expect("finalize WAV");
        }
        buf
    }

    fn mono_16(sample_rate: u32) -> WavSpec {
        WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        }
    }

    #[test]
    fn test_reads_header_fields() {
        let spec = WavSpec {
            channels: 2,
            ..mono_16(22050)
        };
        let bytes = wav_bytes(spec, 22050);

        let header = read_header(Cursor::new(bytes)).unwrap();
        assert_eq!(header.sample_rate, 22050);
        assert_eq!(header.channels, 2);
        assert_eq!(header.bits_per_sample, 16);
        assert!((header.duration_secs - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_non_wav_bytes() {
        let err = read_header(Cursor::new(b"ID3\x04 definitely not a wave".to_vec())).unwrap_err();
        assert_eq!(err.reason_code(), "unreadable_container");
    }

    #[test]
    fn test_rejects_truncated_header() {
        let bytes = wav_bytes(mono_16(8000), 100);
        let err = read_header(Cursor::new(bytes[..30].to_vec())).unwrap_err();
        assert_eq!(err.reason_code(), "unreadable_container");
    }

    #[test]
    fn test_rejects_empty_source() {
        let err = read_header(Cursor::new(Vec::new())).unwrap_err();
        assert_eq!(err.reason_code(), "unreadable_container");
    }

    struct FailingSource;

    impl Read for FailingSource {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "storage offline"))
        }
    }

    #[test]
    fn test_read_failure_is_source_unavailable() {
        let err = read_header(FailingSource).unwrap_err();
        assert_eq!(err.reason_code(), "source_unavailable");
    }

    /// Returns `Interrupted` once, then reads normally
    struct InterruptedOnce<R> {
        inner: R,
        interrupted: bool,
    }

    impl<R: Read> Read for InterruptedOnce<R> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if !self.interrupted {
                self.interrupted = true;
                return Err(io::Error::new(io::ErrorKind::Interrupted, "signal"));
            }
            self.inner.read(buf)
        }
    }

    #[test]
    fn test_interrupted_read_is_retried() {
        let bytes = wav_bytes(mono_16(8000), 8000);
        let source = InterruptedOnce {
            inner: Cursor::new(bytes.clone()),
            interrupted: false,
        };
        let header = read_header(source).unwrap();
        assert_eq!(header.sample_rate, 8000);
        assert!((header.duration_secs - 1.0).abs() < 1e-12);

        // Truncation behind an interruption is still a container problem
        let source = InterruptedOnce {
            inner: Cursor::new(bytes[..20].to_vec()),
            interrupted: false,
        };
        let err = read_header(source).unwrap_err();
        assert_eq!(err.reason_code(), "unreadable_container");
    }

    #[test]
    fn test_reads_only_header() {
        let bytes = wav_bytes(mono_16(8000), 8000);
        let total = bytes.len() as u64;
        let mut cursor = Cursor::new(bytes);

        read_header(&mut cursor).unwrap();
        // 16000 bytes of samples follow the header and stay unread
        assert!(cursor.position() + 16000 <= total);
    }
}
