// tests/test_utils/mod.rs
//
// Waveform fixtures shared by the integration tests.

#![allow(dead_code)]

use hound::{SampleFormat, WavSpec, WavWriter};
use std::io::Cursor;
use std::path::{Path, PathBuf};

pub fn int_spec(sample_rate: u32, channels: u16, bits_per_sample: u16) -> WavSpec {
    WavSpec {
        channels,
        sample_rate,
        bits_per_sample,
        sample_format: SampleFormat::Int,
    }
}

/// Complete WAV container of `frames` silent frames
pub fn wav_bytes(spec: WavSpec, frames: u32) -> Vec<u8> {
    let mut buf = Vec::new();
    {
        let mut writer = WavWriter::new(Cursor::new(&mut buf), spec).expect("create WAV writer");
        let samples = frames as u64 * spec.channels as u64;
        for _ in 0..samples {
            match spec.sample_format {
                SampleFormat::Int => writer.write_sample(0i32).expect("write sample"),
                SampleFormat::Float => writer.write_sample(0.0f32).expect("write sample"),
            }
        }
        writer.finalize().expect("finalize WAV");
    }
    buf
}

/// `seconds` of 16-bit mono audio at `sample_rate`
pub fn mono_16(sample_rate: u32, seconds: f64) -> Vec<u8> {
    let frames = (sample_rate as f64 * seconds).round() as u32;
    wav_bytes(int_spec(sample_rate, 1, 16), frames)
}

/// Canonical 44-byte PCM header declaring `frames` frames, with no sample
/// data after it. Lets tests describe long recordings without writing them.
pub fn header_only(sample_rate: u32, channels: u16, bits_per_sample: u16, frames: u32) -> Vec<u8> {
    let block_align = channels * ((bits_per_sample + 7) / 8);
    let data_len = frames * block_align as u32;

    let mut bytes = Vec::with_capacity(44);
    bytes.extend_from_slice(b"RIFF");
    bytes.extend_from_slice(&(36 + data_len).to_le_bytes());
    bytes.extend_from_slice(b"WAVE");
    bytes.extend_from_slice(b"fmt ");
    bytes.extend_from_slice(&16u32.to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes());
    bytes.extend_from_slice(&channels.to_le_bytes());
    bytes.extend_from_slice(&sample_rate.to_le_bytes());
    bytes.extend_from_slice(&(sample_rate * block_align as u32).to_le_bytes());
    bytes.extend_from_slice(&block_align.to_le_bytes());
    bytes.extend_from_slice(&bits_per_sample.to_le_bytes());
    bytes.extend_from_slice(b"data");
    bytes.extend_from_slice(&data_len.to_le_bytes());
    bytes
}

pub fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).expect("write fixture");
    path
}
