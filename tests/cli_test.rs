// tests/cli_test.rs
//
// Runs the built binary against generated fixtures.

mod test_utils;

use std::path::Path;
use std::process::{Command, Output};
use test_utils::{mono_16, write_file};

fn run(dir: &Path, args: &[&str]) -> Output {
    // Pin configuration so a user config file cannot leak into the test
    let config = dir.join("config.json");
    if !config.exists() {
        std::fs::write(&config, "{}").unwrap();
    }
    Command::new(env!("CARGO_BIN_EXE_wavintake"))
        .arg("--config")
        .arg(&config)
        .args(args)
        .env_remove("WAVINTAKE_TARGET_RATE")
        .env_remove("WAVINTAKE_ALLOWED_RATES")
        .output()
        .expect("Failed to execute wavintake")
}

#[test]
fn check_json_reports_characterization() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_file(dir.path(), "take.wav", &mono_16(44100, 2.0));

    let output = run(
        dir.path(),
        &[
            "--allowed-rates",
            "44100",
            "--target-rate",
            "8000",
            "check",
            "--json",
            file.to_str().unwrap(),
        ],
    );
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let c = &value[0]["characterization"];
    assert_eq!(c["original_sample_rate"], 44100);
    assert_eq!(c["resampled_sample_rate"], 8000);
    assert_eq!(c["bitrate"], 705_600);
    assert_eq!(c["rate_decision"]["status"], "negotiated_not_executed");
}

#[test]
fn check_fails_when_any_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "good.wav", &mono_16(8000, 1.0));
    write_file(dir.path(), "odd.wav", &mono_16(11025, 1.0));

    let output = run(dir.path(), &["check", "--json", dir.path().to_str().unwrap()]);
    assert!(!output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let entries = value.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    let rejected: Vec<_> = entries.iter().filter(|e| e["accepted"] == false).collect();
    assert_eq!(rejected.len(), 1);
    assert_eq!(rejected[0]["rejection"]["reason"], "unsupported_sample_rate");
}

#[test]
fn ingest_then_list() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_file(dir.path(), "memo.wav", &mono_16(16000, 1.5));
    let store = dir.path().join("store.jsonl");
    let uploads = dir.path().join("uploads");

    let output = run(
        dir.path(),
        &[
            "ingest",
            "--user",
            "erin",
            "--store",
            store.to_str().unwrap(),
            "--upload-dir",
            uploads.to_str().unwrap(),
            file.to_str().unwrap(),
        ],
    );
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(std::fs::read_dir(&uploads).unwrap().count(), 1);

    let output = run(
        dir.path(),
        &["list", "--user", "erin", "--store", store.to_str().unwrap(), "--json"],
    );
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value.as_array().unwrap().len(), 1);
    assert!(value[0]["name"].as_str().unwrap().ends_with(".wav"));
}
