// src/cli/mod.rs
//
// Command-line interface module

mod args;
mod output;

pub use args::{Args, Command};
pub use output::{format_json, format_report, format_summary, CheckReport};

use anyhow::{Context, Result};
use indicatif::{ParallelProgressIterator, ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use walkdir::WalkDir;

use crate::config::{IngestConfig, PipelineConfig};
use crate::core::characterize_path;
use crate::ingest::{
    DeviceFingerprinter, HostFingerprinter, IngestService, JsonLinesStore, RecordStore,
    RequestInfo, User, UserId,
};

const WAV_EXTENSIONS: [&str; 2] = ["wav", "wave"];

/// Run the parsed command
pub fn run(args: Args) -> Result<ExitCode> {
    let config = args
        .resolve_config()
        .context("Failed to resolve configuration")?;

    match &args.command {
        Command::Check { inputs, json } => check(inputs, *json, args.verbose, &config.pipeline()),
        Command::Ingest {
            user, email, files, ..
        } => ingest(user, email.as_deref(), files, config),
        Command::List { user, json, .. } => list(user, *json, &config),
        Command::ShowConfig => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Expand files and directories into the WAV files they contain
pub fn collect_wav_files(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for path in inputs {
        if path.is_dir() {
            for entry in WalkDir::new(path)
                .follow_links(true)
                .into_iter()
                .filter_map(|e| e.ok())
            {
                if entry.file_type().is_file() && has_wav_extension(entry.path()) {
                    files.push(entry.path().to_path_buf());
                }
            }
        } else {
            // Explicit files are checked whatever their name; a missing one
            // is reported by the pipeline as an unavailable source
            files.push(path.clone());
        }
    }

    files.sort();
    files
}

fn has_wav_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| WAV_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn check(inputs: &[PathBuf], json: bool, verbose: bool, pipeline: &PipelineConfig) -> Result<ExitCode> {
    let files = collect_wav_files(inputs);
    if files.is_empty() {
        anyhow::bail!("No WAV files found");
    }
    log::info!("Checking {} file(s)", files.len());

    let progress = if json || files.len() < 2 {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new(files.len() as u64);
        bar.set_style(
            ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        bar
    };

    // Each invocation is independent, so files are characterized in parallel
    let reports: Vec<CheckReport> = files
        .par_iter()
        .progress_with(progress.clone())
        .map(|path| CheckReport {
            path: path.clone(),
            result: characterize_path(path, pipeline),
        })
        .collect();
    progress.finish_and_clear();

    if json {
        println!("{}", format_json(&reports)?);
    } else {
        for report in &reports {
            print!("{}", format_report(report, verbose));
        }
        print!("{}", format_summary(&reports));
    }

    if reports.iter().all(CheckReport::is_accepted) {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

fn ingest(user: &str, email: Option<&str>, files: &[PathBuf], config: IngestConfig) -> Result<ExitCode> {
    let mut store = JsonLinesStore::open(&config.store_path)
        .with_context(|| format!("Failed to open store {}", config.store_path.display()))?;

    let user_id = UserId::from(user);
    if store.find_user(&user_id).is_none() {
        let email = email
            .map(str::to_string)
            .unwrap_or_else(|| format!("{}@localhost", user));
        store.create_user(User::new(user_id.clone(), user, email))?;
        log::info!("Created user {}", user_id);
    }

    let request = RequestInfo {
        user_agent: format!("wavintake/{}", env!("CARGO_PKG_VERSION")),
        remote_addr: String::new(),
    };
    let device = HostFingerprinter.fingerprint(&request);

    let mut service = IngestService::new(config, store);
    let mut failed = 0;

    for file in files {
        let name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        match service.ingest(&user_id, file, &name, device.clone()) {
            Ok(record) => println!("{}", output::format_ingested(file, &record)),
            Err(err) => {
                failed += 1;
                println!("{}", output::format_ingest_error(file, &err));
            }
        }
    }

    Ok(if failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn list(user: &str, json: bool, config: &IngestConfig) -> Result<ExitCode> {
    let store = JsonLinesStore::open(&config.store_path)
        .with_context(|| format!("Failed to open store {}", config.store_path.display()))?;
    let files = store.audio_files_for_user(&UserId::from(user));

    if json {
        println!("{}", serde_json::to_string_pretty(&files)?);
    } else {
        print!("{}", output::format_listing(user, &files));
    }
    Ok(ExitCode::SUCCESS)
}
