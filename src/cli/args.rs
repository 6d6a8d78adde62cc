//! CLI argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{ConfigError, IngestConfig, IngestConfigBuilder};

#[derive(Parser, Debug)]
#[command(name = "wavintake")]
#[command(version, about = "Validate and characterize uploaded WAV recordings")]
pub struct Args {
    /// Configuration file (JSON). Defaults to the platform config directory
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Intended output sample rate in Hz
    #[arg(long, global = true, env = "WAVINTAKE_TARGET_RATE")]
    pub target_rate: Option<u32>,

    /// Accepted sample rates, comma separated (e.g. 8000,16000,44100)
    #[arg(long, global = true, env = "WAVINTAKE_ALLOWED_RATES", value_delimiter = ',')]
    pub allowed_rates: Vec<u32>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Characterize files without storing anything
    Check {
        /// Input files or directories
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Ingest files into the record store for a user
    Ingest {
        /// Owning user identifier
        #[arg(short, long)]
        user: String,

        /// Email used when the user does not exist yet
        #[arg(long)]
        email: Option<String>,

        /// Record store path (overrides config)
        #[arg(long)]
        store: Option<PathBuf>,

        /// Upload folder (overrides config)
        #[arg(long)]
        upload_dir: Option<PathBuf>,

        /// Files to ingest
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// List stored files for a user
    List {
        #[arg(short, long)]
        user: String,

        /// Record store path (overrides config)
        #[arg(long)]
        store: Option<PathBuf>,

        /// Output results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the effective configuration as JSON
    ShowConfig,
}

impl Args {
    /// Load the configuration file and apply flag/env overrides
    pub fn resolve_config(&self) -> Result<IngestConfig, ConfigError> {
        let base = match &self.config {
            Some(path) => IngestConfig::load(path)?,
            None => IngestConfig::load_default()?,
        };

        let mut builder = IngestConfigBuilder::from_config(base);
        if let Some(rate) = self.target_rate {
            builder = builder.target_rate(rate);
        }
        if !self.allowed_rates.is_empty() {
            builder = builder.allowed_rates(self.allowed_rates.iter().copied());
        }
        match &self.command {
            Command::Ingest {
                store, upload_dir, ..
            } => {
                if let Some(store) = store {
                    builder = builder.store_path(store.clone());
                }
                if let Some(dir) = upload_dir {
                    builder = builder.upload_folder(dir.clone());
                }
            }
            Command::List {
                store: Some(store), ..
            } => {
                builder = builder.store_path(store.clone());
            }
            _ => {}
        }
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("wavintake").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_parse_check() {
        let args = parse(&["check", "--json", "a.wav", "dir"]);
        match args.command {
            Command::Check { inputs, json } => {
                assert!(json);
                assert_eq!(inputs, vec![PathBuf::from("a.wav"), PathBuf::from("dir")]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_allowed_rates_comma_separated() {
        let args = parse(&["--allowed-rates", "8000,44100", "check", "a.wav"]);
        assert_eq!(args.allowed_rates, vec![8000, 44100]);
    }

    #[test]
    fn test_overrides_apply_to_config() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.json");
        std::fs::write(&config_path, r#"{ "target_sample_rate": 22050 }"#).unwrap();

        let args = parse(&[
            "--config",
            config_path.to_str().unwrap(),
            "--allowed-rates",
            "16000",
            "ingest",
            "--user",
            "u1",
            "--store",
            "records.jsonl",
            "a.wav",
        ]);
        let config = args.resolve_config().unwrap();
        assert_eq!(config.target_sample_rate, 22050);
        assert_eq!(config.allowed_sample_rates.len(), 1);
        assert!(config.allowed_sample_rates.contains(&16000));
        assert_eq!(config.store_path, PathBuf::from("records.jsonl"));
    }

    #[test]
    fn test_check_requires_input() {
        assert!(Args::try_parse_from(["wavintake", "check"]).is_err());
    }
}
