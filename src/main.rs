// src/main.rs
use clap::Parser;
use colorful::Colorful;
use std::process::ExitCode;

use wavintake::cli::{self, Args};

fn main() -> ExitCode {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match cli::run(args) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{} {:#}", "error:".red(), err);
            ExitCode::from(2)
        }
    }
}
