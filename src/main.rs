//! VoiceFx CLI - Voice Effects Processor
//!
//! Command-line entry point: parse flags, run one pipeline pass, report
//! the first error with its code.

use clap::Parser;
use env_logger::Env;
use log::error;

use voicefx::cli::{run, Cli};

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        error!("[{}] {}", e.error_code(), e);
        std::process::exit(1);
    }
}
