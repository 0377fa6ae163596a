//! # cfprof - Main Entry Point
//!
//! Supports two operational modes:
//! - **Report** (default): decode, symbolize and rank the samples
//! - **Raw** (`--raw`): print decoded addresses without analysis

use anyhow::Result;
use clap::Parser;
use log::info;
use std::io;

use cfprof::cli::Args;
use cfprof::pipeline;
use cfprof::preflight::run_preflight_checks;

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_ERROR: i32 = 1;

fn main() {
    env_logger::init();
    std::process::exit(match run() {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            EXIT_ERROR
        }
    });
}

fn run() -> Result<()> {
    // clap exits with status 2 on usage errors
    let config = Args::parse().into_config();

    run_preflight_checks(&config)?;
    info!("cfprof v{} reading {}", env!("CARGO_PKG_VERSION"), config.log_path.display());

    let stdout = io::stdout();
    let mut out = stdout.lock();
    pipeline::run(&config, &mut out)
}
