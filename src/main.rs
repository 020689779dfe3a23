//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `uptime_monitor` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - Exit codes
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use uptime_monitor::cli::{Cli, Command};
use uptime_monitor::initialization::init_logger_with;
use uptime_monitor::{format_timestamp, run_check, run_digest, Config, DigestConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // SMTP credentials usually live in .env; try the current directory first,
    // then the executable's directory
    if dotenvy::dotenv().is_err() {
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let env_path = exe_dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                }
            }
        }
    }

    let cli = Cli::parse();

    init_logger_with(cli.log_level.clone().into(), cli.log_format.clone())
        .context("Failed to initialize logger")?;

    match cli.command {
        Command::Check(args) => match run_check(Config::from(args)).await {
            Ok(report) => {
                log::info!(
                    "Checked {} URL{} ({} up, {} down)",
                    report.total,
                    if report.total == 1 { "" } else { "s" },
                    report.up,
                    report.down
                );
                Ok(())
            }
            Err(e) => {
                eprintln!("uptime_monitor error: {:#}", e);
                process::exit(1);
            }
        },
        Command::Digest(args) => {
            let result = match DigestConfig::try_from(args) {
                Ok(config) => {
                    let to = config.to.clone();
                    run_digest(config).await.map(|_| to)
                }
                Err(e) => Err(e.into()),
            };
            match result {
                Ok(to) => {
                    let now = chrono::Local::now().naive_local();
                    println!("[{}] Daily report sent to {}", format_timestamp(&now), to);
                    Ok(())
                }
                Err(e) => {
                    eprintln!("uptime_monitor error: {:#}", e);
                    process::exit(1);
                }
            }
        }
    }
}
