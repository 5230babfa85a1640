mod models;
mod service;
mod utils;

use crate::models::backup_report::BackupReport;
use crate::models::config::{setup_config, Config};
use crate::service::backup::{backup_files, list_backups};
use crate::utils::directory::prepare_backup_directory;
use crate::utils::progress::create_progress_bar;
use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{debug, error, info, warn};
use std::path::Path;

#[derive(Parser)]
#[command(name = "RustyDbBackUp")]
#[command(about = "Timestamp and hash named backups of database files", long_about = None)]
struct Cli {
    #[arg(
        short = 'c',
        long = "config",
        default_value = "config.json",
        env = "RUSTYDBBACKUP_CONFIG"
    )]
    config_file: String,

    #[arg(short = 'b', long = "backup-dir", env = "BACKUP_DIR")]
    backup_dir: Option<String>,

    #[arg(
        short = 'l',
        long = "log-level",
        default_value = "info",
        env = "LOG_LEVEL"
    )]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Cli::parse();

    env_logger::Builder::from_default_env()
        .filter_level(parse_log_level(&args.log_level))
        .format_timestamp_secs()
        .init();

    info!("RustyDbBackUp starting...");

    let config_file = args
        .config_file
        .trim_matches(|c| c == '"' || c == '\'')
        .to_string();
    let config: Config = setup_config(config_file)
        .context("Failed to load configuration")?
        .with_backup_dir_override(args.backup_dir);
    debug!("Loaded config: {:?}", &config);

    let backup_dir = prepare_backup_directory(&config.backup_dir)
        .context("Failed to prepare backup directory")?;

    let report = run_backup(&config, &backup_dir);
    log_summary(&report, &backup_dir);

    ensure_success(&report)
}

/// Any failed entry makes the run exit with a non-zero status.
fn ensure_success(report: &BackupReport) -> Result<()> {
    if !report.is_success() {
        bail!(
            "{} of {} backups failed",
            report.failed(),
            report.processed()
        );
    }
    Ok(())
}

fn parse_log_level(level: &str) -> log::LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => log::LevelFilter::Trace,
        "debug" => log::LevelFilter::Debug,
        "info" => log::LevelFilter::Info,
        "warn" => log::LevelFilter::Warn,
        "error" => log::LevelFilter::Error,
        _ => log::LevelFilter::Info,
    }
}

fn run_backup(config: &Config, backup_dir: &Path) -> BackupReport {
    let progress = create_progress_bar(config.sources.len() as u64, "Backing up");
    let report = backup_files(&config.sources, backup_dir, config, Some(&progress));
    progress.finish_and_clear();
    report
}

fn log_summary(report: &BackupReport, backup_dir: &Path) {
    for (entry, error) in report.failures() {
        error!("Failed: {} ({})", entry, error);
    }

    info!(
        "Backup finished: {} processed, {} successful ({} copied), {} failed, {} skipped",
        report.processed(),
        report.successful(),
        report.copied(),
        report.failed(),
        report.skipped
    );

    match list_backups(backup_dir) {
        Ok(backups) => info!(
            "{} backups stored in {}",
            backups.len(),
            backup_dir.display()
        ),
        Err(e) => warn!("Could not list {}: {}", backup_dir.display(), e),
    }
}
