use anyhow::Result;
use clap::Parser;
use log::{debug, info};
use phototime_core::{
    collect_photo_files, config_path, load_config, open_provider, rename_files, RenameReport,
    RenameStats, RenameStatus,
};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "phototime", version)]
#[command(about = "写真のファイル名を撮影日時 (YYYYMMDD_HHMMSS±HHMM) にリネームします")]
struct Cli {
    /// directory with photos to rename
    directory: Option<PathBuf>,
}

fn main() -> Result<ExitCode> {
    env_logger::init_from_env(
        env_logger::Env::new()
            .filter_or("PHOTOTIME_LOG", "warn")
            .write_style("PHOTOTIME_LOG_STYLE"),
    );

    let cli = Cli::parse();
    let directory = match cli.directory {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    debug!("設定ファイル: {}", config_path()?.display());
    let config = load_config()?;
    debug!("設定: {:?}", config);

    let mut stats = RenameStats::default();
    let files = collect_photo_files(&directory, &mut stats)?;
    if files.is_empty() {
        debug!("写真がありません: {}", directory.display());
        return Ok(ExitCode::SUCCESS);
    }

    let mut provider = open_provider(&config)?;
    let report = rename_files(files, stats, provider.as_mut(), config.on_collision);
    print_report(&report);

    if report.has_failures() {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn print_report(report: &RenameReport) {
    for outcome in &report.outcomes {
        println!("{}", outcome.original_name);
        match &outcome.status {
            RenameStatus::Renamed { new_name } => println!(" → {}", new_name),
            RenameStatus::Unchanged => println!(" → {} (変更なし)", outcome.original_name),
            RenameStatus::Failed { message } => println!(" → FAILED: {}", message),
        }
    }

    info!(
        "集計: scanned={} photo={} non_photo_skip={} renamed={} unchanged={} failed={}",
        report.stats.scanned_files,
        report.stats.photo_files,
        report.stats.skipped_non_photo,
        report.stats.renamed,
        report.stats.unchanged,
        report.stats.failed
    );
}
