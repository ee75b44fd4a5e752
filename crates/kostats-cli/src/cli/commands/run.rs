//! `kostats run` – the scheduled fetch.

use anyhow::{Context, Result};
use kostats_core::auth::authenticate;
use kostats_core::category::Category;
use kostats_core::config::{Credentials, KostatsConfig, RunSettings};
use kostats_core::history::HistoryStore;
use kostats_core::http::{CurlSession, SessionOptions};
use kostats_core::orchestrator::{self, CategoryOutcome, RunReport};
use std::fs;
use std::path::PathBuf;

/// Returns Err only when no work was possible (settings, login). Per-category
/// and per-file failures are logged and reported but still exit 0.
pub fn run_fetch(
    cfg: &KostatsConfig,
    download_dir: PathBuf,
    categories: &[Category],
    dry_run: bool,
) -> Result<()> {
    let credentials = Credentials::from_env()?;
    let settings = RunSettings::new(cfg, download_dir, categories, dry_run)?;
    let login_url = cfg.login_url()?;
    let site_root = cfg.base_url()?;

    fs::create_dir_all(&settings.download_dir)
        .with_context(|| format!("create download dir: {}", settings.download_dir.display()))?;
    let store = HistoryStore::in_dir(&settings.download_dir, &cfg.history_file_name);
    let mut history = store.load();

    tracing::info!("starting KOStats fetch into {}", settings.download_dir.display());
    let client = CurlSession::new(&SessionOptions::from_config(cfg)).context("init HTTP session")?;
    let mut session = authenticate(client, &login_url, &site_root, &credentials)
        .context("login failed, aborting")?;

    let report = orchestrator::run(&settings, &mut session, &store, &mut history);
    print_report(&report, dry_run);
    Ok(())
}

fn print_report(report: &RunReport, dry_run: bool) {
    for r in &report.categories {
        match &r.outcome {
            CategoryOutcome::Completed(s) if dry_run => {
                println!("{}: {} listed, {} new", r.category, s.listed, s.pending.len());
                for id in &s.pending {
                    println!("  would download {}", id);
                }
            }
            CategoryOutcome::Completed(s) => {
                println!(
                    "{}: {} listed, {} already downloaded, {} downloaded, {} failed",
                    r.category,
                    s.listed,
                    s.already_downloaded,
                    s.downloaded.len(),
                    s.failed.len()
                );
            }
            CategoryOutcome::Failed { reason } => println!("{}: skipped ({})", r.category, reason),
        }
    }
    if report.history_saved == Some(false) {
        println!("warning: download history could not be saved; files may be fetched again next run");
    }
    if !dry_run {
        println!("Downloaded {} new file(s) in total.", report.downloaded_total());
    }
}
