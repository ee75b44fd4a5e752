//! One fetcher run: per category, fetch the listing, diff against history,
//! download what is new.
//!
//! Failures are scoped: a category whose listing cannot be fetched or parsed
//! is skipped, a file that cannot be stored is skipped. The history is saved
//! after every stored file and once more at the end.

mod report;

pub use report::{CategoryOutcome, CategoryReport, CategoryStats, RunReport};

use crate::auth::SessionHandle;
use crate::category::CategoryProfile;
use crate::config::RunSettings;
use crate::error::{FetchError, ParseError};
use crate::history::{HistoryEntry, HistoryRecord, HistoryStore};
use crate::http::HttpClient;
use crate::listing::{parse_listing, FileRef, LinkPattern, TextFileLinks};
use crate::storage::download_file;

/// Runs every configured category with the site's default link pattern.
pub fn run<C: HttpClient>(
    settings: &RunSettings,
    session: &mut SessionHandle<C>,
    store: &HistoryStore,
    history: &mut HistoryRecord,
) -> RunReport {
    run_with_pattern(settings, session, store, history, &TextFileLinks)
}

pub fn run_with_pattern<C: HttpClient>(
    settings: &RunSettings,
    session: &mut SessionHandle<C>,
    store: &HistoryStore,
    history: &mut HistoryRecord,
    pattern: &dyn LinkPattern,
) -> RunReport {
    let mut report = RunReport::default();

    for profile in &settings.categories {
        let outcome = match list_category(session, profile, pattern) {
            Ok(files) => CategoryOutcome::Completed(process_files(
                settings, session, store, history, profile, &files,
            )),
            Err(reason) => {
                tracing::error!(category = %profile.category, "{}", reason);
                CategoryOutcome::Failed { reason }
            }
        };
        report.categories.push(CategoryReport {
            category: profile.category,
            outcome,
        });
    }

    if !settings.dry_run {
        report.history_saved = Some(save_history(store, history));
    }

    tracing::info!(
        downloaded = report.downloaded_total(),
        failed_files = report.failed_files_total(),
        failed_categories = report.failed_categories().len(),
        "run completed"
    );
    report
}

/// Fetches and parses one listing page. Errors come back as a log-ready reason.
fn list_category<C: HttpClient>(
    session: &mut SessionHandle<C>,
    profile: &CategoryProfile,
    pattern: &dyn LinkPattern,
) -> Result<Vec<FileRef>, String> {
    tracing::info!(category = %profile.category, url = %profile.listing_url, "getting file links");
    let html = session
        .client()
        .get_text(&profile.listing_url)
        .map_err(|source| FetchError {
            url: profile.listing_url.to_string(),
            source,
        })
        .map_err(|e| e.to_string())?;

    let files = parse_listing(&html, profile.category, &profile.listing_url, pattern)
        .map_err(|e: ParseError| e.to_string())?;
    tracing::info!(category = %profile.category, files = files.len(), "found files");
    Ok(files)
}

fn process_files<C: HttpClient>(
    settings: &RunSettings,
    session: &mut SessionHandle<C>,
    store: &HistoryStore,
    history: &mut HistoryRecord,
    profile: &CategoryProfile,
    files: &[FileRef],
) -> CategoryStats {
    let category = profile.category;
    let mut stats = CategoryStats {
        listed: files.len(),
        ..CategoryStats::default()
    };

    let new_files: Vec<&FileRef> = files
        .iter()
        .filter(|f| !history.contains(category, &f.identifier))
        .collect();
    stats.already_downloaded = files.len() - new_files.len();
    tracing::debug!(%category, skipped = stats.already_downloaded, new = new_files.len(), "diffed against history");

    if settings.dry_run {
        for file in new_files {
            tracing::info!(%category, file = %file.identifier, "would download");
            stats.pending.push(file.identifier.clone());
        }
        return stats;
    }

    for file in new_files {
        if !settings.request_delay.is_zero() {
            std::thread::sleep(settings.request_delay);
        }
        tracing::info!(%category, file = %file.identifier, "downloading");
        match download_file(session.client(), file, &profile.local_directory) {
            Ok(stored) => {
                history.record(
                    category,
                    &file.identifier,
                    HistoryEntry::downloaded(&file.download_url, &stored),
                );
                save_history(store, history);
                tracing::info!(%category, file = %file.identifier, bytes = stored.bytes, "downloaded");
                stats.downloaded.push(file.identifier.clone());
            }
            Err(e) => {
                tracing::error!(%category, file = %file.identifier, "download failed: {}", e);
                stats.failed.push(file.identifier.clone());
            }
        }
    }

    tracing::info!(%category, downloaded = stats.downloaded.len(), failed = stats.failed.len(), "category done");
    stats
}

fn save_history(store: &HistoryStore, history: &HistoryRecord) -> bool {
    match store.save(history) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("could not save download history: {}", e);
            false
        }
    }
}
