//! `kostats history` – print what has been downloaded so far.

use anyhow::Result;
use kostats_core::category::Category;
use kostats_core::config::KostatsConfig;
use kostats_core::history::HistoryStore;
use std::path::Path;

pub fn run_history(cfg: &KostatsConfig, download_dir: &Path, only: Option<Category>) -> Result<()> {
    let store = HistoryStore::in_dir(download_dir, &cfg.history_file_name);
    let history = store.load();

    for category in Category::ALL {
        if only.is_some_and(|c| c != category) {
            continue;
        }
        println!("{} ({} file(s))", category, history.count(category));
        for id in history.identifiers(category) {
            let when = history
                .entry(category, id)
                .map(|e| e.downloaded_at.as_str())
                .filter(|s| !s.is_empty())
                .unwrap_or("-");
            println!("  {:<32} {}", id, when);
        }
    }
    Ok(())
}
