//! Per-run outcome summary.

use crate::category::Category;

/// What happened to one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryOutcome {
    Completed(CategoryStats),
    /// Listing could not be fetched or parsed; nothing was downloaded.
    Failed { reason: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryStats {
    /// Files advertised on the listing page.
    pub listed: usize,
    /// Listed files already present in the history.
    pub already_downloaded: usize,
    /// Identifiers stored and recorded this run.
    pub downloaded: Vec<String>,
    /// Identifiers that failed; they stay out of the history for the next run.
    pub failed: Vec<String>,
    /// Identifiers that would be downloaded (dry run only).
    pub pending: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryReport {
    pub category: Category,
    pub outcome: CategoryOutcome,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub categories: Vec<CategoryReport>,
    /// Result of the end-of-run history save; `None` when not attempted (dry run).
    pub history_saved: Option<bool>,
}

impl RunReport {
    pub fn stats(&self, category: Category) -> Option<&CategoryStats> {
        self.categories
            .iter()
            .find(|r| r.category == category)
            .and_then(|r| match &r.outcome {
                CategoryOutcome::Completed(stats) => Some(stats),
                CategoryOutcome::Failed { .. } => None,
            })
    }

    pub fn failed_categories(&self) -> Vec<Category> {
        self.categories
            .iter()
            .filter(|r| matches!(r.outcome, CategoryOutcome::Failed { .. }))
            .map(|r| r.category)
            .collect()
    }

    fn completed(&self) -> impl Iterator<Item = &CategoryStats> {
        self.categories.iter().filter_map(|r| match &r.outcome {
            CategoryOutcome::Completed(stats) => Some(stats),
            CategoryOutcome::Failed { .. } => None,
        })
    }

    pub fn downloaded_total(&self) -> usize {
        self.completed().map(|s| s.downloaded.len()).sum()
    }

    pub fn failed_files_total(&self) -> usize {
        self.completed().map(|s| s.failed.len()).sum()
    }

    pub fn pending_total(&self) -> usize {
        self.completed().map(|s| s.pending.len()).sum()
    }
}
