//! CLI command handlers, one per file.

mod categories;
mod history;
mod run;

pub use categories::run_categories;
pub use history::run_history;
pub use run::run_fetch;
