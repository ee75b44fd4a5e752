//! CLI for the KOStats fetcher.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use kostats_core::category::Category;
use kostats_core::config;
use std::path::PathBuf;

use commands::{run_categories, run_fetch, run_history};

/// Top-level CLI for the KOStats fetcher.
#[derive(Debug, Parser)]
#[command(name = "kostats")]
#[command(about = "Download new KOStats data files for each sport", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Log in, then download every listed file not yet in the history (the scheduled job).
    Run {
        /// Base download directory (overrides DOWNLOAD_DIR and config.toml).
        #[arg(long, value_name = "DIR")]
        download_dir: Option<PathBuf>,
        /// Only process these categories (repeatable). Default: all.
        #[arg(long = "category", short = 'c', value_name = "CODE")]
        categories: Vec<Category>,
        /// Fetch and diff listings but download nothing.
        #[arg(long)]
        dry_run: bool,
    },

    /// Show identifiers recorded in the download history.
    History {
        /// Base download directory (overrides DOWNLOAD_DIR and config.toml).
        #[arg(long, value_name = "DIR")]
        download_dir: Option<PathBuf>,
        /// Only show this category.
        #[arg(long, short = 'c', value_name = "CODE")]
        category: Option<Category>,
    },

    /// List the known categories and their listing pages.
    Categories,
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        let env_dir = || std::env::var(config::DOWNLOAD_DIR_VAR).ok();

        match cli.command {
            CliCommand::Run {
                download_dir,
                categories,
                dry_run,
            } => {
                let dir = cfg.resolve_download_dir(download_dir.as_deref(), env_dir())?;
                run_fetch(&cfg, dir, &categories, dry_run)?;
            }
            CliCommand::History {
                download_dir,
                category,
            } => {
                let dir = cfg.resolve_download_dir(download_dir.as_deref(), env_dir())?;
                run_history(&cfg, &dir, category)?;
            }
            CliCommand::Categories => run_categories(&cfg)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
