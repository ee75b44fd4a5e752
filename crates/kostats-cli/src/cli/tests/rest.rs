//! Tests for history and categories subcommands.

use super::parse;
use crate::cli::{Cli, CliCommand};
use clap::Parser;
use kostats_core::category::Category;

#[test]
fn cli_parse_history() {
    match parse(&["kostats", "history"]) {
        CliCommand::History {
            download_dir,
            category,
        } => {
            assert!(download_dir.is_none());
            assert!(category.is_none());
        }
        _ => panic!("expected History"),
    }
}

#[test]
fn cli_parse_history_one_category() {
    match parse(&["kostats", "history", "--category", "mlb", "--download-dir", "/tmp/ko"]) {
        CliCommand::History {
            download_dir,
            category,
        } => {
            assert_eq!(category, Some(Category::Mlb));
            assert_eq!(download_dir.as_deref(), Some(std::path::Path::new("/tmp/ko")));
        }
        _ => panic!("expected History"),
    }
}

#[test]
fn cli_parse_categories() {
    assert!(matches!(parse(&["kostats", "categories"]), CliCommand::Categories));
}

#[test]
fn cli_requires_subcommand() {
    assert!(Cli::try_parse_from(["kostats"]).is_err());
}
