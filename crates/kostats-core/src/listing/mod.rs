//! Listing page parsing: category HTML in, file references out.

mod pattern;

pub use pattern::{LinkPattern, TextFileLinks};

use scraper::Html;
use std::collections::HashSet;
use url::Url;

use crate::auth::{has_login_form, selector};
use crate::category::Category;
use crate::error::ParseError;
use crate::naming::LocalNames;

/// A downloadable file advertised on a listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRef {
    /// Dedup key recorded in the download history.
    pub identifier: String,
    pub download_url: Url,
    /// File name used on disk inside the category directory, unique within the listing.
    pub display_name: String,
}

/// Extracts file references from `html`, the listing page of `category` served at `page_url`.
///
/// Order follows the page; a repeated identifier keeps its first occurrence.
/// Distinct identifiers that sanitize to the same file name get numbered
/// names in page order. An empty page yields an empty list.
pub fn parse_listing(
    html: &str,
    category: Category,
    page_url: &Url,
    pattern: &dyn LinkPattern,
) -> Result<Vec<FileRef>, ParseError> {
    let document = Html::parse_document(html);
    if has_login_form(&document) {
        return Err(ParseError::SessionExpired {
            url: page_url.to_string(),
        });
    }

    let anchors = selector("a[href]");
    let mut seen: HashSet<String> = HashSet::new();
    let mut names = LocalNames::new();
    let mut files = Vec::new();

    for a in document.select(&anchors) {
        let Some(href) = a.value().attr("href") else {
            continue;
        };
        if !pattern.matches(href) {
            continue;
        }
        let download_url = page_url
            .join(href.trim())
            .map_err(|source| ParseError::InvalidLink {
                url: page_url.to_string(),
                href: href.to_string(),
                source,
            })?;
        let identifier = pattern
            .identifier(&download_url)
            .ok_or_else(|| ParseError::MissingFileName {
                url: page_url.to_string(),
                href: href.to_string(),
            })?;
        if seen.insert(identifier.clone()) {
            let Some(display_name) = names.claim(&identifier) else {
                return Err(ParseError::MissingFileName {
                    url: page_url.to_string(),
                    href: href.to_string(),
                });
            };
            files.push(FileRef {
                identifier,
                download_url,
                display_name,
            });
        }
    }

    tracing::debug!(category = %category, files = files.len(), "parsed listing");
    Ok(files)
}
