//! Which links on a listing page are data files, and how they are keyed.

use url::Url;

use crate::naming::file_name_from_url;

/// Site-specific rule for spotting file links and deriving their identifier.
///
/// The identifier must stay the same for the same remote file on every run;
/// it is the dedup key stored in the download history.
pub trait LinkPattern {
    /// True if the raw `href` points at a downloadable data file.
    fn matches(&self, href: &str) -> bool;

    /// Dedup key for a matched link, resolved against the listing page.
    /// Defaults to the decoded file name plus any query string.
    fn identifier(&self, url: &Url) -> Option<String> {
        file_name_from_url(url)
    }
}

/// Current site layout: plain-text stat files, `*.TXT` in any case.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextFileLinks;

impl LinkPattern for TextFileLinks {
    fn matches(&self, href: &str) -> bool {
        href.trim().to_ascii_lowercase().ends_with(".txt")
    }
}
