//! Fixed table of sport categories and their per-run configuration record.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use url::Url;

/// One sport's data feed on the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    Cbk,
    Cfb,
    Mlb,
    Nba,
    Nfl,
    Nhl,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown category {0:?} (expected one of CBK, CFB, MLB, NBA, NFL, NHL)")]
pub struct UnknownCategory(pub String);

impl Category {
    /// Processing order for a run.
    pub const ALL: [Category; 6] = [
        Category::Cbk,
        Category::Cfb,
        Category::Mlb,
        Category::Nba,
        Category::Nfl,
        Category::Nhl,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Category::Cbk => "CBK",
            Category::Cfb => "CFB",
            Category::Mlb => "MLB",
            Category::Nba => "NBA",
            Category::Nfl => "NFL",
            Category::Nhl => "NHL",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Category::Cbk => "College Basketball",
            Category::Cfb => "College Football",
            Category::Mlb => "Major League Baseball",
            Category::Nba => "NBA Basketball",
            Category::Nfl => "NFL Football",
            Category::Nhl => "NHL Hockey",
        }
    }

    /// Listing page path on the site, e.g. `/NBA_Subscription/NBA.HTM`.
    pub fn listing_path(self) -> String {
        let code = self.code();
        format!("/{code}_Subscription/{code}.HTM")
    }

    /// Subdirectory of the download directory that receives this category's files.
    pub fn subdirectory(self) -> &'static str {
        self.code()
    }

    pub fn profile(self, base_url: &Url, download_dir: &Path) -> Result<CategoryProfile, url::ParseError> {
        Ok(CategoryProfile {
            category: self,
            display_name: self.display_name(),
            listing_url: base_url.join(&self.listing_path())?,
            local_directory: download_dir.join(self.subdirectory()),
        })
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.code().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// Resolved configuration for one category in one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryProfile {
    pub category: Category,
    pub display_name: &'static str,
    pub listing_url: Url,
    pub local_directory: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_codes_case_insensitive() {
        assert_eq!("nba".parse::<Category>().unwrap(), Category::Nba);
        assert_eq!(" CFB ".parse::<Category>().unwrap(), Category::Cfb);
        assert_eq!(
            "NCAA".parse::<Category>(),
            Err(UnknownCategory("NCAA".to_string()))
        );
    }

    #[test]
    fn profile_builds_listing_url_and_directory() {
        let base = Url::parse("http://www.kostats.com").unwrap();
        let p = Category::Mlb.profile(&base, Path::new("/data")).unwrap();
        assert_eq!(
            p.listing_url.as_str(),
            "http://www.kostats.com/MLB_Subscription/MLB.HTM"
        );
        assert_eq!(p.local_directory, PathBuf::from("/data/MLB"));
        assert_eq!(p.display_name, "Major League Baseball");
    }

    #[test]
    fn codes_are_unique_and_sorted() {
        let codes: Vec<_> = Category::ALL.iter().map(|c| c.code()).collect();
        let mut sorted = codes.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(codes, sorted);
    }

    #[test]
    fn serde_uses_codes() {
        assert_eq!(serde_json::to_string(&Category::Nhl).unwrap(), "\"NHL\"");
        let c: Category = serde_json::from_str("\"CBK\"").unwrap();
        assert_eq!(c, Category::Cbk);
    }
}
