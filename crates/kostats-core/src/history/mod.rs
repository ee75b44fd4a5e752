//! Download history: which identifiers were already fetched, per category.
//!
//! An identifier is in the record only after its file was completely written.
//! Nothing here removes identifiers.

mod store;

pub use store::HistoryStore;

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

use crate::category::Category;
use crate::storage::StoredFile;

/// Metadata kept for each downloaded file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// RFC 3339 time the file finished downloading.
    #[serde(default)]
    pub downloaded_at: String,
    #[serde(default)]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bytes: Option<u64>,
}

impl HistoryEntry {
    /// Entry for a file that was just stored from `url`.
    pub fn downloaded(url: &url::Url, stored: &StoredFile) -> Self {
        Self {
            downloaded_at: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            url: url.to_string(),
            sha256: Some(stored.sha256.clone()),
            bytes: Some(stored.bytes),
        }
    }
}

/// Category code → identifier → entry. Keys are kept as stored so codes this
/// build does not know survive a load/save cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct HistoryRecord {
    categories: BTreeMap<String, BTreeMap<String, HistoryEntry>>,
}

impl HistoryRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, category: Category, identifier: &str) -> bool {
        self.categories
            .get(category.code())
            .is_some_and(|files| files.contains_key(identifier))
    }

    /// Inserts `identifier` unless already present. Returns true if it was new;
    /// an existing entry is left untouched.
    pub fn record(&mut self, category: Category, identifier: &str, entry: HistoryEntry) -> bool {
        let files = self
            .categories
            .entry(category.code().to_string())
            .or_default();
        if files.contains_key(identifier) {
            return false;
        }
        files.insert(identifier.to_string(), entry);
        true
    }

    pub fn entry(&self, category: Category, identifier: &str) -> Option<&HistoryEntry> {
        self.categories.get(category.code())?.get(identifier)
    }

    /// Recorded identifiers of `category`, sorted.
    pub fn identifiers(&self, category: Category) -> impl Iterator<Item = &str> + '_ {
        self.categories
            .get(category.code())
            .into_iter()
            .flat_map(|files| files.keys().map(String::as_str))
    }

    pub fn count(&self, category: Category) -> usize {
        self.categories.get(category.code()).map_or(0, BTreeMap::len)
    }

    pub fn total(&self) -> usize {
        self.categories.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// A category as found on disk: the current map form, or a bare list of identifiers.
#[derive(Deserialize)]
#[serde(untagged)]
enum CategoryOnDisk {
    Entries(BTreeMap<String, HistoryEntry>),
    Names(Vec<String>),
}

impl<'de> Deserialize<'de> for HistoryRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, CategoryOnDisk>::deserialize(deserializer)?;
        let categories = raw
            .into_iter()
            .map(|(code, files)| {
                let files = match files {
                    CategoryOnDisk::Entries(map) => map,
                    CategoryOnDisk::Names(names) => names
                        .into_iter()
                        .map(|n| (n, HistoryEntry::default()))
                        .collect(),
                };
                (code, files)
            })
            .collect();
        Ok(Self { categories })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(url: &str) -> HistoryEntry {
        HistoryEntry {
            downloaded_at: "2025-01-02T03:04:05Z".into(),
            url: url.into(),
            sha256: None,
            bytes: None,
        }
    }

    #[test]
    fn record_is_idempotent_and_keeps_first_entry() {
        let mut h = HistoryRecord::new();
        assert!(h.record(Category::Nba, "A.TXT", entry("first")));
        assert!(!h.record(Category::Nba, "A.TXT", entry("second")));
        assert_eq!(h.entry(Category::Nba, "A.TXT").unwrap().url, "first");
        assert_eq!(h.count(Category::Nba), 1);
    }

    #[test]
    fn categories_are_partitioned() {
        let mut h = HistoryRecord::new();
        h.record(Category::Nba, "A.TXT", entry("u"));
        assert!(h.contains(Category::Nba, "A.TXT"));
        assert!(!h.contains(Category::Nfl, "A.TXT"));
        assert_eq!(h.identifiers(Category::Nfl).count(), 0);
        assert_eq!(h.total(), 1);
    }

    #[test]
    fn loads_legacy_entries_without_checksum() {
        let json = r#"{
          "NBA": {
            "NBA1107.TXT": {
              "downloaded_at": "2025-11-07T06:00:01.123456",
              "url": "http://www.kostats.com/NBA_Subscription/NBA1107.TXT"
            }
          }
        }"#;
        let h: HistoryRecord = serde_json::from_str(json).unwrap();
        let e = h.entry(Category::Nba, "NBA1107.TXT").unwrap();
        assert_eq!(e.downloaded_at, "2025-11-07T06:00:01.123456");
        assert!(e.sha256.is_none());
        let out = serde_json::to_string(&h).unwrap();
        assert!(!out.contains("sha256"));
    }

    #[test]
    fn loads_identifier_lists() {
        let json = r#"{ "CFB": ["W1.TXT", "W2.TXT"], "XYZ": {} }"#;
        let h: HistoryRecord = serde_json::from_str(json).unwrap();
        let ids: Vec<_> = h.identifiers(Category::Cfb).collect();
        assert_eq!(ids, vec!["W1.TXT", "W2.TXT"]);
        let out = serde_json::to_value(&h).unwrap();
        assert!(out.get("XYZ").is_some(), "unknown codes are preserved");
    }
}
