//! File identifiers and local file names for listed files.
//!
//! The identifier is the decoded last path segment of the resolved link, plus
//! `?query` when the link has one. The name on disk is derived from it and
//! made unique within a listing by [`LocalNames`].

use std::collections::HashSet;
use url::Url;

/// Identifier for the file behind `url`.
///
/// Percent escapes are decoded, so `NBA%2011.TXT` and a link written as
/// `NBA 11.TXT` share the identifier `NBA 11.TXT`. The query is kept, so
/// `dl.php?f=A.TXT` and `dl.php?f=B.TXT` stay distinct.
///
/// Returns `None` if the path has no final segment or it is `.`/`..`.
pub fn file_name_from_url(url: &Url) -> Option<String> {
    let segment = url.path().rsplit('/').find(|s| !s.is_empty())?;
    let name = percent_decode(segment);
    if name == "." || name == ".." {
        return None;
    }
    match url.query() {
        Some(q) if !q.is_empty() => Some(format!("{}?{}", name, percent_decode(q))),
        _ => Some(name),
    }
}

/// Decodes `%XX` escapes. Malformed escapes are kept as written and invalid
/// UTF-8 is replaced.
fn percent_decode(input: &str) -> String {
    fn hex(b: u8) -> Option<u8> {
        (b as char).to_digit(16).map(|d| d as u8)
    }

    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            if let (Some(h), Some(l)) = (
                bytes.get(i + 1).copied().and_then(hex),
                bytes.get(i + 2).copied().and_then(hex),
            ) {
                out.push(h << 4 | l);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

const NAME_MAX: usize = 255;

/// Turns an identifier into a single Linux path component.
///
/// Path separators, NUL and other control characters become `_`. Leading
/// dots and surrounding whitespace are dropped so the file is neither hidden
/// nor a `.`/`..` entry. The result is cut to 255 bytes on a char boundary
/// and may be empty.
pub fn sanitize_filename(identifier: &str) -> String {
    let mapped: String = identifier
        .chars()
        .map(|c| match c {
            '/' | '\\' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    let trimmed = mapped.trim().trim_start_matches('.').trim_start();
    let mut end = trimmed.len().min(NAME_MAX);
    while !trimmed.is_char_boundary(end) {
        end -= 1;
    }
    trimmed[..end].to_string()
}

/// Hands out on-disk names for one listing so no two files share a name.
///
/// The first file to claim a name gets it as is; later ones get `-2`, `-3`
/// and so on before the extension.
#[derive(Debug, Default)]
pub struct LocalNames {
    taken: HashSet<String>,
}

impl LocalNames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims a name derived from `identifier`. `None` if nothing usable is left
    /// after sanitizing.
    pub fn claim(&mut self, identifier: &str) -> Option<String> {
        let base = sanitize_filename(identifier);
        if base.is_empty() {
            return None;
        }
        if self.taken.insert(base.clone()) {
            return Some(base);
        }

        let (stem, ext) = match base.rfind('.') {
            Some(dot) if dot > 0 => base.split_at(dot),
            _ => (base.as_str(), ""),
        };
        let name = (2u32..)
            .map(|n| {
                let suffix = format!("-{}{}", n, ext);
                let mut keep = stem.len().min(NAME_MAX.saturating_sub(suffix.len()));
                while !stem.is_char_boundary(keep) {
                    keep -= 1;
                }
                format!("{}{}", &stem[..keep], suffix)
            })
            .find(|candidate| !self.taken.contains(candidate))?;
        self.taken.insert(name.clone());
        Some(name)
    }
}
