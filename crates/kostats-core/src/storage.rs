//! Writing one downloaded file into its category directory.
//!
//! The body streams into `<name>.part`; only a complete, synced file is
//! renamed to its final name. Any failure removes the temp file.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::checksum::Sha256Writer;
use crate::error::DownloadError;
use crate::http::HttpClient;
use crate::listing::FileRef;

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Path for the temp file: appends `.part` to the final path (e.g. `NBA1107.TXT` → `NBA1107.TXT.part`).
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

/// A completely written file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub path: PathBuf,
    pub bytes: u64,
    pub sha256: String,
}

/// Removes the temp file on drop unless it was renamed into place.
struct PartFile {
    path: PathBuf,
    keep: bool,
}

impl Drop for PartFile {
    fn drop(&mut self) {
        if !self.keep {
            let _ = fs::remove_file(&self.path);
        }
    }
}

fn storage_err(path: &Path) -> impl FnOnce(std::io::Error) -> DownloadError + '_ {
    move |source| DownloadError::Storage {
        path: path.to_path_buf(),
        source,
    }
}

/// Downloads `file` into `dir` (created if missing) under its display name.
/// An existing file of the same name is replaced.
pub fn download_file<C: HttpClient>(
    client: &mut C,
    file: &FileRef,
    dir: &Path,
) -> Result<StoredFile, DownloadError> {
    fs::create_dir_all(dir).map_err(storage_err(dir))?;

    let final_path = dir.join(&file.display_name);
    let tmp = temp_path(&final_path);
    let mut guard = PartFile {
        path: tmp.clone(),
        keep: false,
    };

    let handle = File::create(&tmp).map_err(storage_err(&tmp))?;
    let mut writer = Sha256Writer::new(BufWriter::new(handle));
    client.download(&file.download_url, &mut writer)?;
    writer.flush().map_err(storage_err(&tmp))?;

    let bytes = writer.bytes_written();
    let (buffered, sha256) = writer.finish();
    let handle = buffered
        .into_inner()
        .map_err(|e| DownloadError::Storage {
            path: tmp.clone(),
            source: e.into_error(),
        })?;
    handle.sync_all().map_err(storage_err(&tmp))?;
    drop(handle);

    fs::rename(&tmp, &final_path).map_err(storage_err(&final_path))?;
    guard.keep = true;

    Ok(StoredFile {
        path: final_path,
        bytes,
        sha256,
    })
}
