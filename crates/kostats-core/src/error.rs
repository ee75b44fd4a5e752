//! Error taxonomy for one fetcher run.
//!
//! Only [`AuthError`] and [`ConfigError`] abort a run. Everything else is
//! scoped to a category or a single file and is reported, not propagated.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure of a single HTTP exchange (used by the session and by tests' fake clients).
#[derive(Debug, Error)]
pub enum HttpError {
    /// Curl reported an error (timeout, connection, TLS, etc.).
    #[error("transport error: {0}")]
    Transport(#[from] curl::Error),
    /// Response had a non-2xx status.
    #[error("{url} returned HTTP {code}")]
    Status { url: String, code: u32 },
    /// Fewer body bytes arrived than `Content-Length` announced.
    #[error("truncated body from {url}: expected {expected} bytes, got {received}")]
    Truncated {
        url: String,
        expected: u64,
        received: u64,
    },
    /// The body sink refused the data (disk full, permission denied).
    #[error("writing response body failed: {0}")]
    Write(#[source] io::Error),
}

/// Login did not yield an authenticated session. Fatal for the run.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("credentials must not be empty")]
    EmptyCredentials,
    #[error("could not load login page: {0}")]
    LoginPage(#[source] HttpError),
    #[error("login form not found on {url}")]
    LoginFormMissing { url: String },
    #[error("invalid login form action {action:?}: {source}")]
    FormAction {
        action: String,
        #[source]
        source: url::ParseError,
    },
    #[error("submitting login form failed: {0}")]
    Submit(#[source] HttpError),
    #[error("login rejected: no logout/account marker in response")]
    Rejected,
}

/// Listing page could not be retrieved for a category.
#[derive(Debug, Error)]
#[error("fetch {url}: {source}")]
pub struct FetchError {
    pub url: String,
    #[source]
    pub source: HttpError,
}

/// Listing page did not have the expected structure.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The site served its login form instead of a listing (session lost or site changed).
    #[error("listing page {url} is a login form; session not accepted")]
    SessionExpired { url: String },
    #[error("file link {href:?} on {url} is not a valid URL: {source}")]
    InvalidLink {
        url: String,
        href: String,
        #[source]
        source: url::ParseError,
    },
    #[error("file link {href:?} on {url} has no usable file name")]
    MissingFileName { url: String, href: String },
}

/// One file could not be stored. The identifier stays out of the history.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("download failed: {0}")]
    Http(#[from] HttpError),
    #[error("storage error at {}: {source}", path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// History could not be written. Logged; never fatal.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("serialize download history: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("write download history {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Required settings are missing or malformed. Fatal before any network activity.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing credential: set {preferred} (or {fallback})")]
    MissingCredential {
        preferred: &'static str,
        fallback: &'static str,
    },
    #[error("no download directory: pass --download-dir, set DOWNLOAD_DIR, or set download_dir in config.toml")]
    MissingDownloadDir,
    #[error("invalid base_url {url:?}: {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}
