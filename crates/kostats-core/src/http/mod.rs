//! HTTP access for one run.
//!
//! The pipeline only depends on [`HttpClient`]; [`CurlSession`] is the real
//! implementation (libcurl easy handle with its in-memory cookie engine, so
//! the login cookie is carried on every later request).

mod curl_session;
mod headers;

pub use curl_session::{CurlSession, SessionOptions};
pub use headers::content_length;

use std::io::Write;
use url::Url;

use crate::error::HttpError;

/// Blocking HTTP operations the fetcher needs. One request at a time.
pub trait HttpClient {
    /// GET `url` and return the body as text (invalid UTF-8 is replaced).
    fn get_text(&mut self, url: &Url) -> Result<String, HttpError>;

    /// POST `fields` as `application/x-www-form-urlencoded` and return the body as text.
    fn post_form(&mut self, url: &Url, fields: &[(String, String)]) -> Result<String, HttpError>;

    /// GET `url`, streaming the body into `sink`. Returns the number of bytes written.
    fn download(&mut self, url: &Url, sink: &mut dyn Write) -> Result<u64, HttpError>;
}

/// Encodes form fields the way browsers submit them.
pub fn encode_form(fields: &[(String, String)]) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(fields.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        .finish()
}
