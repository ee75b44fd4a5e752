//! Blocking curl session that keeps cookies between requests.

use curl::easy::Easy;
use std::io::Write;
use std::time::Duration;
use url::Url;

use super::{content_length, encode_form, HttpClient};
use crate::config::KostatsConfig;
use crate::error::HttpError;

/// Connection settings for a [`CurlSession`].
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub connect_timeout: Duration,
    /// Whole-request limit, body included.
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(30),
            timeout: Duration::from_secs(600),
            user_agent: concat!("kostats/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl SessionOptions {
    pub fn from_config(cfg: &KostatsConfig) -> Self {
        Self {
            timeout: cfg.request_timeout(),
            ..Self::default()
        }
    }
}

enum Method<'a> {
    Get,
    Post(&'a [u8]),
}

/// One libcurl easy handle reused for the whole run.
///
/// `cookie_file("")` turns on curl's in-memory cookie engine without reading a
/// file, so `Set-Cookie` from the login response is replayed on later requests.
pub struct CurlSession {
    easy: Easy,
}

impl CurlSession {
    pub fn new(opts: &SessionOptions) -> Result<Self, HttpError> {
        let mut easy = Easy::new();
        easy.cookie_file("")?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        easy.useragent(&opts.user_agent)?;
        easy.connect_timeout(opts.connect_timeout)?;
        easy.low_speed_limit(1024)?;
        easy.low_speed_time(Duration::from_secs(60))?;
        easy.timeout(opts.timeout)?;
        Ok(Self { easy })
    }

    fn perform(&mut self, url: &Url, method: Method<'_>, sink: &mut dyn Write) -> Result<u64, HttpError> {
        self.easy.url(url.as_str())?;
        match method {
            Method::Get => self.easy.get(true)?,
            Method::Post(body) => {
                self.easy.post(true)?;
                self.easy.post_fields_copy(body)?;
            }
        }

        let mut headers: Vec<String> = Vec::new();
        let mut written = 0u64;
        let mut write_err: Option<std::io::Error> = None;

        let performed = {
            let mut transfer = self.easy.transfer();
            transfer.header_function(|data| {
                headers.push(String::from_utf8_lossy(data).trim_end().to_string());
                true
            })?;
            transfer.write_function(|data| match sink.write_all(data) {
                Ok(()) => {
                    written += data.len() as u64;
                    Ok(data.len())
                }
                Err(e) => {
                    write_err = Some(e);
                    Ok(0) // abort transfer
                }
            })?;
            transfer.perform()
        };

        if let Some(e) = write_err {
            return Err(HttpError::Write(e));
        }
        performed?;

        let code = self.easy.response_code()?;
        if !(200..300).contains(&code) {
            return Err(HttpError::Status {
                url: url.to_string(),
                code,
            });
        }

        if let Some(expected) = content_length(&headers) {
            if expected != written {
                return Err(HttpError::Truncated {
                    url: url.to_string(),
                    expected,
                    received: written,
                });
            }
        }

        tracing::debug!(url = %url, bytes = written, status = code, "request complete");
        Ok(written)
    }
}

impl HttpClient for CurlSession {
    fn get_text(&mut self, url: &Url) -> Result<String, HttpError> {
        let mut body = Vec::new();
        self.perform(url, Method::Get, &mut body)?;
        Ok(String::from_utf8_lossy(&body).into_owned())
    }

    fn post_form(&mut self, url: &Url, fields: &[(String, String)]) -> Result<String, HttpError> {
        let encoded = encode_form(fields);
        let mut body = Vec::new();
        self.perform(url, Method::Post(encoded.as_bytes()), &mut body)?;
        Ok(String::from_utf8_lossy(&body).into_owned())
    }

    fn download(&mut self, url: &Url, sink: &mut dyn Write) -> Result<u64, HttpError> {
        self.perform(url, Method::Get, sink)
    }
}
