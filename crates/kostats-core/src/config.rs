use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::category::{Category, CategoryProfile};
use crate::error::ConfigError;

/// Environment variable names, preferred first.
pub const USERNAME_VARS: (&str, &str) = ("KOSTATS_USERNAME", "USERNAME");
pub const PASSWORD_VARS: (&str, &str) = ("KOSTATS_PASSWORD", "PASSWORD");
pub const DOWNLOAD_DIR_VAR: &str = "DOWNLOAD_DIR";

/// Global configuration loaded from `~/.config/kostats/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KostatsConfig {
    /// Site root; category listing pages hang off this.
    pub base_url: String,
    /// Path of the member login page relative to `base_url`.
    pub login_path: String,
    /// Pause between file downloads in milliseconds (0 = none).
    pub request_delay_ms: u64,
    /// Upper bound for a single request, including the body transfer.
    pub request_timeout_secs: u64,
    /// History file name, placed directly under the download directory.
    pub history_file_name: String,
    /// Fallback download directory when neither the CLI nor `DOWNLOAD_DIR` set one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_dir: Option<PathBuf>,
}

impl Default for KostatsConfig {
    fn default() -> Self {
        Self {
            base_url: "http://www.kostats.com".to_string(),
            login_path: "/amember5/member".to_string(),
            request_delay_ms: 1000,
            request_timeout_secs: 600,
            history_file_name: "download_history.json".to_string(),
            download_dir: None,
        }
    }
}

impl KostatsConfig {
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.base_url).map_err(|source| ConfigError::InvalidBaseUrl {
            url: self.base_url.clone(),
            source,
        })
    }

    pub fn login_url(&self) -> Result<Url, ConfigError> {
        let base = self.base_url()?;
        base.join(&self.login_path)
            .map_err(|source| ConfigError::InvalidBaseUrl {
                url: format!("{}{}", self.base_url, self.login_path),
                source,
            })
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Picks the download directory: CLI flag, then `DOWNLOAD_DIR`, then config file.
    pub fn resolve_download_dir(
        &self,
        cli: Option<&Path>,
        env: Option<String>,
    ) -> Result<PathBuf, ConfigError> {
        if let Some(p) = cli {
            return Ok(p.to_path_buf());
        }
        if let Some(v) = env.filter(|v| !v.trim().is_empty()) {
            return Ok(PathBuf::from(v));
        }
        self.download_dir
            .clone()
            .ok_or(ConfigError::MissingDownloadDir)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("kostats")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<KostatsConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = KostatsConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: KostatsConfig = toml::from_str(&data)?;
    Ok(cfg)
}

/// Site login credentials. Debug output never shows the password.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads credentials through `lookup` so callers (and tests) control the source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let pick = |(preferred, fallback): (&'static str, &'static str)| {
            lookup(preferred)
                .filter(|v| !v.is_empty())
                .or_else(|| lookup(fallback).filter(|v| !v.is_empty()))
                .ok_or(ConfigError::MissingCredential {
                    preferred,
                    fallback,
                })
        };
        Ok(Self {
            username: pick(USERNAME_VARS)?,
            password: pick(PASSWORD_VARS)?,
        })
    }
}

/// Everything the orchestrator needs for one run, resolved up front.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub download_dir: PathBuf,
    pub categories: Vec<CategoryProfile>,
    pub request_delay: Duration,
    pub dry_run: bool,
}

impl RunSettings {
    /// Builds settings for `categories` (all of them when empty), in table order.
    pub fn new(
        cfg: &KostatsConfig,
        download_dir: PathBuf,
        categories: &[Category],
        dry_run: bool,
    ) -> Result<Self, ConfigError> {
        let base = cfg.base_url()?;
        let selected: Vec<Category> = Category::ALL
            .into_iter()
            .filter(|c| categories.is_empty() || categories.contains(c))
            .collect();
        let mut profiles = Vec::with_capacity(selected.len());
        for category in selected {
            let profile = category
                .profile(&base, &download_dir)
                .map_err(|source| ConfigError::InvalidBaseUrl {
                    url: cfg.base_url.clone(),
                    source,
                })?;
            profiles.push(profile);
        }
        Ok(Self {
            download_dir,
            categories: profiles,
            request_delay: cfg.request_delay(),
            dry_run,
        })
    }
}
