use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::SnapError;

/// One browser cookie as it is cached on disk and applied before navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookieRecord {
    pub name: String,
    pub value: String,
    pub domain: String,
    #[serde(default = "default_path")]
    pub path: String,
    #[serde(default)]
    pub http_only: bool,
    #[serde(default = "default_secure")]
    pub secure: bool,
}

fn default_path() -> String {
    "/".to_string()
}

fn default_secure() -> bool {
    true
}

impl CookieRecord {
    pub fn new(
        name: impl Into<String>,
        value: impl Into<String>,
        domain: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            domain: domain.into(),
            path: default_path(),
            http_only: false,
            secure: default_secure(),
        }
    }
}

/// A target URL with its 1-based position in the input list.
/// The position keys the output filenames, so it must stay stable per run.
#[derive(Debug, Clone)]
pub struct Target {
    pub index: usize,
    pub url: Url,
    pub domain: String,
}

impl Target {
    pub fn new(index: usize, raw: &str) -> Result<Self, SnapError> {
        let raw = raw.trim();
        let url =
            Url::parse(raw).map_err(|e| SnapError::InvalidUrl(format!("{}: {}", raw, e)))?;
        let domain = url
            .host_str()
            .ok_or_else(|| SnapError::InvalidUrl(format!("{} has no host", url)))?
            .to_string();
        Ok(Self { index, url, domain })
    }

    pub fn screenshot_path(&self, dir: &Path) -> PathBuf {
        dir.join(format!("screenshot_{}.jpg", self.index))
    }

    pub fn blurred_path(&self, dir: &Path) -> PathBuf {
        dir.join(format!("blurred_{}.jpg", self.index))
    }
}

/// Turn the configured URL list into positioned targets.
pub fn targets_from(urls: &[String]) -> Result<Vec<Target>, SnapError> {
    urls.iter()
        .enumerate()
        .map(|(i, raw)| Target::new(i + 1, raw))
        .collect()
}
