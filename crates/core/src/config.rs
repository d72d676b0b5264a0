use std::collections::HashMap;

use serde::Deserialize;

use crate::error::SnapError;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
    #[serde(default)]
    pub interact: InteractConfig,
    #[serde(default)]
    pub imaging: ImagingConfig,
    #[serde(default)]
    pub cookies: CookieConfig,
    #[serde(default)]
    pub upload: UploadConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeneralConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    #[serde(default)]
    pub target_urls: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BrowserConfig {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_window_width")]
    pub window_width: u32,
    #[serde(default = "default_window_height")]
    pub window_height: u32,
    /// Upper bound on the post-navigation quiet wait. Pages that never go
    /// quiet (persistent polling) are captured as-is once this elapses.
    #[serde(default = "default_settle_wait")]
    pub settle_wait_seconds: u64,
    #[serde(default = "default_quality_u32")]
    pub screenshot_quality: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct InteractConfig {
    /// Hosts matching any of these substrings get the click-through step.
    #[serde(default = "default_host_patterns")]
    pub host_patterns: Vec<String>,
    #[serde(default = "default_button_text")]
    pub button_text: String,
    #[serde(default = "default_element_wait")]
    pub element_wait_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ImagingConfig {
    #[serde(default = "default_blur_sigma")]
    pub blur_sigma: f32,
    #[serde(default = "default_quality_u8")]
    pub jpeg_quality: u8,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CookieConfig {
    #[serde(default = "default_true")]
    pub cache_enabled: bool,
    #[serde(default = "default_cache_file")]
    pub cache_file: String,
    /// domain -> raw "name=value; ..." string, normally injected via COOKIE_MAP.
    #[serde(default)]
    pub map: HashMap<String, String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UploadConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub album_id: String,
    #[serde(default = "default_nsfw")]
    pub nsfw: String,
}

impl AppConfig {
    pub fn validate_for_run(&self) -> Result<(), SnapError> {
        if self.general.target_urls.is_empty() {
            return Err(SnapError::Config(
                "no target URLs: set TARGET_URLS or pass --urls".into(),
            ));
        }
        if self.upload.api_key.is_empty() {
            return Err(SnapError::Config("IMGE_API_KEY is required".into()));
        }
        if self.upload.album_id.is_empty() {
            return Err(SnapError::Config("IMGE_ALBUM_ID is required".into()));
        }
        Ok(())
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            target_urls: Vec::new(),
        }
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            window_width: default_window_width(),
            window_height: default_window_height(),
            settle_wait_seconds: default_settle_wait(),
            screenshot_quality: default_quality_u32(),
        }
    }
}

impl Default for InteractConfig {
    fn default() -> Self {
        Self {
            host_patterns: default_host_patterns(),
            button_text: default_button_text(),
            element_wait_seconds: default_element_wait(),
        }
    }
}

impl Default for ImagingConfig {
    fn default() -> Self {
        Self {
            blur_sigma: default_blur_sigma(),
            jpeg_quality: default_quality_u8(),
        }
    }
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            cache_enabled: true,
            cache_file: default_cache_file(),
            map: HashMap::new(),
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key: String::new(),
            album_id: String::new(),
            nsfw: default_nsfw(),
        }
    }
}

fn default_output_dir() -> String { ".".to_string() }
fn default_user_agent() -> String { "Mozilla/5.0".to_string() }
fn default_window_width() -> u32 { 1280 }
fn default_window_height() -> u32 { 800 }
fn default_settle_wait() -> u64 { 10 }
fn default_quality_u32() -> u32 { 80 }
fn default_quality_u8() -> u8 { 80 }
fn default_host_patterns() -> Vec<String> { vec!["streamlit.app".to_string()] }
fn default_button_text() -> String { "Manage app".to_string() }
fn default_element_wait() -> u64 { 30 }
fn default_blur_sigma() -> f32 { 15.0 }
fn default_true() -> bool { true }
fn default_cache_file() -> String { "cookies.json".to_string() }
fn default_endpoint() -> String { "https://im.ge/api/1/upload".to_string() }
fn default_nsfw() -> String { "1".to_string() }
