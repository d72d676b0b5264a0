use std::ffi::OsString;

use anyhow::Result;
use headless_chrome::{Browser, LaunchOptionsBuilder};
use tracing::info;

use pagesnap_core::config::BrowserConfig;

/// One Chrome process shared by the whole run. Each target visits in its own
/// tab; the process goes down when the session is dropped.
pub struct VisitSession {
    pub(crate) browser: Browser,
}

impl VisitSession {
    pub fn launch(config: &BrowserConfig) -> Result<Self> {
        let mut extra_args: Vec<OsString> = Vec::new();

        // Required for running in Docker containers
        extra_args.push(OsString::from("--no-sandbox"));
        extra_args.push(OsString::from("--disable-dev-shm-usage"));
        extra_args.push(OsString::from("--disable-gpu"));

        let mut builder = LaunchOptionsBuilder::default();
        builder
            .headless(true)
            .window_size(Some((config.window_width, config.window_height)))
            .args(extra_args.iter().map(|a| a.as_ref()).collect());

        // Use CHROME_PATH env var if set (for Docker/custom installs)
        if let Ok(chrome_path) = std::env::var("CHROME_PATH") {
            builder.path(Some(std::path::PathBuf::from(chrome_path)));
        }

        let browser = Browser::new(builder.build()?)?;
        info!(
            width = config.window_width,
            height = config.window_height,
            "browser launched"
        );

        Ok(Self { browser })
    }
}
