mod cli;
mod commands;
mod pipeline;

use anyhow::Result;
use clap::Parser;
use tracing::warn;

use pagesnap_core::config::AppConfig;

use crate::cli::{Cli, Commands};
use crate::pipeline::run_pipelines;

fn main() -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async_main())
}

async fn async_main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config_str = std::fs::read_to_string(&cli.config).unwrap_or_else(|_| {
        warn!(path = %cli.config, "config file not found, using defaults");
        include_str!("../config/default.toml").to_string()
    });
    let mut config: AppConfig = toml::from_str(&config_str)?;

    // Environment variable overrides
    if let Ok(v) = std::env::var("TARGET_URLS") {
        config.general.target_urls = split_csv(&v);
    }
    if let Ok(v) = std::env::var("COOKIE_MAP") {
        // JSON object: domain -> raw cookie string
        config.cookies.map = serde_json::from_str(&v)?;
    }
    if let Ok(v) = std::env::var("USER_AGENT") {
        config.browser.user_agent = v;
    }
    if let Ok(v) = std::env::var("IMGE_API_KEY") {
        config.upload.api_key = v;
    }
    if let Ok(v) = std::env::var("IMGE_ALBUM_ID") {
        config.upload.album_id = v;
    }
    if let Ok(v) = std::env::var("COOKIE_CACHE_ENABLED") {
        config.cookies.cache_enabled = v != "0" && v.to_lowercase() != "false";
    }
    if let Ok(v) = std::env::var("COOKIE_FILE") {
        config.cookies.cache_file = v;
    }
    if let Ok(v) = std::env::var("OUTPUT_DIR") {
        config.general.output_dir = v;
    }

    match cli.command {
        Commands::Run { urls, no_cache } => {
            if let Some(urls) = urls {
                config.general.target_urls = split_csv(&urls);
            }
            if no_cache {
                config.cookies.cache_enabled = false;
            }
            run_pipelines(config).await?;
        }
        Commands::Cache { domain } => {
            commands::run_cache(config, domain)?;
        }
    }

    Ok(())
}

fn split_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
