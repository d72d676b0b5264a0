use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "pagesnap", about = "Visit pages, screenshot, blur, publish")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the screenshot pipeline for every target URL
    Run {
        /// Target URLs (comma-separated), overrides TARGET_URLS
        #[arg(short, long)]
        urls: Option<String>,

        /// Skip the on-disk cookie cache for this run
        #[arg(long)]
        no_cache: bool,
    },
    /// Inspect the on-disk cookie cache
    Cache {
        /// Only show this domain's records
        #[arg(short, long)]
        domain: Option<String>,
    },
}
