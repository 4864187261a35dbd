//! Command-line interface, clap-based.
//!
//! The tool does exactly one thing, so there are no subcommands — only
//! optional flags that override the loaded [`SitemapConfig`](crate::config::SitemapConfig).

use std::path::PathBuf;

use clap::Parser;

use crate::config::SitemapConfig;

/// Generate the product sitemap for the storefront build.
#[derive(Debug, Parser)]
#[command(name = "sitemap-gen", version, about)]
pub struct Cli {
    /// Origin of the products API (overrides config and environment).
    #[arg(long)]
    pub api_base_url: Option<String>,

    /// Public site origin used for URLs in the sitemap.
    #[arg(long)]
    pub site_url: Option<String>,

    /// Output file path.
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Wall-clock limit for the whole run, in milliseconds.
    #[arg(long)]
    pub deadline_ms: Option<u64>,

    /// Print each request attempt, not just per-page results.
    #[arg(long, short, default_value_t = false)]
    pub verbose: bool,
}

impl Cli {
    /// Apply flag overrides on top of the loaded configuration.
    pub fn apply_to(&self, config: &mut SitemapConfig) {
        if let Some(url) = &self.api_base_url {
            config.api_base_url = url.clone();
        }
        if let Some(url) = &self.site_url {
            config.site_url = url.clone();
        }
        if let Some(path) = &self.output {
            config.output_path = path.clone();
        }
        if let Some(ms) = self.deadline_ms {
            config.deadline_ms = ms;
        }
    }
}
