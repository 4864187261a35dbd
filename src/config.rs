//! Generator configuration loaded from `sitemap.toml`.
//!
//! [`SitemapConfig`] carries every tunable of the run. Values missing from
//! the file use the storefront's production defaults. The `VITE_API_BASE_URL`
//! and `API_BASE_URL` environment variables take precedence over the file for
//! the API origin, in that order, matching what the site build exports.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use serde::Deserialize;

/// Top-level configuration for a sitemap generation run.
#[derive(Debug, Clone, Deserialize)]
pub struct SitemapConfig {
    /// Origin of the products API.
    #[serde(default = "default_base_url")]
    pub api_base_url: String,

    /// Public site origin used to build absolute URLs in the sitemap.
    #[serde(default = "default_base_url")]
    pub site_url: String,

    /// Where the generated XML is written.
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,

    /// Products requested per page.
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Hard cap on pages scanned, whatever the API reports.
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,

    /// Total attempts per page before the fetch phase gives up.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Fixed delay between attempts on the same page, in milliseconds.
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// Per-request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Wall-clock ceiling for the whole run, in milliseconds. When it fires,
    /// in-flight work is abandoned and the fallback document is written.
    #[serde(default = "default_deadline_ms")]
    pub deadline_ms: u64,
}

fn default_base_url() -> String {
    "https://samah-store.tech".to_string()
}

fn default_output_path() -> PathBuf {
    PathBuf::from("public/sitemap-products.xml")
}

fn default_page_size() -> u32 {
    100
}

fn default_max_pages() -> u32 {
    10
}

fn default_max_retries() -> u32 {
    2
}

fn default_retry_delay_ms() -> u64 {
    500
}

fn default_timeout_ms() -> u64 {
    5000
}

fn default_deadline_ms() -> u64 {
    30_000
}

impl Default for SitemapConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_base_url(),
            site_url: default_base_url(),
            output_path: default_output_path(),
            page_size: default_page_size(),
            max_pages: default_max_pages(),
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
            timeout_ms: default_timeout_ms(),
            deadline_ms: default_deadline_ms(),
        }
    }
}

impl SitemapConfig {
    /// Load configuration from `sitemap.toml` in the current directory,
    /// falling back to defaults if the file does not exist, then apply
    /// environment overrides.
    pub fn load() -> Result<Self> {
        let path = Path::new("sitemap.toml");
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            toml::from_str::<SitemapConfig>(&contents)?
        } else {
            Self::default()
        };

        // The Vite-prefixed variable is what the frontend build exports;
        // the bare one serves every other environment.
        if let Ok(url) = std::env::var("VITE_API_BASE_URL")
            && !url.is_empty()
        {
            config.api_base_url = url;
        } else if let Ok(url) = std::env::var("API_BASE_URL")
            && !url.is_empty()
        {
            config.api_base_url = url;
        }

        Ok(config)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn deadline(&self) -> Duration {
        Duration::from_millis(self.deadline_ms)
    }
}
