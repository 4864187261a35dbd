mod api;
mod cli;
mod config;
mod generator;
mod sitemap;
mod ui;

use anyhow::Result;
use clap::Parser;

use cli::Cli;
use config::SitemapConfig;
use generator::SitemapGenerator;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = SitemapConfig::load()?;
    cli.apply_to(&mut config);

    SitemapGenerator::new(config, cli.verbose).run().await
}
