//! CLI command modules

pub mod catalog;
pub mod diff;
pub mod schedule;
pub mod search;

use clap::Args;
use pallada_engine::{Fetcher, HttpFetcher, PalladaConfig, ProxyDirFetcher, Synchronizer};
use std::path::PathBuf;

/// Options shared by every command
#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// TOML config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Snapshot directory (overrides the config file)
    #[arg(long, global = true)]
    pub snapshot_dir: Option<PathBuf>,

    /// Read pages from saved HTML files instead of the portal
    #[arg(long, global = true)]
    pub proxy_dir: Option<PathBuf>,

    /// Emit JSON log lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Log filter directive (e.g. "pallada=trace")
    #[arg(long, global = true)]
    pub log_filter: Option<String>,
}

impl GlobalArgs {
    /// Config file (or defaults) with command-line overrides applied
    pub fn config(&self) -> Result<PalladaConfig, Box<dyn std::error::Error>> {
        let mut config = PalladaConfig::load_or_default(self.config.as_deref())?;
        if let Some(dir) = &self.snapshot_dir {
            config.snapshot_dir = dir.clone();
        }
        if let Some(dir) = &self.proxy_dir {
            config.proxy_dir = Some(dir.clone());
        }
        Ok(config)
    }

    /// Synchronizer over the configured snapshot directory
    pub fn synchronizer(&self) -> Result<Synchronizer, Box<dyn std::error::Error>> {
        Ok(Synchronizer::new(self.config()?))
    }
}

/// Saved-page fetcher when a proxy directory is configured, HTTP otherwise
pub fn fetcher(config: &PalladaConfig) -> Result<Box<dyn Fetcher>, Box<dyn std::error::Error>> {
    match &config.proxy_dir {
        Some(dir) => Ok(Box::new(ProxyDirFetcher::new(dir))),
        None => Ok(Box::new(HttpFetcher::new(&config.http)?)),
    }
}
