//! Catalog command: crawl, import or export the entity index

use chrono::Utc;
use clap::Args;
use pallada_core::index::{build_index, parse_catalog_json};
use pallada_core::model::Source;
use pallada_engine::{SyncPolicy, CATALOG_KEY};
use pallada_store::Snapshot;
use std::path::PathBuf;

use super::GlobalArgs;

#[derive(Debug, Args)]
pub struct CatalogArgs {
    /// Re-crawl the portal even when a catalog is stored
    #[arg(long)]
    pub refresh: bool,

    /// Replace the stored catalog with a JSON catalog file
    #[arg(long, conflicts_with = "refresh")]
    pub import: Option<PathBuf>,

    /// Write the catalog as JSON to this file
    #[arg(long)]
    pub export: Option<PathBuf>,
}

pub fn execute(global: &GlobalArgs, args: CatalogArgs) -> Result<(), Box<dyn std::error::Error>> {
    let sync = global.synchronizer()?;

    let index = match &args.import {
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            let raw = parse_catalog_json(&text)?;
            let now = Utc::now();
            let snapshot = Snapshot::at(CATALOG_KEY, now, build_index(raw, Source::Fresh, now)?);
            sync.store().save(&snapshot)?;
            snapshot.payload
        }
        None => {
            let fetcher = super::fetcher(sync.config())?;
            let policy = if args.refresh {
                SyncPolicy::Refresh
            } else {
                SyncPolicy::CacheFirst
            };
            sync.load_index(fetcher.as_ref(), policy)?
        }
    };

    println!(
        "{} entities [{}, {}]",
        index.len(),
        index.source(),
        index.source_date().format("%Y-%m-%d %H:%M:%S UTC")
    );

    if let Some(path) = &args.export {
        std::fs::write(path, serde_json::to_string_pretty(&index.to_raw())?)?;
        println!("Catalog written to {}", path.display());
    }
    Ok(())
}
