//! Search command: list catalog entities matching a query

use clap::Args;
use pallada_core::index::search;
use pallada_engine::SyncPolicy;

use super::GlobalArgs;

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Free-text name query (Cyrillic or Latin)
    pub query: String,

    /// Maximum number of matches
    #[arg(short, long, default_value_t = 5)]
    pub limit: usize,

    /// Re-crawl the catalog instead of using the stored one
    #[arg(long)]
    pub refresh_catalog: bool,
}

pub fn execute(global: &GlobalArgs, args: SearchArgs) -> Result<(), Box<dyn std::error::Error>> {
    let sync = global.synchronizer()?;
    let fetcher = super::fetcher(sync.config())?;
    let policy = if args.refresh_catalog {
        SyncPolicy::Refresh
    } else {
        SyncPolicy::CacheFirst
    };
    let index = sync.load_index(fetcher.as_ref(), policy)?;

    let matches = search(
        &index,
        &args.query,
        sync.config().resolver.threshold,
        args.limit,
    );
    if matches.is_empty() {
        println!("No matches for '{}'", args.query);
        return Ok(());
    }
    for m in matches {
        println!(
            "{:>6}  {:<9}  {:>5.1}  {}",
            m.entity.id, m.entity.entity_type, m.score, m.entity.display_name
        );
    }
    Ok(())
}
