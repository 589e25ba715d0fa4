//! Pallada Engine - Orchestration layer
//!
//! Coordinates the pure core (index, parser, diff) with the snapshot store
//! and the outside world:
//! - Configuration loading
//! - Page fetchers (HTTP, saved-page directory), blocking and async
//! - Catalog crawling
//! - Schedule sync with `FRESH` / `PROXY` / `CHANGED` classification

pub mod catalog;
pub mod config;
pub mod fetch;
pub mod sync;

/// Result type alias using the structured error
pub type Result<T> = std::result::Result<T, pallada_core::errors::ExError>;

pub use catalog::CatalogCrawler;
pub use config::PalladaConfig;
pub use fetch::{AsyncFetcher, AsyncHttpFetcher, Fetcher, HttpFetcher, ProxyDirFetcher};
pub use sync::{sync, sync_async, SyncPolicy, SyncResult, Synchronizer, CATALOG_KEY};
