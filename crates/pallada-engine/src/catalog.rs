//! Catalog crawler
//!
//! The portal has no listing endpoint, so the catalog is rebuilt by
//! visiting every configured group and professor id and reading the page
//! title. Ids that fail to fetch or parse are skipped with a warning.

use pallada_core::model::{EntityType, RawCatalogEntry};
use pallada_core::parse::read_title;
use pallada_core::{log_op_end, log_op_skip, log_op_start};
use std::time::Instant;

use crate::config::PalladaConfig;
use crate::fetch::{AsyncFetcher, Fetcher};
use crate::Result;

/// Visits the configured id ranges and produces raw catalog entries
#[derive(Debug, Clone)]
pub struct CatalogCrawler<'a> {
    config: &'a PalladaConfig,
}

impl<'a> CatalogCrawler<'a> {
    pub fn new(config: &'a PalladaConfig) -> Self {
        Self { config }
    }

    /// Every `(entity_type, id, url)` the crawl will visit, groups first
    pub fn targets(&self) -> Vec<(EntityType, u32, String)> {
        let catalog = &self.config.catalog;
        [
            (EntityType::Group, catalog.group_ids),
            (EntityType::Professor, catalog.professor_ids),
        ]
        .into_iter()
        .flat_map(|(entity_type, range)| {
            range
                .ids()
                .map(move |id| (entity_type, id, self.config.entity_url(entity_type, id)))
        })
        .collect()
    }

    /// Crawl with a blocking fetcher
    pub fn crawl<F: Fetcher + ?Sized>(&self, fetcher: &F) -> Vec<RawCatalogEntry> {
        let start = Instant::now();
        let targets = self.targets();
        log_op_start!("crawl_catalog", target_count = targets.len());

        let entries: Vec<RawCatalogEntry> = targets
            .into_iter()
            .filter_map(|(entity_type, id, url)| {
                let page = fetcher.fetch(&url);
                entry_from_page(entity_type, id, url, page)
            })
            .collect();

        log_op_end!(
            "crawl_catalog",
            duration_ms = start.elapsed().as_millis() as u64,
            index_len = entries.len()
        );
        entries
    }

    /// Crawl with an async fetcher; pages are requested one at a time
    pub async fn crawl_async<F: AsyncFetcher + ?Sized>(&self, fetcher: &F) -> Vec<RawCatalogEntry> {
        let start = Instant::now();
        let targets = self.targets();
        log_op_start!("crawl_catalog", target_count = targets.len());

        let mut entries = Vec::with_capacity(targets.len());
        for (entity_type, id, url) in targets {
            let page = fetcher.fetch(&url).await;
            if let Some(entry) = entry_from_page(entity_type, id, url, page) {
                entries.push(entry);
            }
        }

        log_op_end!(
            "crawl_catalog",
            duration_ms = start.elapsed().as_millis() as u64,
            index_len = entries.len()
        );
        entries
    }
}

fn entry_from_page(
    entity_type: EntityType,
    id: u32,
    url: String,
    page: Result<String>,
) -> Option<RawCatalogEntry> {
    let page = match page {
        Ok(page) => page,
        Err(e) => {
            log_op_skip!("crawl_catalog", e, url = %url);
            return None;
        }
    };
    match read_title(&page, entity_type) {
        Ok((name, _period)) => Some(RawCatalogEntry {
            name,
            kind: entity_type.path_segment().to_string(),
            id,
            url,
        }),
        Err(e) => {
            log_op_skip!("crawl_catalog", e, url = %url);
            None
        }
    }
}
