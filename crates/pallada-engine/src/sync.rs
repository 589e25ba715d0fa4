//! Sync orchestration.
//!
//! ## Pipeline (in order):
//! 1. Load the entity index (stored catalog snapshot or a fresh crawl)
//! 2. Resolve the query to an entity
//! 3. Cache-first short-circuit: serve the stored schedule as `PROXY`
//! 4. Fetch and parse the entity's page
//! 5. Classify against the stored snapshot (`FRESH` / `PROXY` / `CHANGED`)
//!    and replace the snapshot with the new model

use chrono::{DateTime, Utc};
use pallada_core::diff::{diff, Change};
use pallada_core::errors::{ExError, ExErrorKind};
use pallada_core::index::{build_index, resolve_with_threshold, EntityIndex};
use pallada_core::model::{Entity, RawCatalogEntry, ScheduleModel, Source};
use pallada_core::parse::build_schedule;
use pallada_core::{log_op_end, log_op_error, log_op_start};
use pallada_store::{FsSnapshotStore, Snapshot};
use serde::Serialize;
use std::time::Instant;

use crate::catalog::CatalogCrawler;
use crate::config::PalladaConfig;
use crate::fetch::{AsyncFetcher, Fetcher};
use crate::Result;

/// Snapshot key of the entity index
pub const CATALOG_KEY: &str = "catalog";

/// Whether a stored snapshot may be served without fetching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncPolicy {
    /// Serve the stored snapshot when there is one
    #[default]
    CacheFirst,
    /// Always fetch and compare against the stored snapshot
    Refresh,
}

/// Outcome of one schedule sync
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyncResult {
    pub source: Source,
    /// Capture time of `model`
    pub source_date: DateTime<Utc>,
    pub model: ScheduleModel,
    /// Empty unless `source` is `Changed`
    pub changes: Vec<Change>,
}

/// Compare `new_model` with the prior snapshot and build the new snapshot
fn classify(
    key: &str,
    prior: Option<Snapshot<ScheduleModel>>,
    new_model: ScheduleModel,
) -> (Snapshot<ScheduleModel>, SyncResult) {
    let snapshot = Snapshot::new(key, new_model);
    let (source, changes) = match prior {
        None => (Source::Fresh, Vec::new()),
        Some(prior) => {
            let changes = diff(&prior.payload, &snapshot.payload);
            if changes.is_empty() {
                (Source::Proxy, changes)
            } else {
                (Source::Changed, changes)
            }
        }
    };
    let result = SyncResult {
        source,
        source_date: snapshot.captured_at,
        model: snapshot.payload.clone(),
        changes,
    };
    (snapshot, result)
}

fn proxy_result(snapshot: Snapshot<ScheduleModel>) -> SyncResult {
    SyncResult {
        source: Source::Proxy,
        source_date: snapshot.captured_at,
        model: snapshot.payload,
        changes: Vec::new(),
    }
}

fn log_sync_end(key: &str, start: Instant, result: &SyncResult) {
    log_op_end!(
        "sync",
        duration_ms = start.elapsed().as_millis() as u64,
        snapshot_key = key,
        source = %result.source,
        change_count = result.changes.len()
    );
}

fn log_sync_error(key: &str, start: Instant, err: &ExError) {
    log_op_error!(
        "sync",
        err.clone(),
        duration_ms = start.elapsed().as_millis() as u64,
        snapshot_key = key
    );
}

/// Classify a freshly built model against the snapshot stored under `key`
/// and store it as the new snapshot (blocking).
///
/// An absent or corrupt prior snapshot yields `Fresh`; an equal one `Proxy`
/// with no changes; a different one `Changed` with its changes.
///
/// # Errors
///
/// `Io` / `Serialization` if the new snapshot cannot be saved.
pub fn sync(key: &str, new_model: ScheduleModel, store: &FsSnapshotStore) -> Result<SyncResult> {
    let start = Instant::now();
    log_op_start!("sync", snapshot_key = key);

    let prior = store.load::<ScheduleModel>(key).found();
    let (snapshot, result) = classify(key, prior, new_model);
    if let Err(e) = store.save(&snapshot) {
        log_sync_error(key, start, &e);
        return Err(e);
    }

    log_sync_end(key, start, &result);
    Ok(result)
}

/// Async form of [`sync`]
///
/// # Errors
///
/// Same as [`sync`].
pub async fn sync_async(
    key: &str,
    new_model: ScheduleModel,
    store: &FsSnapshotStore,
) -> Result<SyncResult> {
    let start = Instant::now();
    log_op_start!("sync", snapshot_key = key);

    let prior = store.load_async::<ScheduleModel>(key).await.found();
    let (snapshot, result) = classify(key, prior, new_model);
    if let Err(e) = store.save_async(&snapshot).await {
        log_sync_error(key, start, &e);
        return Err(e);
    }

    log_sync_end(key, start, &result);
    Ok(result)
}

fn empty_catalog_error() -> ExError {
    ExError::new(ExErrorKind::Fetch)
        .with_op("load_index")
        .with_message("catalog crawl returned no entries")
}

fn stored_index(snapshot: Snapshot<EntityIndex>) -> EntityIndex {
    tracing::debug!(index_len = snapshot.payload.len(), "serving stored catalog");
    snapshot
        .payload
        .with_source(Source::Proxy, snapshot.captured_at)
}

fn index_from_crawl(raw: Vec<RawCatalogEntry>) -> Result<Snapshot<EntityIndex>> {
    if raw.is_empty() {
        return Err(empty_catalog_error());
    }
    let captured_at = Utc::now();
    let index = build_index(raw, Source::Fresh, captured_at)?;
    Ok(Snapshot::at(CATALOG_KEY, captured_at, index))
}

/// Ties the configuration, the snapshot store and a fetcher together
#[derive(Debug, Clone)]
pub struct Synchronizer {
    config: PalladaConfig,
    store: FsSnapshotStore,
}

impl Synchronizer {
    /// Synchronizer over the store at `config.snapshot_dir`
    pub fn new(config: PalladaConfig) -> Self {
        let store = FsSnapshotStore::new(config.snapshot_dir.clone());
        Self { config, store }
    }

    pub fn with_store(config: PalladaConfig, store: FsSnapshotStore) -> Self {
        Self { config, store }
    }

    pub fn config(&self) -> &PalladaConfig {
        &self.config
    }

    pub fn store(&self) -> &FsSnapshotStore {
        &self.store
    }

    /// Entity index: the stored catalog under `CacheFirst`, otherwise a
    /// fresh crawl that replaces the stored catalog (blocking).
    ///
    /// # Errors
    ///
    /// `Fetch` if the crawl yields no entries, `DuplicateEntity` /
    /// `InvalidInput` if the crawled catalog is inconsistent, `Io` if it
    /// cannot be stored.
    pub fn load_index<F: Fetcher + ?Sized>(
        &self,
        fetcher: &F,
        policy: SyncPolicy,
    ) -> Result<EntityIndex> {
        if policy == SyncPolicy::CacheFirst {
            if let Some(snapshot) = self.store.load::<EntityIndex>(CATALOG_KEY).found() {
                return Ok(stored_index(snapshot));
            }
        }
        let raw = CatalogCrawler::new(&self.config).crawl(fetcher);
        let snapshot = index_from_crawl(raw)?;
        self.store.save(&snapshot)?;
        Ok(snapshot.payload)
    }

    /// Async form of [`Synchronizer::load_index`]
    ///
    /// # Errors
    ///
    /// Same as [`Synchronizer::load_index`].
    pub async fn load_index_async<F: AsyncFetcher + ?Sized>(
        &self,
        fetcher: &F,
        policy: SyncPolicy,
    ) -> Result<EntityIndex> {
        if policy == SyncPolicy::CacheFirst {
            if let Some(snapshot) = self
                .store
                .load_async::<EntityIndex>(CATALOG_KEY)
                .await
                .found()
            {
                return Ok(stored_index(snapshot));
            }
        }
        let raw = CatalogCrawler::new(&self.config).crawl_async(fetcher).await;
        let snapshot = index_from_crawl(raw)?;
        self.store.save_async(&snapshot).await?;
        Ok(snapshot.payload)
    }

    /// Resolve `query` with the configured threshold
    ///
    /// # Errors
    ///
    /// `NotFound` when nothing scores above the threshold.
    pub fn resolve<'a>(&self, index: &'a EntityIndex, query: &str) -> Result<&'a Entity> {
        resolve_with_threshold(index, query, self.config.resolver.threshold).map_err(ExError::from)
    }

    /// Schedule of `entity` under `policy` (blocking)
    ///
    /// # Errors
    ///
    /// `Fetch` if the page cannot be retrieved, `MalformedSource` if it
    /// cannot be parsed, `Io` if the snapshot cannot be stored.
    pub fn schedule<F: Fetcher + ?Sized>(
        &self,
        entity: &Entity,
        fetcher: &F,
        policy: SyncPolicy,
    ) -> Result<SyncResult> {
        if policy == SyncPolicy::CacheFirst {
            if let Some(snapshot) = self.store.load::<ScheduleModel>(&entity.url).found() {
                tracing::debug!(entity_id = entity.id, "serving stored schedule");
                return Ok(proxy_result(snapshot));
            }
        }
        let page = fetcher.fetch(&entity.url)?;
        let model = build_schedule(&page, entity.entity_type)
            .map_err(|e| ExError::from(e).with_entity_id(&entity.url))?;
        sync(&entity.url, model, &self.store)
    }

    /// Async form of [`Synchronizer::schedule`]
    ///
    /// # Errors
    ///
    /// Same as [`Synchronizer::schedule`].
    pub async fn schedule_async<F: AsyncFetcher + ?Sized>(
        &self,
        entity: &Entity,
        fetcher: &F,
        policy: SyncPolicy,
    ) -> Result<SyncResult> {
        if policy == SyncPolicy::CacheFirst {
            if let Some(snapshot) = self
                .store
                .load_async::<ScheduleModel>(&entity.url)
                .await
                .found()
            {
                tracing::debug!(entity_id = entity.id, "serving stored schedule");
                return Ok(proxy_result(snapshot));
            }
        }
        let page = fetcher.fetch(&entity.url).await?;
        let model = build_schedule(&page, entity.entity_type)
            .map_err(|e| ExError::from(e).with_entity_id(&entity.url))?;
        sync_async(&entity.url, model, &self.store).await
    }

    /// Full pipeline from a free-text query (blocking). The index is always
    /// loaded cache-first; `policy` applies to the schedule.
    ///
    /// # Errors
    ///
    /// Any error of [`Synchronizer::load_index`], [`Synchronizer::resolve`]
    /// or [`Synchronizer::schedule`].
    pub fn sync_query<F: Fetcher + ?Sized>(
        &self,
        query: &str,
        fetcher: &F,
        policy: SyncPolicy,
    ) -> Result<(Entity, SyncResult)> {
        let index = self.load_index(fetcher, SyncPolicy::CacheFirst)?;
        let entity = self.resolve(&index, query)?.clone();
        let result = self.schedule(&entity, fetcher, policy)?;
        Ok((entity, result))
    }

    /// Async form of [`Synchronizer::sync_query`]
    ///
    /// # Errors
    ///
    /// Same as [`Synchronizer::sync_query`].
    pub async fn sync_query_async<F: AsyncFetcher + ?Sized>(
        &self,
        query: &str,
        fetcher: &F,
        policy: SyncPolicy,
    ) -> Result<(Entity, SyncResult)> {
        let index = self.load_index_async(fetcher, SyncPolicy::CacheFirst).await?;
        let entity = self.resolve(&index, query)?.clone();
        let result = self.schedule_async(&entity, fetcher, policy).await?;
        Ok((entity, result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pallada_core::model::EntityType;

    #[test]
    fn test_classify_without_prior_is_fresh() {
        let model = ScheduleModel::new(EntityType::Group, "ИВ-21", "p");
        let (snapshot, result) = classify("k", None, model.clone());
        assert_eq!(result.source, Source::Fresh);
        assert_eq!(result.source_date, snapshot.captured_at);
        assert_eq!(snapshot.payload, model);
    }

    #[test]
    fn test_default_policy_is_cache_first() {
        assert_eq!(SyncPolicy::default(), SyncPolicy::CacheFirst);
    }
}
