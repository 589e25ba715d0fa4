//! Entity index: the searchable catalog of groups and professors.
//!
//! Built once per catalog fetch from [`RawCatalogEntry`] records and never
//! mutated afterwards. Lookups go through [`resolver::resolve`].

pub mod normalize;
pub mod resolver;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::errors::{Result, TimetableError};
use crate::model::{Entity, EntityType, RawCatalogEntry, Source};

pub use normalize::normalize;
pub use resolver::{resolve, resolve_with_threshold, search, Match, MIN_SIMILARITY};

/// Immutable, ordered catalog of entities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityIndex {
    entities: Vec<Entity>,
    source: Source,
    source_date: DateTime<Utc>,
}

impl EntityIndex {
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn source(&self) -> Source {
        self.source
    }

    pub fn source_date(&self) -> DateTime<Utc> {
        self.source_date
    }

    /// Group and professor ids are numbered independently by the portal
    pub fn get(&self, entity_type: EntityType, id: u32) -> Option<&Entity> {
        self.entities
            .iter()
            .find(|e| e.entity_type == entity_type && e.id == id)
    }

    /// Same entities, re-tagged with where this copy came from.
    ///
    /// Used when an index is served from a stored snapshot.
    pub fn with_source(mut self, source: Source, source_date: DateTime<Utc>) -> Self {
        self.source = source;
        self.source_date = source_date;
        self
    }

    /// Raw entries this index was built from (for persisting a catalog file)
    pub fn to_raw(&self) -> Vec<RawCatalogEntry> {
        self.entities
            .iter()
            .map(|e| RawCatalogEntry {
                name: e.display_name.clone(),
                kind: e.entity_type.path_segment().to_string(),
                id: e.id,
                url: e.url.clone(),
            })
            .collect()
    }
}

/// Build an index from the raw catalog listing.
///
/// Entry order is preserved; it is the resolver's final tie-break.
///
/// # Errors
///
/// - `DuplicateEntity` if two entries share a type and an id
/// - `InvalidCatalogEntry` if an entry has an unknown type tag or blank name
pub fn build_index(
    raw_catalog: Vec<RawCatalogEntry>,
    source: Source,
    source_date: DateTime<Utc>,
) -> Result<EntityIndex> {
    let mut seen = HashSet::with_capacity(raw_catalog.len());
    let mut entities = Vec::with_capacity(raw_catalog.len());

    for raw in raw_catalog {
        let entity_type =
            EntityType::parse(&raw.kind).ok_or_else(|| TimetableError::InvalidCatalogEntry {
                reason: format!("entry {} has unknown type '{}'", raw.id, raw.kind),
            })?;
        if !seen.insert((entity_type, raw.id)) {
            return Err(TimetableError::DuplicateEntity {
                entity_type,
                id: raw.id,
            });
        }
        if raw.name.trim().is_empty() {
            return Err(TimetableError::InvalidCatalogEntry {
                reason: format!("entry {} has an empty name", raw.id),
            });
        }
        entities.push(Entity::new(raw.id, raw.name.trim(), entity_type, raw.url));
    }

    tracing::debug!(index_len = entities.len(), "entity index built");

    Ok(EntityIndex {
        entities,
        source,
        source_date,
    })
}

/// Decode a catalog listing saved as a JSON array of raw entries.
///
/// # Errors
///
/// `Serialization` if the text is not a JSON array of catalog entries.
pub fn parse_catalog_json(text: &str) -> Result<Vec<RawCatalogEntry>> {
    Ok(serde_json::from_str(text)?)
}
