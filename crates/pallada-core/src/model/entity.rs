use serde::{Deserialize, Serialize};
use std::fmt;

use crate::index::normalize::normalize;

/// Kind of timetable owner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Group,
    Professor,
}

impl EntityType {
    /// Path segment used by the portal (`/timetable/<segment>/<id>`)
    pub fn path_segment(self) -> &'static str {
        match self {
            EntityType::Group => "group",
            EntityType::Professor => "professor",
        }
    }

    /// Parse the catalog type tag; `None` for unknown tags
    pub fn parse(tag: &str) -> Option<Self> {
        match tag.trim().to_lowercase().as_str() {
            "group" => Some(EntityType::Group),
            "professor" => Some(EntityType::Professor),
            _ => None,
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_segment())
    }
}

/// Where a piece of data came from for the current call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Source {
    /// Fetched live during this call
    Fresh,
    /// Served from a stored snapshot
    Proxy,
    /// Fetched live and different from the stored snapshot
    Changed,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Source::Fresh => "FRESH",
            Source::Proxy => "PROXY",
            Source::Changed => "CHANGED",
        };
        f.write_str(label)
    }
}

/// One entry of the remote catalog listing, as crawled or loaded from a
/// saved catalog JSON file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCatalogEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub id: u32,
    pub url: String,
}

/// A searchable group or professor.
///
/// Immutable once indexed; `normalized_name` is always derived from
/// `display_name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub display_name: String,
    pub normalized_name: String,
    pub entity_type: EntityType,
    pub url: String,
}

impl Entity {
    pub fn new(
        id: u32,
        display_name: impl Into<String>,
        entity_type: EntityType,
        url: impl Into<String>,
    ) -> Self {
        let display_name = display_name.into();
        Self {
            id,
            normalized_name: normalize(&display_name),
            display_name,
            entity_type,
            url: url.into(),
        }
    }
}
