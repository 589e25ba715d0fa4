//! Runtime configuration
//!
//! Loaded from an optional TOML file; every field has a default so an empty
//! file (or no file) is a valid configuration.

use pallada_core::errors::{ExError, ExErrorKind};
use pallada_core::model::EntityType;
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::path::{Path, PathBuf};

use crate::Result;

pub const DEFAULT_BASE_URL: &str = "https://timetable.pallada.sibsau.ru";

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PalladaConfig {
    /// Portal root, without a trailing slash
    pub base_url: String,
    /// Directory of the snapshot store
    pub snapshot_dir: PathBuf,
    /// Serve saved `<kind>_<id>.html` pages from here instead of the network
    pub proxy_dir: Option<PathBuf>,
    pub http: HttpConfig,
    pub resolver: ResolverConfig,
    pub catalog: CatalogConfig,
}

impl Default for PalladaConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            snapshot_dir: PathBuf::from(".pallada/snapshots"),
            proxy_dir: None,
            http: HttpConfig::default(),
            resolver: ResolverConfig::default(),
            catalog: CatalogConfig::default(),
        }
    }
}

/// HTTP client settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    /// The portal's certificate chain does not verify on stock trust stores
    pub accept_invalid_certs: bool,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            accept_invalid_certs: true,
            user_agent: format!("pallada/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Minimum similarity (exclusive, 0-100)
    pub threshold: f64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            threshold: pallada_core::index::MIN_SIMILARITY,
        }
    }
}

/// Half-open id range `start..end`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdRange {
    pub start: u32,
    pub end: u32,
}

impl IdRange {
    pub fn ids(&self) -> Range<u32> {
        self.start..self.end
    }
}

/// Id ranges the catalog crawler visits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub group_ids: IdRange,
    pub professor_ids: IdRange,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            group_ids: IdRange {
                start: 3099,
                end: 3102,
            },
            professor_ids: IdRange {
                start: 13500,
                end: 13502,
            },
        }
    }
}

fn config_error(message: impl Into<String>) -> ExError {
    ExError::new(ExErrorKind::Config)
        .with_op("load_config")
        .with_message(message)
}

impl PalladaConfig {
    /// Parse and validate a TOML document
    ///
    /// # Errors
    ///
    /// `Config` if the document is not valid TOML for this schema or a value
    /// is out of range.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: PalladaConfig =
            toml::from_str(text).map_err(|e| config_error(format!("invalid config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Read a TOML config file
    ///
    /// # Errors
    ///
    /// `Io` if the file cannot be read, `Config` if it does not parse or
    /// validate.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            ExError::new(ExErrorKind::Io)
                .with_op("load_config")
                .with_entity_id(path.display().to_string())
                .with_message(e.to_string())
        })?;
        Self::from_toml_str(&text).map_err(|e| e.with_entity_id(path.display().to_string()))
    }

    /// `load(path)` when a path is given, defaults otherwise
    ///
    /// # Errors
    ///
    /// Same as [`PalladaConfig::load`].
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    /// Check value ranges
    ///
    /// # Errors
    ///
    /// `Config` describing the first invalid value.
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(config_error("base_url must not be empty"));
        }
        if !(0.0..=100.0).contains(&self.resolver.threshold) {
            return Err(config_error(format!(
                "resolver.threshold must be within 0..=100, got {}",
                self.resolver.threshold
            )));
        }
        for (name, range) in [
            ("catalog.group_ids", self.catalog.group_ids),
            ("catalog.professor_ids", self.catalog.professor_ids),
        ] {
            if range.start > range.end {
                return Err(config_error(format!(
                    "{} start {} is after end {}",
                    name, range.start, range.end
                )));
            }
        }
        Ok(())
    }

    /// Portal URL of an entity's timetable page
    pub fn entity_url(&self, entity_type: EntityType, id: u32) -> String {
        format!(
            "{}/timetable/{}/{}",
            self.base_url.trim_end_matches('/'),
            entity_type.path_segment(),
            id
        )
    }
}
