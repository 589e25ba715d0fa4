//! Snapshot persistence layer.
//!
//! Holds the most recent instance of any serializable value (schedule
//! model, entity index) under a caller-chosen key, stamped with the time it
//! was captured.
//!
//! ## Responsibilities
//!
//! - Whole-file atomic replace on save (last writer wins)
//! - Classifying loads as found, absent or corrupt
//! - Blocking (`std::fs`) and async (`tokio::fs`) forms of every operation
//!
//! ## Non-Responsibilities
//!
//! - Deciding what a corrupt snapshot means (handled by `pallada-engine`)
//! - Comparing snapshots (handled by `pallada-core::diff`)

pub mod atomic;
pub mod fs_store;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use fs_store::FsSnapshotStore;

/// A stored value with its capture time.
///
/// Serialized as `{ "key", "captured_at", "payload" }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot<T> {
    pub key: String,
    pub captured_at: DateTime<Utc>,
    pub payload: T,
}

impl<T> Snapshot<T> {
    /// Snapshot captured now
    pub fn new(key: impl Into<String>, payload: T) -> Self {
        Self::at(key, Utc::now(), payload)
    }

    /// Snapshot with an explicit capture time
    pub fn at(key: impl Into<String>, captured_at: DateTime<Utc>, payload: T) -> Self {
        Self {
            key: key.into(),
            captured_at,
            payload,
        }
    }
}

/// Outcome of a snapshot load
#[derive(Debug, Clone, PartialEq)]
pub enum SnapshotLoad<T> {
    Found(Snapshot<T>),
    /// Nothing stored under the key
    Absent,
    /// A file exists but cannot be used; callers treat it like `Absent`
    Corrupt(String),
}

impl<T> SnapshotLoad<T> {
    /// The snapshot, if one was found; `Absent` and `Corrupt` both yield `None`
    pub fn found(self) -> Option<Snapshot<T>> {
        match self {
            SnapshotLoad::Found(snapshot) => Some(snapshot),
            SnapshotLoad::Absent | SnapshotLoad::Corrupt(_) => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, SnapshotLoad::Absent)
    }

    pub fn label(&self) -> &'static str {
        match self {
            SnapshotLoad::Found(_) => "found",
            SnapshotLoad::Absent => "absent",
            SnapshotLoad::Corrupt(_) => "corrupt",
        }
    }
}
