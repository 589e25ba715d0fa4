//! Pallada Store - snapshot persistence
//!
//! Provides:
//! - A filesystem snapshot store keyed by caller identifiers (entity URL,
//!   `catalog`), one JSON file per key
//! - Atomic temp→rename writes
//! - Blocking and async forms of load, save and remove

pub mod errors;
pub mod snapshot;

// Re-export key types
pub use errors::Result;
pub use snapshot::{FsSnapshotStore, Snapshot, SnapshotLoad};
