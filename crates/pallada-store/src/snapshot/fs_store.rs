//! Filesystem snapshot store
//!
//! One JSON file per key, named by the SHA-256 of the key. Loads never fail:
//! a missing file is `Absent` and an unreadable or undecodable one is
//! `Corrupt`.

use pallada_core::{log_op_end, log_op_error, log_op_skip, log_op_start};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::errors::{serialization_error, snapshot_corrupt, snapshot_io_error, Result};
use crate::snapshot::atomic::{atomic_write, atomic_write_async};
use crate::snapshot::{Snapshot, SnapshotLoad};

/// Filesystem-backed snapshot store
#[derive(Debug, Clone)]
pub struct FsSnapshotStore {
    root: PathBuf,
}

impl FsSnapshotStore {
    /// Create a store rooted at `root`; the directory is created on first save
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File that holds the snapshot for `key`
    pub fn path_for(&self, key: &str) -> PathBuf {
        let digest = Sha256::digest(key.as_bytes());
        self.root.join(format!("{}.json", hex::encode(digest)))
    }

    /// Load the snapshot stored under `key` (blocking)
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> SnapshotLoad<T> {
        let start = Instant::now();
        log_op_start!("snapshot_load", snapshot_key = key);

        let loaded = match std::fs::read(self.path_for(key)) {
            Ok(bytes) => decode(key, &bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => SnapshotLoad::Absent,
            Err(e) => SnapshotLoad::Corrupt(format!("unreadable snapshot file: {}", e)),
        };
        finish_load(key, start, loaded)
    }

    /// Load the snapshot stored under `key` (async)
    pub async fn load_async<T: DeserializeOwned>(&self, key: &str) -> SnapshotLoad<T> {
        let start = Instant::now();
        log_op_start!("snapshot_load", snapshot_key = key);

        let loaded = match tokio::fs::read(self.path_for(key)).await {
            Ok(bytes) => decode(key, &bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => SnapshotLoad::Absent,
            Err(e) => SnapshotLoad::Corrupt(format!("unreadable snapshot file: {}", e)),
        };
        finish_load(key, start, loaded)
    }

    /// Atomically replace the snapshot stored under `snapshot.key` (blocking)
    ///
    /// # Errors
    ///
    /// `Serialization` if the payload cannot be encoded, `Io` if the file
    /// cannot be written.
    pub fn save<T: Serialize>(&self, snapshot: &Snapshot<T>) -> Result<()> {
        let start = Instant::now();
        log_op_start!("snapshot_save", snapshot_key = %snapshot.key);

        let result = encode(snapshot).and_then(|bytes| {
            atomic_write(&self.path_for(&snapshot.key), &bytes)
                .map_err(|e| e.with_entity_id(&snapshot.key))
        });
        finish_save(start, result)
    }

    /// Atomically replace the snapshot stored under `snapshot.key` (async)
    ///
    /// # Errors
    ///
    /// Same as [`FsSnapshotStore::save`].
    pub async fn save_async<T: Serialize>(&self, snapshot: &Snapshot<T>) -> Result<()> {
        let start = Instant::now();
        log_op_start!("snapshot_save", snapshot_key = %snapshot.key);

        let result = match encode(snapshot) {
            Ok(bytes) => atomic_write_async(&self.path_for(&snapshot.key), &bytes)
                .await
                .map_err(|e| e.with_entity_id(&snapshot.key)),
            Err(e) => Err(e),
        };
        finish_save(start, result)
    }

    /// Delete the snapshot stored under `key`. Returns whether one existed.
    ///
    /// # Errors
    ///
    /// `Io` if the file exists but cannot be removed.
    pub fn remove(&self, key: &str) -> Result<bool> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(snapshot_io_error("snapshot_remove", key, e)),
        }
    }

    /// Async form of [`FsSnapshotStore::remove`]
    ///
    /// # Errors
    ///
    /// `Io` if the file exists but cannot be removed.
    pub async fn remove_async(&self, key: &str) -> Result<bool> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(snapshot_io_error("snapshot_remove", key, e)),
        }
    }
}

fn encode<T: Serialize>(snapshot: &Snapshot<T>) -> Result<Vec<u8>> {
    serde_json::to_vec_pretty(snapshot)
        .map_err(|e| serialization_error("snapshot_save", &snapshot.key, e))
}

fn decode<T: DeserializeOwned>(key: &str, bytes: &[u8]) -> SnapshotLoad<T> {
    match serde_json::from_slice::<Snapshot<T>>(bytes) {
        Ok(snapshot) if snapshot.key == key => SnapshotLoad::Found(snapshot),
        Ok(snapshot) => SnapshotLoad::Corrupt(format!(
            "snapshot key mismatch: expected '{}', found '{}'",
            key, snapshot.key
        )),
        Err(e) => SnapshotLoad::Corrupt(format!("invalid snapshot JSON: {}", e)),
    }
}

fn finish_save(start: Instant, result: Result<()>) -> Result<()> {
    let duration_ms = start.elapsed().as_millis() as u64;
    match &result {
        Ok(()) => {
            log_op_end!("snapshot_save", duration_ms = duration_ms);
        }
        Err(e) => {
            log_op_error!("snapshot_save", e.clone(), duration_ms = duration_ms);
        }
    }
    result
}

fn finish_load<T>(key: &str, start: Instant, loaded: SnapshotLoad<T>) -> SnapshotLoad<T> {
    if let SnapshotLoad::Corrupt(reason) = &loaded {
        let err = snapshot_corrupt(key, reason);
        log_op_skip!(
            "snapshot_load",
            err,
            snapshot_key = key,
            err.kind = ?err.kind(),
            err.code = err.code()
        );
    }
    log_op_end!(
        "snapshot_load",
        duration_ms = start.elapsed().as_millis() as u64,
        snapshot_key = key,
        outcome = loaded.label()
    );
    loaded
}
