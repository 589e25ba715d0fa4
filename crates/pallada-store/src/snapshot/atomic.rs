//! Atomic write primitives
//!
//! Temp→rename in the target's directory, so readers see either the old
//! file or the new one, never a partial write. Temp names are unique per
//! write; concurrent writers race on the rename and the last one wins.

use crate::errors::{internal_error, io_error, Result};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

fn temp_path_for(target_path: &Path) -> Result<PathBuf> {
    let file_name = target_path.file_name().ok_or_else(|| {
        internal_error(
            "atomic_write",
            format!("target path has no file name: {}", target_path.display()),
        )
    })?;
    let mut name = OsString::from(".");
    name.push(file_name);
    name.push(format!(".{}.tmp", uuid::Uuid::new_v4().simple()));
    Ok(target_path.with_file_name(name))
}

/// Atomically replace `target_path` with `content` (blocking)
pub fn atomic_write(target_path: &Path, content: &[u8]) -> Result<()> {
    let temp_path = temp_path_for(target_path)?;
    if let Some(parent) = target_path.parent() {
        fs::create_dir_all(parent).map_err(|e| io_error("create_snapshot_dir", e))?;
    }

    fs::write(&temp_path, content).map_err(|e| io_error("write_snapshot_temp", e))?;

    if let Err(e) = fs::rename(&temp_path, target_path) {
        let _ = fs::remove_file(&temp_path);
        return Err(io_error("rename_snapshot_temp", e));
    }
    Ok(())
}

/// Atomically replace `target_path` with `content` (async)
pub async fn atomic_write_async(target_path: &Path, content: &[u8]) -> Result<()> {
    let temp_path = temp_path_for(target_path)?;
    if let Some(parent) = target_path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| io_error("create_snapshot_dir", e))?;
    }

    tokio::fs::write(&temp_path, content)
        .await
        .map_err(|e| io_error("write_snapshot_temp", e))?;

    if let Err(e) = tokio::fs::rename(&temp_path, target_path).await {
        let _ = tokio::fs::remove_file(&temp_path).await;
        return Err(io_error("rename_snapshot_temp", e));
    }
    Ok(())
}
