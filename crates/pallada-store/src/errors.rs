//! Error handling for pallada-store
//!
//! Wraps pallada-core ExError with store-specific helpers

use pallada_core::errors::{ExError, ExErrorKind};

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create an IO error
pub fn io_error(operation: &str, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op(operation.to_string())
        .with_message(err.to_string())
}

/// Create an IO error tagged with the snapshot key it concerns
pub fn snapshot_io_error(operation: &str, key: &str, err: std::io::Error) -> ExError {
    io_error(operation, err).with_entity_id(key)
}

/// Create an internal error for a broken store invariant
pub fn internal_error(operation: &str, message: impl Into<String>) -> ExError {
    ExError::new(ExErrorKind::Internal)
        .with_op(operation.to_string())
        .with_message(message)
}

/// Create a serialization error for a snapshot payload
pub fn serialization_error(operation: &str, key: &str, err: serde_json::Error) -> ExError {
    ExError::new(ExErrorKind::Serialization)
        .with_op(operation.to_string())
        .with_entity_id(key)
        .with_message(format!("Failed to serialize snapshot: {}", err))
}

/// Create a corrupt-snapshot error describing a
/// [`SnapshotLoad::Corrupt`](crate::snapshot::SnapshotLoad) outcome
pub fn snapshot_corrupt(key: &str, reason: &str) -> ExError {
    ExError::new(ExErrorKind::SnapshotCorrupt)
        .with_op("snapshot_load")
        .with_entity_id(key)
        .with_message(reason.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_kind() {
        let err = io_error(
            "snapshot_save",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.kind(), ExErrorKind::Io);
        assert_eq!(err.op(), Some("snapshot_save"));
    }

    #[test]
    fn test_internal_error_kind() {
        let err = internal_error("atomic_write", "no file name");
        assert_eq!(err.kind(), ExErrorKind::Internal);
        assert_eq!(err.op(), Some("atomic_write"));
    }

    #[test]
    fn test_snapshot_corrupt_carries_key() {
        let err = snapshot_corrupt("catalog", "key mismatch");
        assert_eq!(err.code(), "ERR_SNAPSHOT_CORRUPT");
        assert_eq!(err.entity_id(), Some("catalog"));
    }
}
