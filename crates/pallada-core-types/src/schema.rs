//! Canonical schema constants for structured logging and events
//!
//! These constants ensure consistency across all logging and error reporting.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";

// Entity identifiers
pub const FIELD_ENTITY_ID: &str = "entity_id";
pub const FIELD_ENTITY_TYPE: &str = "entity_type";
pub const FIELD_SNAPSHOT_KEY: &str = "snapshot_key";
pub const FIELD_URL: &str = "url";

// Collection sizes
pub const FIELD_INDEX_LEN: &str = "index_len";
pub const FIELD_LESSON_COUNT: &str = "lesson_count";
pub const FIELD_CHANGE_COUNT: &str = "change_count";

// Sync classification
pub const FIELD_SOURCE: &str = "source";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
pub const EVENT_SKIP: &str = "skip";
