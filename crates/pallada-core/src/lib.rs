//! Pallada Core - timetable domain kernel
//!
//! This crate holds everything that is pure over already-fetched data:
//! - Entity and schedule models
//! - The entity index and its fuzzy resolver (Cyrillic/Latin tolerant)
//! - The portal page parser producing a canonical [`ScheduleModel`]
//! - The schedule diff engine and its human summary
//! - The error and logging facilities shared by the other crates
//!
//! Network access and persistence live in `pallada-store` and
//! `pallada-engine`.

pub mod diff;
pub mod errors;
pub mod index;
pub mod logging_facility;
pub mod model;
pub mod parse;

/// Canonical log field and event names, re-exported for the logging macros
pub use pallada_core_types as core_types;

// Re-export commonly used types
pub use diff::{diff, render_change_summary, Change};
pub use errors::{ExError, ExErrorKind, Result, TimetableError};
pub use index::{build_index, resolve, EntityIndex};
pub use model::{Entity, EntityType, LessonSlot, LessonTime, ScheduleModel, Section, Source};
pub use parse::build_schedule;
