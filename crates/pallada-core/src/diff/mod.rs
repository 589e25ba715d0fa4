//! Schedule diff engine.
//!
//! Compares two versions of a [`ScheduleModel`](crate::model::ScheduleModel)
//! and produces an ordered list of [`Change`] records.
//!
//! ## Entry point
//!
//! ```
//! use pallada_core::diff::{diff, render_change_summary};
//! use pallada_core::model::{EntityType, ScheduleModel};
//!
//! let old = ScheduleModel::new(EntityType::Group, "ИВ-21", "1 семестр");
//! let new = old.clone();
//! let changes = diff(&old, &new);
//! assert!(changes.is_empty());
//! let summary = render_change_summary(&changes);
//! assert!(summary.contains("No changes"));
//! ```
//!
//! ## Guarantees
//!
//! - **Determinism**: identical inputs produce identical change lists.
//! - **Semantic equality**: the list is empty iff the two models are
//!   timetable-equal; slot order within a collection is irrelevant.
//! - **Section isolation**: slots are only ever matched against slots of the
//!   same section.

pub mod engine;
pub mod human_summary;
pub mod model;

pub use engine::diff;
pub use human_summary::render_change_summary;
pub use model::{Change, FIELD_LESSON};
