//! Canonical data model: catalog entities and schedules.

pub mod entity;
pub mod lesson;
pub mod schedule;

pub use entity::{Entity, EntityType, RawCatalogEntry, Source};
pub use lesson::{LessonSlot, LessonTime, SlotKey};
pub use schedule::{ScheduleModel, Section};
