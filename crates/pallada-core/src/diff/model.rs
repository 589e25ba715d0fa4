//! Schedule diff output types.

use serde::{Deserialize, Serialize};

use crate::model::{LessonTime, Section};

/// Field name used when a whole slot appears or disappears
pub const FIELD_LESSON: &str = "lesson";

/// One atomic difference between two schedule versions.
///
/// Either a single differing field of a slot present in both versions, or
/// a whole slot (`field == "lesson"`) that exists on one side only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Change {
    pub section: Section,
    pub week_number: Option<u32>,
    pub day_name: String,
    pub lesson_time: LessonTime,
    pub field: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
}

impl Change {
    /// Slot present in the new version only
    pub fn is_addition(&self) -> bool {
        self.field == FIELD_LESSON && self.old_value.is_none()
    }

    /// Slot present in the old version only
    pub fn is_removal(&self) -> bool {
        self.field == FIELD_LESSON && self.new_value.is_none()
    }

    /// Same change seen from the other direction
    pub fn reversed(&self) -> Change {
        Change {
            old_value: self.new_value.clone(),
            new_value: self.old_value.clone(),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn change(field: &str, old: Option<&str>, new: Option<&str>) -> Change {
        Change {
            section: Section::Regular,
            week_number: Some(1),
            day_name: "Понедельник".into(),
            lesson_time: LessonTime::new(1, "09:00-10:30"),
            field: field.into(),
            old_value: old.map(String::from),
            new_value: new.map(String::from),
        }
    }

    #[test]
    fn test_addition_and_removal_flags() {
        assert!(change(FIELD_LESSON, None, Some("Math")).is_addition());
        assert!(change(FIELD_LESSON, Some("Math"), None).is_removal());
        assert!(!change("subject", None, Some("Math")).is_addition());
    }

    #[test]
    fn test_reversed_swaps_values() {
        let c = change("subject", Some("Math"), Some("Physics"));
        let r = c.reversed();
        assert_eq!(r.old_value.as_deref(), Some("Physics"));
        assert_eq!(r.new_value.as_deref(), Some("Math"));
        assert_eq!(r.reversed(), c);
    }
}
