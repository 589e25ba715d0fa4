use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder the portal shows for an empty cell
pub const NOT_AVAILABLE: &str = "N/A";

/// Time of a lesson within its day.
///
/// `ordinal` numbers parallel lessons sharing the same textual range on the
/// same day (1 for the first line, 2 for the second, ...), which keeps the
/// slot key unique when subgroups meet at the same time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LessonTime {
    pub ordinal: u32,
    pub range: String,
}

impl LessonTime {
    pub fn new(ordinal: u32, range: impl Into<String>) -> Self {
        Self {
            ordinal,
            range: range.into(),
        }
    }
}

impl fmt::Display for LessonTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ordinal > 1 {
            write!(f, "{} #{}", self.range, self.ordinal)
        } else {
            f.write_str(&self.range)
        }
    }
}

/// Join key used to match slots across two schedule versions
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotKey {
    pub day_name: String,
    pub lesson_time: LessonTime,
    pub week_number: Option<u32>,
}

/// One lesson occurrence.
///
/// Field order matters: the derived `Ord` is only used to compare
/// collections as multisets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LessonSlot {
    pub day_name: String,
    pub lesson_time: LessonTime,
    pub subject: String,
    pub lesson_type: Option<String>,
    pub location: String,
    /// Professor name on group pages, comma-joined group names on professor pages
    pub teacher_or_group: String,
    pub subgroup: Option<String>,
    /// Present for regular weekly lessons only
    pub week_number: Option<u32>,
}

impl LessonSlot {
    pub fn key(&self) -> SlotKey {
        SlotKey {
            day_name: self.day_name.clone(),
            lesson_time: self.lesson_time.clone(),
            week_number: self.week_number,
        }
    }

    /// Comparable (non-key) fields as `(name, value)` pairs, in the order
    /// the diff engine reports them.
    pub fn fields(&self) -> [(&'static str, Option<&str>); 5] {
        [
            ("subject", Some(self.subject.as_str())),
            ("lesson_type", self.lesson_type.as_deref()),
            ("location", Some(self.location.as_str())),
            ("teacher_or_group", Some(self.teacher_or_group.as_str())),
            ("subgroup", self.subgroup.as_deref()),
        ]
    }

    /// One-line human rendering used in whole-slot change records
    pub fn render(&self) -> String {
        let mut out = self.subject.clone();
        if let Some(kind) = &self.lesson_type {
            out.push_str(&format!(" ({})", kind));
        }
        if let Some(sub) = &self.subgroup {
            out.push_str(&format!(" [{}]", sub));
        }
        out.push_str(&format!(", {}, {}", self.location, self.teacher_or_group));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot() -> LessonSlot {
        LessonSlot {
            day_name: "Понедельник".into(),
            lesson_time: LessonTime::new(1, "09:00-10:30"),
            subject: "Math".into(),
            lesson_type: Some("Лекция".into()),
            location: "Корпус Н / 101".into(),
            teacher_or_group: "Ivanov I.I.".into(),
            subgroup: None,
            week_number: Some(1),
        }
    }

    #[test]
    fn test_render_slot() {
        assert_eq!(
            slot().render(),
            "Math (Лекция), Корпус Н / 101, Ivanov I.I."
        );
    }

    #[test]
    fn test_lesson_time_display_hides_first_ordinal() {
        assert_eq!(LessonTime::new(1, "09:00-10:30").to_string(), "09:00-10:30");
        assert_eq!(LessonTime::new(2, "09:00-10:30").to_string(), "09:00-10:30 #2");
    }

    #[test]
    fn test_key_ignores_content_fields() {
        let a = slot();
        let mut b = slot();
        b.subject = "Physics".into();
        assert_eq!(a.key(), b.key());
        assert_ne!(a, b);
    }
}
