use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use super::entity::EntityType;
use super::lesson::LessonSlot;

/// The three lesson collections of a schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Regular,
    Session,
    Consultation,
}

impl Section {
    /// All sections in diff emission order
    pub const ALL: [Section; 3] = [Section::Regular, Section::Session, Section::Consultation];
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Section::Regular => "regular",
            Section::Session => "session",
            Section::Consultation => "consultation",
        };
        f.write_str(label)
    }
}

/// Canonical timetable of one group or professor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleModel {
    pub entity_type: EntityType,
    /// Group name or person name
    pub subject_name: String,
    /// Semester (groups) or academic year (professors)
    pub period_label: String,
    pub lessons: Vec<LessonSlot>,
    #[serde(default)]
    pub session_lessons: Vec<LessonSlot>,
    /// Always empty for groups
    #[serde(default)]
    pub consultation_lessons: Vec<LessonSlot>,
}

impl ScheduleModel {
    pub fn new(
        entity_type: EntityType,
        subject_name: impl Into<String>,
        period_label: impl Into<String>,
    ) -> Self {
        Self {
            entity_type,
            subject_name: subject_name.into(),
            period_label: period_label.into(),
            lessons: Vec::new(),
            session_lessons: Vec::new(),
            consultation_lessons: Vec::new(),
        }
    }

    pub fn section(&self, section: Section) -> &[LessonSlot] {
        match section {
            Section::Regular => &self.lessons,
            Section::Session => &self.session_lessons,
            Section::Consultation => &self.consultation_lessons,
        }
    }

    pub fn lesson_count(&self) -> usize {
        self.lessons.len() + self.session_lessons.len() + self.consultation_lessons.len()
    }

    /// Timetable equality: each collection equal as an unordered multiset.
    ///
    /// Names and period labels are not compared.
    pub fn same_timetable(&self, other: &ScheduleModel) -> bool {
        Section::ALL
            .iter()
            .all(|&s| same_multiset(self.section(s), other.section(s)))
    }
}

fn same_multiset(a: &[LessonSlot], b: &[LessonSlot]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut a: Vec<&LessonSlot> = a.iter().collect();
    let mut b: Vec<&LessonSlot> = b.iter().collect();
    a.sort();
    b.sort();
    a == b
}

/// Number parallel lessons: slots sharing `(week, day, range)` get ordinals
/// 1, 2, ... in sequence order.
pub fn assign_ordinals(slots: &mut [LessonSlot]) {
    let mut seen: HashMap<(Option<u32>, String, String), u32> = HashMap::new();
    for slot in slots.iter_mut() {
        let counter = seen
            .entry((
                slot.week_number,
                slot.day_name.clone(),
                slot.lesson_time.range.clone(),
            ))
            .or_insert(0);
        *counter += 1;
        slot.lesson_time.ordinal = *counter;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::lesson::LessonTime;

    fn slot(day: &str, range: &str, subject: &str) -> LessonSlot {
        LessonSlot {
            day_name: day.into(),
            lesson_time: LessonTime::new(0, range),
            subject: subject.into(),
            lesson_type: None,
            location: "N/A".into(),
            teacher_or_group: "N/A".into(),
            subgroup: None,
            week_number: Some(1),
        }
    }

    #[test]
    fn test_same_timetable_ignores_order() {
        let mut a = ScheduleModel::new(EntityType::Group, "ИВ-21", "1 семестр");
        a.lessons = vec![slot("Пн", "09:00", "A"), slot("Вт", "09:00", "B")];
        let mut b = a.clone();
        b.lessons.reverse();
        assert!(a.same_timetable(&b));
    }

    #[test]
    fn test_same_timetable_counts_duplicates() {
        let mut a = ScheduleModel::new(EntityType::Group, "g", "p");
        a.lessons = vec![slot("Пн", "09:00", "A"), slot("Пн", "09:00", "A")];
        let mut b = a.clone();
        b.lessons.pop();
        assert!(!a.same_timetable(&b));
    }

    #[test]
    fn test_assign_ordinals_numbers_parallel_lessons() {
        let mut slots = vec![
            slot("Пн", "09:00-10:30", "A"),
            slot("Пн", "09:00-10:30", "B"),
            slot("Пн", "10:40-12:10", "C"),
            slot("Вт", "09:00-10:30", "D"),
        ];
        assign_ordinals(&mut slots);
        let ordinals: Vec<u32> = slots.iter().map(|s| s.lesson_time.ordinal).collect();
        assert_eq!(ordinals, vec![1, 2, 1, 1]);
    }
}
