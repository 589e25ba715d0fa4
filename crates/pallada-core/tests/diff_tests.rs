#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Schedule diff scenarios and properties.

use std::collections::HashSet;

use pallada_core::diff::{diff, render_change_summary, Change, FIELD_LESSON};
use pallada_core::model::schedule::assign_ordinals;
use pallada_core::model::{EntityType, LessonSlot, LessonTime, ScheduleModel, Section};
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn slot(week: u32, day: &str, range: &str, subject: &str) -> LessonSlot {
    LessonSlot {
        day_name: day.to_string(),
        lesson_time: LessonTime::new(1, range),
        subject: subject.to_string(),
        lesson_type: Some("Лекция".to_string()),
        location: "Корпус Н / Н 101".to_string(),
        teacher_or_group: "Иванов И.И.".to_string(),
        subgroup: None,
        week_number: Some(week),
    }
}

fn group_model(lessons: Vec<LessonSlot>) -> ScheduleModel {
    let mut model = ScheduleModel::new(EntityType::Group, "ИВ-21", "2 семестр 2024/2025");
    model.lessons = lessons;
    model
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn test_subject_change_yields_single_change() {
    let old = group_model(vec![slot(1, "Понедельник", "09:00-10:30", "Math")]);
    let new = group_model(vec![slot(1, "Понедельник", "09:00-10:30", "Physics")]);

    let changes = diff(&old, &new);
    assert_eq!(
        changes,
        vec![Change {
            section: Section::Regular,
            week_number: Some(1),
            day_name: "Понедельник".to_string(),
            lesson_time: LessonTime::new(1, "09:00-10:30"),
            field: "subject".to_string(),
            old_value: Some("Math".to_string()),
            new_value: Some("Physics".to_string()),
        }]
    );
}

#[test]
fn test_added_slot_yields_single_lesson_change() {
    let old = group_model(vec![slot(1, "Понедельник", "09:00-10:30", "Math")]);
    let new = group_model(vec![
        slot(1, "Понедельник", "09:00-10:30", "Math"),
        slot(1, "Понедельник", "10:40-12:10", "Physics"),
    ]);

    let changes = diff(&old, &new);
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].field, FIELD_LESSON);
    assert_eq!(changes[0].old_value, None);
    assert!(changes[0].new_value.as_deref().unwrap().starts_with("Physics"));
}

#[test]
fn test_removed_slot_yields_single_lesson_change() {
    let old = group_model(vec![
        slot(1, "Понедельник", "09:00-10:30", "Math"),
        slot(2, "Среда", "09:00-10:30", "Physics"),
    ]);
    let new = group_model(vec![slot(1, "Понедельник", "09:00-10:30", "Math")]);

    let changes = diff(&old, &new);
    assert_eq!(changes.len(), 1);
    assert!(changes[0].is_removal());
    assert_eq!(changes[0].week_number, Some(2));
}

#[test]
fn test_reordered_collection_is_not_a_change() {
    let lessons = vec![
        slot(1, "Понедельник", "09:00-10:30", "Math"),
        slot(1, "Вторник", "09:00-10:30", "Physics"),
        slot(2, "Среда", "10:40-12:10", "History"),
    ];
    let old = group_model(lessons.clone());
    let mut reversed = lessons;
    reversed.reverse();
    let new = group_model(reversed);

    assert!(diff(&old, &new).is_empty());
    assert!(old.same_timetable(&new));
}

#[test]
fn test_diff_does_not_mutate_inputs() {
    let old = group_model(vec![slot(1, "Понедельник", "09:00-10:30", "Math")]);
    let new = group_model(vec![slot(1, "Вторник", "09:00-10:30", "Math")]);
    let (old_copy, new_copy) = (old.clone(), new.clone());
    let _ = diff(&old, &new);
    assert_eq!(old, old_copy);
    assert_eq!(new, new_copy);
}

#[test]
fn test_summary_mentions_every_change() {
    let old = group_model(vec![slot(1, "Понедельник", "09:00-10:30", "Math")]);
    let new = group_model(vec![slot(1, "Понедельник", "09:00-10:30", "Physics")]);
    let summary = render_change_summary(&diff(&old, &new));
    assert!(summary.contains("Math → Physics"));
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

const DAYS: [&str; 3] = ["Понедельник", "Вторник", "Среда"];
const RANGES: [&str; 2] = ["09:00-10:30", "10:40-12:10"];
const SUBJECTS: [&str; 3] = ["Math", "Physics", "History"];

fn arb_slot() -> impl Strategy<Value = LessonSlot> {
    (
        1u32..=2,
        0..DAYS.len(),
        0..RANGES.len(),
        0..SUBJECTS.len(),
        proptest::option::of(prop_oneof![Just("Лекция"), Just("Практика")]),
        proptest::option::of(Just("1 подгруппа")),
    )
        .prop_map(|(week, day, range, subject, kind, subgroup)| LessonSlot {
            day_name: DAYS[day].to_string(),
            lesson_time: LessonTime::new(0, RANGES[range]),
            subject: SUBJECTS[subject].to_string(),
            lesson_type: kind.map(String::from),
            location: "Корпус Н / Н 101".to_string(),
            teacher_or_group: "Иванов И.И.".to_string(),
            subgroup: subgroup.map(String::from),
            week_number: Some(week),
        })
}

fn arb_model() -> impl Strategy<Value = ScheduleModel> {
    (
        proptest::collection::vec(arb_slot(), 0..8),
        proptest::collection::vec(arb_slot(), 0..3),
    )
        .prop_map(|(mut lessons, mut session)| {
            for s in &mut session {
                s.week_number = None;
            }
            assign_ordinals(&mut lessons);
            assign_ordinals(&mut session);
            let mut model = group_model(lessons);
            model.session_lessons = session;
            model
        })
}

/// Models built by hand, where slots may share a key
fn arb_unnumbered_model() -> impl Strategy<Value = ScheduleModel> {
    proptest::collection::vec(arb_slot(), 0..8).prop_map(group_model)
}

proptest! {
    #[test]
    fn prop_diff_with_self_is_empty(model in arb_model()) {
        prop_assert!(diff(&model, &model).is_empty());
    }

    #[test]
    fn prop_swapped_diff_is_reversed_set(a in arb_model(), b in arb_model()) {
        let forward: HashSet<Change> = diff(&a, &b).into_iter().collect();
        let backward: HashSet<Change> = diff(&b, &a).iter().map(Change::reversed).collect();
        prop_assert_eq!(forward, backward);
    }

    #[test]
    fn prop_empty_diff_iff_same_timetable(a in arb_model(), b in arb_model()) {
        prop_assert_eq!(diff(&a, &b).is_empty(), a.same_timetable(&b));
    }

    #[test]
    fn prop_repeated_keys_empty_diff_iff_same_timetable(
        a in arb_unnumbered_model(),
        b in arb_unnumbered_model(),
    ) {
        prop_assert_eq!(diff(&a, &b).is_empty(), a.same_timetable(&b));
    }

    #[test]
    fn prop_repeated_keys_shuffled_is_empty(a in arb_unnumbered_model()) {
        let mut b = a.clone();
        b.lessons.reverse();
        prop_assert!(diff(&a, &b).is_empty());
    }

    #[test]
    fn prop_repeated_keys_swapped_diff_is_reversed_set(
        a in arb_unnumbered_model(),
        b in arb_unnumbered_model(),
    ) {
        let forward: HashSet<Change> = diff(&a, &b).into_iter().collect();
        let backward: HashSet<Change> = diff(&b, &a).iter().map(Change::reversed).collect();
        prop_assert_eq!(forward, backward);
    }
}
