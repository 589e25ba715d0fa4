//! Schedule diff computation.
//!
//! The entry point is [`diff`], which joins the slots of two schedule
//! versions on `(day_name, lesson_time, week_number)` within each section.
//!
//! Parsed models carry unique keys (see
//! [`assign_ordinals`](crate::model::schedule::assign_ordinals)), but any
//! model is accepted: slots sharing a key are first matched exactly, then
//! the leftovers are paired in order.

use std::collections::HashMap;
use std::time::Instant;

use crate::diff::model::{Change, FIELD_LESSON};
use crate::model::{LessonSlot, ScheduleModel, Section, SlotKey};
use crate::{log_op_end, log_op_start};

/// For each slot of `new`, the index of the `old` slot it is compared with
fn pair_slots(old: &[LessonSlot], new: &[LessonSlot]) -> Vec<Option<usize>> {
    let mut unmatched: HashMap<SlotKey, Vec<usize>> = HashMap::new();
    for (i, slot) in old.iter().enumerate() {
        unmatched.entry(slot.key()).or_default().push(i);
    }

    let mut pairs = vec![None; new.len()];
    for (j, slot) in new.iter().enumerate() {
        if let Some(candidates) = unmatched.get_mut(&slot.key()) {
            if let Some(pos) = candidates.iter().position(|&i| old[i] == *slot) {
                pairs[j] = Some(candidates.remove(pos));
            }
        }
    }
    for (j, slot) in new.iter().enumerate() {
        if pairs[j].is_some() {
            continue;
        }
        if let Some(candidates) = unmatched.get_mut(&slot.key()) {
            if !candidates.is_empty() {
                pairs[j] = Some(candidates.remove(0));
            }
        }
    }
    pairs
}

fn change_for(
    section: Section,
    slot: &LessonSlot,
    field: &str,
    old_value: Option<String>,
    new_value: Option<String>,
) -> Change {
    Change {
        section,
        week_number: slot.week_number,
        day_name: slot.day_name.clone(),
        lesson_time: slot.lesson_time.clone(),
        field: field.to_string(),
        old_value,
        new_value,
    }
}

fn diff_section(section: Section, old: &[LessonSlot], new: &[LessonSlot], out: &mut Vec<Change>) {
    let pairs = pair_slots(old, new);
    let mut paired_old = vec![false; old.len()];

    for (slot, pair) in new.iter().zip(&pairs) {
        match pair {
            None => out.push(change_for(
                section,
                slot,
                FIELD_LESSON,
                None,
                Some(slot.render()),
            )),
            Some(i) => {
                paired_old[*i] = true;
                let previous = &old[*i];
                for ((field, before), (_, after)) in previous.fields().into_iter().zip(slot.fields())
                {
                    if before != after {
                        out.push(change_for(
                            section,
                            slot,
                            field,
                            before.map(String::from),
                            after.map(String::from),
                        ));
                    }
                }
            }
        }
    }

    for (slot, paired) in old.iter().zip(&paired_old) {
        if !paired {
            out.push(change_for(
                section,
                slot,
                FIELD_LESSON,
                Some(slot.render()),
                None,
            ));
        }
    }
}

/// Compare two schedule versions.
///
/// Sections are reported in order regular, session, consultation. Within a
/// section, additions and field changes follow `new`'s slot order, then
/// removals follow `old`'s slot order. Neither model is modified.
///
/// The result is empty exactly when `old.same_timetable(new)`.
pub fn diff(old: &ScheduleModel, new: &ScheduleModel) -> Vec<Change> {
    let start = Instant::now();
    log_op_start!("diff", subject = %new.subject_name);

    let mut changes = Vec::new();
    for section in Section::ALL {
        diff_section(section, old.section(section), new.section(section), &mut changes);
    }

    log_op_end!(
        "diff",
        duration_ms = start.elapsed().as_millis() as u64,
        change_count = changes.len()
    );
    changes
}
