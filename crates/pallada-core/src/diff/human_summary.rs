//! Human-readable summary renderer for schedule diffs.

use crate::diff::model::Change;
use crate::model::Section;

fn heading(section: Section) -> &'static str {
    match section {
        Section::Regular => "Weekly lessons",
        Section::Session => "Session",
        Section::Consultation => "Consultations",
    }
}

fn position(change: &Change) -> String {
    match change.week_number {
        Some(week) => format!("week {}, {} {}", week, change.day_name, change.lesson_time),
        None => format!("{} {}", change.day_name, change.lesson_time),
    }
}

fn value(v: &Option<String>) -> &str {
    v.as_deref().unwrap_or("(none)")
}

/// Render a Markdown summary of a change list, grouped by section.
///
/// Informational only; the structured [`Change`] list is authoritative.
pub fn render_change_summary(changes: &[Change]) -> String {
    let mut out = String::new();
    out.push_str("## Schedule Changes\n\n");

    if changes.is_empty() {
        out.push_str("_No changes detected._\n");
        return out;
    }

    for section in Section::ALL {
        let in_section: Vec<&Change> = changes.iter().filter(|c| c.section == section).collect();
        if in_section.is_empty() {
            continue;
        }
        out.push_str(&format!("### {} ({})\n\n", heading(section), in_section.len()));
        for change in in_section {
            let line = if change.is_addition() {
                format!("- **Added** {}: {}\n", position(change), value(&change.new_value))
            } else if change.is_removal() {
                format!("- **Removed** {}: {}\n", position(change), value(&change.old_value))
            } else {
                format!(
                    "- **{}** changed at {}: {} → {}\n",
                    change.field,
                    position(change),
                    value(&change.old_value),
                    value(&change.new_value)
                )
            };
            out.push_str(&line);
        }
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::model::FIELD_LESSON;
    use crate::model::LessonTime;

    fn change(section: Section, field: &str, old: Option<&str>, new: Option<&str>) -> Change {
        Change {
            section,
            week_number: (section == Section::Regular).then_some(2),
            day_name: "Среда".into(),
            lesson_time: LessonTime::new(1, "10:40-12:10"),
            field: field.into(),
            old_value: old.map(String::from),
            new_value: new.map(String::from),
        }
    }

    #[test]
    fn test_summary_empty() {
        let s = render_change_summary(&[]);
        assert!(s.contains("No changes detected"));
    }

    #[test]
    fn test_summary_field_change() {
        let s = render_change_summary(&[change(
            Section::Regular,
            "subject",
            Some("Math"),
            Some("Physics"),
        )]);
        assert!(s.contains("### Weekly lessons (1)"));
        assert!(s.contains("**subject** changed at week 2, Среда 10:40-12:10: Math → Physics"));
    }

    #[test]
    fn test_summary_groups_by_section() {
        let s = render_change_summary(&[
            change(Section::Session, FIELD_LESSON, Some("Exam"), None),
            change(Section::Regular, FIELD_LESSON, None, Some("Math")),
        ]);
        let weekly = s.find("Weekly lessons").unwrap();
        let session = s.find("### Session").unwrap();
        assert!(weekly < session);
        assert!(s.contains("**Removed** Среда 10:40-12:10: Exam"));
        assert!(s.contains("**Added** week 2, Среда 10:40-12:10: Math"));
        assert!(!s.contains("Consultations"));
    }
}
