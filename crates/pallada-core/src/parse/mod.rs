//! Portal page → [`ScheduleModel`].
//!
//! Group and professor pages share one layout: a title, week tabs pointing
//! at per-week day blocks, an optional session tab and (professors only) an
//! optional consultation tab. Absent tabs give empty collections; a missing
//! title, day header or time header means the layout changed and the page
//! is rejected as `MalformedSource`.

mod markup;

use scraper::{ElementRef, Html};
use std::time::Instant;

use crate::errors::{Result, TimetableError};
use crate::model::lesson::NOT_AVAILABLE;
use crate::model::schedule::assign_ordinals;
use crate::model::{EntityType, LessonSlot, LessonTime, ScheduleModel};
use crate::{log_op_end, log_op_error, log_op_start};
use markup::{day_blocks, find_by_id, read_line, text_of, LineFields, Selectors, TimeLayout};

/// Subject shown for consultation lines, which carry no discipline name
pub const CONSULTATION_SUBJECT: &str = "Консультация";

/// Parse a pre-fetched portal page.
///
/// # Errors
///
/// `MalformedSource` when the title, a day header or a weekly time header
/// is missing, or the title does not have the expected shape.
pub fn build_schedule(raw_document: &str, entity_type: EntityType) -> Result<ScheduleModel> {
    let start = Instant::now();
    log_op_start!("build_schedule", entity_type = %entity_type);

    match parse_document(raw_document, entity_type) {
        Ok(model) => {
            log_op_end!(
                "build_schedule",
                duration_ms = start.elapsed().as_millis() as u64,
                lesson_count = model.lesson_count()
            );
            Ok(model)
        }
        Err(e) => {
            log_op_error!(
                "build_schedule",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            Err(e)
        }
    }
}

/// Title of a page as `(name, period)`, without parsing the timetable.
///
/// Used by the catalog crawler to name entities.
///
/// # Errors
///
/// `MalformedSource` if the title is missing or has an unexpected shape.
pub fn read_title(raw_document: &str, entity_type: EntityType) -> Result<(String, String)> {
    let doc = Html::parse_document(raw_document);
    let sel = Selectors::new()?;
    title_parts(&doc, &sel, entity_type)
}

fn title_parts(doc: &Html, sel: &Selectors, entity_type: EntityType) -> Result<(String, String)> {
    let title = doc
        .select(&sel.title)
        .next()
        .map(text_of)
        .ok_or_else(|| TimetableError::MalformedSource {
            reason: "title element not found".to_string(),
        })?;
    match entity_type {
        EntityType::Group => split_group_title(&title),
        EntityType::Professor => split_professor_title(&title),
    }
}

/// `Расписание группы "ИВ-21" 1 семестр 2024-2025 г.` → `("ИВ-21", "1 семестр 2024-2025")`
fn split_group_title(title: &str) -> Result<(String, String)> {
    let parts: Vec<&str> = title.split('"').collect();
    if parts.len() != 3 {
        return Err(TimetableError::MalformedSource {
            reason: format!("unexpected group title format: {}", title),
        });
    }
    let semester = parts[2].replace("г.", "");
    Ok((parts[1].trim().to_string(), semester.trim().to_string()))
}

/// `Иванов Иван Иванович - 2024/2025 учебный год` → `("Иванов Иван Иванович", "2024/2025 учебный год")`
fn split_professor_title(title: &str) -> Result<(String, String)> {
    let split = match title.split_once(" - ") {
        Some(pair) => Some(pair),
        None => {
            let parts: Vec<&str> = title.split('-').collect();
            (parts.len() == 2).then(|| (parts[0], parts[1]))
        }
    };
    match split {
        Some((name, period)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), period.trim().to_string()))
        }
        _ => Err(TimetableError::MalformedSource {
            reason: format!("unexpected professor title format: {}", title),
        }),
    }
}

fn to_slot(
    fields: LineFields,
    day_name: &str,
    week_number: Option<u32>,
    entity_type: EntityType,
) -> LessonSlot {
    let teacher_or_group = match entity_type {
        EntityType::Group => fields.professor,
        EntityType::Professor if fields.groups.is_empty() => NOT_AVAILABLE.to_string(),
        EntityType::Professor => fields.groups.join(", "),
    };
    LessonSlot {
        day_name: day_name.to_string(),
        lesson_time: LessonTime::new(0, fields.time),
        subject: fields.subject,
        lesson_type: fields.lesson_type,
        location: fields.location,
        teacher_or_group,
        subgroup: fields.subgroup,
        week_number,
    }
}

fn read_section(
    container: ElementRef<'_>,
    sel: &Selectors,
    layout: TimeLayout,
    week_number: Option<u32>,
    entity_type: EntityType,
    out: &mut Vec<LessonSlot>,
) -> Result<()> {
    for day in day_blocks(container, sel)? {
        for line in day.lines {
            let fields = read_line(line, sel, layout)?;
            out.push(to_slot(fields, &day.name, week_number, entity_type));
        }
    }
    Ok(())
}

fn parse_document(raw_document: &str, entity_type: EntityType) -> Result<ScheduleModel> {
    let doc = Html::parse_document(raw_document);
    let sel = Selectors::new()?;

    let (name, period) = title_parts(&doc, &sel, entity_type)?;
    let mut model = ScheduleModel::new(entity_type, name, period);

    for tab in doc.select(&sel.week_tab) {
        let label = text_of(tab);
        let week_number: u32 = label
            .split_whitespace()
            .next()
            .and_then(|w| w.parse().ok())
            .ok_or_else(|| TimetableError::MalformedSource {
                reason: format!("week tab without a week number: '{}'", label),
            })?;
        let target = tab
            .value()
            .attr("href")
            .unwrap_or_default()
            .trim_start_matches('#');
        // A tab whose pane is missing contributes nothing
        let Some(pane) = find_by_id(&doc, &sel, target) else {
            continue;
        };
        read_section(
            pane,
            &sel,
            TimeLayout::Range,
            Some(week_number),
            entity_type,
            &mut model.lessons,
        )?;
    }

    if let Some(session) = doc.select(&sel.session_tab).next() {
        read_section(
            session,
            &sel,
            TimeLayout::DateTime,
            None,
            entity_type,
            &mut model.session_lessons,
        )?;
    }

    if entity_type == EntityType::Professor {
        if let Some(consultations) = doc.select(&sel.consultation_tab).next() {
            read_section(
                consultations,
                &sel,
                TimeLayout::Range,
                None,
                entity_type,
                &mut model.consultation_lessons,
            )?;
            for slot in &mut model.consultation_lessons {
                slot.subject = CONSULTATION_SUBJECT.to_string();
                slot.lesson_type = None;
            }
        }
    }

    assign_ordinals(&mut model.lessons);
    assign_ordinals(&mut model.session_lessons);
    assign_ordinals(&mut model.consultation_lessons);

    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_group_title() {
        let (name, period) =
            split_group_title(r#"Расписание занятий группы "ИВ-21" 2 семестр 2024/2025 г."#)
                .unwrap();
        assert_eq!(name, "ИВ-21");
        assert_eq!(period, "2 семестр 2024/2025");
    }

    #[test]
    fn test_split_group_title_rejects_unquoted() {
        assert!(split_group_title("Расписание ИВ-21").is_err());
    }

    #[test]
    fn test_split_professor_title() {
        let (name, period) = split_professor_title("Проскурин Александр Валерьевич - 2024/2025 учебный год").unwrap();
        assert_eq!(name, "Проскурин Александр Валерьевич");
        assert_eq!(period, "2024/2025 учебный год");
    }

    #[test]
    fn test_split_professor_title_keeps_hyphenated_surname() {
        let (name, _) =
            split_professor_title("Иванова-Петрова Анна Сергеевна - 2024/2025").unwrap();
        assert_eq!(name, "Иванова-Петрова Анна Сергеевна");
    }

    #[test]
    fn test_missing_title_is_malformed() {
        let err = build_schedule("<html><body></body></html>", EntityType::Group).unwrap_err();
        assert!(matches!(err, TimetableError::MalformedSource { .. }));
    }
}
