//! DOM helpers over the portal's timetable markup.
//!
//! Every selector the parser relies on lives in [`Selectors`]; a change in
//! the portal layout should only ever touch this file.

use scraper::{ElementRef, Html, Selector};

use crate::errors::{Result, TimetableError};
use crate::model::lesson::NOT_AVAILABLE;

pub(crate) struct Selectors {
    pub title: Selector,
    pub week_tab: Selector,
    pub div_with_id: Selector,
    pub day: Selector,
    pub day_name: Selector,
    pub body: Selector,
    pub line: Selector,
    pub time: Selector,
    pub time_wide: Selector,
    pub time_narrow: Selector,
    pub first_div: Selector,
    pub discipline: Selector,
    pub subject: Selector,
    pub titled_link: Selector,
    pub link: Selector,
    pub professor_link: Selector,
    pub group_link: Selector,
    pub subgroup: Selector,
    pub list_item: Selector,
    pub session_tab: Selector,
    pub consultation_tab: Selector,
}

fn css(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| TimetableError::MalformedSource {
        reason: format!("invalid selector '{}': {:?}", selector, e),
    })
}

impl Selectors {
    pub fn new() -> Result<Self> {
        Ok(Self {
            title: css("h3.text-center.bold")?,
            week_tab: css("ul.nav.nav-pills.navbar-right.n_week li a")?,
            div_with_id: css("div[id]")?,
            day: css("div.day")?,
            day_name: css("div.name.text-center")?,
            body: css("div.body")?,
            line: css("div.line")?,
            time: css("div.time.text-center")?,
            time_wide: css(".hidden-xs")?,
            time_narrow: css(".visible-xs")?,
            first_div: css("div")?,
            discipline: css("div.discipline")?,
            subject: css("span.name")?,
            titled_link: css("a[title]")?,
            link: css("a")?,
            professor_link: css(r#"a[href*="/timetable/professor/"]"#)?,
            group_link: css(r#"a[href*="/timetable/group/"]"#)?,
            subgroup: css("li.bold.num_pdgrp")?,
            list_item: css("li")?,
            session_tab: css("div#session_tab")?,
            consultation_tab: css("div#consultation_tab")?,
        })
    }
}

/// Text content with runs of whitespace collapsed to single spaces
pub(crate) fn text_of(el: ElementRef<'_>) -> String {
    el.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Text content with line breaks dropped and each line trimmed,
/// so `"09:00\n  -\n  10:30"` reads `"09:00-10:30"`.
fn joined_lines(el: ElementRef<'_>) -> String {
    el.text()
        .collect::<String>()
        .lines()
        .map(str::trim)
        .collect::<String>()
}

/// How the time cell of a line is read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TimeLayout {
    /// Weekly and consultation lines: a desktop and a mobile rendering
    Range,
    /// Session lines: a single date-time string, the time is its last word
    DateTime,
}

/// Raw fields of one `div.line`, before they become a slot
#[derive(Debug, Clone, Default)]
pub(crate) struct LineFields {
    pub time: String,
    pub subject: String,
    pub location: String,
    pub professor: String,
    pub groups: Vec<String>,
    pub subgroup: Option<String>,
    pub lesson_type: Option<String>,
}

/// One day block: its name and its lesson lines
pub(crate) struct DayBlock<'a> {
    pub name: String,
    pub lines: Vec<ElementRef<'a>>,
}

pub(crate) fn find_by_id<'a>(doc: &'a Html, sel: &Selectors, id: &str) -> Option<ElementRef<'a>> {
    doc.select(&sel.div_with_id)
        .find(|el| el.value().id() == Some(id))
}

/// Day blocks under `container`.
///
/// # Errors
///
/// `MalformedSource` if a day block has no name header.
pub(crate) fn day_blocks<'a>(container: ElementRef<'a>, sel: &Selectors) -> Result<Vec<DayBlock<'a>>> {
    container
        .select(&sel.day)
        .map(|day| {
            let header = day.select(&sel.day_name).next().ok_or_else(|| {
                TimetableError::MalformedSource {
                    reason: "day block without a name header".to_string(),
                }
            })?;
            let name = text_of(header)
                .split_whitespace()
                .next()
                .unwrap_or_default()
                .to_string();
            let lines = day
                .select(&sel.body)
                .next()
                .map(|body| body.select(&sel.line).collect())
                .unwrap_or_default();
            Ok(DayBlock { name, lines })
        })
        .collect()
}

fn read_time(line: ElementRef<'_>, sel: &Selectors, layout: TimeLayout) -> Result<String> {
    let cell = line.select(&sel.time).next();
    match layout {
        TimeLayout::Range => {
            let cell = cell.ok_or_else(|| TimetableError::MalformedSource {
                reason: "lesson line without a time header".to_string(),
            })?;
            if let Some(wide) = cell.select(&sel.time_wide).next() {
                return Ok(joined_lines(wide));
            }
            if let Some(narrow) = cell.select(&sel.time_narrow).next() {
                let parts: Vec<&str> = narrow
                    .text()
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .collect();
                return Ok(parts.join("-"));
            }
            Ok(text_of(cell))
        }
        // A session line may legitimately have no time cell
        TimeLayout::DateTime => Ok(cell
            .and_then(|c| c.select(&sel.first_div).next())
            .map(text_of)
            .and_then(|t| t.split(' ').last().map(str::to_string))
            .unwrap_or_default()),
    }
}

fn parenthesized(text: &str) -> Option<String> {
    let (_, rest) = text.split_once('(')?;
    let inner = rest.split(')').next().unwrap_or(rest).trim();
    (!inner.is_empty()).then(|| inner.to_string())
}

/// Extract the fields of one lesson line.
///
/// # Errors
///
/// `MalformedSource` if a weekly or consultation line has no time header.
pub(crate) fn read_line(line: ElementRef<'_>, sel: &Selectors, layout: TimeLayout) -> Result<LineFields> {
    let time = read_time(line, sel, layout)?;
    let Some(discipline) = line.select(&sel.discipline).next() else {
        return Ok(LineFields {
            time,
            subject: NOT_AVAILABLE.to_string(),
            location: NOT_AVAILABLE.to_string(),
            professor: NOT_AVAILABLE.to_string(),
            ..LineFields::default()
        });
    };

    let subject = discipline
        .select(&sel.subject)
        .next()
        .map(text_of)
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());

    let location_link = discipline.select(&sel.titled_link).next();
    let location = location_link
        .map(|a| {
            format!(
                "{} / {}",
                a.value().attr("title").unwrap_or_default().trim(),
                text_of(a)
            )
        })
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());

    let professor = discipline
        .select(&sel.professor_link)
        .next()
        .or_else(|| {
            discipline
                .select(&sel.link)
                .find(|a| a.value().attr("title").is_none())
        })
        .map(text_of)
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());

    let groups = discipline.select(&sel.group_link).map(text_of).collect();

    let subgroup = discipline
        .select(&sel.subgroup)
        .next()
        .map(text_of)
        .filter(|s| !s.is_empty());

    let lesson_type = discipline
        .select(&sel.list_item)
        .map(text_of)
        .find_map(|t| parenthesized(&t));

    Ok(LineFields {
        time,
        subject,
        location,
        professor,
        groups,
        subgroup,
        lesson_type,
    })
}
