//! Schedule command: resolve a query and sync its timetable

use clap::Args;
use pallada_core::diff::render_change_summary;
use pallada_core::model::{LessonSlot, ScheduleModel, Section};
use pallada_engine::{SyncPolicy, SyncResult};

use super::GlobalArgs;

#[derive(Debug, Args)]
pub struct ScheduleArgs {
    /// Group or professor name (Cyrillic or Latin)
    pub query: String,

    /// Fetch the page even when a stored snapshot exists
    #[arg(long)]
    pub refresh: bool,

    /// Print the sync result as JSON
    #[arg(long)]
    pub json: bool,
}

fn section_title(section: Section) -> &'static str {
    match section {
        Section::Regular => "Lessons",
        Section::Session => "Session",
        Section::Consultation => "Consultations",
    }
}

fn slot_line(slot: &LessonSlot) -> String {
    let when = match slot.week_number {
        Some(week) => format!("w{} {} {}", week, slot.day_name, slot.lesson_time),
        None => format!("{} {}", slot.day_name, slot.lesson_time),
    };
    format!("  {:<32} {}", when, slot.render())
}

fn print_model(model: &ScheduleModel) {
    for section in Section::ALL {
        let slots = model.section(section);
        if slots.is_empty() {
            continue;
        }
        println!("{} ({}):", section_title(section), slots.len());
        for slot in slots {
            println!("{}", slot_line(slot));
        }
    }
}

fn print_result(result: &SyncResult) {
    println!(
        "{} ({}) [{}, {}]",
        result.model.subject_name,
        result.model.period_label,
        result.source,
        result.source_date.format("%Y-%m-%d %H:%M:%S UTC")
    );
    print_model(&result.model);
    if !result.changes.is_empty() {
        println!();
        print!("{}", render_change_summary(&result.changes));
    }
}

pub fn execute(global: &GlobalArgs, args: ScheduleArgs) -> Result<(), Box<dyn std::error::Error>> {
    let sync = global.synchronizer()?;
    let fetcher = super::fetcher(sync.config())?;
    let policy = if args.refresh {
        SyncPolicy::Refresh
    } else {
        SyncPolicy::CacheFirst
    };

    let (entity, result) = sync.sync_query(&args.query, fetcher.as_ref(), policy)?;
    tracing::debug!(entity_id = entity.id, source = %result.source, "schedule ready");

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_result(&result);
    }
    Ok(())
}
