//! Diff command: compare two saved timetable pages offline

use clap::Args;
use pallada_core::diff::{diff, render_change_summary};
use pallada_core::model::{EntityType, ScheduleModel};
use pallada_core::parse::build_schedule;
use pallada_core::{ExError, ExErrorKind};
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct DiffArgs {
    /// Older page
    pub old: PathBuf,

    /// Newer page
    pub new: PathBuf,

    /// Page owner: group or professor
    #[arg(long = "type", default_value = "group", value_parser = parse_entity_type)]
    pub entity_type: EntityType,

    /// Print the change list as JSON
    #[arg(long)]
    pub json: bool,
}

fn parse_entity_type(tag: &str) -> Result<EntityType, String> {
    EntityType::parse(tag).ok_or_else(|| format!("unknown entity type '{}'", tag))
}

fn read_page(path: &Path, entity_type: EntityType) -> Result<ScheduleModel, ExError> {
    let page = std::fs::read_to_string(path).map_err(|e| {
        ExError::new(ExErrorKind::Io)
            .with_op("read_page")
            .with_entity_id(path.display().to_string())
            .with_message(e.to_string())
    })?;
    build_schedule(&page, entity_type)
        .map_err(|e| ExError::from(e).with_entity_id(path.display().to_string()))
}

pub fn execute(args: DiffArgs) -> Result<(), Box<dyn std::error::Error>> {
    let old = read_page(&args.old, args.entity_type)?;
    let new = read_page(&args.new, args.entity_type)?;
    let changes = diff(&old, &new);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&changes)?);
    } else {
        print!("{}", render_change_summary(&changes));
    }
    Ok(())
}
