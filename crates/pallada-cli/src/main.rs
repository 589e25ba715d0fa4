//! Pallada CLI
//!
//! Command-line interface for the timetable sync

use clap::{Parser, Subcommand};
use pallada_core::logging_facility::{init_with_filter, Profile};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "pallada")]
#[command(about = "Pallada - university timetable sync", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: commands::GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Find groups and professors matching a query
    Search(commands::search::SearchArgs),
    /// Show (and sync) the timetable of a group or professor
    Schedule(commands::schedule::ScheduleArgs),
    /// Compare two saved timetable pages
    Diff(commands::diff::DiffArgs),
    /// Crawl, import or export the entity catalog
    Catalog(commands::catalog::CatalogArgs),
}

fn main() {
    let cli = Cli::parse();

    let profile = if cli.global.log_json {
        Profile::Production
    } else {
        Profile::Development
    };
    init_with_filter(profile, cli.global.log_filter.as_deref());

    let result = match cli.command {
        Commands::Search(args) => commands::search::execute(&cli.global, args),
        Commands::Schedule(args) => commands::schedule::execute(&cli.global, args),
        Commands::Diff(args) => commands::diff::execute(args),
        Commands::Catalog(args) => commands::catalog::execute(&cli.global, args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
