pub mod session;

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use tracing::{info, level_filters::LevelFilter};

use crate::{
    config::AppConfig,
    utils::{dir::application_dir, logging::enable_logging},
    workbook::{
        reference::load_reference,
        workday::{mark_day, DayEvent, DayMark},
        REFERENCE_SHEET, TIMESHEET_SHEET, WORKDAY_SHEET,
    },
};

#[derive(Parser, Debug)]
#[command(name = "Timesheet", version, long_about = None)]
#[command(about = "Terminal stopwatch that books worked time into an Excel timesheet", long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(long, help = "Mirror logs to stderr")]
    log: bool,
}

#[derive(Subcommand, Debug)]
#[command(version, about, long_about = None)]
enum Commands {
    #[command(about = "Select the workbook used for reference data and bookings")]
    Use {
        #[arg(help = "Path to an .xlsx workbook matching the expected structure")]
        path: PathBuf,
    },
    #[command(about = "Show the currently configured workbook")]
    Status,
    #[command(about = "List the projects and work types from the reference sheet")]
    List,
    #[command(about = "Run the interactive stopwatch")]
    Track {
        #[arg(
            long,
            help = "Project to book on. Defaults to the first one in the reference sheet"
        )]
        project: Option<String>,
        #[arg(
            long = "work-type",
            help = "Work type to book. Defaults to the first one in the reference sheet"
        )]
        work_type: Option<String>,
    },
    #[command(about = "Mark the start or the end of the working day on the workday sheet")]
    Day {
        #[command(subcommand)]
        event: DayCommand,
    },
    #[command(about = "Print the workbook structure this tool expects")]
    Requirements,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum DayCommand {
    #[command(about = "Record when the working day started")]
    Start,
    #[command(about = "Record when the working day ended, together with the total")]
    End,
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let app_dir = application_dir()?;
    let logging_level = if args.log {
        Some(LevelFilter::DEBUG)
    } else {
        None
    };
    enable_logging(&app_dir, logging_level, args.log)?;

    match args.commands {
        Commands::Use { path } => select_workbook(&app_dir, path),
        Commands::Status => show_status(&app_dir),
        Commands::List => list_reference(&app_dir),
        Commands::Track { project, work_type } => {
            session::run_track(&app_dir, project, work_type).await
        }
        Commands::Day { event } => mark_day_command(&app_dir, event),
        Commands::Requirements => {
            print_requirements();
            Ok(())
        }
    }
}

/// Validates the workbook by loading its reference data before anything is
/// persisted. A failed load leaves the previous configuration untouched.
fn select_workbook(app_dir: &Path, path: PathBuf) -> Result<()> {
    let path = path.canonicalize().unwrap_or(path);
    let reference = load_reference(&path)?;
    reference.ensure_usable()?;

    let mut config = AppConfig::load(app_dir);
    config.workbook_path = Some(path.clone());
    config.save(app_dir)?;

    info!("Selected workbook {path:?}");
    println!("Using workbook {}", path.display());
    println!(
        "{} projects, {} work types",
        reference.projects.len(),
        reference.work_types.len()
    );
    Ok(())
}

fn show_status(app_dir: &Path) -> Result<()> {
    let config = AppConfig::load(app_dir);
    match config.workbook_path {
        Some(path) if path.exists() => println!("Workbook: {}", path.display()),
        Some(path) => println!(
            "Workbook: {} (file no longer exists, pick a new one with `timesheet use`)",
            path.display()
        ),
        None => println!("No workbook selected. Pick one with `timesheet use <file.xlsx>`"),
    }
    Ok(())
}

fn list_reference(app_dir: &Path) -> Result<()> {
    let path = configured_workbook(app_dir)?;
    let reference = load_reference(&path)?;
    reference.ensure_usable()?;

    println!("Projects:");
    for project in &reference.projects {
        println!("  {project}");
    }
    println!("Work types:");
    for work_type in &reference.work_types {
        println!("  {work_type}");
    }
    Ok(())
}

fn mark_day_command(app_dir: &Path, event: DayCommand) -> Result<()> {
    let path = configured_workbook(app_dir)?;
    let event = match event {
        DayCommand::Start => DayEvent::Start,
        DayCommand::End => DayEvent::End,
    };
    match mark_day(&path, event, Local::now())? {
        DayMark::Recorded { .. } => match event {
            DayEvent::Start => println!("Day start recorded"),
            DayEvent::End => println!("Day end and total recorded"),
        },
        DayMark::SheetAbsent => println!(
            "The workbook has no '{WORKDAY_SHEET}' sheet, nothing was recorded"
        ),
    }
    Ok(())
}

fn print_requirements() {
    println!(
        "The workbook must contain sheet '{REFERENCE_SHEET}' with two columns\n\
         starting at row 2: project and work type.\n\
         \n\
         It also needs sheet '{TIMESHEET_SHEET}' where finished runs are appended:\n\
         date, project, work type, duration (time format).\n\
         \n\
         Optionally, sheet '{WORKDAY_SHEET}' tracks the working day with columns:\n\
         date, day start, day end, total."
    );
}

pub(crate) fn configured_workbook(app_dir: &Path) -> Result<PathBuf> {
    let config = AppConfig::load(app_dir);
    let Some(path) = config.workbook_path else {
        bail!("No workbook selected. Pick one with `timesheet use <file.xlsx>`");
    };
    Ok(path)
}
