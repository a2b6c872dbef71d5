//! `timetable` CLI: expand, check, merge and score meetings from JSON files.
//!
//! ## Usage
//!
//! ```sh
//! # Expand repeating meetings into single occurrences (stdin → stdout)
//! cat meetings.json | timetable expand
//!
//! # Earliest conflict in a schedule
//! timetable conflicts -i meetings.json
//!
//! # Every conflicting pair, written to a file
//! timetable conflicts --all -i meetings.json -o conflicts.json
//!
//! # Coalesce weekly rows that differ only by weekday
//! timetable merge -i meetings.json
//!
//! # Rank course sections against preferences
//! timetable score -c criteria.json -i courses.json
//!
//! # Debug logging on stderr (or set RUST_LOG)
//! timetable -v conflicts -i meetings.json
//! ```

use std::io::{self, Read};

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use clap::{Parser, Subcommand};
use serde::Serialize;
use timetable_engine::scorer::rank;
use timetable_engine::{
    find_conflicts, meetings_conflict, merge, to_single_occurrences, Conflict, Course, Meeting,
    OptimizerCriteria,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "timetable",
    version,
    about = "Recurring meeting expansion, conflict detection and course scoring"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log debug events to stderr (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Expand meetings into one entry per occurrence
    Expand {
        /// Meetings JSON array (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Report date/time conflicts between meetings
    Conflicts {
        /// Meetings JSON array (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// List every conflicting pair instead of only the earliest conflict
        #[arg(long)]
        all: bool,
    },
    /// Merge weekly meetings that differ only by weekday
    Merge {
        /// Meetings JSON array (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Score and rank course sections against preference criteria
    Score {
        /// Criteria JSON object
        #[arg(short, long)]
        criteria: String,
        /// Courses JSON array (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
}

/// One expanded occurrence.
#[derive(Serialize)]
struct OccurrenceRow<'a> {
    date_start: NaiveDate,
    date_end: NaiveDate,
    time_start: NaiveTime,
    time_end: NaiveTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<&'a str>,
}

impl<'a> From<&'a Meeting> for OccurrenceRow<'a> {
    fn from(meeting: &'a Meeting) -> Self {
        OccurrenceRow {
            date_start: meeting.date_start(),
            date_end: meeting.date_end(),
            time_start: meeting.time_start(),
            time_end: meeting.time_end(),
            location: meeting.location(),
        }
    }
}

#[derive(Serialize)]
struct ConflictReport {
    conflict: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    at: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    conflicts: Option<Vec<Conflict>>,
}

#[derive(Serialize)]
struct RankedCourse<'a> {
    crn: u32,
    course_code: &'a str,
    class_type: &'a str,
    score: f64,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Expand { input, output } => {
            let meetings = read_meetings(input.as_deref())?;
            let mut singles = Vec::new();
            for meeting in &meetings {
                singles.extend(
                    to_single_occurrences(meeting).context("Failed to expand meeting")?,
                );
            }
            debug!(meetings = meetings.len(), occurrences = singles.len(), "expanded input");
            let rows: Vec<OccurrenceRow> = singles.iter().map(OccurrenceRow::from).collect();
            write_json(output.as_deref(), &rows)?;
        }
        Commands::Conflicts { input, output, all } => {
            let meetings = read_meetings(input.as_deref())?;
            let report = if all {
                let conflicts =
                    find_conflicts(&meetings).context("Failed to check for conflicts")?;
                ConflictReport {
                    conflict: !conflicts.is_empty(),
                    at: conflicts.iter().map(|c| c.at).min(),
                    conflicts: Some(conflicts),
                }
            } else {
                let earliest =
                    meetings_conflict(&meetings).context("Failed to check for conflicts")?;
                ConflictReport {
                    conflict: earliest.is_some(),
                    at: earliest.map(|c| c.at),
                    conflicts: None,
                }
            };
            write_json(output.as_deref(), &report)?;
        }
        Commands::Merge { input, output } => {
            let meetings = read_meetings(input.as_deref())?;
            let merged = merge(&meetings);
            debug!(before = meetings.len(), after = merged.len(), "merged input");
            write_json(output.as_deref(), &merged)?;
        }
        Commands::Score {
            criteria,
            input,
            output,
        } => {
            let criteria: OptimizerCriteria =
                serde_json::from_str(&read_input(Some(criteria.as_str()))?)
                    .context("Failed to parse criteria JSON")?;
            let courses: Vec<Course> = serde_json::from_str(&read_input(input.as_deref())?)
                .context("Failed to parse courses JSON")?;
            let ranked = rank(&criteria, &courses).context("Failed to score courses")?;
            let rows: Vec<RankedCourse> = ranked
                .into_iter()
                .map(|(index, score)| {
                    let course = &courses[index];
                    RankedCourse {
                        crn: course.crn,
                        course_code: &course.course_code,
                        class_type: &course.class_type,
                        score,
                    }
                })
                .collect();
            write_json(output.as_deref(), &rows)?;
        }
    }

    Ok(())
}

/// Install the stderr subscriber. `-v` forces debug, otherwise `RUST_LOG` or `warn`.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(true)
        .init();
}

fn read_meetings(path: Option<&str>) -> Result<Vec<Meeting>> {
    let json = read_input(path)?;
    serde_json::from_str(&json).context("Failed to parse meetings JSON")
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_json<T: Serialize + ?Sized>(path: Option<&str>, value: &T) -> Result<()> {
    let mut content = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    content.push('\n');
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}
