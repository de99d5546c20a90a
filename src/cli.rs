use crate::sort::SortKey;
use crate::types::{Severity, Status};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

const TAGLINE: &str = "Admin dashboard for the StrikeLog bug tracker";

#[derive(Parser, Debug)]
#[command(name = "strikelog")]
#[command(version)]
#[command(about = TAGLINE, long_about = None)]
pub struct Args {
    /// Read bugs from a JSON export instead of the backend
    #[arg(short, long, global = true, conflicts_with = "url")]
    pub file: Option<PathBuf>,

    /// Backend base URL
    #[arg(long, global = true, env = "STRIKELOG_API_URL")]
    pub url: Option<String>,

    /// HTTP timeout in seconds
    #[arg(long, global = true, default_value_t = 30)]
    pub timeout: u64,

    /// Debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show stats, active/completed tables and weekly charts
    Dashboard(DashboardArgs),

    /// List the bugs one user reported
    Mine(MineArgs),

    /// Report a new bug
    Submit(SubmitArgs),

    /// Change a bug's status
    SetStatus {
        id: String,
        #[arg(value_parser = parse_status)]
        status: Status,
    },

    /// Mark a resolved bug as fixed (Closed)
    Close { id: String },

    /// Move a closed bug back to In Progress
    Reopen { id: String },

    /// Delete a bug report
    Remove { id: String },

    /// Print severity weights and the status lifecycle
    Legend,
}

#[derive(clap::Args, Debug, Default)]
pub struct DashboardArgs {
    /// Column header click; repeat to toggle direction
    #[arg(long, value_enum)]
    pub sort: Vec<SortKey>,

    /// Last day of the weekly window (defaults to today, local time)
    #[arg(long, value_parser = parse_date)]
    pub today: Option<NaiveDate>,

    /// Output JSON instead of tables
    #[arg(long)]
    pub json: bool,

    /// Print stat cards and the severity histogram only
    #[arg(long)]
    pub summary: bool,

    /// Exit non-zero when an active Blocker exists
    #[arg(long)]
    pub fail_on_blockers: bool,
}

#[derive(clap::Args, Debug)]
pub struct MineArgs {
    /// Reporter name, as stored on each bug
    #[arg(long, env = "STRIKELOG_USER")]
    pub reporter: String,

    /// Column header click; repeat to toggle direction
    #[arg(long, value_enum)]
    pub sort: Vec<SortKey>,

    /// Output JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(clap::Args, Debug)]
pub struct SubmitArgs {
    #[arg(long)]
    pub title: String,

    #[arg(long)]
    pub description: String,

    /// Reporter name (defaults to $STRIKELOG_USER)
    #[arg(long, env = "STRIKELOG_USER")]
    pub reporter: String,

    #[arg(long, value_parser = parse_severity, default_value = "Medium")]
    pub severity: Severity,

    /// File or path the bug was observed in
    #[arg(long)]
    pub affected_file: Option<String>,
}

fn parse_severity(raw: &str) -> Result<Severity, String> {
    match Severity::parse(raw) {
        Severity::Unclassified => Err(format!(
            "unknown severity '{}' (expected Blocker, Critical, High, Medium or Low)",
            raw
        )),
        severity => Ok(severity),
    }
}

fn parse_status(raw: &str) -> Result<Status, String> {
    match Status::parse(raw) {
        Status::Unclassified => Err(format!(
            "unknown status '{}' (expected Open, \"In Progress\", Resolved or Closed)",
            raw
        )),
        status => Ok(status),
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| format!("{} (expected YYYY-MM-DD)", e))
}

pub fn parse() -> Args {
    Args::parse()
}
