//! Command-line surface.
//!
//! The same `Action` subcommands serve one-shot invocations and the lines
//! typed into a running `watch` session.

use std::path::PathBuf;

use chrono::{NaiveDate, NaiveTime};
use clap::{Parser, Subcommand};
use zentask_core::model::task::{parse_due_date, parse_due_time};
use zentask_core::TaskFilter;

#[derive(Parser)]
#[command(name = "zentask", about = "Dated to-do list with due-minute reminders")]
pub struct Cli {
    /// Directory holding the task database [default: ./.zentask]
    #[arg(long, env = "ZENTASK_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "ZENTASK_LOG_LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Directory for rolling log files [default: <data-dir>/logs]
    #[arg(long, env = "ZENTASK_LOG_DIR", global = true)]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    #[command(flatten)]
    Action(Action),

    /// Scan for due reminders until interrupted; reads commands from stdin
    Watch {
        /// Seconds between alarm scans (1-30)
        #[arg(long, env = "ZENTASK_SCAN_INTERVAL_SECS", default_value_t = 30)]
        scan_interval_secs: u64,
        /// Never deliver reminders (tasks are still marked notified)
        #[arg(long)]
        quiet: bool,
        /// JSON file with {"motivation", "tip"} [default: <data-dir>/motivation.json]
        #[arg(long, env = "ZENTASK_MOTIVATION_FILE")]
        motivation_file: Option<PathBuf>,
    },
}

/// Store operations, shared by one-shot subcommands and `watch` input lines.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Action {
    /// Add a task
    Add {
        /// Task text
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
        /// Due date (YYYY-MM-DD)
        #[arg(long, value_parser = parse_due_date)]
        due: Option<NaiveDate>,
        /// Due time (HH:MM); reminders need a due date as well
        #[arg(long, value_parser = parse_due_time)]
        at: Option<NaiveTime>,
    },

    /// List tasks
    #[command(alias = "ls")]
    List {
        /// Which tasks to show (all, active, completed)
        #[arg(long, short, default_value = "all", value_parser = parse_filter)]
        filter: TaskFilter,
    },

    /// Toggle a task between active and completed
    #[command(alias = "done")]
    Toggle {
        /// Task id or unique id prefix
        id: String,
    },

    /// Edit a task's text and deadline
    Edit {
        /// Task id or unique id prefix
        id: String,
        /// New task text
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
        /// New due date (YYYY-MM-DD); omitted keeps the current one
        #[arg(long, value_parser = parse_due_date, conflicts_with = "no_due")]
        due: Option<NaiveDate>,
        /// New due time (HH:MM); omitted keeps the current one
        #[arg(long, value_parser = parse_due_time, conflicts_with_all = ["no_due", "no_time"])]
        at: Option<NaiveTime>,
        /// Remove the due date and time
        #[arg(long)]
        no_due: bool,
        /// Remove only the due time
        #[arg(long)]
        no_time: bool,
    },

    /// Remove a task permanently
    Rm {
        /// Task id or unique id prefix
        id: String,
    },

    /// Show totals and completion rate
    Stats,
}

fn parse_filter(value: &str) -> Result<TaskFilter, zentask_core::model::filter::UnknownFilter> {
    value.parse()
}

/// Parser for one `watch` input line, without a binary name.
#[derive(Parser)]
#[command(name = "watch", no_binary_name = true, disable_help_flag = true)]
pub struct InputLine {
    #[command(subcommand)]
    pub action: Action,
}
