use std::path::PathBuf;

use chrono::{NaiveDate, NaiveTime};
use clap::builder::PossibleValuesParser;
use clap::{Args, Parser, Subcommand};

use planner_core::derivation::{GoalFilter, TaskFilter, TaskSortKey, WeekStart};
use planner_core::models::{
    lenient, GoalStatus, Mood, Priority, GOAL_CATEGORIES, SESSION_TYPES, TASK_CATEGORIES,
};

#[derive(Debug, Parser)]
#[command(name = "studyplan")]
#[command(about = "Plan your studies: goals, tasks, sessions and progress", version)]
pub struct Cli {
    /// Data file: a SQLite database, or a `.json` file
    #[arg(long, global = true, env = "STUDYPLAN_DB")]
    pub db: Option<PathBuf>,

    /// First day of the week for weekly views (sunday or monday)
    #[arg(long, global = true, env = "STUDYPLAN_WEEK_START")]
    pub week_start: Option<WeekStart>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Overview of goals, tasks and upcoming sessions
    Dashboard,
    /// Completion rates, study hours and this week's stats
    Progress,
    /// Manage study goals
    Goals {
        #[command(subcommand)]
        action: GoalCommand,
    },
    /// Manage tasks
    Tasks {
        #[command(subcommand)]
        action: TaskCommand,
    },
    /// Manage scheduled study sessions
    Schedule {
        #[command(subcommand)]
        action: ScheduleCommand,
    },
    /// Record daily study progress
    Log {
        #[command(subcommand)]
        action: LogCommand,
    },
    /// Write all data as JSON (to stdout when no path is given)
    Export { path: Option<PathBuf> },
    /// Replace all data with the contents of a JSON export
    Import { path: PathBuf },
}

#[derive(Debug, Subcommand)]
pub enum GoalCommand {
    /// List goals
    List {
        /// all, active, completed, paused or cancelled
        #[arg(long, default_value = "all")]
        status: GoalFilter,
    },
    /// Create a goal
    Add {
        title: String,
        #[command(flatten)]
        fields: GoalFields,
    },
    /// Edit a goal
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[command(flatten)]
        fields: GoalFields,
    },
    /// Change a goal's status
    Status { id: String, status: GoalStatus },
    /// Delete a goal
    Delete { id: String },
}

#[derive(Debug, Args)]
pub struct GoalFields {
    #[arg(long)]
    pub description: Option<String>,
    /// YYYY-MM-DD
    #[arg(long)]
    pub deadline: Option<NaiveDate>,
    #[arg(long)]
    pub priority: Option<Priority>,
    #[arg(long)]
    pub status: Option<GoalStatus>,
    #[arg(long, value_parser = PossibleValuesParser::new(GOAL_CATEGORIES.iter().copied()))]
    pub category: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum TaskCommand {
    /// List tasks
    List {
        /// all, completed, pending, overdue or high-priority
        #[arg(long, default_value = "all")]
        filter: TaskFilter,
        /// created, title, priority or due
        #[arg(long, default_value = "created")]
        sort: TaskSortKey,
    },
    /// Create a task
    Add {
        title: String,
        #[command(flatten)]
        fields: TaskFields,
    },
    /// Edit a task
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[command(flatten)]
        fields: TaskFields,
        /// Remove the due date
        #[arg(long, conflicts_with = "due")]
        no_due: bool,
    },
    /// Flip a task between done and not done
    Toggle { id: String },
    /// Delete a task
    Delete { id: String },
}

#[derive(Debug, Args)]
pub struct TaskFields {
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub priority: Option<Priority>,
    #[arg(long, value_parser = PossibleValuesParser::new(TASK_CATEGORIES.iter().copied()))]
    pub category: Option<String>,
    /// Due date, YYYY-MM-DD
    #[arg(long)]
    pub due: Option<NaiveDate>,
    /// Free text, e.g. "2 hours"
    #[arg(long)]
    pub estimate: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum ScheduleCommand {
    /// Upcoming sessions, soonest first
    List,
    /// This week's sessions, day by day
    Week,
    /// Schedule a session
    Add {
        title: String,
        #[command(flatten)]
        fields: SessionFields,
    },
    /// Edit a session
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[command(flatten)]
        fields: SessionFields,
    },
    /// Delete a session
    Delete { id: String },
}

#[derive(Debug, Args)]
pub struct SessionFields {
    #[arg(long)]
    pub description: Option<String>,
    /// YYYY-MM-DD
    #[arg(long)]
    pub date: Option<NaiveDate>,
    /// HH:MM
    #[arg(long, value_parser = parse_time)]
    pub time: Option<NaiveTime>,
    #[arg(long)]
    pub duration: Option<String>,
    #[arg(long)]
    pub subject: Option<String>,
    #[arg(long = "type", value_parser = PossibleValuesParser::new(SESSION_TYPES.iter().copied()))]
    pub kind: Option<String>,
    #[arg(long)]
    pub location: Option<String>,
    #[arg(long)]
    pub reminder: Option<bool>,
}

#[derive(Debug, Subcommand)]
pub enum LogCommand {
    /// Most recent progress entries
    List {
        #[arg(long, default_value_t = 7)]
        limit: usize,
    },
    /// Log a day of study
    Add {
        /// Defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        subject: Option<String>,
        /// Hours studied; negative or unreadable values are ignored
        #[arg(long)]
        hours: Option<String>,
        /// Tasks completed; unreadable values are ignored
        #[arg(long)]
        tasks: Option<String>,
        #[arg(long)]
        notes: Option<String>,
        #[arg(long)]
        mood: Option<Mood>,
    },
    /// Delete a progress entry
    Delete { id: String },
}

fn parse_time(s: &str) -> Result<NaiveTime, String> {
    lenient::parse_time(s).ok_or_else(|| format!("invalid time '{s}' (expected HH:MM)"))
}
