use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};

use super::is_overdue;
use crate::models::{Goal, GoalStatus, Priority, Session, Task};

/// Task list filters offered by the task manager.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TaskFilter {
    #[default]
    All,
    Completed,
    Pending,
    Overdue,
    HighPriority,
}

impl TaskFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Completed => "completed",
            Self::Pending => "pending",
            Self::Overdue => "overdue",
            Self::HighPriority => "high-priority",
        }
    }

    pub fn matches(&self, task: &Task, now: NaiveDateTime) -> bool {
        match self {
            Self::All => true,
            Self::Completed => task.completed,
            Self::Pending => !task.completed,
            Self::Overdue => is_task_overdue(task, now),
            Self::HighPriority => task.priority == Priority::High,
        }
    }
}

impl fmt::Display for TaskFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "completed" | "done" => Ok(Self::Completed),
            "pending" => Ok(Self::Pending),
            "overdue" => Ok(Self::Overdue),
            "high" | "high-priority" => Ok(Self::HighPriority),
            other => Err(format!(
                "unknown task filter '{other}' (expected all, completed, pending, overdue or high-priority)"
            )),
        }
    }
}

/// Not completed and past its due date. Tasks without a due date never are.
pub fn is_task_overdue(task: &Task, now: NaiveDateTime) -> bool {
    !task.completed && task.due_date.is_some_and(|due| is_overdue(due, now))
}

pub fn filter_tasks(tasks: &[Task], filter: TaskFilter, now: NaiveDateTime) -> Vec<&Task> {
    tasks.iter().filter(|task| filter.matches(task, now)).collect()
}

/// Goal list filter: everything, or one explicit status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum GoalFilter {
    #[default]
    All,
    Status(GoalStatus),
}

impl GoalFilter {
    pub fn matches(&self, goal: &Goal) -> bool {
        match self {
            Self::All => true,
            Self::Status(status) => goal.status == *status,
        }
    }
}

impl FromStr for GoalFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse().map(Self::Status)
    }
}

pub fn filter_goals(goals: &[Goal], filter: GoalFilter) -> Vec<&Goal> {
    goals.iter().filter(|goal| filter.matches(goal)).collect()
}

/// Sessions from today onward, soonest first.
pub fn filter_upcoming(sessions: &[Session], now: NaiveDateTime) -> Vec<&Session> {
    let today = now.date();
    let mut upcoming: Vec<&Session> = sessions.iter().filter(|s| s.date >= today).collect();
    upcoming.sort_by(|a, b| (a.date, a.time).cmp(&(b.date, b.time)));
    upcoming
}

/// Sessions on one calendar date, in start-time order.
pub fn sessions_on(sessions: &[Session], date: NaiveDate) -> Vec<&Session> {
    let mut day: Vec<&Session> = sessions.iter().filter(|s| s.date == date).collect();
    day.sort_by_key(|s| s.time);
    day
}
