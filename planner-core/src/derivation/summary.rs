//! Composite views: what the dashboard and the progress page show.

use chrono::NaiveDateTime;
use serde::Serialize;

use super::*;
use crate::models::{Goal, GoalStatus, ProgressEntry, Session, Task};
use crate::store::StudyData;

/// How many items the list widgets show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Limits {
    pub recent_tasks: usize,
    pub upcoming_sessions: usize,
    pub active_goals: usize,
    pub recent_progress: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            recent_tasks: 5,
            upcoming_sessions: 5,
            active_goals: 3,
            recent_progress: 7,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub overdue: usize,
    pub completion_rate: u32,
}

impl TaskStats {
    pub fn compute(tasks: &[Task], now: NaiveDateTime) -> Self {
        let total = tasks.len();
        let completed = count_by(tasks, |t| t.completed);
        Self {
            total,
            completed,
            pending: total - completed,
            overdue: count_by(tasks, |t| is_task_overdue(t, now)),
            completion_rate: completion_rate(completed, total),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GoalStats {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
    pub paused: usize,
    pub cancelled: usize,
    /// Not completed and past the deadline.
    pub overdue: usize,
    pub completion_rate: u32,
}

impl GoalStats {
    pub fn compute(goals: &[Goal], now: NaiveDateTime) -> Self {
        let with_status = |status: GoalStatus| count_by(goals, |g| g.status == status);
        let total = goals.len();
        let completed = with_status(GoalStatus::Completed);
        Self {
            total,
            active: with_status(GoalStatus::Active),
            completed,
            paused: with_status(GoalStatus::Paused),
            cancelled: with_status(GoalStatus::Cancelled),
            overdue: count_by(goals, |g| is_goal_overdue(g, now)),
            completion_rate: completion_rate(completed, total),
        }
    }
}

pub fn is_goal_overdue(goal: &Goal, now: NaiveDateTime) -> bool {
    goal.status != GoalStatus::Completed && is_overdue(goal.deadline, now)
}

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard<'a> {
    pub goals: GoalStats,
    pub tasks: TaskStats,
    pub upcoming_session_count: usize,
    pub recent_tasks: Vec<&'a Task>,
    pub upcoming_sessions: Vec<&'a Session>,
    pub active_goals: Vec<&'a Goal>,
}

impl<'a> Dashboard<'a> {
    pub fn compute(data: &'a StudyData, now: NaiveDateTime, limits: &Limits) -> Self {
        let mut upcoming = filter_upcoming(&data.schedule, now);
        let upcoming_session_count = upcoming.len();
        upcoming.truncate(limits.upcoming_sessions);

        let mut active_goals = filter_goals(&data.goals, GoalFilter::Status(GoalStatus::Active));
        active_goals.truncate(limits.active_goals);

        Self {
            goals: GoalStats::compute(&data.goals, now),
            tasks: TaskStats::compute(&data.tasks, now),
            upcoming_session_count,
            recent_tasks: recent_n(&data.tasks, |t| t.created_at, limits.recent_tasks),
            upcoming_sessions: upcoming,
            active_goals,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProgressReport<'a> {
    pub goal_completion_rate: u32,
    pub task_completion_rate: u32,
    pub total_sessions: usize,
    pub upcoming_sessions: usize,
    pub total_hours: f64,
    /// Mean hours per logged entry, 0 when nothing is logged.
    pub average_hours: f64,
    pub recent_entries: Vec<&'a ProgressEntry>,
    pub week: WeekStats,
}

impl<'a> ProgressReport<'a> {
    pub fn compute(
        data: &'a StudyData,
        now: NaiveDateTime,
        week_start: WeekStart,
        limits: &Limits,
    ) -> Self {
        let goals_done = count_by(&data.goals, |g| g.status == GoalStatus::Completed);
        let tasks_done = count_by(&data.tasks, |t| t.completed);
        let total_hours = total_hours(&data.progress);
        let average_hours = if data.progress.is_empty() {
            0.0
        } else {
            total_hours / data.progress.len() as f64
        };

        Self {
            goal_completion_rate: completion_rate(goals_done, data.goals.len()),
            task_completion_rate: completion_rate(tasks_done, data.tasks.len()),
            total_sessions: data.schedule.len(),
            upcoming_sessions: filter_upcoming(&data.schedule, now).len(),
            total_hours,
            average_hours,
            recent_entries: recent_n(&data.progress, |e| e.date, limits.recent_progress),
            week: week_stats(&data.progress, now, week_start),
        }
    }
}
