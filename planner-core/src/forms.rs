//! Form controllers: turn create/update inputs into complete records.
//!
//! Validation is limited to required fields. A field holding only
//! whitespace counts as missing.

use chrono::{DateTime, NaiveTime, Timelike, Utc};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::*;

/// Fresh record id. Ids are never reused or reassigned.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn required_text(value: String, field: &'static str) -> Result<String> {
    if value.trim().is_empty() {
        return Err(Error::MissingRequiredField(field));
    }
    Ok(value)
}

fn required<T>(value: Option<T>, field: &'static str) -> Result<T> {
    value.ok_or(Error::MissingRequiredField(field))
}

/// Blank optional text is stored as absent.
fn optional_text(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Session times are stored as `HH:MM`; drop anything finer.
fn to_minute(time: NaiveTime) -> NaiveTime {
    NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or(time)
}

/// `updated_at` never precedes `created_at`, even with a skewed clock.
fn touched(created_at: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    now.max(created_at)
}

impl CreateGoalInput {
    pub fn into_goal(self, now: DateTime<Utc>) -> Result<Goal> {
        Ok(Goal {
            id: new_id(),
            title: required_text(self.title, "title")?,
            description: self.description.unwrap_or_default(),
            deadline: required(self.deadline, "deadline")?,
            priority: self.priority.unwrap_or_default(),
            status: self.status.unwrap_or_default(),
            category: self
                .category
                .unwrap_or_else(|| DEFAULT_GOAL_CATEGORY.to_string()),
            created_at: now,
            updated_at: now,
        })
    }
}

impl UpdateGoalInput {
    /// Only status changes, as from a status picker.
    pub fn status(status: GoalStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn apply(self, goal: &mut Goal, now: DateTime<Utc>) -> Result<()> {
        if let Some(title) = self.title {
            goal.title = required_text(title, "title")?;
        }
        if let Some(description) = self.description {
            goal.description = description;
        }
        if let Some(deadline) = self.deadline {
            goal.deadline = deadline;
        }
        if let Some(priority) = self.priority {
            goal.priority = priority;
        }
        if let Some(status) = self.status {
            goal.status = status;
        }
        if let Some(category) = self.category {
            goal.category = category;
        }
        goal.updated_at = touched(goal.created_at, now);
        Ok(())
    }
}

impl CreateTaskInput {
    pub fn into_task(self, now: DateTime<Utc>) -> Result<Task> {
        Ok(Task {
            id: new_id(),
            title: required_text(self.title, "title")?,
            description: self.description.unwrap_or_default(),
            priority: self.priority.unwrap_or_default(),
            category: self
                .category
                .unwrap_or_else(|| DEFAULT_TASK_CATEGORY.to_string()),
            due_date: self.due_date,
            estimated_time: self.estimated_time.unwrap_or_default(),
            completed: self.completed.unwrap_or(false),
            created_at: now,
            updated_at: now,
        })
    }
}

impl UpdateTaskInput {
    pub fn apply(self, task: &mut Task, now: DateTime<Utc>) -> Result<()> {
        if let Some(title) = self.title {
            task.title = required_text(title, "title")?;
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(category) = self.category {
            task.category = category;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
        if let Some(estimated_time) = self.estimated_time {
            task.estimated_time = estimated_time;
        }
        if let Some(completed) = self.completed {
            task.completed = completed;
        }
        task.updated_at = touched(task.created_at, now);
        Ok(())
    }
}

impl CreateSessionInput {
    pub fn into_session(self, now: DateTime<Utc>) -> Result<Session> {
        Ok(Session {
            id: new_id(),
            title: required_text(self.title, "title")?,
            description: self.description.unwrap_or_default(),
            date: required(self.date, "date")?,
            time: to_minute(required(self.time, "time")?),
            duration: self.duration.unwrap_or_default(),
            subject: self.subject.unwrap_or_default(),
            kind: self
                .kind
                .unwrap_or_else(|| DEFAULT_SESSION_TYPE.to_string()),
            location: self.location.unwrap_or_default(),
            reminder: self.reminder.unwrap_or(false),
            created_at: now,
            updated_at: now,
        })
    }
}

impl UpdateSessionInput {
    pub fn apply(self, session: &mut Session, now: DateTime<Utc>) -> Result<()> {
        if let Some(title) = self.title {
            session.title = required_text(title, "title")?;
        }
        if let Some(description) = self.description {
            session.description = description;
        }
        if let Some(date) = self.date {
            session.date = date;
        }
        if let Some(time) = self.time {
            session.time = to_minute(time);
        }
        if let Some(duration) = self.duration {
            session.duration = duration;
        }
        if let Some(subject) = self.subject {
            session.subject = subject;
        }
        if let Some(kind) = self.kind {
            session.kind = kind;
        }
        if let Some(location) = self.location {
            session.location = location;
        }
        if let Some(reminder) = self.reminder {
            session.reminder = reminder;
        }
        session.updated_at = touched(session.created_at, now);
        Ok(())
    }
}

impl CreateProgressInput {
    pub fn into_entry(self, now: DateTime<Utc>) -> Result<ProgressEntry> {
        Ok(ProgressEntry {
            id: new_id(),
            date: required(self.date, "date")?,
            subject: optional_text(self.subject),
            hours_studied: self.hours_studied.filter(|h| h.is_finite() && *h >= 0.0),
            tasks_completed: self.tasks_completed,
            notes: optional_text(self.notes),
            mood: self.mood.unwrap_or_default(),
            created_at: now,
        })
    }
}
