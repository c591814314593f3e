use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::models::Task;

/// Task list orderings. All of them are stable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TaskSortKey {
    /// Newest first.
    #[default]
    CreatedAt,
    /// A to Z, ignoring case.
    Title,
    /// High, then medium, then low.
    Priority,
    /// Soonest first; tasks without a due date last.
    DueDate,
}

impl TaskSortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreatedAt => "created",
            Self::Title => "title",
            Self::Priority => "priority",
            Self::DueDate => "due",
        }
    }

    pub fn compare(&self, a: &Task, b: &Task) -> Ordering {
        match self {
            Self::CreatedAt => b.created_at.cmp(&a.created_at),
            Self::Title => {
                let a = a.title.chars().flat_map(char::to_lowercase);
                let b = b.title.chars().flat_map(char::to_lowercase);
                a.cmp(b)
            }
            Self::Priority => b.priority.rank().cmp(&a.priority.rank()),
            Self::DueDate => match (a.due_date, b.due_date) {
                (Some(a), Some(b)) => a.cmp(&b),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
        }
    }
}

impl fmt::Display for TaskSortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskSortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "created" | "createdat" | "created-at" => Ok(Self::CreatedAt),
            "title" => Ok(Self::Title),
            "priority" => Ok(Self::Priority),
            "due" | "duedate" | "due-date" => Ok(Self::DueDate),
            other => Err(format!(
                "unknown sort key '{other}' (expected created, title, priority or due)"
            )),
        }
    }
}

/// Order tasks by `key`. Ties keep their input order.
pub fn sort_tasks<'a>(tasks: impl IntoIterator<Item = &'a Task>, key: TaskSortKey) -> Vec<&'a Task> {
    let mut sorted: Vec<&Task> = tasks.into_iter().collect();
    sorted.sort_by(|a, b| key.compare(a, b));
    sorted
}

/// The `n` records with the greatest `key`, greatest first. Ties keep input order.
pub fn recent_n<T, K: Ord>(items: &[T], key: impl Fn(&T) -> K, n: usize) -> Vec<&T> {
    let mut sorted: Vec<&T> = items.iter().collect();
    sorted.sort_by(|a, b| key(b).cmp(&key(a)));
    sorted.truncate(n);
    sorted
}
