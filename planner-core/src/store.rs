//! The entity store: four collections, replaced wholesale and saved on every change.

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::*;

/// Key the snapshot is stored under.
pub const STORAGE_KEY: &str = "studyPlannerData";

/// A snapshot of every collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudyData {
    #[serde(default)]
    pub goals: Vec<Goal>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub schedule: Vec<Session>,
    #[serde(default)]
    pub progress: Vec<ProgressEntry>,
}

impl StudyData {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check that ids are unique within each section and that no record
    /// was updated before it was created.
    pub fn validate(&self) -> Result<()> {
        check_ids(&self.goals, SectionKind::Goals)?;
        check_ids(&self.tasks, SectionKind::Tasks)?;
        check_ids(&self.schedule, SectionKind::Schedule)?;
        check_ids(&self.progress, SectionKind::Progress)?;
        check_stamps(&self.goals, SectionKind::Goals)?;
        check_stamps(&self.tasks, SectionKind::Tasks)?;
        check_stamps(&self.schedule, SectionKind::Schedule)?;
        Ok(())
    }

    /// Bring a loaded snapshot back in line with [`validate`](Self::validate):
    /// the first record with a given id wins, and `updated_at` is raised to
    /// `created_at` where it lags. Returns the number of records touched.
    pub fn repair(&mut self) -> usize {
        dedupe(&mut self.goals)
            + dedupe(&mut self.tasks)
            + dedupe(&mut self.schedule)
            + dedupe(&mut self.progress)
            + clamp_stamps(&mut self.goals)
            + clamp_stamps(&mut self.tasks)
            + clamp_stamps(&mut self.schedule)
    }

    pub fn is_empty(&self) -> bool {
        self.goals.is_empty()
            && self.tasks.is_empty()
            && self.schedule.is_empty()
            && self.progress.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Goals,
    Tasks,
    Schedule,
    Progress,
}

impl SectionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Goals => "goals",
            Self::Tasks => "tasks",
            Self::Schedule => "schedule",
            Self::Progress => "progress",
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A replacement collection for one section.
#[derive(Debug, Clone)]
pub enum Section {
    Goals(Vec<Goal>),
    Tasks(Vec<Task>),
    Schedule(Vec<Session>),
    Progress(Vec<ProgressEntry>),
}

impl Section {
    pub fn kind(&self) -> SectionKind {
        match self {
            Self::Goals(_) => SectionKind::Goals,
            Self::Tasks(_) => SectionKind::Tasks,
            Self::Schedule(_) => SectionKind::Schedule,
            Self::Progress(_) => SectionKind::Progress,
        }
    }
}

/// Opaque load/save of the serialized snapshot.
pub trait Persistence {
    /// Returns `None` when nothing has been saved yet.
    fn load(&self) -> Result<Option<String>>;
    fn save(&self, contents: &str) -> Result<()>;
}

impl<P: Persistence + ?Sized> Persistence for &P {
    fn load(&self) -> Result<Option<String>> {
        (**self).load()
    }

    fn save(&self, contents: &str) -> Result<()> {
        (**self).save(contents)
    }
}

pub struct EntityStore<P> {
    data: StudyData,
    backend: P,
}

impl<P: Persistence> EntityStore<P> {
    /// Load the saved snapshot. Absent or unreadable state starts empty;
    /// duplicate ids and backwards timestamps are repaired.
    pub fn open(backend: P) -> Result<Self> {
        let data = match backend.load()? {
            Some(json) => match StudyData::from_json(&json) {
                Ok(mut data) => {
                    let repaired = data.repair();
                    if repaired > 0 {
                        tracing::warn!(repaired, "Repaired inconsistent records in saved study data");
                    }
                    tracing::debug!(
                        goals = data.goals.len(),
                        tasks = data.tasks.len(),
                        sessions = data.schedule.len(),
                        progress = data.progress.len(),
                        "Loaded study data"
                    );
                    data
                }
                Err(e) => {
                    tracing::warn!("Saved study data is corrupt, starting empty: {}", e);
                    StudyData::default()
                }
            },
            None => {
                tracing::debug!("No saved study data, starting empty");
                StudyData::default()
            }
        };

        Ok(Self { data, backend })
    }

    pub fn snapshot(&self) -> &StudyData {
        &self.data
    }

    /// Replace one collection wholesale and persist the whole snapshot.
    pub fn replace(&mut self, section: Section) -> Result<()> {
        let kind = section.kind();
        match section {
            Section::Goals(goals) => self.data.goals = goals,
            Section::Tasks(tasks) => self.data.tasks = tasks,
            Section::Schedule(schedule) => self.data.schedule = schedule,
            Section::Progress(progress) => self.data.progress = progress,
        }
        tracing::debug!(section = %kind, "Replaced section");
        self.persist()
    }

    /// Replace every collection, e.g. from an export file.
    ///
    /// The snapshot must pass [`StudyData::validate`]; otherwise nothing changes.
    pub fn import(&mut self, data: StudyData) -> Result<()> {
        data.validate()?;
        self.data = data;
        tracing::info!("Imported study data");
        self.persist()
    }

    fn persist(&self) -> Result<()> {
        let json = self.data.to_json()?;
        self.backend.save(&json)
    }

    // --- Goals ---

    pub fn add_goal(&mut self, input: CreateGoalInput, now: DateTime<Utc>) -> Result<Goal> {
        let goal = input.into_goal(now)?;
        let mut goals = self.data.goals.clone();
        goals.push(goal.clone());
        self.replace(Section::Goals(goals))?;
        Ok(goal)
    }

    pub fn update_goal(
        &mut self,
        id: &str,
        input: UpdateGoalInput,
        now: DateTime<Utc>,
    ) -> Result<Goal> {
        let mut goals = self.data.goals.clone();
        let goal = find_mut(&mut goals, id, SectionKind::Goals)?;
        input.apply(goal, now)?;
        let updated = goal.clone();
        self.replace(Section::Goals(goals))?;
        Ok(updated)
    }

    pub fn set_goal_status(
        &mut self,
        id: &str,
        status: GoalStatus,
        now: DateTime<Utc>,
    ) -> Result<Goal> {
        self.update_goal(id, UpdateGoalInput::status(status), now)
    }

    pub fn delete_goal(&mut self, id: &str) -> Result<()> {
        let goals = without(&self.data.goals, id, SectionKind::Goals)?;
        self.replace(Section::Goals(goals))
    }

    // --- Tasks ---

    pub fn add_task(&mut self, input: CreateTaskInput, now: DateTime<Utc>) -> Result<Task> {
        let task = input.into_task(now)?;
        let mut tasks = self.data.tasks.clone();
        tasks.push(task.clone());
        self.replace(Section::Tasks(tasks))?;
        Ok(task)
    }

    pub fn update_task(
        &mut self,
        id: &str,
        input: UpdateTaskInput,
        now: DateTime<Utc>,
    ) -> Result<Task> {
        let mut tasks = self.data.tasks.clone();
        let task = find_mut(&mut tasks, id, SectionKind::Tasks)?;
        input.apply(task, now)?;
        let updated = task.clone();
        self.replace(Section::Tasks(tasks))?;
        Ok(updated)
    }

    /// Flip a task's completed flag.
    pub fn toggle_task(&mut self, id: &str, now: DateTime<Utc>) -> Result<Task> {
        let completed = find(&self.data.tasks, id, SectionKind::Tasks)?.completed;
        self.update_task(
            id,
            UpdateTaskInput {
                completed: Some(!completed),
                ..Default::default()
            },
            now,
        )
    }

    pub fn delete_task(&mut self, id: &str) -> Result<()> {
        let tasks = without(&self.data.tasks, id, SectionKind::Tasks)?;
        self.replace(Section::Tasks(tasks))
    }

    // --- Schedule ---

    pub fn add_session(
        &mut self,
        input: CreateSessionInput,
        now: DateTime<Utc>,
    ) -> Result<Session> {
        let session = input.into_session(now)?;
        let mut schedule = self.data.schedule.clone();
        schedule.push(session.clone());
        self.replace(Section::Schedule(schedule))?;
        Ok(session)
    }

    pub fn update_session(
        &mut self,
        id: &str,
        input: UpdateSessionInput,
        now: DateTime<Utc>,
    ) -> Result<Session> {
        let mut schedule = self.data.schedule.clone();
        let session = find_mut(&mut schedule, id, SectionKind::Schedule)?;
        input.apply(session, now)?;
        let updated = session.clone();
        self.replace(Section::Schedule(schedule))?;
        Ok(updated)
    }

    pub fn delete_session(&mut self, id: &str) -> Result<()> {
        let schedule = without(&self.data.schedule, id, SectionKind::Schedule)?;
        self.replace(Section::Schedule(schedule))
    }

    // --- Progress ---

    pub fn add_progress(
        &mut self,
        input: CreateProgressInput,
        now: DateTime<Utc>,
    ) -> Result<ProgressEntry> {
        let entry = input.into_entry(now)?;
        let mut progress = self.data.progress.clone();
        progress.push(entry.clone());
        self.replace(Section::Progress(progress))?;
        Ok(entry)
    }

    pub fn delete_progress(&mut self, id: &str) -> Result<()> {
        let progress = without(&self.data.progress, id, SectionKind::Progress)?;
        self.replace(Section::Progress(progress))
    }
}

fn not_found(section: SectionKind, id: &str) -> Error {
    Error::NotFound {
        section,
        id: id.to_string(),
    }
}

fn find<'a, T: Record>(items: &'a [T], id: &str, section: SectionKind) -> Result<&'a T> {
    items
        .iter()
        .find(|item| item.id() == id)
        .ok_or_else(|| not_found(section, id))
}

fn find_mut<'a, T: Record>(
    items: &'a mut [T],
    id: &str,
    section: SectionKind,
) -> Result<&'a mut T> {
    items
        .iter_mut()
        .find(|item| item.id() == id)
        .ok_or_else(|| not_found(section, id))
}

/// Copy of `items` without the record `id`, preserving order.
fn without<T: Record + Clone>(items: &[T], id: &str, section: SectionKind) -> Result<Vec<T>> {
    let remaining: Vec<T> = items.iter().filter(|item| item.id() != id).cloned().collect();
    if remaining.len() == items.len() {
        return Err(not_found(section, id));
    }
    Ok(remaining)
}

fn check_ids<T: Record>(items: &[T], section: SectionKind) -> Result<()> {
    let mut seen = HashSet::new();
    match items.iter().map(Record::id).find(|id| !seen.insert(*id)) {
        Some(id) => Err(Error::DuplicateId {
            section,
            id: id.to_string(),
        }),
        None => Ok(()),
    }
}

fn check_stamps<T: Timestamped>(items: &[T], section: SectionKind) -> Result<()> {
    match items.iter().find(|item| item.updated_at() < item.created_at()) {
        Some(item) => Err(Error::UpdatedBeforeCreated {
            section,
            id: item.id().to_string(),
        }),
        None => Ok(()),
    }
}

fn dedupe<T: Record>(items: &mut Vec<T>) -> usize {
    let before = items.len();
    let mut seen = HashSet::new();
    items.retain(|item| seen.insert(item.id().to_string()));
    before - items.len()
}

fn clamp_stamps<T: Timestamped>(items: &mut [T]) -> usize {
    let mut clamped = 0;
    for item in items.iter_mut() {
        if item.updated_at() < item.created_at() {
            item.set_updated_at(item.created_at());
            clamped += 1;
        }
    }
    clamped
}
