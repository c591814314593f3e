//! Command handlers. Each one reads or edits the store and writes its
//! result to `out`, as text or as JSON.

use std::io::Write;
use std::path::Path;

use anyhow::{bail, Context as _};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;

use planner_core::derivation::{
    filter_goals, filter_tasks, filter_upcoming, recent_n, sessions_on, sort_tasks, Dashboard,
    ProgressReport, Week,
};
use planner_core::models::{
    lenient, CreateGoalInput, CreateProgressInput, CreateSessionInput, CreateTaskInput, Session,
    UpdateGoalInput, UpdateSessionInput, UpdateTaskInput,
};
use planner_core::{EntityStore, JsonFile, Persistence, StudyData};

use crate::cli::{
    Commands, GoalCommand, GoalFields, LogCommand, ScheduleCommand, SessionFields, TaskCommand,
    TaskFields,
};
use crate::config::Config;
use crate::render;

/// Everything a command needs besides the store.
#[derive(Debug, Clone)]
pub struct Context {
    pub config: Config,
    /// Local wall-clock time, used for every date comparison.
    pub now: NaiveDateTime,
    /// Stamped on created and updated records.
    pub utc: DateTime<Utc>,
}

impl Context {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            now: Local::now().naive_local(),
            utc: Utc::now(),
        }
    }
}

pub fn run<P: Persistence>(
    store: &mut EntityStore<P>,
    command: Commands,
    ctx: &Context,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    match command {
        Commands::Dashboard => dashboard(store, ctx, out),
        Commands::Progress => progress(store, ctx, out),
        Commands::Goals { action } => goals(store, action, ctx, out),
        Commands::Tasks { action } => tasks(store, action, ctx, out),
        Commands::Schedule { action } => schedule(store, action, ctx, out),
        Commands::Log { action } => log(store, action, ctx, out),
        Commands::Export { path } => export(store, path.as_deref(), out),
        Commands::Import { path } => import(store, &path, out),
    }
}

fn emit_json(out: &mut impl Write, value: &impl Serialize) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

fn dashboard<P: Persistence>(
    store: &EntityStore<P>,
    ctx: &Context,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let view = Dashboard::compute(store.snapshot(), ctx.now, &ctx.config.limits);
    if ctx.config.json {
        return emit_json(out, &view);
    }
    render::dashboard(out, &view, ctx.now)?;
    Ok(())
}

fn progress<P: Persistence>(
    store: &EntityStore<P>,
    ctx: &Context,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let report = ProgressReport::compute(
        store.snapshot(),
        ctx.now,
        ctx.config.week_start,
        &ctx.config.limits,
    );
    if ctx.config.json {
        return emit_json(out, &report);
    }
    render::progress(out, &report)?;
    Ok(())
}

fn goals<P: Persistence>(
    store: &mut EntityStore<P>,
    action: GoalCommand,
    ctx: &Context,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    match action {
        GoalCommand::List { status } => {
            let goals = filter_goals(&store.snapshot().goals, status);
            if ctx.config.json {
                return emit_json(out, &goals);
            }
            if goals.is_empty() {
                writeln!(out, "No goals found.")?;
            }
            for goal in goals {
                render::goal_line(out, goal, ctx.now)?;
            }
        }
        GoalCommand::Add { title, fields } => {
            let GoalFields {
                description,
                deadline,
                priority,
                status,
                category,
            } = fields;
            let input = CreateGoalInput {
                title,
                description,
                deadline,
                priority,
                status,
                category,
            };
            let goal = store.add_goal(input, ctx.utc)?;
            tracing::info!(id = %goal.id, "Created goal");
            report(out, ctx, "Added goal", &goal.id, &goal)?;
        }
        GoalCommand::Edit { id, title, fields } => {
            let GoalFields {
                description,
                deadline,
                priority,
                status,
                category,
            } = fields;
            let input = UpdateGoalInput {
                title,
                description,
                deadline,
                priority,
                status,
                category,
            };
            let goal = store.update_goal(&id, input, ctx.utc)?;
            report(out, ctx, "Updated goal", &goal.id, &goal)?;
        }
        GoalCommand::Status { id, status } => {
            let goal = store.set_goal_status(&id, status, ctx.utc)?;
            tracing::info!(id = %goal.id, status = %goal.status, "Changed goal status");
            report(out, ctx, "Updated goal", &goal.id, &goal)?;
        }
        GoalCommand::Delete { id } => {
            store.delete_goal(&id)?;
            tracing::info!(%id, "Deleted goal");
            writeln!(out, "Deleted goal {id}")?;
        }
    }
    Ok(())
}

fn tasks<P: Persistence>(
    store: &mut EntityStore<P>,
    action: TaskCommand,
    ctx: &Context,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    match action {
        TaskCommand::List { filter, sort } => {
            let tasks = sort_tasks(filter_tasks(&store.snapshot().tasks, filter, ctx.now), sort);
            if ctx.config.json {
                return emit_json(out, &tasks);
            }
            if tasks.is_empty() {
                writeln!(out, "No tasks found.")?;
            }
            for task in tasks {
                render::task_line(out, task, ctx.now)?;
            }
        }
        TaskCommand::Add { title, fields } => {
            let TaskFields {
                description,
                priority,
                category,
                due,
                estimate,
            } = fields;
            let input = CreateTaskInput {
                title,
                description,
                priority,
                category,
                due_date: due,
                estimated_time: estimate,
                completed: None,
            };
            let task = store.add_task(input, ctx.utc)?;
            tracing::info!(id = %task.id, "Created task");
            report(out, ctx, "Added task", &task.id, &task)?;
        }
        TaskCommand::Edit {
            id,
            title,
            fields,
            no_due,
        } => {
            let TaskFields {
                description,
                priority,
                category,
                due,
                estimate,
            } = fields;
            let due_date = if no_due { Some(None) } else { due.map(Some) };
            let input = UpdateTaskInput {
                title,
                description,
                priority,
                category,
                due_date,
                estimated_time: estimate,
                completed: None,
            };
            let task = store.update_task(&id, input, ctx.utc)?;
            report(out, ctx, "Updated task", &task.id, &task)?;
        }
        TaskCommand::Toggle { id } => {
            let task = store.toggle_task(&id, ctx.utc)?;
            let verb = if task.completed { "Completed" } else { "Reopened" };
            report(out, ctx, &format!("{verb} task"), &task.id, &task)?;
        }
        TaskCommand::Delete { id } => {
            store.delete_task(&id)?;
            tracing::info!(%id, "Deleted task");
            writeln!(out, "Deleted task {id}")?;
        }
    }
    Ok(())
}

fn schedule<P: Persistence>(
    store: &mut EntityStore<P>,
    action: ScheduleCommand,
    ctx: &Context,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    match action {
        ScheduleCommand::List => {
            let sessions = filter_upcoming(&store.snapshot().schedule, ctx.now);
            if ctx.config.json {
                return emit_json(out, &sessions);
            }
            if sessions.is_empty() {
                writeln!(out, "Nothing scheduled.")?;
            }
            for session in sessions {
                render::session_line(out, session)?;
            }
        }
        ScheduleCommand::Week => {
            let week = Week::containing(ctx.now.date(), ctx.config.week_start);
            let schedule = &store.snapshot().schedule;
            if ctx.config.json {
                let days: Vec<_> = week
                    .dates()
                    .into_iter()
                    .map(|date| WeekDay {
                        date,
                        sessions: sessions_on(schedule, date),
                    })
                    .collect();
                return emit_json(out, &days);
            }
            render::week(out, &week, schedule, ctx.now.date())?;
        }
        ScheduleCommand::Add { title, fields } => {
            let SessionFields {
                description,
                date,
                time,
                duration,
                subject,
                kind,
                location,
                reminder,
            } = fields;
            let input = CreateSessionInput {
                title,
                description,
                date,
                time,
                duration,
                subject,
                kind,
                location,
                reminder,
            };
            let session = store.add_session(input, ctx.utc)?;
            tracing::info!(id = %session.id, "Scheduled session");
            report(out, ctx, "Scheduled session", &session.id, &session)?;
        }
        ScheduleCommand::Edit { id, title, fields } => {
            let SessionFields {
                description,
                date,
                time,
                duration,
                subject,
                kind,
                location,
                reminder,
            } = fields;
            let input = UpdateSessionInput {
                title,
                description,
                date,
                time,
                duration,
                subject,
                kind,
                location,
                reminder,
            };
            let session = store.update_session(&id, input, ctx.utc)?;
            report(out, ctx, "Updated session", &session.id, &session)?;
        }
        ScheduleCommand::Delete { id } => {
            store.delete_session(&id)?;
            tracing::info!(%id, "Deleted session");
            writeln!(out, "Deleted session {id}")?;
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct WeekDay<'a> {
    date: NaiveDate,
    sessions: Vec<&'a Session>,
}

fn log<P: Persistence>(
    store: &mut EntityStore<P>,
    action: LogCommand,
    ctx: &Context,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    match action {
        LogCommand::List { limit } => {
            let entries = recent_n(&store.snapshot().progress, |e| e.date, limit);
            if ctx.config.json {
                return emit_json(out, &entries);
            }
            if entries.is_empty() {
                writeln!(out, "Nothing logged yet.")?;
            }
            for entry in entries {
                render::entry_line(out, entry)?;
            }
        }
        LogCommand::Add {
            date,
            subject,
            hours,
            tasks,
            notes,
            mood,
        } => {
            let input = CreateProgressInput {
                date: Some(date.unwrap_or(ctx.now.date())),
                subject,
                hours_studied: hours.as_deref().and_then(lenient::parse_decimal),
                tasks_completed: tasks
                    .as_deref()
                    .and_then(lenient::parse_integer)
                    .and_then(|n| u32::try_from(n).ok()),
                notes,
                mood,
            };
            let entry = store.add_progress(input, ctx.utc)?;
            tracing::info!(id = %entry.id, date = %entry.date, "Logged progress");
            report(out, ctx, "Logged progress", &entry.id, &entry)?;
        }
        LogCommand::Delete { id } => {
            store.delete_progress(&id)?;
            tracing::info!(%id, "Deleted progress entry");
            writeln!(out, "Deleted progress entry {id}")?;
        }
    }
    Ok(())
}

/// Confirm a write: the record itself in JSON mode, a one-liner otherwise.
fn report(
    out: &mut impl Write,
    ctx: &Context,
    action: &str,
    id: &str,
    record: &impl Serialize,
) -> anyhow::Result<()> {
    if ctx.config.json {
        return emit_json(out, record);
    }
    writeln!(out, "{action} {id}")?;
    Ok(())
}

fn export<P: Persistence>(
    store: &EntityStore<P>,
    path: Option<&Path>,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let json = store.snapshot().to_json_pretty()?;
    match path {
        Some(path) => {
            JsonFile::new(path)
                .save(&json)
                .with_context(|| format!("failed to export to {}", path.display()))?;
            tracing::info!("Exported study data to {}", path.display());
            writeln!(out, "Exported to {}", path.display())?;
        }
        None => writeln!(out, "{json}")?,
    }
    Ok(())
}

fn import<P: Persistence>(
    store: &mut EntityStore<P>,
    path: &Path,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let Some(json) = JsonFile::new(path).load()? else {
        bail!("{} does not exist", path.display());
    };
    let data = StudyData::from_json(&json)
        .with_context(|| format!("{} is not a study planner export", path.display()))?;
    let counts = (
        data.goals.len(),
        data.tasks.len(),
        data.schedule.len(),
        data.progress.len(),
    );
    store.import(data)?;
    writeln!(
        out,
        "Imported {} goals, {} tasks, {} sessions and {} progress entries",
        counts.0, counts.1, counts.2, counts.3
    )?;
    Ok(())
}
