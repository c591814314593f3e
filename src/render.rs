//! Plain-text views of records and derived statistics.

use std::io::{self, Write};

use chrono::{NaiveDate, NaiveDateTime, Timelike};

use planner_core::derivation::{
    days_until, is_goal_overdue, is_task_overdue, sessions_on, Dashboard, ProgressReport, Week,
};
use planner_core::models::{Goal, Mood, ProgressEntry, Session, Task};

/// Deadlines this close get a "days left" note.
const URGENT_DAYS: i64 = 7;

pub fn greeting(now: NaiveDateTime) -> &'static str {
    match now.hour() {
        0..=11 => "Good morning",
        12..=17 => "Good afternoon",
        _ => "Good evening",
    }
}

pub fn mood_label(mood: Option<Mood>) -> &'static str {
    mood.map_or("N/A", |m| m.as_str())
}

fn check(done: bool) -> char {
    if done {
        'x'
    } else {
        ' '
    }
}

pub fn goal_line(out: &mut impl Write, goal: &Goal, now: NaiveDateTime) -> io::Result<()> {
    let note = if is_goal_overdue(goal, now) {
        " (overdue)".to_string()
    } else {
        match days_until(goal.deadline, now) {
            days @ 0..=URGENT_DAYS => format!(" ({days} days left)"),
            _ => String::new(),
        }
    };
    writeln!(
        out,
        "{}  {}  [{}] [{}] due {}{}  {}",
        goal.id, goal.title, goal.status, goal.priority, goal.deadline, note, goal.category
    )
}

pub fn task_line(out: &mut impl Write, task: &Task, now: NaiveDateTime) -> io::Result<()> {
    let due = match task.due_date {
        Some(due) if is_task_overdue(task, now) => format!("  due {due} (overdue)"),
        Some(due) => format!("  due {due}"),
        None => String::new(),
    };
    let estimate = if task.estimated_time.is_empty() {
        String::new()
    } else {
        format!("  ~{}", task.estimated_time)
    };
    writeln!(
        out,
        "[{}] {}  {}  [{}] {}{}{}",
        check(task.completed),
        task.id,
        task.title,
        task.priority,
        task.category,
        due,
        estimate
    )
}

pub fn session_line(out: &mut impl Write, session: &Session) -> io::Result<()> {
    write!(
        out,
        "{}  {} at {}  {} ({})",
        session.id,
        session.date,
        session.time.format("%H:%M"),
        session.title,
        session.kind
    )?;
    if !session.duration.is_empty() {
        write!(out, "  {}", session.duration)?;
    }
    if !session.location.is_empty() {
        write!(out, "  @ {}", session.location)?;
    }
    if session.reminder {
        write!(out, "  [reminder]")?;
    }
    writeln!(out)
}

pub fn entry_line(out: &mut impl Write, entry: &ProgressEntry) -> io::Result<()> {
    write!(out, "{}  {}  {:.1}h", entry.id, entry.date, entry.hours())?;
    if let Some(subject) = &entry.subject {
        write!(out, "  {subject}")?;
    }
    if let Some(count) = entry.tasks_completed {
        write!(out, "  {count} tasks")?;
    }
    write!(out, "  mood: {}", entry.mood)?;
    if let Some(notes) = &entry.notes {
        write!(out, "  \"{notes}\"")?;
    }
    writeln!(out)
}

pub fn dashboard(out: &mut impl Write, view: &Dashboard, now: NaiveDateTime) -> io::Result<()> {
    writeln!(out, "{}! Here's your study overview for today.", greeting(now))?;
    writeln!(out)?;
    writeln!(
        out,
        "Goals: {} total, {} completed ({}%)",
        view.goals.total, view.goals.completed, view.goals.completion_rate
    )?;
    writeln!(
        out,
        "Tasks: {} total, {} completed ({}%), {} overdue",
        view.tasks.total, view.tasks.completed, view.tasks.completion_rate, view.tasks.overdue
    )?;
    writeln!(out, "Upcoming sessions: {}", view.upcoming_session_count)?;

    writeln!(out)?;
    writeln!(out, "Recent tasks")?;
    if view.recent_tasks.is_empty() {
        writeln!(out, "  No tasks yet.")?;
    }
    for task in &view.recent_tasks {
        write!(out, "  ")?;
        task_line(out, task, now)?;
    }

    writeln!(out)?;
    writeln!(out, "Upcoming sessions")?;
    if view.upcoming_sessions.is_empty() {
        writeln!(out, "  Nothing scheduled.")?;
    }
    for session in &view.upcoming_sessions {
        write!(out, "  ")?;
        session_line(out, session)?;
    }

    writeln!(out)?;
    writeln!(out, "Active goals")?;
    if view.active_goals.is_empty() {
        writeln!(out, "  No active goals.")?;
    }
    for goal in &view.active_goals {
        write!(out, "  ")?;
        goal_line(out, goal, now)?;
    }
    Ok(())
}

pub fn progress(out: &mut impl Write, report: &ProgressReport) -> io::Result<()> {
    writeln!(out, "Goal completion: {}%", report.goal_completion_rate)?;
    writeln!(out, "Task completion: {}%", report.task_completion_rate)?;
    writeln!(
        out,
        "Sessions: {} scheduled, {} upcoming",
        report.total_sessions, report.upcoming_sessions
    )?;
    writeln!(
        out,
        "Study hours: {:.1} total, {:.1} per entry",
        report.total_hours, report.average_hours
    )?;

    let week = &report.week;
    writeln!(out)?;
    writeln!(out, "This week ({} to {})", week.week.start, week.week.end)?;
    writeln!(out, "  Study hours:     {:.1}h", week.hours)?;
    writeln!(out, "  Entries:         {}", week.entries)?;
    writeln!(out, "  Average mood:    {}", mood_label(week.average_mood))?;

    writeln!(out)?;
    writeln!(out, "Recent entries")?;
    if report.recent_entries.is_empty() {
        writeln!(out, "  Nothing logged yet.")?;
    }
    for entry in &report.recent_entries {
        write!(out, "  ")?;
        entry_line(out, entry)?;
    }
    Ok(())
}

/// One block per day of `week`, marking today.
pub fn week(
    out: &mut impl Write,
    week: &Week,
    sessions: &[Session],
    today: NaiveDate,
) -> io::Result<()> {
    for date in week.dates() {
        let marker = if date == today { "  (today)" } else { "" };
        writeln!(out, "{} {}{}", date.format("%a"), date, marker)?;
        let day = sessions_on(sessions, date);
        if day.is_empty() {
            writeln!(out, "  -")?;
        }
        for session in day {
            writeln!(
                out,
                "  {}  {}  {}",
                session.time.format("%H:%M"),
                session.title,
                session.subject
            )?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 15)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn greeting_follows_the_clock() {
        assert_eq!(greeting(at(0)), "Good morning");
        assert_eq!(greeting(at(11)), "Good morning");
        assert_eq!(greeting(at(12)), "Good afternoon");
        assert_eq!(greeting(at(17)), "Good afternoon");
        assert_eq!(greeting(at(18)), "Good evening");
    }

    #[test]
    fn missing_mood_reads_not_available() {
        assert_eq!(mood_label(None), "N/A");
        assert_eq!(mood_label(Some(Mood::Okay)), "okay");
    }
}
