use chrono::NaiveDateTime;
use serde::Serialize;

use super::{Week, WeekStart};
use crate::models::{Mood, ProgressEntry};

/// Study totals for the calendar week containing "now".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekStats {
    pub week: Week,
    pub hours: f64,
    pub entries: usize,
    /// `None` when the week has no entries.
    pub average_mood: Option<Mood>,
}

/// Sum of hours studied. Absent or malformed values count as zero.
pub fn total_hours<'a>(entries: impl IntoIterator<Item = &'a ProgressEntry>) -> f64 {
    entries
        .into_iter()
        .map(ProgressEntry::hours)
        .fold(0.0, |total, hours| total + hours)
}

/// Mean mood on the poor..excellent scale, rounded to the nearest mood.
pub fn average_mood<'a>(entries: impl IntoIterator<Item = &'a ProgressEntry>) -> Option<Mood> {
    let (sum, count) = entries
        .into_iter()
        .fold((0u32, 0u32), |(sum, count), entry| {
            (sum + u32::from(entry.mood.ordinal()), count + 1)
        });
    if count == 0 {
        return None;
    }
    let mean = f64::from(sum) / f64::from(count);
    Mood::from_ordinal(mean.round() as u8)
}

pub fn week_stats(entries: &[ProgressEntry], now: NaiveDateTime, week_start: WeekStart) -> WeekStats {
    let week = Week::containing(now.date(), week_start);
    let in_week: Vec<&ProgressEntry> = entries.iter().filter(|e| week.contains(e.date)).collect();

    WeekStats {
        week,
        hours: total_hours(in_week.iter().copied()),
        entries: in_week.len(),
        average_mood: average_mood(in_week.iter().copied()),
    }
}
