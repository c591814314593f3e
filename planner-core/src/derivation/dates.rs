use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// True when `deadline` is in the past and not today.
///
/// A deadline due today is never overdue, whatever the time of day.
pub fn is_overdue(deadline: NaiveDate, now: NaiveDateTime) -> bool {
    // The deadline sits at midnight, so `deadline < now` on a different
    // calendar date reduces to a date comparison.
    deadline < now.date()
}

/// Whole days from today until `deadline`: 0 when due today, negative once past.
///
/// Uses calendar days so that `days_until(d, now) < 0` exactly when
/// `is_overdue(d, now)`.
pub fn days_until(deadline: NaiveDate, now: NaiveDateTime) -> i64 {
    deadline.signed_duration_since(now.date()).num_days()
}

/// First day of the calendar week.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeekStart {
    #[default]
    Sunday,
    Monday,
}

impl WeekStart {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sunday => "sunday",
            Self::Monday => "monday",
        }
    }

    fn offset(&self, date: NaiveDate) -> i64 {
        let weekday = date.weekday();
        let days = match self {
            Self::Sunday => weekday.num_days_from_sunday(),
            Self::Monday => weekday.num_days_from_monday(),
        };
        i64::from(days)
    }
}

impl fmt::Display for WeekStart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WeekStart {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sunday" | "sun" => Ok(Self::Sunday),
            "monday" | "mon" => Ok(Self::Monday),
            other => Err(format!("unknown week start '{other}' (expected sunday or monday)")),
        }
    }
}

/// Inclusive bounds of the calendar week containing `date`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Week {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Week {
    pub fn containing(date: NaiveDate, week_start: WeekStart) -> Self {
        let start = date - Duration::days(week_start.offset(date));
        Self {
            start,
            end: start + Duration::days(6),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// The seven dates of the week, in order.
    pub fn dates(&self) -> [NaiveDate; 7] {
        std::array::from_fn(|i| self.start + Duration::days(i as i64))
    }
}

/// The seven dates of the week containing `now`.
pub fn week_dates(now: NaiveDateTime, week_start: WeekStart) -> [NaiveDate; 7] {
    Week::containing(now.date(), week_start).dates()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(d: NaiveDate, h: u32, min: u32) -> NaiveDateTime {
        d.and_hms_opt(h, min, 0).unwrap()
    }

    #[test]
    fn same_day_deadline_is_never_overdue() {
        let today = date(2024, 5, 15);
        for (h, m) in [(0, 0), (0, 1), (12, 0), (23, 59)] {
            assert!(!is_overdue(today, at(today, h, m)));
            assert_eq!(days_until(today, at(today, h, m)), 0);
        }
    }

    #[test]
    fn yesterday_is_overdue_tomorrow_is_not() {
        let now = at(date(2024, 5, 15), 8, 30);
        assert!(is_overdue(date(2024, 5, 14), now));
        assert!(!is_overdue(date(2024, 5, 16), now));
        assert_eq!(days_until(date(2024, 5, 14), now), -1);
        assert_eq!(days_until(date(2024, 5, 16), now), 1);
        assert_eq!(days_until(date(2024, 6, 14), now), 30);
    }

    #[test]
    fn overdue_agrees_with_days_until() {
        let now = at(date(2024, 3, 1), 17, 45);
        for offset in -40..=40 {
            let deadline = now.date() + Duration::days(offset);
            assert_eq!(is_overdue(deadline, now), days_until(deadline, now) < 0);
        }
    }

    #[test]
    fn sunday_week_contains_wednesday() {
        // 2024-05-15 is a Wednesday.
        let week = Week::containing(date(2024, 5, 15), WeekStart::Sunday);
        assert_eq!(week.start, date(2024, 5, 12));
        assert_eq!(week.end, date(2024, 5, 18));
        assert_eq!(week.start.weekday(), Weekday::Sun);
    }

    #[test]
    fn monday_week_starts_on_monday() {
        let week = Week::containing(date(2024, 5, 12), WeekStart::Monday);
        assert_eq!(week.start, date(2024, 5, 6));
        assert_eq!(week.end, date(2024, 5, 12));
    }

    #[test]
    fn week_dates_are_consecutive() {
        let dates = week_dates(at(date(2024, 12, 31), 9, 0), WeekStart::Sunday);
        assert_eq!(dates[0], date(2024, 12, 29));
        assert_eq!(dates[6], date(2025, 1, 4));
        for pair in dates.windows(2) {
            assert_eq!(pair[1] - pair[0], Duration::days(1));
        }
    }

    #[test]
    fn week_start_parses() {
        assert_eq!("Monday".parse::<WeekStart>(), Ok(WeekStart::Monday));
        assert_eq!("sun".parse::<WeekStart>(), Ok(WeekStart::Sunday));
        assert!("friday".parse::<WeekStart>().is_err());
    }
}
