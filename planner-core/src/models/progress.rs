use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::lenient;

/// A daily study log entry. Entries are never edited after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEntry {
    pub id: String,
    pub date: NaiveDate,
    #[serde(default, deserialize_with = "lenient::text")]
    pub subject: Option<String>,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub hours_studied: Option<f64>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub tasks_completed: Option<u32>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub notes: Option<String>,
    #[serde(default)]
    pub mood: Mood,
    pub created_at: DateTime<Utc>,
}

impl ProgressEntry {
    /// Hours studied, with absent values counted as zero.
    pub fn hours(&self) -> f64 {
        self.hours_studied.unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    Excellent,
    #[default]
    Good,
    Okay,
    Poor,
}

impl Mood {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Okay => "okay",
            Self::Poor => "poor",
        }
    }

    /// Position on the scale poor = 1 .. excellent = 4.
    pub fn ordinal(&self) -> u8 {
        match self {
            Self::Poor => 1,
            Self::Okay => 2,
            Self::Good => 3,
            Self::Excellent => 4,
        }
    }

    pub fn from_ordinal(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::Poor),
            2 => Some(Self::Okay),
            3 => Some(Self::Good),
            4 => Some(Self::Excellent),
            _ => None,
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mood {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "excellent" => Ok(Self::Excellent),
            "good" => Ok(Self::Good),
            "okay" | "ok" => Ok(Self::Okay),
            "poor" => Ok(Self::Poor),
            other => Err(format!(
                "unknown mood '{other}' (expected excellent, good, okay or poor)"
            )),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateProgressInput {
    pub date: Option<NaiveDate>,
    pub subject: Option<String>,
    pub hours_studied: Option<f64>,
    pub tasks_completed: Option<u32>,
    pub notes: Option<String>,
    pub mood: Option<Mood>,
}
