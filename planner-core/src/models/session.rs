use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::lenient;

pub const DEFAULT_SESSION_TYPE: &str = "study";

pub const SESSION_TYPES: &[&str] = &[
    "study",
    "lecture",
    "exam",
    "assignment",
    "group",
    "break",
    "other",
];

/// A scheduled study session. Stored under the `schedule` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub date: NaiveDate,
    #[serde(with = "lenient::hh_mm")]
    pub time: NaiveTime,
    /// Free text such as "90 min".
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub subject: String,
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub reminder: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_kind() -> String {
    DEFAULT_SESSION_TYPE.to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateSessionInput {
    pub title: String,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub duration: Option<String>,
    pub subject: Option<String>,
    pub kind: Option<String>,
    pub location: Option<String>,
    pub reminder: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateSessionInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub duration: Option<String>,
    pub subject: Option<String>,
    pub kind: Option<String>,
    pub location: Option<String>,
    pub reminder: Option<bool>,
}
