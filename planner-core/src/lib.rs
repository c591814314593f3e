//! Core library for the study planner.
//!
//! This crate provides the study records (goals, tasks, sessions and progress
//! entries), the entity store that holds them, the persistence backends, and
//! the derivation engine that turns a snapshot into dashboard statistics.
//! It is independent of any front-end.
//!
//! # Usage
//!
//! ```no_run
//! use chrono::Local;
//! use planner_core::derivation::{Dashboard, Limits};
//! use planner_core::{Database, EntityStore};
//!
//! let db = Database::open_default()?;
//! db.migrate()?;
//!
//! let store = EntityStore::open(db)?;
//! let now = Local::now().naive_local();
//! let dashboard = Dashboard::compute(store.snapshot(), now, &Limits::default());
//! println!("{}% of tasks done", dashboard.tasks.completion_rate);
//! # Ok::<(), planner_core::Error>(())
//! ```

pub mod db;
pub mod derivation;
pub mod error;
pub mod file;
pub mod forms;
pub mod models;
pub mod store;

// Re-export commonly used types at crate root
pub use db::Database;
pub use error::{Error, Result};
pub use file::JsonFile;
pub use store::{EntityStore, Persistence, Section, SectionKind, StudyData};
