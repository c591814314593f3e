//! The `studyplan` command-line front-end for `planner-core`.

pub mod cli;
pub mod commands;
pub mod config;
pub mod render;
