//! foldersort - sort a directory's files into category folders
//!
//! This library classifies filenames by extension against a built-in table
//! overlaid with user-defined categories, and moves the top-level files of a
//! directory into one folder per category while reporting progress and log
//! lines to the caller.

pub mod cli;
pub mod config;
pub mod file_category;
pub mod file_organizer;
pub mod output;
pub mod worker;

pub use config::{CategoryConfig, ConfigError};
pub use file_category::{CategoryTable, CustomCategories, FALLBACK_CATEGORY, classify};
pub use file_organizer::{FileOrganizer, OrganizeError, OrganizeReport, OrganizeResult, PlannedMove};
pub use worker::{OrganizeEvent, OrganizeHandle, spawn_organize};

pub use cli::{RunOptions, run_cli, run_cli_with_config};
