//! Command-line interface module for foldersort.
//!
//! This module handles all CLI-related functionality including:
//! - Resolving custom categories from a config file and arguments
//! - Running the organize pass on a background thread
//! - Rendering progress, log lines and the final summary
//! - Dry-run planning

use crate::config::resolve_custom_categories;
use crate::file_category::{CategoryTable, CustomCategories};
use crate::file_organizer::FileOrganizer;
use crate::output::OutputFormatter;
use crate::worker::{OrganizeEvent, spawn_organize};
use std::path::Path;

/// Options for a single CLI run.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// If true, show the plan without making changes.
    pub dry_run: bool,
}

/// Organizes `dir_path` with the given custom categories, or only shows the
/// plan when `options.dry_run` is set.
///
/// # Examples
///
/// ```no_run
/// use foldersort::cli::{RunOptions, run_cli};
/// use foldersort::file_category::CustomCategories;
/// use std::path::Path;
///
/// let result = run_cli(
///     RunOptions::default(),
///     Path::new("/path/to/directory"),
///     CustomCategories::new(),
/// );
/// match result {
///     Ok(()) => println!("Operation completed successfully"),
///     Err(e) => eprintln!("Error: {}", e),
/// }
/// ```
pub fn run_cli(
    options: RunOptions,
    dir_path: &Path,
    custom: CustomCategories,
) -> Result<(), String> {
    if options.dry_run {
        organize_directory_dry_run(dir_path, &custom)
    } else {
        organize_directory(dir_path, custom)
    }
}

/// Runs the CLI application, building custom categories from an optional
/// config file followed by `NAME=.ext,.ext` specs.
///
/// # Arguments
///
/// * `options` - Run options
/// * `dir_path` - The directory path to operate on
/// * `config_path` - Optional path to a TOML file with custom categories
/// * `category_specs` - Custom categories given on the command line
pub fn run_cli_with_config(
    options: RunOptions,
    dir_path: &Path,
    config_path: Option<&Path>,
    category_specs: &[String],
) -> Result<(), String> {
    let custom = resolve_custom_categories(config_path, category_specs)
        .map_err(|e| format!("Error loading configuration: {}", e))?;
    run_cli(options, dir_path, custom)
}

/// Organizes files in a directory into category subdirectories.
///
/// The pass runs on a worker thread; this thread renders its events in the
/// order they were produced.
fn organize_directory(base_path: &Path, custom: CustomCategories) -> Result<(), String> {
    OutputFormatter::info(&format!("Organizing contents of: {}", base_path.display()));

    let handle = spawn_organize(base_path.to_path_buf(), custom);
    let pb = OutputFormatter::create_progress_bar();

    for event in handle.events() {
        match event {
            OrganizeEvent::Progress(fraction) => OutputFormatter::set_progress(&pb, fraction),
            OrganizeEvent::Log(line) => pb.suspend(|| OutputFormatter::log_line(&line)),
        }
    }
    pb.finish_and_clear();

    let report = handle.join().map_err(|e| format!("Error: {}", e))?;

    if !report.category_counts.is_empty() {
        OutputFormatter::summary_table(&report.category_counts, report.moved);
    }

    if !report.failed.is_empty() {
        OutputFormatter::warning(&format!(
            "{} of {} files could not be organized. Please review errors above.",
            report.failed.len(),
            report.total_processed()
        ));
    }
    if !report.unreadable_entries.is_empty() {
        OutputFormatter::warning(&format!(
            "{} entries could not be read and were left in place.",
            report.unreadable_entries.len()
        ));
    }

    Ok(())
}

/// Shows where each file would go without creating folders or moving files.
fn organize_directory_dry_run(base_path: &Path, custom: &CustomCategories) -> Result<(), String> {
    OutputFormatter::dry_run_notice(&format!("Analyzing contents of: {}", base_path.display()));

    let plan = FileOrganizer::plan(base_path, custom).map_err(|e| format!("Error: {}", e))?;

    if plan.is_empty() {
        OutputFormatter::plain("No files found to organize.");
        return Ok(());
    }

    OutputFormatter::header("Files would be organized as follows:");
    for planned in &plan {
        OutputFormatter::plain(&format!(
            " - {} → {}/",
            planned.file_name, planned.category
        ));
    }

    let category_counts =
        CategoryTable::new(custom).tally(plan.iter().map(|planned| planned.category.as_str()));
    OutputFormatter::summary_table(&category_counts, plan.len());
    OutputFormatter::dry_run_notice("No files were modified.");
    OutputFormatter::plain(&format!(
        "Run 'foldersort {}' (without --dry-run) to execute the organization.",
        base_path.display()
    ));

    Ok(())
}
