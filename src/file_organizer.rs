//! Directory organization: moving files into category folders.
//!
//! An organize pass creates one folder per known category under the target
//! directory, then moves every top-level regular file into the folder of its
//! category. Progress and log lines are reported through two caller-supplied
//! sinks, invoked synchronously in file-processing order.

use crate::file_category::{CategoryTable, CustomCategories};
use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Errors that can occur during file organization operations.
#[derive(Debug)]
pub enum OrganizeError {
    /// Failed to create a category directory.
    DirectoryCreationFailed { path: PathBuf, source: io::Error },
    /// Failed to move a file to its category directory.
    FileMoveFailure {
        source: PathBuf,
        destination: PathBuf,
        source_error: io::Error,
    },
    /// A file with the same name already exists in the category directory.
    DestinationExists { destination: PathBuf },
    /// The base directory path is invalid or doesn't exist.
    InvalidBasePath { path: PathBuf, source: io::Error },
    /// The background organize thread panicked.
    WorkerPanicked,
}

impl std::fmt::Display for OrganizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DirectoryCreationFailed { path, source } => {
                write!(
                    f,
                    "Failed to create directory {}: {}",
                    path.display(),
                    source
                )
            }
            Self::FileMoveFailure {
                source,
                destination,
                source_error,
            } => {
                write!(
                    f,
                    "Failed to move {} to {}: {}",
                    source.display(),
                    destination.display(),
                    source_error
                )
            }
            Self::DestinationExists { destination } => {
                write!(f, "destination already exists: {}", destination.display())
            }
            Self::InvalidBasePath { path, source } => {
                write!(f, "Invalid base path {}: {}", path.display(), source)
            }
            Self::WorkerPanicked => write!(f, "Organize worker thread panicked"),
        }
    }
}

impl std::error::Error for OrganizeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::DirectoryCreationFailed { source, .. } | Self::InvalidBasePath { source, .. } => {
                Some(source)
            }
            Self::FileMoveFailure { source_error, .. } => Some(source_error),
            Self::DestinationExists { .. } | Self::WorkerPanicked => None,
        }
    }
}

/// Result type for file organization operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// Outcome of one organize pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrganizeReport {
    /// Number of files moved into a category folder.
    pub moved: usize,
    /// Files that could not be moved, with the reason.
    pub failed: Vec<(String, String)>,
    /// Moved-file counts per category, in category lookup order with
    /// `Others` last. Categories with no moved files are omitted.
    pub category_counts: Vec<(String, usize)>,
    /// Top-level entries that could not be read while listing the directory.
    pub unreadable_entries: Vec<String>,
}

impl OrganizeReport {
    /// Total number of files the pass attempted to move.
    pub fn total_processed(&self) -> usize {
        self.moved + self.failed.len()
    }

    /// Returns true if every eligible file was moved.
    pub fn is_complete_success(&self) -> bool {
        self.failed.is_empty() && self.unreadable_entries.is_empty()
    }
}

/// Top-level directory contents eligible for an organize pass.
#[derive(Debug, Default)]
struct Snapshot {
    /// Regular files, in listing order.
    files: Vec<OsString>,
    /// Entries whose metadata could not be read, with the reason.
    unreadable: Vec<String>,
}

impl Snapshot {
    /// Builds a snapshot from listed entries. `Ok(None)` marks an entry that
    /// is not a regular file.
    fn collect<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = io::Result<Option<OsString>>>,
    {
        let mut snapshot = Self::default();
        for entry in entries {
            match entry {
                Ok(Some(file_name)) => snapshot.files.push(file_name),
                Ok(None) => {}
                Err(e) => snapshot.unreadable.push(e.to_string()),
            }
        }
        snapshot
    }
}

/// A move the organizer would perform, computed without touching the disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedMove {
    pub file_name: String,
    pub category: String,
    pub destination: PathBuf,
}

/// Organizes files by moving them into category subdirectories.
pub struct FileOrganizer;

impl FileOrganizer {
    /// Runs one organize pass over `directory`.
    ///
    /// Every category folder (custom, built-in and `Others`) is created first.
    /// Each top-level regular file is then classified and moved; a failed move
    /// is logged and the pass continues. After each file, `on_progress`
    /// receives `processed / total`. No progress is reported when the
    /// directory holds no files. Entries that cannot be read while listing
    /// the directory are logged up front and not counted in `total`. Symlinks
    /// and directories are never moved. The last log line is always
    /// `Files organized: {moved}`.
    ///
    /// # Errors
    ///
    /// Returns `OrganizeError::InvalidBasePath` without touching the disk if
    /// `directory` is missing or not a directory, and
    /// `OrganizeError::DirectoryCreationFailed` if a category folder cannot be
    /// created. Per-file failures are never returned as errors.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use foldersort::file_category::CustomCategories;
    /// use foldersort::file_organizer::FileOrganizer;
    /// use std::path::Path;
    ///
    /// let report = FileOrganizer::organize(
    ///     Path::new("/path/to/Downloads"),
    ///     &CustomCategories::new(),
    ///     |fraction| println!("{:.0}%", fraction * 100.0),
    ///     |line| println!("{}", line),
    /// );
    ///
    /// match report {
    ///     Ok(report) => println!("Moved {} files", report.moved),
    ///     Err(e) => eprintln!("Organization failed: {}", e),
    /// }
    /// ```
    pub fn organize<P, L>(
        directory: &Path,
        custom: &CustomCategories,
        mut on_progress: P,
        mut on_log: L,
    ) -> OrganizeResult<OrganizeReport>
    where
        P: FnMut(f64),
        L: FnMut(&str),
    {
        Self::validate_base_path(directory)?;

        let table = CategoryTable::new(custom);
        Self::ensure_category_dirs(directory, &table)?;

        let snapshot = Self::snapshot(directory)?;
        let total_files = snapshot.files.len();
        let mut report = OrganizeReport::default();
        let mut moved_categories: Vec<&str> = Vec::with_capacity(total_files);

        for reason in snapshot.unreadable {
            on_log(&format!("Error reading entry in {}: {}", directory.display(), reason));
            report.unreadable_entries.push(reason);
        }

        for (index, file_name) in snapshot.files.iter().enumerate() {
            let display_name = file_name.to_string_lossy();
            let category = table.classify(&display_name);

            match Self::move_to_category(directory, file_name, category) {
                Ok(_) => {
                    report.moved += 1;
                    moved_categories.push(category);
                    on_log(&format!("Moved: {} to {}", display_name, category));
                }
                Err(e) => {
                    on_log(&format!("Error moving file {}: {}", display_name, e));
                    report.failed.push((display_name.to_string(), e.to_string()));
                }
            }

            on_progress((index + 1) as f64 / total_files as f64);
        }

        report.category_counts = table.tally(moved_categories);
        on_log(&format!("Files organized: {}", report.moved));
        Ok(report)
    }

    /// Computes the moves an organize pass would make, without creating
    /// folders or moving files. Unreadable entries are left out.
    ///
    /// # Errors
    ///
    /// Returns `OrganizeError::InvalidBasePath` if `directory` is missing or
    /// not a directory.
    pub fn plan(directory: &Path, custom: &CustomCategories) -> OrganizeResult<Vec<PlannedMove>> {
        Self::validate_base_path(directory)?;

        let table = CategoryTable::new(custom);
        let plan = Self::snapshot(directory)?
            .files
            .into_iter()
            .map(|file_name| {
                let name = file_name.to_string_lossy().to_string();
                let category = table.classify(&name).to_string();
                PlannedMove {
                    destination: directory.join(&category).join(&file_name),
                    file_name: name,
                    category,
                }
            })
            .collect();

        Ok(plan)
    }

    /// Moves `file_name` from `base_path` into its category folder.
    ///
    /// The category folder must already exist. An existing file at the
    /// destination is never overwritten; the move fails with
    /// `OrganizeError::DestinationExists` instead.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use foldersort::file_organizer::FileOrganizer;
    /// use std::ffi::OsStr;
    /// use std::path::Path;
    ///
    /// let result = FileOrganizer::move_to_category(
    ///     Path::new("/path/to/base"),
    ///     OsStr::new("image.png"),
    ///     "Images",
    /// );
    ///
    /// match result {
    ///     Ok(path) => println!("Moved to {}", path.display()),
    ///     Err(e) => eprintln!("Move failed: {}", e),
    /// }
    /// ```
    pub fn move_to_category(
        base_path: &Path,
        file_name: &OsStr,
        category: &str,
    ) -> OrganizeResult<PathBuf> {
        let source = base_path.join(file_name);
        let destination = base_path.join(category).join(file_name);

        if fs::symlink_metadata(&destination).is_ok() {
            return Err(OrganizeError::DestinationExists { destination });
        }

        match fs::rename(&source, &destination) {
            Ok(()) => Ok(destination),
            Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
                Self::copy_then_remove(&source, &destination)?;
                Ok(destination)
            }
            Err(e) => Err(OrganizeError::FileMoveFailure {
                source,
                destination,
                source_error: e,
            }),
        }
    }

    fn copy_then_remove(source: &Path, destination: &Path) -> OrganizeResult<()> {
        Self::copy_then_remove_with(source, destination, |path| fs::remove_file(path))
    }

    /// Copies `source` to `destination`, then deletes `source` with
    /// `remove_source`. If that deletion fails the copy is deleted again.
    fn copy_then_remove_with<R>(
        source: &Path,
        destination: &Path,
        remove_source: R,
    ) -> OrganizeResult<()>
    where
        R: FnOnce(&Path) -> io::Result<()>,
    {
        let to_failure = |e: io::Error| OrganizeError::FileMoveFailure {
            source: source.to_path_buf(),
            destination: destination.to_path_buf(),
            source_error: e,
        };

        fs::copy(source, destination).map_err(to_failure)?;
        if let Err(e) = remove_source(source) {
            // Leave exactly one copy behind.
            let _ = fs::remove_file(destination);
            return Err(to_failure(e));
        }
        Ok(())
    }

    fn validate_base_path(directory: &Path) -> OrganizeResult<()> {
        let metadata = fs::metadata(directory).map_err(|e| OrganizeError::InvalidBasePath {
            path: directory.to_path_buf(),
            source: e,
        })?;

        if !metadata.is_dir() {
            return Err(OrganizeError::InvalidBasePath {
                path: directory.to_path_buf(),
                source: io::Error::new(io::ErrorKind::NotADirectory, "not a directory"),
            });
        }
        Ok(())
    }

    fn ensure_category_dirs(directory: &Path, table: &CategoryTable) -> OrganizeResult<()> {
        for name in table.folder_names() {
            let category_path = directory.join(name);
            if category_path.is_dir() {
                continue;
            }
            fs::create_dir(&category_path).map_err(|e| OrganizeError::DirectoryCreationFailed {
                path: category_path.clone(),
                source: e,
            })?;
        }
        Ok(())
    }

    /// Lists the top-level regular files, in directory listing order.
    fn snapshot(directory: &Path) -> OrganizeResult<Snapshot> {
        let entries = fs::read_dir(directory).map_err(|e| OrganizeError::InvalidBasePath {
            path: directory.to_path_buf(),
            source: e,
        })?;

        Ok(Snapshot::collect(entries.map(|entry| -> io::Result<Option<OsString>> {
            let entry = entry?;
            let is_file = entry.file_type()?.is_file();
            Ok(is_file.then(|| entry.file_name()))
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn organize_collecting(
        base_path: &Path,
        custom: &CustomCategories,
    ) -> (OrganizeResult<OrganizeReport>, Vec<f64>, Vec<String>) {
        let mut progress = Vec::new();
        let mut log = Vec::new();
        let result = FileOrganizer::organize(
            base_path,
            custom,
            |fraction| progress.push(fraction),
            |line| log.push(line.to_string()),
        );
        (result, progress, log)
    }

    #[test]
    fn test_move_to_category_uses_existing_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();

        let category_dir = base_path.join("Images");
        fs::create_dir(&category_dir).expect("Failed to create category directory");
        let file_path = base_path.join("test.png");
        fs::write(&file_path, "test content").expect("Failed to write test file");

        let moved = FileOrganizer::move_to_category(base_path, OsStr::new("test.png"), "Images")
            .expect("Failed to move file");

        assert!(!file_path.exists());
        assert_eq!(moved, category_dir.join("test.png"));
        assert!(moved.exists());
    }

    #[test]
    fn test_move_to_category_refuses_to_overwrite() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();

        fs::create_dir(base_path.join("Documents")).expect("Failed to create category directory");
        fs::write(base_path.join("Documents/b.txt"), "old").expect("Failed to write file");
        fs::write(base_path.join("b.txt"), "new").expect("Failed to write file");

        let result = FileOrganizer::move_to_category(base_path, OsStr::new("b.txt"), "Documents");

        assert!(matches!(result, Err(OrganizeError::DestinationExists { .. })));
        assert_eq!(fs::read_to_string(base_path.join("b.txt")).unwrap(), "new");
        assert_eq!(
            fs::read_to_string(base_path.join("Documents/b.txt")).unwrap(),
            "old"
        );
    }

    #[test]
    fn test_move_to_category_missing_folder_fails() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        fs::write(base_path.join("a.jpg"), "x").expect("Failed to write file");

        let result = FileOrganizer::move_to_category(base_path, OsStr::new("a.jpg"), "Images");
        assert!(matches!(result, Err(OrganizeError::FileMoveFailure { .. })));
        assert!(base_path.join("a.jpg").exists());
    }

    #[test]
    fn test_organize_invalid_base_path() {
        let non_existent = Path::new("/non/existent/path");
        let (result, progress, log) = organize_collecting(non_existent, &CustomCategories::new());

        assert!(matches!(result, Err(OrganizeError::InvalidBasePath { .. })));
        assert!(progress.is_empty());
        assert!(log.is_empty());
    }

    #[test]
    fn test_organize_rejects_regular_file_as_base() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let file_path = temp_dir.path().join("not_a_dir.txt");
        fs::write(&file_path, "x").expect("Failed to write file");

        let (result, _, _) = organize_collecting(&file_path, &CustomCategories::new());
        assert!(matches!(result, Err(OrganizeError::InvalidBasePath { .. })));
    }

    #[test]
    fn test_organize_empty_directory_reports_no_progress() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let (result, progress, log) =
            organize_collecting(temp_dir.path(), &CustomCategories::new());

        let report = result.expect("Organize failed");
        assert_eq!(report.moved, 0);
        assert!(progress.is_empty());
        assert_eq!(log, vec!["Files organized: 0".to_string()]);
    }

    #[test]
    fn test_organize_progress_and_log_order() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        for name in ["a.jpg", "b.txt", "report.xyz"] {
            fs::write(base_path.join(name), name).expect("Failed to write file");
        }

        let (result, progress, log) = organize_collecting(base_path, &CustomCategories::new());
        let report = result.expect("Organize failed");

        assert_eq!(report.moved, 3);
        assert_eq!(progress.len(), 3);
        assert!((progress[0] - 1.0 / 3.0).abs() < f64::EPSILON);
        assert!(progress.windows(2).all(|pair| pair[0] < pair[1]));
        assert!((progress[2] - 1.0).abs() < f64::EPSILON);

        assert_eq!(log.len(), 4);
        assert!(log[..3].iter().all(|line| line.starts_with("Moved: ")));
        assert!(log.contains(&"Moved: a.jpg to Images".to_string()));
        assert!(log.contains(&"Moved: b.txt to Documents".to_string()));
        assert!(log.contains(&"Moved: report.xyz to Others".to_string()));
        assert_eq!(log[3], "Files organized: 3");
    }

    #[test]
    fn test_organize_collision_is_logged_and_skipped() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();

        fs::create_dir(base_path.join("Images")).expect("Failed to create category directory");
        fs::write(base_path.join("Images/a.jpg"), "old").expect("Failed to write file");
        fs::write(base_path.join("a.jpg"), "new").expect("Failed to write file");
        fs::write(base_path.join("b.png"), "png").expect("Failed to write file");

        let (result, progress, log) = organize_collecting(base_path, &CustomCategories::new());
        let report = result.expect("Organize failed");

        assert_eq!(report.moved, 1);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, "a.jpg");
        assert_eq!(progress.len(), 2);
        assert!(
            log.iter()
                .any(|line| line.starts_with("Error moving file a.jpg: destination already exists"))
        );
        assert_eq!(log.last().map(String::as_str), Some("Files organized: 1"));
        assert!(base_path.join("a.jpg").exists());
    }

    #[test]
    fn test_organize_folder_creation_failure_moves_nothing() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();

        // A regular file occupies the name of a category folder.
        fs::write(base_path.join("Videos"), "blocker").expect("Failed to write file");
        fs::write(base_path.join("a.jpg"), "x").expect("Failed to write file");

        let (result, _, log) = organize_collecting(base_path, &CustomCategories::new());

        assert!(matches!(
            result,
            Err(OrganizeError::DirectoryCreationFailed { .. })
        ));
        assert!(log.is_empty());
        assert!(base_path.join("a.jpg").exists());
    }

    #[test]
    fn test_report_category_counts() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        for name in ["a.jpg", "b.png", "c.pdf"] {
            fs::write(base_path.join(name), name).expect("Failed to write file");
        }

        let (result, _, _) = organize_collecting(base_path, &CustomCategories::new());
        let counts = result.expect("Organize failed").category_counts;

        assert_eq!(
            counts,
            vec![("Images".to_string(), 2), ("Documents".to_string(), 1)]
        );
    }

    #[test]
    fn test_report_category_counts_ignore_listing_order() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        for name in ["a.pdf", "b.jpg", "c.mp3", "d.zip", "e.mp4", "f.xyz", "g.epub"] {
            fs::write(base_path.join(name), name).expect("Failed to write file");
        }
        let mut custom = CustomCategories::new();
        custom.insert("Ebooks", [".epub"]).unwrap();

        let (result, _, _) = organize_collecting(base_path, &custom);
        let names: Vec<String> = result
            .expect("Organize failed")
            .category_counts
            .into_iter()
            .map(|(name, _)| name)
            .collect();

        assert_eq!(
            names,
            vec![
                "Images", "Documents", "Videos", "Audios", "Archives", "Ebooks", "Others"
            ]
        );
    }

    #[test]
    fn test_snapshot_keeps_files_and_records_unreadable_entries() {
        let snapshot = Snapshot::collect(vec![
            Ok(Some(OsString::from("a.jpg"))),
            Ok(None),
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied")),
            Ok(Some(OsString::from("b.txt"))),
        ]);

        assert_eq!(
            snapshot.files,
            vec![OsString::from("a.jpg"), OsString::from("b.txt")]
        );
        assert_eq!(snapshot.unreadable, vec!["denied".to_string()]);
    }

    #[test]
    fn test_copy_then_remove_moves_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let source = temp_dir.path().join("a.jpg");
        let destination = temp_dir.path().join("b.jpg");
        fs::write(&source, "payload").expect("Failed to write file");

        FileOrganizer::copy_then_remove(&source, &destination).expect("Copy fallback failed");

        assert!(!source.exists());
        assert_eq!(fs::read_to_string(&destination).unwrap(), "payload");
    }

    #[test]
    fn test_copy_then_remove_keeps_one_copy_when_source_stays() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let source = temp_dir.path().join("a.jpg");
        let destination = temp_dir.path().join("b.jpg");
        fs::write(&source, "payload").expect("Failed to write file");

        let result = FileOrganizer::copy_then_remove_with(&source, &destination, |_| {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"))
        });

        assert!(matches!(result, Err(OrganizeError::FileMoveFailure { .. })));
        assert_eq!(fs::read_to_string(&source).unwrap(), "payload");
        assert!(!destination.exists());
    }

    #[test]
    fn test_copy_then_remove_missing_source_fails() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let source = temp_dir.path().join("missing.jpg");
        let destination = temp_dir.path().join("b.jpg");

        let result = FileOrganizer::copy_then_remove(&source, &destination);

        assert!(matches!(result, Err(OrganizeError::FileMoveFailure { .. })));
        assert!(!destination.exists());
    }

    #[test]
    fn test_plan_touches_nothing() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        fs::write(base_path.join("a.jpg"), "x").expect("Failed to write file");
        fs::create_dir(base_path.join("nested")).expect("Failed to create directory");

        let plan = FileOrganizer::plan(base_path, &CustomCategories::new()).expect("Plan failed");

        assert_eq!(
            plan,
            vec![PlannedMove {
                file_name: "a.jpg".to_string(),
                category: "Images".to_string(),
                destination: base_path.join("Images").join("a.jpg"),
            }]
        );
        assert!(base_path.join("a.jpg").exists());
        assert!(!base_path.join("Images").exists());
    }
}
