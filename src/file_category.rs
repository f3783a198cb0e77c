//! Extension-based file categorization.
//!
//! This module maps a filename to a category name using a table of built-in
//! categories overlaid with caller-supplied custom categories.
//!
//! # Examples
//!
//! ```
//! use foldersort::file_category::{CustomCategories, classify};
//!
//! let mut custom = CustomCategories::new();
//! custom.insert("Ebooks", [".epub", ".mobi"]).unwrap();
//!
//! assert_eq!(classify("PHOTO.JPG", &custom), "Images");
//! assert_eq!(classify("book.epub", &custom), "Ebooks");
//! assert_eq!(classify("report.xyz", &custom), "Others");
//! ```

use crate::config::ConfigError;

/// Name of the catch-all category for files that match no extension.
pub const FALLBACK_CATEGORY: &str = "Others";

/// The built-in category table, in lookup order.
pub const BUILTIN_CATEGORIES: &[(&str, &[&str])] = &[
    ("Images", &[".jpg", ".jpeg", ".png", ".gif", ".bmp"]),
    ("Documents", &[".pdf", ".docx", ".txt", ".xlsx", ".pptx"]),
    ("Videos", &[".mp4", ".avi", ".mov", ".mkv"]),
    ("Audios", &[".mp3", ".wav", ".flac"]),
    ("Archives", &[".zip", ".rar", ".tar"]),
];

/// User-defined categories that overlay the built-in table.
///
/// Entries keep their insertion order. Inserting a name that is already
/// present replaces its extension list in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomCategories {
    entries: Vec<(String, Vec<String>)>,
}

impl CustomCategories {
    /// Creates an empty set of custom categories.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a custom category.
    ///
    /// Extensions are normalized: surrounding whitespace is trimmed, they are
    /// lowercased, and a leading `.` is added when missing. Blank entries are
    /// dropped.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidCategoryName` if the name is empty, is `.`
    /// or `..`, or contains a path separator.
    pub fn insert<I, S>(&mut self, name: &str, extensions: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let name = validate_category_name(name)?;
        let extensions: Vec<String> = extensions
            .into_iter()
            .filter_map(|ext| normalize_extension(ext.as_ref()))
            .collect();

        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, current)) => *current = extensions,
            None => self.entries.push((name.to_string(), extensions)),
        }
        Ok(())
    }

    /// Returns the extensions registered for `name`, if any.
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, extensions)| extensions.as_slice())
    }

    /// Iterates over category names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn validate_category_name(name: &str) -> Result<&str, ConfigError> {
    let trimmed = name.trim();
    if trimmed.is_empty()
        || trimmed == "."
        || trimmed == ".."
        || trimmed.contains(['/', '\\'])
    {
        return Err(ConfigError::InvalidCategoryName(name.to_string()));
    }
    Ok(trimmed)
}

fn normalize_extension(ext: &str) -> Option<String> {
    let ext = ext.trim().to_lowercase();
    if ext.is_empty() {
        return None;
    }
    if ext.starts_with('.') {
        Some(ext)
    } else {
        Some(format!(".{}", ext))
    }
}

/// Returns the lowercase extension of `filename`, including the leading dot.
///
/// Leading dots are part of the stem, so hidden files such as `.bashrc` have
/// no extension. A trailing dot yields `"."`.
///
/// # Examples
///
/// ```
/// use foldersort::file_category::extension_of;
///
/// assert_eq!(extension_of("PHOTO.JPG"), ".jpg");
/// assert_eq!(extension_of("archive.tar.gz"), ".gz");
/// assert_eq!(extension_of(".bashrc"), "");
/// assert_eq!(extension_of("README"), "");
/// ```
pub fn extension_of(filename: &str) -> String {
    let stem_start = filename.trim_start_matches('.');
    match stem_start.rfind('.') {
        Some(index) => stem_start[index..].to_lowercase(),
        None => String::new(),
    }
}

/// The merged lookup table: built-ins first, custom categories overlaid.
#[derive(Debug, Clone)]
pub struct CategoryTable {
    entries: Vec<(String, Vec<String>)>,
    custom_names: Vec<String>,
}

impl CategoryTable {
    /// Builds the merged table for one organize pass.
    ///
    /// A custom category with a built-in's name replaces that built-in's
    /// extensions but keeps its position; other custom categories are
    /// appended after the built-ins.
    pub fn new(custom: &CustomCategories) -> Self {
        let mut entries: Vec<(String, Vec<String>)> = BUILTIN_CATEGORIES
            .iter()
            .map(|(name, extensions)| {
                (
                    name.to_string(),
                    extensions.iter().map(|ext| ext.to_string()).collect(),
                )
            })
            .collect();

        for (name, extensions) in &custom.entries {
            match entries.iter_mut().find(|(existing, _)| existing == name) {
                Some((_, current)) => current.clone_from(extensions),
                None => entries.push((name.clone(), extensions.clone())),
            }
        }

        Self {
            entries,
            custom_names: custom.names().map(str::to_string).collect(),
        }
    }

    /// Returns the category for `filename`.
    ///
    /// Scans the table in order and returns the first category whose
    /// extension list contains the file's extension, or `"Others"`.
    pub fn classify(&self, filename: &str) -> &str {
        let ext = extension_of(filename);
        if ext.is_empty() {
            return FALLBACK_CATEGORY;
        }

        self.entries
            .iter()
            .find(|(_, extensions)| extensions.iter().any(|e| *e == ext))
            .map(|(name, _)| name.as_str())
            .unwrap_or(FALLBACK_CATEGORY)
    }

    /// Returns every folder an organize pass must create, without duplicates.
    ///
    /// Custom categories come first, then the built-ins, then the fallback.
    pub fn folder_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::with_capacity(self.entries.len() + 1);
        let candidates = self
            .custom_names
            .iter()
            .map(String::as_str)
            .chain(BUILTIN_CATEGORIES.iter().map(|(name, _)| *name))
            .chain(std::iter::once(FALLBACK_CATEGORY));

        for name in candidates {
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }

    /// Counts `categories` per category, in lookup order with the fallback
    /// last. Categories that never occur are left out.
    ///
    /// # Examples
    ///
    /// ```
    /// use foldersort::file_category::{CategoryTable, CustomCategories};
    ///
    /// let table = CategoryTable::new(&CustomCategories::new());
    /// let counts = table.tally(["Others", "Audios", "Images", "Audios"]);
    /// assert_eq!(
    ///     counts,
    ///     vec![
    ///         ("Images".to_string(), 1),
    ///         ("Audios".to_string(), 2),
    ///         ("Others".to_string(), 1),
    ///     ]
    /// );
    /// ```
    pub fn tally<'a, I>(&self, categories: I) -> Vec<(String, usize)>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut counts: Vec<(String, usize)> = self
            .entries
            .iter()
            .map(|(name, _)| (name.clone(), 0))
            .collect();
        if !counts.iter().any(|(name, _)| name == FALLBACK_CATEGORY) {
            counts.push((FALLBACK_CATEGORY.to_string(), 0));
        }

        for category in categories {
            match counts.iter_mut().find(|(name, _)| name == category) {
                Some((_, count)) => *count += 1,
                None => counts.push((category.to_string(), 1)),
            }
        }

        counts.retain(|(_, count)| *count > 0);
        counts
    }
}

/// Classifies `filename` against the built-in table overlaid with `custom`.
///
/// The file does not need to exist. Returns `"Others"` when nothing matches.
pub fn classify(filename: &str, custom: &CustomCategories) -> String {
    CategoryTable::new(custom).classify(filename).to_string()
}
