//! Custom category configuration.
//!
//! Custom categories come from two places: a TOML file passed explicitly on
//! the command line, and `NAME=.ext,.ext` arguments. Nothing is discovered
//! implicitly and nothing is ever written back.
//!
//! # Configuration File Format
//!
//! ```toml
//! [[category]]
//! name = "Ebooks"
//! extensions = [".epub", ".mobi"]
//!
//! [[category]]
//! name = "Images"
//! extensions = [".png", ".webp"]
//! ```
//!
//! Entries are applied in file order. A name that matches a built-in
//! category replaces the built-in extension list.

use crate::file_category::CustomCategories;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Errors that can occur while loading or parsing custom categories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Configuration file not found at the specified path.
    ConfigNotFound(PathBuf),
    /// Invalid TOML syntax or structure.
    ConfigInvalid(String),
    /// IO error while reading configuration.
    IoError(String),
    /// A category name that cannot be used as a folder name.
    InvalidCategoryName(String),
    /// A `NAME=.ext,.ext` argument that could not be parsed.
    InvalidCategorySpec(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ConfigNotFound(path) => {
                write!(f, "Configuration file not found: {}", path.display())
            }
            ConfigError::ConfigInvalid(msg) => write!(f, "Invalid configuration: {}", msg),
            ConfigError::IoError(msg) => write!(f, "IO error reading configuration: {}", msg),
            ConfigError::InvalidCategoryName(name) => {
                write!(
                    f,
                    "Invalid category name '{}': must be a non-empty folder name without path separators",
                    name
                )
            }
            ConfigError::InvalidCategorySpec(spec) => {
                write!(
                    f,
                    "Invalid category '{}': expected NAME=.ext1,.ext2",
                    spec
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Custom categories as stored in a TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryConfig {
    #[serde(default, rename = "category")]
    pub categories: Vec<CategoryEntry>,
}

/// A single `[[category]]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryEntry {
    pub name: String,
    #[serde(default)]
    pub extensions: Vec<String>,
}

impl CategoryConfig {
    /// Loads configuration from `config_path`, or returns an empty
    /// configuration when no path is given.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ConfigNotFound` if the file does not exist,
    /// `ConfigError::IoError` if it cannot be read and
    /// `ConfigError::ConfigInvalid` if TOML parsing fails.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => Ok(Self::default()),
        }
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

        toml::from_str(&content).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))
    }

    /// Converts the file entries into validated custom categories.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidCategoryName` for unusable names.
    pub fn into_custom_categories(self) -> Result<CustomCategories, ConfigError> {
        let mut custom = CustomCategories::new();
        for entry in self.categories {
            custom.insert(&entry.name, &entry.extensions)?;
        }
        Ok(custom)
    }
}

/// Parses a `NAME=.ext1,.ext2` command-line category.
///
/// # Examples
///
/// ```
/// use foldersort::config::parse_category_spec;
///
/// let (name, extensions) = parse_category_spec("Ebooks=.epub, mobi").unwrap();
/// assert_eq!(name, "Ebooks");
/// assert_eq!(extensions, vec![".epub", "mobi"]);
/// ```
pub fn parse_category_spec(spec: &str) -> Result<(String, Vec<String>), ConfigError> {
    let (name, extensions) = spec
        .split_once('=')
        .ok_or_else(|| ConfigError::InvalidCategorySpec(spec.to_string()))?;

    let name = name.trim();
    if name.is_empty() {
        return Err(ConfigError::InvalidCategorySpec(spec.to_string()));
    }

    let extensions: Vec<String> = extensions
        .split(',')
        .map(str::trim)
        .filter(|ext| !ext.is_empty())
        .map(str::to_string)
        .collect();

    if extensions.is_empty() {
        return Err(ConfigError::InvalidCategorySpec(spec.to_string()));
    }

    Ok((name.to_string(), extensions))
}

/// Builds the custom categories for one run: the config file first, then
/// each command-line spec in order.
///
/// # Errors
///
/// Returns the first configuration or parsing error encountered.
pub fn resolve_custom_categories(
    config_path: Option<&Path>,
    specs: &[String],
) -> Result<CustomCategories, ConfigError> {
    let mut custom = CategoryConfig::load(config_path)?.into_custom_categories()?;
    for spec in specs {
        let (name, extensions) = parse_category_spec(spec)?;
        custom.insert(&name, &extensions)?;
    }
    Ok(custom)
}
