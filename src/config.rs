//! Export configuration
//!
//! Loaded from a YAML file:
//!
//! ```yaml
//! dendron_notes_path: ./vault
//! export_path: ./content
//! frontmatter_replace_field:
//!   - { field: created, field_type: timestamp, replace: date }
//! ```

use std::fs;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ExportError, Result};

/// How a frontmatter value is re-typed when its field is renamed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    /// Sequence of dot-hierarchy tags
    Tags,
    /// Sequence of dot-hierarchy note references
    Links,
    /// Milliseconds since the Unix epoch
    Timestamp,
    /// Anything else: renamed, value untouched
    Other(String),
}

impl From<String> for FieldType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "tags" => FieldType::Tags,
            "links" => FieldType::Links,
            "timestamp" => FieldType::Timestamp,
            _ => FieldType::Other(value),
        }
    }
}

impl From<FieldType> for String {
    fn from(value: FieldType) -> Self {
        match value {
            FieldType::Tags => "tags".to_string(),
            FieldType::Links => "links".to_string(),
            FieldType::Timestamp => "timestamp".to_string(),
            FieldType::Other(s) => s,
        }
    }
}

/// A single frontmatter rename rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrontmatterRule {
    /// Field name in the source frontmatter
    pub field: String,
    /// How the value is coerced
    pub field_type: FieldType,
    /// Field name in the exported frontmatter
    pub replace: String,
}

impl FrontmatterRule {
    pub fn new(field: impl Into<String>, field_type: FieldType, replace: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            field_type,
            replace: replace.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Root of the source vault
    #[serde(rename = "dendron_notes_path")]
    pub source_root: PathBuf,

    /// Root of the exported content tree
    #[serde(rename = "export_path")]
    pub export_root: PathBuf,

    /// Ordered frontmatter rewrite rules
    #[serde(rename = "frontmatter_replace_field", default)]
    pub frontmatter_rules: Vec<FrontmatterRule>,
}

impl Config {
    /// Create a config from explicit roots, with no frontmatter rules
    pub fn new(source_root: impl Into<PathBuf>, export_root: impl Into<PathBuf>) -> Self {
        Self {
            source_root: normalize_root(&source_root.into()),
            export_root: normalize_root(&export_root.into()),
            frontmatter_rules: Vec::new(),
        }
    }

    /// Load and normalize a config file
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|e| ExportError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        Self::from_yaml(path, &raw)
    }

    /// Parse config text; `path` is only used for error messages
    pub fn from_yaml(path: &Path, raw: &str) -> Result<Self> {
        let cfg: Config = serde_yaml::from_str(raw).map_err(|e| ExportError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        if cfg.source_root.as_os_str().is_empty() || cfg.export_root.as_os_str().is_empty() {
            return Err(ExportError::Config {
                path: path.to_path_buf(),
                message: "dendron_notes_path and export_path must not be empty".to_string(),
            });
        }

        Ok(cfg.normalized())
    }

    /// Replace the rule list
    pub fn with_rules(mut self, rules: Vec<FrontmatterRule>) -> Self {
        self.frontmatter_rules = rules;
        self
    }

    /// Override the source root (e.g. from the command line)
    pub fn with_source_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.source_root = normalize_root(&root.into());
        self
    }

    /// Override the export root (e.g. from the command line)
    pub fn with_export_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.export_root = normalize_root(&root.into());
        self
    }

    fn normalized(mut self) -> Self {
        self.source_root = normalize_root(&self.source_root);
        self.export_root = normalize_root(&self.export_root);
        self
    }
}

/// Drop trailing separators and `.` components so prefix stripping is exact
fn normalize_root(root: &Path) -> PathBuf {
    let normalized: PathBuf = root
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();
    if normalized.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        normalized
    }
}
