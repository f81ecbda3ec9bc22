//! Error taxonomy for the export run
//!
//! Every failure aborts the whole run. Stage failures are wrapped once by the
//! pipeline so the printed chain names the stage and the note.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    /// Filesystem read/write/copy failure
    #[error("{context}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    /// Directory traversal failure while crawling the source root
    #[error("crawl {}", root.display())]
    Walk {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// Malformed frontmatter block
    #[error("parse frontmatter in {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    /// Frontmatter value does not match the declared rule type
    #[error("frontmatter field `{field}`: expected {expected}, found {found}")]
    Type {
        field: String,
        expected: &'static str,
        found: &'static str,
    },

    /// A linked asset could not be relocated
    #[error("process linked asset {asset}")]
    Asset {
        asset: String,
        #[source]
        source: Box<ExportError>,
    },

    /// Configuration file missing or malformed
    #[error("config {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    /// Frontmatter could not be serialized back to YAML
    #[error("serialize frontmatter of {}", note.display())]
    Serialize {
        note: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// A pipeline stage failed for a note
    #[error("stage `{stage}` failed for {}", note.display())]
    Stage {
        stage: &'static str,
        note: PathBuf,
        #[source]
        source: Box<ExportError>,
    },
}

impl ExportError {
    /// Wrap an io::Error with a human readable context line
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        ExportError::Io {
            context: context.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ExportError>;
