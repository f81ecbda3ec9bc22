//! Note data model
//!
//! A [`Note`] is created once per source file by the parser, passes through
//! every pipeline stage by value and is consumed by the writer.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_yaml::Mapping;

/// Attributes of the source file carried through to the writer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceInfo {
    /// Path the note was read from
    pub path: PathBuf,
    /// Permissions applied to the written file (None for in-memory notes)
    pub permissions: Option<fs::Permissions>,
}

impl SourceInfo {
    pub fn from_metadata(path: &Path, meta: &fs::Metadata) -> Self {
        Self {
            path: path.to_path_buf(),
            permissions: Some(meta.permissions()),
        }
    }
}

/// Read-only handle onto the publishable notes of one export run
///
/// All notes of a batch share the same member list; each handle only adds
/// the position of its own note.
#[derive(Debug, Clone)]
pub struct NoteBatch {
    members: Arc<[PathBuf]>,
    position: Option<usize>,
}

impl Default for NoteBatch {
    fn default() -> Self {
        Self {
            members: Arc::from(Vec::new()),
            position: None,
        }
    }
}

impl NoteBatch {
    /// Source paths of every note in the batch, in crawl order
    ///
    /// Stages that need the rest of the export set (for example to check
    /// whether a link points at a published note) read it from here.
    pub fn members(&self) -> &[PathBuf] {
        &self.members
    }

    /// Index of the owning note within [`members`](Self::members)
    pub fn position(&self) -> Option<usize> {
        self.position
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// A single note flowing through the export pipeline
#[derive(Debug, Clone)]
pub struct Note {
    /// Current path of the note; the source path until the path stages run
    pub display_name: PathBuf,
    /// Source file attributes, never modified
    pub source: SourceInfo,
    /// Parsed frontmatter (empty when the file has none)
    pub frontmatter: Mapping,
    /// Body bytes following the frontmatter block
    pub content: Vec<u8>,
    /// The publishable notes exported alongside this one
    pub batch: NoteBatch,
}

impl Note {
    /// Create a note that is not backed by a file on disk
    pub fn new(display_name: impl Into<PathBuf>, frontmatter: Mapping, content: impl Into<Vec<u8>>) -> Self {
        let display_name = display_name.into();
        Self {
            source: SourceInfo {
                path: display_name.clone(),
                ..SourceInfo::default()
            },
            display_name,
            frontmatter,
            content: content.into(),
            batch: NoteBatch::default(),
        }
    }

    /// Create a note from a parsed source file
    pub fn from_source(source: SourceInfo, frontmatter: Mapping, content: Vec<u8>) -> Self {
        Self {
            display_name: source.path.clone(),
            source,
            frontmatter,
            content,
            batch: NoteBatch::default(),
        }
    }
}

/// Attach a shared batch handle to every note
///
/// Called once, after filtering; the handles are never updated afterwards.
pub fn attach_batch(notes: &mut [Note]) {
    let members: Arc<[PathBuf]> = notes.iter().map(|n| n.source.path.clone()).collect();

    for (i, note) in notes.iter_mut().enumerate() {
        note.batch = NoteBatch {
            members: Arc::clone(&members),
            position: Some(i),
        };
    }
}
