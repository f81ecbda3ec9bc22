//! Destination path stages
//!
//! Dendron names hierarchies with dots in a single filename
//! (`proj.alpha.md`); Quartz expects nested directories (`proj/alpha.md`).

use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};

use super::Stage;
use crate::constants as C;
use crate::error::{ExportError, Result};
use crate::fs::display_path;
use crate::note::Note;

/// Moves a note from the source root to its nested export path
#[derive(Debug, Clone)]
pub struct PathRemap {
    source_root: PathBuf,
    export_root: PathBuf,
}

impl PathRemap {
    pub fn new(source_root: PathBuf, export_root: PathBuf) -> Self {
        Self {
            source_root,
            export_root,
        }
    }
}

impl Stage for PathRemap {
    fn name(&self) -> &'static str {
        "path-remap"
    }

    fn transform(&self, mut note: Note) -> Result<Note> {
        let relative = note.display_name.strip_prefix(&self.source_root).map_err(|_| {
            ExportError::io(
                format!("remap {}", display_path(&note.display_name)),
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("note is outside {}", display_path(&self.source_root)),
                ),
            )
        })?;

        note.display_name = self.export_root.join(nest_hierarchy(relative));
        Ok(note)
    }
}

/// Turn `dir/a.b.c.md` into `dir/a/b/c.md`
///
/// Directory components are kept as they are; only the file stem is split.
/// Empty segments (`a..b.md`, `.hidden.md`) are dropped.
pub fn nest_hierarchy(relative: &Path) -> PathBuf {
    let (Some(stem), Some(file_name)) = (
        relative.file_stem().and_then(OsStr::to_str),
        relative.file_name(),
    ) else {
        return relative.to_path_buf();
    };

    let segments: Vec<&str> = stem
        .split(C::HIERARCHY_SEPARATOR)
        .filter(|s| !s.is_empty())
        .collect();
    let Some((last, parents)) = segments.split_last() else {
        return relative.to_path_buf();
    };

    let mut nested = relative
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    for segment in parents {
        nested.push(segment);
    }

    match Path::new(file_name).extension() {
        Some(ext) => nested.push(format!("{}.{}", last, ext.to_string_lossy())),
        None => nested.push(last),
    }

    nested
}

/// Renames the top-level `root.md` of the export tree to `index.md`
#[derive(Debug, Clone)]
pub struct RootRename {
    export_root: PathBuf,
}

impl RootRename {
    pub fn new(export_root: PathBuf) -> Self {
        Self { export_root }
    }
}

impl Stage for RootRename {
    fn name(&self) -> &'static str {
        "root-rename"
    }

    fn transform(&self, mut note: Note) -> Result<Note> {
        if note.display_name == self.export_root.join(C::ROOT_NOTE_FILENAME) {
            note.display_name = self.export_root.join(C::INDEX_NOTE_FILENAME);
        }
        Ok(note)
    }
}
