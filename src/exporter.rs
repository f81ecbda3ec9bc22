//! Exporter - drives one export run
//!
//! Crawl → parse → filter → rewrite pipeline → write. The run is
//! single-threaded and stops at the first error; files written before the
//! failure are left in place.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::Result;
use crate::filter;
use crate::frontmatter;
use crate::fs::{self, display_path};
use crate::note::Note;
use crate::stage::{CopiedAssets, Pipeline};

/// Summary of a successful run
#[derive(Debug, Clone, Serialize)]
pub struct ExportReport {
    /// Markdown files found under the source root
    pub crawled: usize,
    /// Notes that passed the publish filter
    pub published: usize,
    /// Destination paths of exported notes, in export order
    pub written: Vec<PathBuf>,
    /// Destination paths of relocated assets, sorted
    pub assets: Vec<PathBuf>,
    /// Whether anything was actually written
    pub dry_run: bool,
}

pub struct Exporter {
    config: Config,
    dry_run: bool,
}

impl Exporter {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            dry_run: false,
        }
    }

    /// Run every stage but write nothing
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn run(&self) -> Result<ExportReport> {
        info!(
            source = %display_path(&self.config.source_root),
            export = %display_path(&self.config.export_root),
            dry_run = self.dry_run,
            "starting export"
        );

        let paths = fs::crawl_notes(&self.config.source_root)?;
        if paths.is_empty() {
            warn!(source = %display_path(&self.config.source_root), "no notes found");
        }

        let notes = paths
            .iter()
            .map(|path| parse_note(path))
            .collect::<Result<Vec<_>>>()?;
        let notes = filter::select_publishable(notes);
        info!(crawled = paths.len(), published = notes.len(), "selected publishable notes");

        let assets = CopiedAssets::default();
        let pipeline = Pipeline::standard(&self.config, assets.clone(), self.dry_run);
        let notes = pipeline.run_all(notes)?;
        warn_on_collisions(&notes);

        if !self.dry_run {
            for note in &notes {
                write_note(note)?;
            }
        }

        info!(notes = notes.len(), assets = assets.len(), "export done");

        Ok(ExportReport {
            crawled: paths.len(),
            published: notes.len(),
            written: notes.into_iter().map(|n| n.display_name).collect(),
            assets: assets.to_vec(),
            dry_run: self.dry_run,
        })
    }
}

/// Read a note file and split its frontmatter
pub fn parse_note(path: &Path) -> Result<Note> {
    let (info, raw) = fs::read_file(path)?;
    let (frontmatter, content) = frontmatter::split(path, &raw)?;
    debug!(note = %display_path(path), fields = frontmatter.len(), "parsed note");

    Ok(Note::from_source(info, frontmatter, content))
}

/// Serialize a note to its current path, keeping the source permissions
pub fn write_note(note: &Note) -> Result<()> {
    let data = frontmatter::render(&note.display_name, &note.frontmatter, &note.content)?;
    fs::write_file(&note.display_name, &data, note.source.permissions.as_ref())?;
    debug!(note = %display_path(&note.display_name), bytes = data.len(), "wrote note");

    Ok(())
}

/// Two notes mapping to one destination are not resolved, only reported
fn warn_on_collisions(notes: &[Note]) {
    let mut seen: HashMap<&Path, &Path> = HashMap::new();

    for note in notes {
        if let Some(first) = seen.insert(&note.display_name, &note.source.path) {
            warn!(
                destination = %display_path(&note.display_name),
                first = %display_path(first),
                second = %display_path(&note.source.path),
                "two notes export to the same path; the later one wins"
            );
        }
    }
}
