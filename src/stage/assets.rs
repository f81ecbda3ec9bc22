//! Copies binary assets referenced by a note into the export tree
//!
//! Targets come from wikilinks (`[[assets/img.png]]`) and from markdown links
//! and images (`![alt](assets/img.png)`). Only targets starting with
//! `assets/` are relocated; the relative sub-path is preserved.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;

use pulldown_cmark::{Event, Parser, Tag};
use tracing::debug;

use super::Stage;
use crate::constants as C;
use crate::error::{ExportError, Result};
use crate::flavour::DialectRewriter;
use crate::fs::{copy_file, display_path, secure_join};
use crate::note::Note;

/// Destination paths of every asset relocated during one run
///
/// Shared between the stage and the exporter, which reports it.
#[derive(Debug, Clone, Default)]
pub struct CopiedAssets(Rc<RefCell<BTreeSet<PathBuf>>>);

impl CopiedAssets {
    /// Record a destination; false when it was already recorded
    fn insert(&self, target: PathBuf) -> bool {
        self.0.borrow_mut().insert(target)
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// Sorted list of relocated destinations
    pub fn to_vec(&self) -> Vec<PathBuf> {
        self.0.borrow().iter().cloned().collect()
    }
}

pub struct AssetRelocation {
    rewriter: DialectRewriter,
    source_root: PathBuf,
    export_root: PathBuf,
    copied: CopiedAssets,
    dry_run: bool,
}

impl AssetRelocation {
    pub fn new(
        rewriter: DialectRewriter,
        source_root: PathBuf,
        export_root: PathBuf,
        copied: CopiedAssets,
    ) -> Self {
        Self {
            rewriter,
            source_root,
            export_root,
            copied,
            dry_run: false,
        }
    }

    /// Check that assets exist without copying them
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Every distinct `assets/` target referenced by the content, in order
    pub fn asset_targets(&self, content: &[u8]) -> Vec<String> {
        let mut targets = self.rewriter.wikilink_targets(content);
        targets.extend(markdown_targets(content));

        let mut seen = BTreeSet::new();
        targets
            .into_iter()
            .filter(|t| t.starts_with(C::ASSETS_PREFIX))
            .filter(|t| seen.insert(t.clone()))
            .collect()
    }

    fn relocate(&self, target: &str) -> Result<()> {
        let source = secure_join(&self.source_root, target)
            .map_err(|e| ExportError::io(format!("resolve {}", target), e))?;
        let destination = secure_join(&self.export_root, target)
            .map_err(|e| ExportError::io(format!("resolve {}", target), e))?;

        if self.dry_run {
            if !source.is_file() {
                return Err(ExportError::io(
                    format!("read file {}", display_path(&source)),
                    io::Error::new(io::ErrorKind::NotFound, "asset does not exist"),
                ));
            }
            self.copied.insert(destination);
            return Ok(());
        }

        if !self.copied.insert(destination.clone()) {
            debug!(asset = %target, "asset already copied");
            return Ok(());
        }

        copy_file(&source, &destination)?;
        debug!(asset = %target, "copied asset");
        Ok(())
    }
}

impl Stage for AssetRelocation {
    fn name(&self) -> &'static str {
        "asset-relocation"
    }

    fn transform(&self, note: Note) -> Result<Note> {
        for target in self.asset_targets(&note.content) {
            self.relocate(&target).map_err(|e| ExportError::Asset {
                asset: target.clone(),
                source: Box::new(e),
            })?;
        }

        Ok(note)
    }
}

/// Destinations of inline markdown links and images
fn markdown_targets(content: &[u8]) -> Vec<String> {
    let text = String::from_utf8_lossy(content);
    let mut targets = Vec::new();

    for event in Parser::new(&text) {
        match event {
            Event::Start(Tag::Link { dest_url, .. }) | Event::Start(Tag::Image { dest_url, .. }) => {
                // CommonMark destinations are percent-encoded; files on disk are not
                let target = urlencoding::decode(&dest_url)
                    .map(|decoded| decoded.into_owned())
                    .unwrap_or_else(|_| dest_url.to_string());
                targets.push(target);
            }
            _ => {}
        }
    }

    targets
}
