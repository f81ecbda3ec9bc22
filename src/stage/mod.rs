//! Rewrite pipeline
//!
//! A [`Pipeline`] is an ordered list of [`Stage`]s. Each stage takes a note by
//! value and hands back the transformed note; the first failure stops the
//! note and is annotated with the stage name and the note's current path.

mod assets;
mod dialect;
mod metadata;
mod path;

pub use assets::{AssetRelocation, CopiedAssets};
pub use dialect::DialectRewrite;
pub use metadata::MetadataTransform;
pub use path::{nest_hierarchy, PathRemap, RootRename};

use tracing::debug;

use crate::config::Config;
use crate::error::{ExportError, Result};
use crate::flavour::DialectRewriter;
use crate::note::Note;

/// One step of the rewrite pipeline
pub trait Stage {
    /// Short name used in logs and error chains
    fn name(&self) -> &'static str;

    /// Transform a note or fail
    fn transform(&self, note: Note) -> Result<Note>;
}

#[derive(Default)]
pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// The export order: metadata, dialect, assets, path remap, root rename
    pub fn standard(config: &Config, assets: CopiedAssets, dry_run: bool) -> Self {
        let rewriter = DialectRewriter::new();

        Self::new()
            .with_stage(MetadataTransform::new(config.frontmatter_rules.clone()))
            .with_stage(DialectRewrite::new(rewriter.clone()))
            .with_stage(
                AssetRelocation::new(
                    rewriter,
                    config.source_root.clone(),
                    config.export_root.clone(),
                    assets,
                )
                .dry_run(dry_run),
            )
            .with_stage(PathRemap::new(
                config.source_root.clone(),
                config.export_root.clone(),
            ))
            .with_stage(RootRename::new(config.export_root.clone()))
    }

    /// Append a stage
    pub fn with_stage(mut self, stage: impl Stage + 'static) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Run every stage over one note, in order
    pub fn run(&self, mut note: Note) -> Result<Note> {
        for stage in &self.stages {
            let current = note.display_name.clone();
            debug!(
                stage = stage.name(),
                note = %current.display(),
                position = ?note.batch.position(),
                batch = note.batch.len(),
                "running stage"
            );

            note = stage.transform(note).map_err(|e| ExportError::Stage {
                stage: stage.name(),
                note: current,
                source: Box::new(e),
            })?;
        }

        Ok(note)
    }

    /// Run the pipeline over the whole batch, stopping at the first failure
    pub fn run_all(&self, notes: Vec<Note>) -> Result<Vec<Note>> {
        notes.into_iter().map(|note| self.run(note)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_yaml::Mapping;
    use std::path::PathBuf;

    struct Append(&'static str);

    impl Stage for Append {
        fn name(&self) -> &'static str {
            "append"
        }

        fn transform(&self, mut note: Note) -> Result<Note> {
            note.content.extend_from_slice(self.0.as_bytes());
            Ok(note)
        }
    }

    struct Fail;

    impl Stage for Fail {
        fn name(&self) -> &'static str {
            "fail"
        }

        fn transform(&self, _note: Note) -> Result<Note> {
            Err(ExportError::Type {
                field: "x".to_string(),
                expected: "integer",
                found: "string",
            })
        }
    }

    #[test]
    fn test_stages_run_in_order() {
        let pipeline = Pipeline::new().with_stage(Append("a")).with_stage(Append("b"));
        let note = pipeline.run(Note::new("n.md", Mapping::new(), "")).unwrap();
        assert_eq!(note.content, b"ab");
    }

    #[test]
    fn test_failure_names_stage_and_note() {
        let pipeline = Pipeline::new().with_stage(Append("a")).with_stage(Fail);
        let err = pipeline.run(Note::new("vault/n.md", Mapping::new(), "")).unwrap_err();

        match err {
            ExportError::Stage { stage, note, source } => {
                assert_eq!(stage, "fail");
                assert_eq!(note, PathBuf::from("vault/n.md"));
                assert!(matches!(*source, ExportError::Type { .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_run_all_stops_at_first_failure() {
        let pipeline = Pipeline::new().with_stage(Fail);
        let notes = vec![
            Note::new("a.md", Mapping::new(), ""),
            Note::new("b.md", Mapping::new(), ""),
        ];
        let err = pipeline.run_all(notes).unwrap_err();
        assert!(err.to_string().contains("a.md"));
    }

    #[test]
    fn test_standard_order() {
        let config = Config::new("vault", "out");
        let pipeline = Pipeline::standard(&config, CopiedAssets::default(), false);
        assert_eq!(
            pipeline.stage_names(),
            vec![
                "metadata-transform",
                "dialect-rewrite",
                "asset-relocation",
                "path-remap",
                "root-rename"
            ]
        );
    }
}
