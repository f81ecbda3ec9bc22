use super::Stage;
use crate::error::Result;
use crate::flavour::DialectRewriter;
use crate::note::Note;

/// Rewrites wikilinks, hashtags and mentions in the note body
#[derive(Debug, Clone, Default)]
pub struct DialectRewrite {
    rewriter: DialectRewriter,
}

impl DialectRewrite {
    pub fn new(rewriter: DialectRewriter) -> Self {
        Self { rewriter }
    }
}

impl Stage for DialectRewrite {
    fn name(&self) -> &'static str {
        "dialect-rewrite"
    }

    fn transform(&self, mut note: Note) -> Result<Note> {
        note.content = self.rewriter.rewrite(&note.content);
        Ok(note)
    }
}
