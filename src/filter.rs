//! Collection filter: only notes with `publish: true` are exported

use serde_yaml::Value;
use tracing::debug;

use crate::constants as C;
use crate::note::{attach_batch, Note};

/// True only when `publish` is present and is the boolean `true`
///
/// Strings, numbers and other YAML types are not coerced.
pub fn is_publishable(note: &Note) -> bool {
    matches!(note.frontmatter.get(C::PUBLISH_FIELD), Some(Value::Bool(true)))
}

/// Keep the publishable notes and link them into one batch
pub fn select_publishable(notes: Vec<Note>) -> Vec<Note> {
    let mut selected: Vec<Note> = notes
        .into_iter()
        .filter(|note| {
            let keep = is_publishable(note);
            if !keep {
                debug!(note = %note.display_name.display(), "skipping unpublished note");
            }
            keep
        })
        .collect();

    attach_batch(&mut selected);
    selected
}
