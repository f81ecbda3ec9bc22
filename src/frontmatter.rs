//! Frontmatter splitting and rendering
//!
//! A frontmatter block exists only when the first line of the file is a
//! `---` fence. It ends at the next line that is exactly `---` (trailing
//! whitespace tolerated). Everything after the closing fence line is the body.

use std::path::Path;

use serde_yaml::{Mapping, Value};

use crate::constants as C;
use crate::error::{ExportError, Result};

/// Split raw file bytes into a frontmatter mapping and the body
///
/// A file that does not start with a fence yields an empty mapping and the
/// whole file as body. `path` is only used for error messages.
pub fn split(path: &Path, raw: &[u8]) -> Result<(Mapping, Vec<u8>)> {
    let mut lines = LineSpans::new(raw);

    match lines.next() {
        Some((start, end)) if is_fence(&raw[start..end]) => {}
        _ => return Ok((Mapping::new(), raw.to_vec())),
    }

    let block_start = lines.offset;
    let mut closing = None;
    for (start, end) in lines.by_ref() {
        if is_fence(&raw[start..end]) {
            closing = Some(start);
            break;
        }
    }

    let block_end = closing.ok_or_else(|| parse_error(path, "unterminated frontmatter fence"))?;
    let body = raw[lines.offset..].to_vec();

    let block = &raw[block_start..block_end];
    if block.len() > C::MAX_FRONTMATTER_SIZE {
        return Err(parse_error(
            path,
            format!("frontmatter exceeds {} bytes", C::MAX_FRONTMATTER_SIZE),
        ));
    }

    let block = std::str::from_utf8(block)
        .map_err(|e| parse_error(path, format!("frontmatter is not UTF-8: {}", e)))?;

    Ok((parse_block(path, block)?, body))
}

/// Serialize frontmatter and body back into file bytes
pub fn render(note_path: &Path, frontmatter: &Mapping, body: &[u8]) -> Result<Vec<u8>> {
    let yaml = serde_yaml::to_string(frontmatter).map_err(|e| ExportError::Serialize {
        note: note_path.to_path_buf(),
        source: e,
    })?;

    let mut out = Vec::with_capacity(yaml.len() + body.len() + 8);
    out.extend_from_slice(C::FRONTMATTER_FENCE.as_bytes());
    out.push(b'\n');
    out.extend_from_slice(yaml.as_bytes());
    if !yaml.ends_with('\n') {
        out.push(b'\n');
    }
    out.extend_from_slice(C::FRONTMATTER_FENCE.as_bytes());
    out.push(b'\n');
    out.extend_from_slice(body);

    Ok(out)
}

fn parse_block(path: &Path, block: &str) -> Result<Mapping> {
    if block.trim().is_empty() {
        return Ok(Mapping::new());
    }

    let value: Value = serde_yaml::from_str(block)
        .map_err(|e| parse_error(path, format!("invalid YAML: {}", e)))?;

    match value {
        Value::Mapping(map) => Ok(map),
        Value::Null => Ok(Mapping::new()),
        _ => Err(parse_error(path, "frontmatter is not a mapping")),
    }
}

fn is_fence(line: &[u8]) -> bool {
    let end = line
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(0, |i| i + 1);
    &line[..end] == C::FRONTMATTER_FENCE.as_bytes()
}

fn parse_error(path: &Path, message: impl Into<String>) -> ExportError {
    ExportError::Parse {
        path: path.to_path_buf(),
        message: message.into(),
    }
}

/// Iterator over `(start, end)` spans of lines, excluding the newline
///
/// `offset` always points just past the last yielded line's newline.
struct LineSpans<'a> {
    raw: &'a [u8],
    offset: usize,
}

impl<'a> LineSpans<'a> {
    fn new(raw: &'a [u8]) -> Self {
        Self { raw, offset: 0 }
    }
}

impl Iterator for LineSpans<'_> {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<Self::Item> {
        if self.offset >= self.raw.len() {
            return None;
        }

        let start = self.offset;
        match self.raw[start..].iter().position(|&b| b == b'\n') {
            Some(pos) => {
                self.offset = start + pos + 1;
                Some((start, start + pos))
            }
            None => {
                self.offset = self.raw.len();
                Some((start, self.raw.len()))
            }
        }
    }
}
