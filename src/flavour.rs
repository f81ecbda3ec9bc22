//! Dendron to Quartz markup rewriting
//!
//! Three whole-document substitutions over the note body:
//! - wikilinks: `[[title|note.path]]` becomes `[[note.path|title]]`, and a bare
//!   `[[note.path]]` gains an alias derived from its last hierarchy segment
//! - hashtags: `#a.b.c` becomes `#a/b/c`
//! - mentions: `@a.b.c` becomes `@a/b/c`
//!
//! The body is treated as raw bytes; nothing outside a match is touched.

use regex::bytes::{Captures, Regex};

use crate::constants as C;

/// Compiled patterns for one rewrite context
#[derive(Debug, Clone)]
pub struct DialectRewriter {
    wikilink: Regex,
    hashtag: Regex,
    mention: Regex,
}

impl Default for DialectRewriter {
    fn default() -> Self {
        Self::new()
    }
}

impl DialectRewriter {
    pub fn new() -> Self {
        Self {
            // [[body]]; the body is split on `|` afterwards
            wikilink: Regex::new(r"\[\[([^\[\]]+)\]\]").expect("wikilink regex"),
            hashtag: Regex::new(r"#\w+(?:\.\w+)*").expect("hashtag regex"),
            mention: Regex::new(r"@\w+(?:\.\w+)*").expect("mention regex"),
        }
    }

    /// Apply every rewrite: wikilinks, then hashtags, then mentions
    pub fn rewrite(&self, content: &[u8]) -> Vec<u8> {
        let content = self.rewrite_wikilinks(content);
        let content = self.rewrite_hashtags(&content);
        self.rewrite_mentions(&content)
    }

    /// Reorder wikilinks into `link|title` form
    pub fn rewrite_wikilinks(&self, content: &[u8]) -> Vec<u8> {
        self.wikilink
            .replace_all(content, |caps: &Captures| rewrite_wikilink(caps))
            .into_owned()
    }

    /// Turn dot-hierarchy hashtags into slash paths
    pub fn rewrite_hashtags(&self, content: &[u8]) -> Vec<u8> {
        self.hashtag
            .replace_all(content, |caps: &Captures| slash_hierarchy(&caps[0]))
            .into_owned()
    }

    /// Turn dot-hierarchy mentions into slash paths
    pub fn rewrite_mentions(&self, content: &[u8]) -> Vec<u8> {
        self.mention
            .replace_all(content, |caps: &Captures| slash_hierarchy(&caps[0]))
            .into_owned()
    }

    /// Link targets of every wikilink in target-dialect (`link|title`) order
    ///
    /// Section anchors are not part of the target.
    pub fn wikilink_targets(&self, content: &[u8]) -> Vec<String> {
        self.wikilink
            .captures_iter(content)
            .filter_map(|caps| {
                let link = caps[1].split(|&b| b == C::ALIAS_SEPARATOR as u8).next()?;
                let link = strip_section(link);
                (!link.is_empty()).then(|| String::from_utf8_lossy(link).into_owned())
            })
            .collect()
    }
}

fn rewrite_wikilink(caps: &Captures) -> Vec<u8> {
    let parts: Vec<&[u8]> = caps[1].split(|&b| b == C::ALIAS_SEPARATOR as u8).collect();

    match parts.as_slice() {
        [target] => {
            let target = strip_section(target);
            // raw references like [[assets/img.png]] stay as written
            if target.is_empty() || target.contains(&(C::PATH_SEPARATOR as u8)) {
                return caps[0].to_vec();
            }
            build_wikilink(target, &derive_alias(target))
        }
        // source order is title|link; both sides are kept whole
        [title, link] if !title.is_empty() && !link.is_empty() => build_wikilink(link, title),
        _ => caps[0].to_vec(),
    }
}

/// Link target without its `#section` anchor
fn strip_section(target: &[u8]) -> &[u8] {
    target
        .split(|&b| b == b'#')
        .next()
        .unwrap_or(target)
}

/// Last hierarchy segment with dashes turned into spaces
fn derive_alias(target: &[u8]) -> Vec<u8> {
    let last = target
        .rsplit(|&b| b == C::HIERARCHY_SEPARATOR as u8)
        .next()
        .unwrap_or(target);

    last.iter().map(|&b| if b == b'-' { b' ' } else { b }).collect()
}

fn build_wikilink(link: &[u8], title: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(link.len() + title.len() + 5);
    out.extend_from_slice(b"[[");
    out.extend_from_slice(link);
    out.push(C::ALIAS_SEPARATOR as u8);
    out.extend_from_slice(title);
    out.extend_from_slice(b"]]");
    out
}

fn slash_hierarchy(token: &[u8]) -> Vec<u8> {
    token
        .iter()
        .map(|&b| {
            if b == C::HIERARCHY_SEPARATOR as u8 {
                C::PATH_SEPARATOR as u8
            } else {
                b
            }
        })
        .collect()
}
