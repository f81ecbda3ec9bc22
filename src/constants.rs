//! Constants for dendron-quartz-export
//!
//! Fences, filenames, sigils and limits shared by the parser, the rewrite
//! stages and the writer.

// === File and Directory Names ===

/// Extension of note files (without the dot)
pub const MARKDOWN_EXTENSION: &str = "md";

/// Filename of the vault root note in the source dialect
pub const ROOT_NOTE_FILENAME: &str = "root.md";

/// Filename of the site index in the target dialect
pub const INDEX_NOTE_FILENAME: &str = "index.md";

/// Prefix of link targets that point at binary assets
pub const ASSETS_PREFIX: &str = "assets/";

// === Frontmatter ===

/// Fence line opening and closing the frontmatter block
pub const FRONTMATTER_FENCE: &str = "---";

/// Field that marks a note as publishable
pub const PUBLISH_FIELD: &str = "publish";

/// Maximum size of a frontmatter block (prevents pathological YAML input)
pub const MAX_FRONTMATTER_SIZE: usize = 64 * 1024; // 64KB

// === Dialect Separators ===

/// Hierarchy separator in the source dialect
pub const HIERARCHY_SEPARATOR: char = '.';

/// Hierarchy separator in the target dialect
pub const PATH_SEPARATOR: char = '/';

/// Wikilink alias separator
pub const ALIAS_SEPARATOR: char = '|';

