//! Filesystem primitives: crawling, reading, copying and writing
//!
//! Every failure is returned as an [`ExportError`] annotated with the path
//! involved. Nothing here retries or skips.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::constants as C;
use crate::error::{ExportError, Result};
use crate::note::SourceInfo;

/// Collect every `.md` file below `root`, sorted for deterministic runs
///
/// Any traversal error aborts the crawl.
pub fn crawl_notes(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(ExportError::io(
            format!("crawl {}", display_path(root)),
            io::Error::new(io::ErrorKind::NotFound, "source root is not a directory"),
        ));
    }

    let mut paths = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| ExportError::Walk {
            root: root.to_path_buf(),
            source: e,
        })?;

        let is_note = entry.file_type().is_file()
            && entry.path().extension().and_then(|e| e.to_str()) == Some(C::MARKDOWN_EXTENSION);
        if is_note {
            paths.push(entry.into_path());
        }
    }

    debug!(root = %display_path(root), count = paths.len(), "crawled notes");
    Ok(paths)
}

/// Read a file together with the attributes the writer needs
pub fn read_file(path: &Path) -> Result<(SourceInfo, Vec<u8>)> {
    let meta = fs::metadata(path)
        .map_err(|e| ExportError::io(format!("read file {}", display_path(path)), e))?;
    let data =
        fs::read(path).map_err(|e| ExportError::io(format!("read file {}", display_path(path)), e))?;

    Ok((SourceInfo::from_metadata(path, &meta), data))
}

/// Write `data` to `path`, creating parent directories first
///
/// `permissions` are applied after writing when given.
pub fn write_file(path: &Path, data: &[u8], permissions: Option<&fs::Permissions>) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| ExportError::io(format!("create directory {}", display_path(parent)), e))?;
    }

    fs::write(path, data)
        .map_err(|e| ExportError::io(format!("write file {}", display_path(path)), e))?;

    if let Some(perms) = permissions {
        fs::set_permissions(path, perms.clone())
            .map_err(|e| ExportError::io(format!("set permissions {}", display_path(path)), e))?;
    }

    Ok(())
}

/// Byte-identical copy, creating the destination's parent directories
pub fn copy_file(source: &Path, target: &Path) -> Result<()> {
    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| ExportError::io(format!("create directory {}", display_path(parent)), e))?;
    }

    fs::copy(source, target).map_err(|e| {
        ExportError::io(
            format!("copy file {} to {}", display_path(source), display_path(target)),
            e,
        )
    })?;

    Ok(())
}

/// Join a link-relative path onto `base`, refusing to escape it
///
/// `..`, absolute components and drive prefixes are rejected.
pub fn secure_join(base: &Path, relative: &str) -> io::Result<PathBuf> {
    if relative.starts_with('/') || relative.starts_with('\\') {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("absolute paths are not allowed: {}", relative),
        ));
    }

    let mut result = base.to_path_buf();
    for component in relative.split(|c| c == '/' || c == '\\') {
        match component {
            "" | "." => continue,
            ".." => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("path traversal detected in {}", relative),
                ));
            }
            _ => {
                if component.len() >= 2 && component.as_bytes()[1] == b':' {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidInput,
                        format!("absolute paths are not allowed: {}", relative),
                    ));
                }
                result.push(component);
            }
        }
    }

    // Symlinks inside the base may still point elsewhere
    if base.exists() && result.exists() {
        let canonical_base = dunce::canonicalize(base).unwrap_or_else(|_| base.to_path_buf());
        let canonical_result = dunce::canonicalize(&result).unwrap_or_else(|_| result.clone());
        if !canonical_result.starts_with(&canonical_base) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} resolves outside {}", relative, display_path(base)),
            ));
        }
    }

    Ok(result)
}

/// Display a path with forward slashes (cross-platform standard)
pub fn display_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_crawl_finds_markdown_recursively() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("nested/deeper")).unwrap();
        fs::write(root.join("root.md"), "").unwrap();
        fs::write(root.join("a.b.md"), "").unwrap();
        fs::write(root.join("nested/deeper/c.md"), "").unwrap();
        fs::write(root.join("image.png"), "").unwrap();
        fs::write(root.join("notes.txt"), "").unwrap();

        let found = crawl_notes(root).unwrap();
        let relative: Vec<String> = found
            .iter()
            .map(|p| display_path(p.strip_prefix(root).unwrap()))
            .collect();

        assert_eq!(relative, vec!["a.b.md", "nested/deeper/c.md", "root.md"]);
    }

    #[test]
    fn test_crawl_missing_root_fails() {
        let temp_dir = TempDir::new().unwrap();
        let err = crawl_notes(&temp_dir.path().join("absent")).unwrap_err();
        assert!(matches!(err, ExportError::Io { .. }));
    }

    #[test]
    fn test_write_creates_parents() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("a/b/c.md");
        write_file(&target, b"hello", None).unwrap();
        assert_eq!(fs::read(&target).unwrap(), b"hello");
    }

    #[cfg(unix)]
    #[test]
    fn test_write_applies_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("note.md");
        let perms = fs::Permissions::from_mode(0o640);
        write_file(&target, b"x", Some(&perms)).unwrap();

        let mode = fs::metadata(&target).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o640);
    }

    #[test]
    fn test_read_file_returns_source_info() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("n.md");
        fs::write(&path, "12345").unwrap();

        let (info, data) = read_file(&path).unwrap();
        assert_eq!(info.path, path);
        assert!(info.permissions.is_some());
        assert_eq!(data, b"12345");
    }

    #[test]
    fn test_copy_file_is_byte_identical() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("in.bin");
        let bytes: Vec<u8> = (0..=255).collect();
        fs::write(&source, &bytes).unwrap();

        let target = temp_dir.path().join("out/assets/in.bin");
        copy_file(&source, &target).unwrap();
        assert_eq!(fs::read(&target).unwrap(), bytes);
    }

    #[test]
    fn test_copy_missing_source_fails_with_path() {
        let temp_dir = TempDir::new().unwrap();
        let err = copy_file(&temp_dir.path().join("nope.png"), &temp_dir.path().join("x.png"))
            .unwrap_err();
        assert!(err.to_string().contains("nope.png"));
    }

    #[test]
    fn test_secure_join_normal() {
        let base = PathBuf::from("/home/user/vault");
        let result = secure_join(&base, "assets/img.png").unwrap();
        assert_eq!(result, PathBuf::from("/home/user/vault/assets/img.png"));
    }

    #[test]
    fn test_secure_join_traversal_blocked() {
        let base = PathBuf::from("/home/user/vault");
        assert!(secure_join(&base, "assets/../../etc/passwd").is_err());
        assert!(secure_join(&base, "/etc/passwd").is_err());
        assert!(secure_join(&base, "C:/Windows").is_err());
    }
}
