//! Filesystem content source.
//!
//! Walks `<source_dir>/<root>` recursively and turns every `.md` file into a
//! [`ContentRecord`]. Hidden files and directories are skipped.

use std::fs;
use std::path::{Path, PathBuf};

use crate::record::{ContentRecord, Markup};
use crate::source::{ContentSource, SourceError, SourceErrorKind};

const BACKEND: &str = "Fs";

/// Content source reading markdown files with YAML frontmatter.
///
/// # Example
///
/// ```ignore
/// use std::path::PathBuf;
/// use docnav_source::{ContentSource, FsContentSource};
///
/// let source = FsContentSource::new(PathBuf::from("src/data"));
/// let guides = source.fetch("translated-guides")?;
/// ```
pub struct FsContentSource {
    /// Directory containing the content roots.
    source_dir: PathBuf,
}

impl FsContentSource {
    /// Create a source rooted at `source_dir`.
    #[must_use]
    pub fn new(source_dir: PathBuf) -> Self {
        Self { source_dir }
    }

    /// Reject root names that would escape the source directory.
    fn validate_root(root: &str) -> Result<(), SourceError> {
        if root.is_empty() || root.contains("..") || root.starts_with('/') {
            return Err(SourceError::new(SourceErrorKind::InvalidPath)
                .with_path(root)
                .with_backend(BACKEND));
        }
        Ok(())
    }

    /// Recursively collect records below `dir`.
    ///
    /// Directory listing failures are fatal; unreadable files become
    /// records without markup.
    fn walk(&self, dir: &Path, records: &mut Vec<ContentRecord>) -> Result<(), SourceError> {
        let entries = fs::read_dir(dir)
            .map_err(|e| SourceError::io(e, Some(dir.to_path_buf())).with_backend(BACKEND))?;

        for entry in entries {
            let entry =
                entry.map_err(|e| SourceError::io(e, Some(dir.to_path_buf())).with_backend(BACKEND))?;
            let file_name = entry.file_name();
            if file_name.to_string_lossy().starts_with('.') {
                continue;
            }

            let path = entry.path();
            let is_dir = entry.file_type().is_ok_and(|t| t.is_dir());

            if is_dir {
                self.walk(&path, records)?;
            } else if path.extension().is_some_and(|e| e == "md") {
                if let Some(record) = self.read_record(path) {
                    records.push(record);
                }
            }
        }

        Ok(())
    }

    fn read_record(&self, path: PathBuf) -> Option<ContentRecord> {
        let relative = path.strip_prefix(&self.source_dir).ok()?;
        let relative = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        let markup = fs::read_to_string(&path)
            .inspect_err(|e| {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read content file");
            })
            .ok()
            .map(|text| Markup::parse(&text));

        Some(ContentRecord::from_relative_path(&relative, path, markup))
    }
}

impl ContentSource for FsContentSource {
    fn fetch(&self, root: &str) -> Result<Vec<ContentRecord>, SourceError> {
        Self::validate_root(root)?;

        let root_dir = self.source_dir.join(root);
        if !root_dir.is_dir() {
            return Err(SourceError::not_found(root_dir).with_backend(BACKEND));
        }

        let mut records = Vec::new();
        self.walk(&root_dir, &mut records)?;
        records.sort_by(|a, b| a.absolute_path.cmp(&b.absolute_path));

        tracing::debug!(root, count = records.len(), "Fetched content records");
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    static_assertions::assert_impl_all!(FsContentSource: Send, Sync);

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_fetch_missing_root() {
        let temp = tempfile::tempdir().unwrap();
        let source = FsContentSource::new(temp.path().to_path_buf());

        let err = source.fetch("docs").unwrap_err();

        assert_eq!(err.kind, SourceErrorKind::NotFound);
        assert_eq!(err.backend, Some("Fs"));
    }

    #[test]
    fn test_fetch_rejects_traversal() {
        let temp = tempfile::tempdir().unwrap();
        let source = FsContentSource::new(temp.path().to_path_buf());

        let err = source.fetch("../etc").unwrap_err();

        assert_eq!(err.kind, SourceErrorKind::InvalidPath);
    }

    #[test]
    fn test_fetch_returns_sorted_records() {
        let temp = tempfile::tempdir().unwrap();
        write(temp.path(), "docs/02-b/01-second.md", "---\ntitle: Second\n---\n");
        write(temp.path(), "docs/01-a/02-first.md", "---\ntitle: First\n---\n");
        write(temp.path(), "docs/01-a/01-zero.md", "---\ntitle: Zero\n---\n");
        let source = FsContentSource::new(temp.path().to_path_buf());

        let records = source.fetch("docs").unwrap();

        let names: Vec<_> = records.iter().map(ContentRecord::source_name).collect();
        assert_eq!(
            names,
            vec!["docs/01-a/01-zero", "docs/01-a/02-first", "docs/02-b/01-second"]
        );
    }

    #[test]
    fn test_fetch_only_reads_requested_root() {
        let temp = tempfile::tempdir().unwrap();
        write(temp.path(), "docs/a.md", "---\ntitle: A\n---\n");
        write(temp.path(), "translated-guides/en/b.md", "---\ntitle: B\n---\n");
        let source = FsContentSource::new(temp.path().to_path_buf());

        let records = source.fetch("translated-guides").unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].relative_directory, "translated-guides/en");
        assert_eq!(records[0].name, "b");
    }

    #[test]
    fn test_fetch_skips_hidden_and_non_markdown() {
        let temp = tempfile::tempdir().unwrap();
        write(temp.path(), "docs/.hidden/a.md", "---\ntitle: A\n---\n");
        write(temp.path(), "docs/.draft.md", "---\ntitle: Draft\n---\n");
        write(temp.path(), "docs/image.png", "binary");
        write(temp.path(), "docs/visible.md", "---\ntitle: Visible\n---\n");
        let source = FsContentSource::new(temp.path().to_path_buf());

        let records = source.fetch("docs").unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "visible");
    }

    #[test]
    fn test_fetch_parses_frontmatter() {
        let temp = tempfile::tempdir().unwrap();
        write(
            temp.path(),
            "docs/01-using-k6/02-ssl-tls.md",
            "---\ntitle: SSL/TLS\nhideFromSidebar: true\n---\nBody text\n",
        );
        let source = FsContentSource::new(temp.path().to_path_buf());

        let records = source.fetch("docs").unwrap();

        let fm = records[0].frontmatter().unwrap();
        assert_eq!(fm.title.as_deref(), Some("SSL/TLS"));
        assert!(fm.hide_from_sidebar);
        assert_eq!(records[0].markup.as_ref().unwrap().body, "Body text\n");
    }

    #[test]
    fn test_fetch_unreadable_file_has_no_markup() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("docs/broken.md");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, [0xff, 0xfe, 0x00, 0xc3]).unwrap();
        let source = FsContentSource::new(temp.path().to_path_buf());

        let records = source.fetch("docs").unwrap();

        assert_eq!(records.len(), 1);
        assert!(records[0].markup.is_none());
    }
}
