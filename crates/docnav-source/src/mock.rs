//! Mock content source for testing.
//!
//! Provides [`MockContentSource`] for unit testing without filesystem access.

use std::path::PathBuf;
use std::sync::RwLock;

use crate::record::{ContentRecord, Markup};
use crate::source::{ContentSource, SourceError, SourceErrorKind};

const BACKEND: &str = "Mock";

/// Mock content source for testing.
///
/// Holds records in memory. Use the builder methods to configure the mock
/// with test data.
///
/// # Example
///
/// ```ignore
/// use docnav_source::{ContentSource, MockContentSource};
///
/// let source = MockContentSource::new()
///     .with_markdown("docs/01-using-k6/02-ssl-tls.md", "---\ntitle: SSL/TLS\n---\n");
///
/// let records = source.fetch("docs").unwrap();
/// ```
#[derive(Debug, Default)]
pub struct MockContentSource {
    records: RwLock<Vec<ContentRecord>>,
    failure: RwLock<Option<SourceErrorKind>>,
}

impl MockContentSource {
    /// Create a new empty mock source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a prebuilt record.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_record(self, record: ContentRecord) -> Self {
        self.records.write().unwrap().push(record);
        self
    }

    /// Add a markdown document at a `/`-separated path relative to the
    /// source root. The absolute path is `/mock/<path>`.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_markdown(self, path: &str, text: &str) -> Self {
        let absolute = PathBuf::from("/mock").join(path);
        let record = ContentRecord::from_relative_path(path, absolute, Some(Markup::parse(text)));
        self.with_record(record)
    }

    /// Add a document whose markup failed to parse upstream.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_unparsed(self, path: &str) -> Self {
        let absolute = PathBuf::from("/mock").join(path);
        self.with_record(ContentRecord::from_relative_path(path, absolute, None))
    }

    /// Make every subsequent `fetch()` fail with `kind`.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_failure(self, kind: SourceErrorKind) -> Self {
        *self.failure.write().unwrap() = Some(kind);
        self
    }
}

fn belongs_to(record: &ContentRecord, root: &str) -> bool {
    record.relative_directory == root
        || record
            .relative_directory
            .strip_prefix(root)
            .is_some_and(|rest| rest.starts_with('/'))
}

impl ContentSource for MockContentSource {
    fn fetch(&self, root: &str) -> Result<Vec<ContentRecord>, SourceError> {
        let failure = self
            .failure
            .read()
            .map_err(|_| SourceError::new(SourceErrorKind::Other).with_backend(BACKEND))?;
        if let Some(kind) = *failure {
            return Err(SourceError::new(kind).with_path(root).with_backend(BACKEND));
        }

        let records = self
            .records
            .read()
            .map_err(|_| SourceError::new(SourceErrorKind::Other).with_backend(BACKEND))?;
        let mut matching: Vec<_> = records
            .iter()
            .filter(|r| belongs_to(r, root))
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.absolute_path.cmp(&b.absolute_path));
        Ok(matching)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_fetch_filters_by_root() {
        let source = MockContentSource::new()
            .with_markdown("docs/a.md", "---\ntitle: A\n---\n")
            .with_markdown("docs-extra/b.md", "---\ntitle: B\n---\n")
            .with_markdown("translated-guides/en/c.md", "---\ntitle: C\n---\n");

        let records = source.fetch("docs").unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "a");
    }

    #[test]
    fn test_fetch_sorts_by_absolute_path() {
        let source = MockContentSource::new()
            .with_markdown("docs/02-b.md", "")
            .with_markdown("docs/01-a.md", "");

        let records = source.fetch("docs").unwrap();

        let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["01-a", "02-b"]);
    }

    #[test]
    fn test_fetch_failure() {
        let source = MockContentSource::new().with_failure(SourceErrorKind::Unavailable);

        let err = source.fetch("docs").unwrap_err();

        assert_eq!(err.kind, SourceErrorKind::Unavailable);
        assert_eq!(err.to_string(), "[Mock] Unavailable (path: docs)");
    }

    #[test]
    fn test_with_unparsed_has_no_markup() {
        let source = MockContentSource::new().with_unparsed("docs/broken.md");

        let records = source.fetch("docs").unwrap();

        assert!(records[0].markup.is_none());
    }
}
