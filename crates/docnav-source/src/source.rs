//! Content source trait and error types.
//!
//! Provides the core [`ContentSource`] trait for retrieving content records,
//! along with [`SourceError`] for unified error handling across backends.
//!
//! # Ordering Contract
//!
//! `fetch()` returns records sorted ascending by absolute source path.
//! Navigation trees and collision resolution depend on this order, so
//! consumers may re-sort, but backends should already comply.

use std::path::PathBuf;

use crate::record::ContentRecord;

/// Semantic error categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum SourceErrorKind {
    /// Content root does not exist.
    NotFound,
    /// Permission denied.
    PermissionDenied,
    /// Invalid root name or path.
    InvalidPath,
    /// Backend is temporarily unavailable.
    Unavailable,
    /// Other/unknown error category.
    Other,
}

/// Source error with semantic kind and backend-specific cause.
#[derive(Debug)]
pub struct SourceError {
    /// Semantic error category.
    pub kind: SourceErrorKind,
    /// Path context (if applicable).
    pub path: Option<PathBuf>,
    /// Backend identifier (e.g., "Fs", "Mock").
    pub backend: Option<&'static str>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl SourceError {
    /// Create a new source error.
    #[must_use]
    pub fn new(kind: SourceErrorKind) -> Self {
        Self {
            kind,
            path: None,
            backend: None,
            source: None,
        }
    }

    /// Attach path context.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Attach backend identifier.
    #[must_use]
    pub fn with_backend(mut self, backend: &'static str) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Attach the underlying error source.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Create a not found error with path.
    #[must_use]
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::new(SourceErrorKind::NotFound).with_path(path)
    }

    /// Create a source error from an I/O error.
    #[must_use]
    pub fn io(err: std::io::Error, path: Option<PathBuf>) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => SourceErrorKind::NotFound,
            std::io::ErrorKind::PermissionDenied => SourceErrorKind::PermissionDenied,
            std::io::ErrorKind::TimedOut => SourceErrorKind::Unavailable,
            _ => SourceErrorKind::Other,
        };
        let mut error = Self::new(kind).with_source(err);
        if let Some(p) = path {
            error = error.with_path(p);
        }
        error
    }
}

impl std::fmt::Display for SourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Format: "[Backend] Kind: message (path: /foo/bar)"
        if let Some(backend) = self.backend {
            write!(f, "[{backend}] ")?;
        }

        let kind_str = match self.kind {
            SourceErrorKind::NotFound => "Not found",
            SourceErrorKind::PermissionDenied => "Permission denied",
            SourceErrorKind::InvalidPath => "Invalid path",
            SourceErrorKind::Unavailable => "Unavailable",
            SourceErrorKind::Other => "Error",
        };

        write!(f, "{kind_str}")?;

        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }

        if let Some(path) = &self.path {
            write!(f, " (path: {})", path.display())?;
        }

        Ok(())
    }
}

impl std::error::Error for SourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Retrieval of content records for one build pass.
pub trait ContentSource: Send + Sync {
    /// Fetch every markdown record below the content root named `root`
    /// (e.g., `"docs"` or `"translated-guides"`).
    ///
    /// Records whose file could not be parsed are still returned, with
    /// `markup` set to `None`, so the caller can report them.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the root cannot be listed. A failed fetch
    /// aborts the whole build.
    fn fetch(&self, root: &str) -> Result<Vec<ContentRecord>, SourceError>;
}
