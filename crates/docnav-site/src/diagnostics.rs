//! Non-fatal build problems.
//!
//! A malformed document never blocks a build: the affected page (or
//! translation entry) is left out and a [`Diagnostic`] goes to the
//! [`DiagnosticSink`] handed to the build.

/// A problem that cost the build a page or a link, not the whole build.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Diagnostic {
    /// The document's markup could not be parsed upstream.
    #[error("Markup of {file} is broken, page not generated")]
    MissingBody { file: String },

    #[error("Frontmatter of {file} is missing, page not generated")]
    MissingFrontmatter { file: String },

    #[error("Frontmatter of {file} has no title, page not generated")]
    MissingTitle { file: String },

    /// `rejected` resolves to a URL already owned by `existing`.
    #[error("Path {path} of {rejected} is already used by {existing}, page not generated")]
    PathCollision {
        path: String,
        existing: String,
        rejected: String,
    },

    #[error("No {locale} translation found for {file}")]
    MissingTranslation { file: String, locale: String },
}

/// Receiver of build diagnostics.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

impl From<crate::collision::PathCollision> for Diagnostic {
    fn from(collision: crate::collision::PathCollision) -> Self {
        Self::PathCollision {
            path: collision.path,
            existing: collision.existing,
            rejected: collision.rejected,
        }
    }
}
