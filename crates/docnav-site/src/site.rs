//! One build pass over a content source.
//!
//! [`SiteBuilder`] fetches both content roots, builds the sidebar trees,
//! assembles every page and collects the redirect table. Nothing is handed
//! to the host until the whole pass succeeded: a failed fetch returns an
//! error and the host sees neither pages nor redirects.
//!
//! # Example
//!
//! ```ignore
//! use std::path::PathBuf;
//! use std::sync::Arc;
//! use docnav_site::{SiteBuilder, SiteOptions};
//! use docnav_source::FsContentSource;
//!
//! let source = Arc::new(FsContentSource::new(PathBuf::from("src/data")));
//! let builder = SiteBuilder::new(source, SiteOptions::default());
//!
//! let mut diagnostics = Vec::new();
//! let output = builder.build(&mut diagnostics)?;
//! println!("{} pages", output.pages.len());
//! ```

use std::sync::Arc;

use docnav_source::{ContentRecord, ContentSource, SourceError};

use crate::assembler::PageAssembler;
use crate::collision::PathCollisionDetector;
use crate::descriptor::PageDescriptor;
use crate::diagnostics::DiagnosticSink;
use crate::normalize::PathNormalizer;
use crate::options::SiteOptions;
use crate::redirects::{RedirectEntry, RedirectRegistry};
use crate::tree::{TreeNode, generate_sidebar};

/// Host side of page registration.
pub trait PageRegistrar {
    fn create_page(&mut self, page: PageDescriptor);
}

/// Host side of redirect registration.
pub trait RedirectRegistrar {
    fn create_redirect(&mut self, redirect: RedirectEntry);
}

impl PageRegistrar for Vec<PageDescriptor> {
    fn create_page(&mut self, page: PageDescriptor) {
        self.push(page);
    }
}

impl RedirectRegistrar for Vec<RedirectEntry> {
    fn create_redirect(&mut self, redirect: RedirectEntry) {
        self.push(redirect);
    }
}

/// Error that aborts a build pass.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// A content root could not be listed.
    #[error("Failed to fetch content: {0}")]
    Fetch(#[from] SourceError),
}

/// Result of a successful build pass.
#[derive(Clone, Debug)]
pub struct SiteOutput {
    /// Pages in registration order.
    pub pages: Vec<PageDescriptor>,
    pub redirects: Vec<RedirectEntry>,
    /// Sidebar tree of the docs root, one child per section.
    pub docs_tree: TreeNode,
    /// Sidebar tree of the guides root, one child per locale.
    pub guides_tree: TreeNode,
}

impl SiteOutput {
    /// Hand pages, then redirects, to the host.
    pub fn publish(self, pages: &mut dyn PageRegistrar, redirects: &mut dyn RedirectRegistrar) {
        for page in self.pages {
            pages.create_page(page);
        }
        for redirect in self.redirects {
            redirects.create_redirect(redirect);
        }
    }
}

/// Runs build passes against a content source.
pub struct SiteBuilder {
    source: Arc<dyn ContentSource>,
    options: SiteOptions,
    normalizer: PathNormalizer,
}

impl SiteBuilder {
    #[must_use]
    pub fn new(source: Arc<dyn ContentSource>, options: SiteOptions) -> Self {
        let normalizer = PathNormalizer::new(options.locales.clone());
        Self {
            source,
            options,
            normalizer,
        }
    }

    #[must_use]
    pub fn options(&self) -> &SiteOptions {
        &self.options
    }

    /// Run one build pass.
    ///
    /// Non-fatal problems go to `sink`; the pass continues without the
    /// affected pages.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Fetch`] if either content root cannot be read.
    pub fn build(&self, sink: &mut dyn DiagnosticSink) -> Result<SiteOutput, BuildError> {
        let docs = self.fetch(&self.options.docs_root)?;
        let guides = self.fetch(&self.options.guides_root)?;

        let docs_tree = generate_sidebar(
            &docs,
            &self.options.docs_root,
            &self.normalizer,
            &self.options,
        );
        let guides_tree = generate_sidebar(
            &guides,
            &self.options.guides_root,
            &self.normalizer,
            &self.options,
        );

        let mut detector = PathCollisionDetector::new();
        let pages = PageAssembler::new(&self.options, &self.normalizer, &docs_tree, &guides_tree)
            .assemble(&docs, &guides, &mut detector, sink);
        let redirects = RedirectRegistry::legacy().into_entries();

        tracing::info!(
            mode = ?self.options.mode,
            pages = pages.len(),
            redirects = redirects.len(),
            "Site built"
        );

        Ok(SiteOutput {
            pages,
            redirects,
            docs_tree,
            guides_tree,
        })
    }

    fn fetch(&self, root: &str) -> Result<Vec<ContentRecord>, BuildError> {
        let mut records = self.source.fetch(root)?;
        records.sort_by(|a, b| a.absolute_path.cmp(&b.absolute_path));
        tracing::debug!(root, count = records.len(), "Fetched content");
        Ok(records)
    }
}
