//! Navigation and URL resolution for docnav.
//!
//! This crate turns a flat set of content records into a navigable site:
//! - [`PathNormalizer`]: canonical URL paths from directories and titles
//! - [`PathCollisionDetector`]: one source per URL
//! - [`SidebarTreeBuilder`] and [`generate_sidebar`]: sidebar trees
//! - [`BreadcrumbBuilder`]: root-to-leaf trails
//! - [`RedirectRegistry`]: legacy URL redirects
//! - [`PageAssembler`]: the final [`PageDescriptor`] set
//!
//! [`SiteBuilder`] wires them into one build pass over a
//! [`ContentSource`](docnav_source::ContentSource).
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::path::PathBuf;
//! use std::sync::Arc;
//! use docnav_site::{Diagnostic, SiteBuilder, SiteOptions};
//! use docnav_source::FsContentSource;
//!
//! let source = Arc::new(FsContentSource::new(PathBuf::from("src/data")));
//! let builder = SiteBuilder::new(source, SiteOptions::default());
//!
//! let mut diagnostics: Vec<Diagnostic> = Vec::new();
//! let output = builder.build(&mut diagnostics)?;
//! for page in &output.pages {
//!     println!("{} -> {}", page.path, page.template);
//! }
//! # Ok(())
//! # }
//! ```

mod assembler;
mod breadcrumbs;
mod collision;
mod descriptor;
mod diagnostics;
mod locale;
mod normalize;
mod options;
mod redirects;
mod site;
mod tree;

pub use assembler::{PageAssembler, top_level_links};
pub use breadcrumbs::{Breadcrumb, BreadcrumbBuilder};
pub use collision::{PathCollision, PathCollisionDetector, PathRecord};
pub use descriptor::{NavLink, PageContent, PageContext, PageDescriptor, TemplateRef};
pub use diagnostics::{Diagnostic, DiagnosticSink};
pub use locale::Locales;
pub use normalize::{
    PathNormalizer, SLUG_PIPELINE, Transform, add_leading_slash, add_trailing_slash, anchor_slug,
    dedupe_path, doc_section, sanitize_title, slugify, strip_directory_path, unorderify,
};
pub use options::{BuildMode, MigrationRedirect, NavigationOptions, SiteOptions, StaticPage};
pub use redirects::{RedirectEntry, RedirectRegistry};
pub use site::{BuildError, PageRegistrar, RedirectRegistrar, SiteBuilder, SiteOutput};
pub use tree::{PageMeta, SidebarTreeBuilder, TreeNode, child_sidebar, generate_sidebar, lookup};
