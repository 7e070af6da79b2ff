//! Content source abstraction for the docnav navigation engine.
//!
//! This crate provides a [`ContentSource`] trait for retrieving the content
//! records a build pass works on. This enables:
//!
//! - **Unit testing** without touching the real filesystem
//! - **Backend flexibility** (filesystem today, a CMS export tomorrow)
//! - **Clean separation** between navigation logic and I/O
//!
//! # Architecture
//!
//! The crate provides:
//! - [`ContentRecord`], [`Markup`] and [`Frontmatter`]: the immutable input model
//! - [`ContentSource`] trait with a single `fetch()` method
//! - [`FsContentSource`] reading markdown files with YAML frontmatter
//! - [`MockContentSource`] for testing (behind `mock` feature flag)
//!
//! # Example
//!
//! ```ignore
//! use std::path::PathBuf;
//! use docnav_source::{ContentSource, FsContentSource};
//!
//! let source = FsContentSource::new(PathBuf::from("src/data"));
//! for record in source.fetch("docs")? {
//!     println!("{}", record.source_name());
//! }
//! ```

mod frontmatter;
mod fs;
#[cfg(feature = "mock")]
mod mock;
mod record;
mod source;

pub use fs::FsContentSource;
#[cfg(feature = "mock")]
pub use mock::MockContentSource;
pub use record::{ContentRecord, Frontmatter, Markup};
pub use source::{ContentSource, SourceError, SourceErrorKind};
