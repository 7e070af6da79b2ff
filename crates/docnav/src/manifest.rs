//! JSON manifests of a build pass.
//!
//! The CLI stands in for the page and redirect registration host: it
//! collects everything the build publishes and writes it to
//! `pages.json` and `redirects.json` in the output directory.

use std::fs;
use std::path::{Path, PathBuf};

use docnav_site::{PageDescriptor, PageRegistrar, RedirectEntry, RedirectRegistrar};
use serde::Serialize;

use crate::error::CliError;

const PAGES_FILENAME: &str = "pages.json";
const REDIRECTS_FILENAME: &str = "redirects.json";

/// Collects published pages and redirects.
#[derive(Debug, Default)]
pub(crate) struct ManifestWriter {
    pages: Vec<PageDescriptor>,
    redirects: Vec<RedirectEntry>,
}

/// Files written by [`ManifestWriter::write`].
#[derive(Debug)]
pub(crate) struct WrittenManifests {
    pub(crate) pages: PathBuf,
    pub(crate) redirects: PathBuf,
}

impl ManifestWriter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Registration targets to publish a build into.
    pub(crate) fn registrars(&mut self) -> (&mut dyn PageRegistrar, &mut dyn RedirectRegistrar) {
        (&mut self.pages, &mut self.redirects)
    }

    pub(crate) fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub(crate) fn redirect_count(&self) -> usize {
        self.redirects.len()
    }

    /// Write both manifests into `dir`, creating it if needed.
    pub(crate) fn write(&self, dir: &Path) -> Result<WrittenManifests, CliError> {
        fs::create_dir_all(dir)?;

        let written = WrittenManifests {
            pages: dir.join(PAGES_FILENAME),
            redirects: dir.join(REDIRECTS_FILENAME),
        };
        write_json(&written.pages, &self.pages)?;
        write_json(&written.redirects, &self.redirects)?;

        tracing::info!(
            dir = %dir.display(),
            pages = self.pages.len(),
            redirects = self.redirects.len(),
            "Wrote manifests"
        );
        Ok(written)
    }
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    Ok(())
}
