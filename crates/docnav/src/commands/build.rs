//! `docnav build` command implementation.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use docnav_config::{CliSettings, Config};
use docnav_site::{BuildMode, Diagnostic, DiagnosticSink, Locales, SiteBuilder, SiteOptions};
use docnav_source::{ContentSource, FsContentSource};

use crate::error::CliError;
use crate::manifest::ManifestWriter;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Path to configuration file (default: auto-discover docnav.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Content source directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Directory the manifests are written to (overrides config).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Build for the public site: drafts are left out.
    #[arg(long, env = "DOCNAV_PRODUCTION")]
    production: bool,

    /// Build a preview site even if the doc URL is the production one.
    #[arg(long, conflicts_with = "production")]
    staging: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl BuildArgs {
    /// Execute the build command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, content cannot be fetched
    /// or the manifests cannot be written.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            source_dir: self.source_dir.clone(),
            output_dir: self.output_dir.clone(),
            production: self.resolve_production(),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let options = site_options(&config);

        output.info(&format!(
            "Source: {}",
            config.content_resolved.source_dir.display()
        ));
        output.info(&format!("Output: {}", config.output_dir.display()));
        output.info(&format!("Mode: {}", mode_name(options.mode)));

        let source: Arc<dyn ContentSource> = Arc::new(FsContentSource::new(
            config.content_resolved.source_dir.clone(),
        ));
        let mut diagnostics = DiagnosticCounter::default();
        let site = SiteBuilder::new(source, options).build(&mut diagnostics)?;

        let mut writer = ManifestWriter::new();
        let (pages, redirects) = writer.registrars();
        site.publish(pages, redirects);
        let written = writer.write(&config.output_dir)?;

        if diagnostics.total() > 0 {
            output.warning(&format!(
                "{} problem(s): {}",
                diagnostics.total(),
                diagnostics.summary()
            ));
        }
        output.success(&format!(
            "Built {} pages and {} redirects to {}",
            writer.page_count(),
            writer.redirect_count(),
            written.pages.display()
        ));
        Ok(())
    }

    /// Resolve the mode override from --production/--staging.
    fn resolve_production(&self) -> Option<bool> {
        if self.production {
            Some(true)
        } else if self.staging {
            Some(false)
        } else {
            None
        }
    }
}

/// Build options from the loaded configuration.
pub(crate) fn site_options(config: &Config) -> SiteOptions {
    let mode = if config.is_production() {
        BuildMode::Production
    } else {
        BuildMode::Staging
    };

    SiteOptions {
        mode,
        locales: Locales::new(
            config.locales.default.clone(),
            config.locales.supported.clone(),
        ),
        doc_url: config.site.doc_url.clone(),
        repository_url: config.site.repository_url.clone(),
        docs_root: config.content_resolved.docs_root.clone(),
        guides_root: config.content_resolved.guides_root.clone(),
        ..SiteOptions::default()
    }
}

fn mode_name(mode: BuildMode) -> &'static str {
    match mode {
        BuildMode::Production => "production",
        BuildMode::Staging => "staging",
    }
}

/// Diagnostic sink counting problems per kind. Logging happens where the
/// diagnostics are raised.
#[derive(Debug, Default)]
pub(crate) struct DiagnosticCounter {
    counts: BTreeMap<&'static str, usize>,
}

impl DiagnosticCounter {
    pub(crate) fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// `kind: count` pairs, sorted by kind.
    pub(crate) fn summary(&self) -> String {
        self.counts
            .iter()
            .map(|(kind, count)| format!("{kind}: {count}"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl DiagnosticSink for DiagnosticCounter {
    fn report(&mut self, diagnostic: Diagnostic) {
        let kind = match diagnostic {
            Diagnostic::MissingBody { .. } => "missing body",
            Diagnostic::MissingFrontmatter { .. } => "missing frontmatter",
            Diagnostic::MissingTitle { .. } => "missing title",
            Diagnostic::PathCollision { .. } => "path collision",
            Diagnostic::MissingTranslation { .. } => "missing translation",
        };
        *self.counts.entry(kind).or_default() += 1;
    }
}
