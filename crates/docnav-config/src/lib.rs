//! Configuration management for docnav.
//!
//! Parses `docnav.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String values in the `[site]` section support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! ## Build Mode
//!
//! A build is a production build when `site.doc_url` equals
//! `site.production_doc_url` (ignoring a trailing slash). The CLI can force
//! either mode through [`CliSettings::production`].

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override content source directory.
    pub source_dir: Option<PathBuf>,
    /// Override manifest output directory.
    pub output_dir: Option<PathBuf>,
    /// Force production (`true`) or staging (`false`) mode.
    pub production: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "docnav.toml";

const DEFAULT_DOC_URL: &str = "http://localhost:8000";
const PRODUCTION_DOC_URL: &str = "https://k6.io/docs";
const REPOSITORY_URL: &str = "https://github.com/k6io/docs/blob/master/src/data";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Site URLs and build mode inputs.
    pub site: SiteConfig,
    /// Content layout (paths are relative strings from TOML).
    content: ContentConfigRaw,
    /// Supported locales.
    pub locales: LocalesConfig,
    /// Output layout (paths are relative strings from TOML).
    output: OutputConfigRaw,

    /// Resolved content configuration (set after loading).
    #[serde(skip)]
    pub content_resolved: ContentConfig,
    /// Resolved manifest output directory (set after loading).
    #[serde(skip)]
    pub output_dir: PathBuf,
    /// Build mode forced from the command line.
    #[serde(skip)]
    production_override: Option<bool>,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Site URL configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Base URL the site is built for.
    pub doc_url: String,
    /// Base URL of the production deployment.
    pub production_doc_url: String,
    /// Base URL for "edit this page" links into the source repository.
    pub repository_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            doc_url: DEFAULT_DOC_URL.to_owned(),
            production_doc_url: PRODUCTION_DOC_URL.to_owned(),
            repository_url: REPOSITORY_URL.to_owned(),
        }
    }
}

impl SiteConfig {
    /// True when the configured doc URL is the production one.
    #[must_use]
    pub fn targets_production(&self) -> bool {
        self.doc_url.trim_end_matches('/') == self.production_doc_url.trim_end_matches('/')
    }
}

/// Raw content configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ContentConfigRaw {
    source_dir: Option<String>,
    docs_root: Option<String>,
    guides_root: Option<String>,
}

/// Resolved content configuration with absolute paths.
#[derive(Debug)]
pub struct ContentConfig {
    /// Directory containing the content roots.
    pub source_dir: PathBuf,
    /// Root directory name of the per-section documentation.
    pub docs_root: String,
    /// Root directory name of the translated guides.
    pub guides_root: String,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("src/data"),
            docs_root: "docs".to_owned(),
            guides_root: "translated-guides".to_owned(),
        }
    }
}

/// Locale configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LocalesConfig {
    /// Locale whose pages are served without a prefix.
    pub default: String,
    /// All supported locales, in translation-map order.
    pub supported: Vec<String>,
}

impl Default for LocalesConfig {
    fn default() -> Self {
        Self {
            default: "en".to_owned(),
            supported: vec!["en".to_owned(), "es".to_owned()],
        }
    }
}

/// Raw output configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct OutputConfigRaw {
    dir: Option<String>,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`site.doc_url`").
        field: String,
        /// Error message (e.g., "${`DOC_URL`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `docnav.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the loaded values don't validate.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Whether this build filters drafts and uses production URLs.
    #[must_use]
    pub fn is_production(&self) -> bool {
        self.production_override
            .unwrap_or_else(|| self.site.targets_production())
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(source_dir) = &settings.source_dir {
            self.content_resolved.source_dir.clone_from(source_dir);
        }
        if let Some(output_dir) = &settings.output_dir {
            self.output_dir.clone_from(output_dir);
        }
        if let Some(production) = settings.production {
            self.production_override = Some(production);
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        let content = ContentConfig::default();
        Self {
            site: SiteConfig::default(),
            content: ContentConfigRaw::default(),
            locales: LocalesConfig::default(),
            output: OutputConfigRaw::default(),
            content_resolved: ContentConfig {
                source_dir: base.join(&content.source_dir),
                ..content
            },
            output_dir: base.join(".docnav"),
            production_override: None,
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_site()?;
        self.validate_content()?;
        self.validate_locales()?;
        Ok(())
    }

    fn validate_site(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.site.doc_url, "site.doc_url")?;
        require_http_url(&self.site.doc_url, "site.doc_url")?;
        require_non_empty(&self.site.production_doc_url, "site.production_doc_url")?;
        require_http_url(&self.site.production_doc_url, "site.production_doc_url")?;
        require_non_empty(&self.site.repository_url, "site.repository_url")?;
        require_http_url(&self.site.repository_url, "site.repository_url")?;
        Ok(())
    }

    fn validate_content(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.content_resolved.docs_root, "content.docs_root")?;
        require_non_empty(&self.content_resolved.guides_root, "content.guides_root")?;
        if self.content_resolved.docs_root == self.content_resolved.guides_root {
            return Err(ConfigError::Validation(
                "content.docs_root and content.guides_root must differ".to_owned(),
            ));
        }
        Ok(())
    }

    fn validate_locales(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.locales.default, "locales.default")?;
        if self.locales.supported.is_empty() {
            return Err(ConfigError::Validation(
                "locales.supported cannot be empty".to_owned(),
            ));
        }
        if !self.locales.supported.contains(&self.locales.default) {
            return Err(ConfigError::Validation(format!(
                "locales.default \"{}\" must be listed in locales.supported",
                self.locales.default
            )));
        }
        if let Some(bad) = self
            .locales
            .supported
            .iter()
            .find(|code| code.is_empty() || code.contains('/'))
        {
            return Err(ConfigError::Validation(format!(
                "locales.supported contains an invalid code \"{bad}\""
            )));
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.site.doc_url = expand::expand_env(&self.site.doc_url, "site.doc_url")?;
        self.site.production_doc_url =
            expand::expand_env(&self.site.production_doc_url, "site.production_doc_url")?;
        self.site.repository_url =
            expand::expand_env(&self.site.repository_url, "site.repository_url")?;
        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let defaults = ContentConfig::default();

        self.content_resolved = ContentConfig {
            source_dir: self
                .content
                .source_dir
                .as_deref()
                .map_or_else(|| config_dir.join(&defaults.source_dir), |d| config_dir.join(d)),
            docs_root: self
                .content
                .docs_root
                .clone()
                .unwrap_or(defaults.docs_root),
            guides_root: self
                .content
                .guides_root
                .clone()
                .unwrap_or(defaults.guides_root),
        };

        self.output_dir = config_dir.join(self.output.dir.as_deref().unwrap_or(".docnav"));
    }
}
