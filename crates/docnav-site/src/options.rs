//! Build options.
//!
//! Everything the engine needs to know about the site that is not content:
//! audience, locales, content roots and the navigation quirks of the
//! documentation site (pinned links, hidden sections, static pages).

use serde::Serialize;

use crate::descriptor::NavLink;
use crate::locale::Locales;
use crate::normalize::slugify;

/// Build audience.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    /// Public site: drafts are left out.
    Production,
    /// Preview site: drafts are published and migrating sections are
    /// redirected to their new location.
    #[default]
    Staging,
}

impl BuildMode {
    #[must_use]
    pub fn is_production(self) -> bool {
        self == Self::Production
    }
}

/// Page rendered from a fixed template rather than content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StaticPage {
    pub path: String,
    pub template: String,
}

impl StaticPage {
    #[must_use]
    pub fn new(path: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            template: template.into(),
        }
    }
}

/// Sidebar redirect for a section that is moving to a separate site.
///
/// Outside production, the sidebar entry titled `title` points at
/// `target`, prefixed with `base_path` unless the documentation URL is a
/// local development server (contains `local_marker`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MigrationRedirect {
    pub title: String,
    pub target: String,
    pub base_path: String,
    pub local_marker: String,
}

impl MigrationRedirect {
    /// Redirect target for a site served at `doc_url`.
    #[must_use]
    pub fn resolve(&self, doc_url: &str) -> String {
        if doc_url.contains(&self.local_marker) {
            self.target.clone()
        } else {
            format!("{}{}", self.base_path, self.target)
        }
    }
}

impl Default for MigrationRedirect {
    fn default() -> Self {
        Self {
            title: "Cloud REST API".to_owned(),
            target: "/cloud-rest-api/introduction".to_owned(),
            base_path: "/docs".to_owned(),
            local_marker: "8000".to_owned(),
        }
    }
}

/// Top-level navigation and supplementary page settings.
#[derive(Clone, Debug)]
pub struct NavigationOptions {
    /// First top-level link (the guides landing page).
    pub home_link: NavLink,
    /// Link inserted after the first `pinned_after` section links.
    pub pinned_link: NavLink,
    pub pinned_after: usize,
    /// Sections without a top-level link or section page.
    pub hidden_sections: Vec<String>,
    /// Section name to link label, for sections not shown upper-cased.
    pub label_overrides: Vec<(String, String)>,
    /// Sections (compared case-insensitively) without stub pages.
    pub stub_excluded_sections: Vec<String>,
    /// Sections additionally without stub pages in production.
    pub production_stub_excluded_sections: Vec<String>,
    pub static_pages: Vec<StaticPage>,
    pub not_found_path: String,
    /// Section whose sidebar the not-found page shows.
    pub not_found_section: String,
    pub migration: Option<MigrationRedirect>,
}

impl Default for NavigationOptions {
    fn default() -> Self {
        Self {
            home_link: NavLink::new("guides", "/"),
            pinned_link: NavLink::new("ecosystem", "/ecosystem/"),
            pinned_after: 3,
            hidden_sections: vec!["Cloud REST API".to_owned()],
            label_overrides: vec![("cloud".to_owned(), "Cloud Docs".to_owned())],
            stub_excluded_sections: vec!["javascript api".to_owned(), "examples".to_owned()],
            production_stub_excluded_sections: vec!["cloud rest api".to_owned()],
            static_pages: vec![
                StaticPage::new("/ecosystem/", "ecosystem"),
                StaticPage::new("/ecosystem/bundle-builder/", "bundle-builder"),
            ],
            not_found_path: "/404".to_owned(),
            not_found_section: "guides".to_owned(),
            migration: Some(MigrationRedirect::default()),
        }
    }
}

impl NavigationOptions {
    /// Whether `section` is left out of top-level navigation.
    #[must_use]
    pub fn is_hidden(&self, section: &str) -> bool {
        let slug = slugify(section);
        self.hidden_sections.iter().any(|h| slugify(h) == slug)
    }

    /// Label of the top-level link for `section`.
    #[must_use]
    pub fn label(&self, section: &str) -> String {
        self.label_overrides
            .iter()
            .find(|(name, _)| name == section)
            .map_or_else(|| section.to_uppercase(), |(_, label)| label.clone())
    }

    /// Whether stub pages are generated below `section`.
    #[must_use]
    pub fn has_stubs(&self, section: &str, mode: BuildMode) -> bool {
        let lower = section.to_lowercase();
        let excluded = |list: &[String]| list.iter().any(|s| s.to_lowercase() == lower);
        !(excluded(&self.stub_excluded_sections)
            || (mode.is_production() && excluded(&self.production_stub_excluded_sections)))
    }
}

/// Options for one build pass.
#[derive(Clone, Debug)]
pub struct SiteOptions {
    pub mode: BuildMode,
    pub locales: Locales,
    /// Base URL the site is served at.
    pub doc_url: String,
    /// Prefix of links to page sources (`<repository_url>/<dir>/<name>.md`).
    pub repository_url: String,
    /// Content root of the single-locale documentation.
    pub docs_root: String,
    /// Content root holding one directory per locale.
    pub guides_root: String,
    pub navigation: NavigationOptions,
}

impl Default for SiteOptions {
    fn default() -> Self {
        Self {
            mode: BuildMode::default(),
            locales: Locales::default(),
            doc_url: "http://localhost:8000".to_owned(),
            repository_url: "https://github.com/k6io/docs/blob/master/src/data".to_owned(),
            docs_root: "docs".to_owned(),
            guides_root: "translated-guides".to_owned(),
            navigation: NavigationOptions::default(),
        }
    }
}

impl SiteOptions {
    /// Whether a page with this `draft` flag is left out of the build.
    #[must_use]
    pub fn skips_draft(&self, draft: bool) -> bool {
        draft && self.mode.is_production()
    }

    /// Sidebar redirect of a page, after the migration override.
    #[must_use]
    pub fn sidebar_redirect(&self, title: &str, redirect: Option<&str>) -> Option<String> {
        if !self.mode.is_production()
            && let Some(migration) = &self.navigation.migration
            && migration.title == title
        {
            return Some(migration.resolve(&self.doc_url));
        }
        redirect.map(ToOwned::to_owned)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_migration_redirect_local_server() {
        let options = SiteOptions::default();

        assert_eq!(
            options.sidebar_redirect("Cloud REST API", None).as_deref(),
            Some("/cloud-rest-api/introduction")
        );
    }

    #[test]
    fn test_migration_redirect_staging_server() {
        let options = SiteOptions {
            doc_url: "https://staging.k6.io/docs".to_owned(),
            ..SiteOptions::default()
        };

        assert_eq!(
            options.sidebar_redirect("Cloud REST API", Some("/old/")).as_deref(),
            Some("/docs/cloud-rest-api/introduction")
        );
    }

    #[test]
    fn test_migration_redirect_not_in_production() {
        let options = SiteOptions {
            mode: BuildMode::Production,
            ..SiteOptions::default()
        };

        assert_eq!(options.sidebar_redirect("Cloud REST API", None), None);
        assert_eq!(
            options.sidebar_redirect("Other", Some("/x/")).as_deref(),
            Some("/x/")
        );
    }

    #[test]
    fn test_skips_draft_only_in_production() {
        let mut options = SiteOptions::default();
        assert!(!options.skips_draft(true));

        options.mode = BuildMode::Production;
        assert!(options.skips_draft(true));
        assert!(!options.skips_draft(false));
    }

    #[test]
    fn test_navigation_labels() {
        let nav = NavigationOptions::default();

        assert_eq!(nav.label("cloud"), "Cloud Docs");
        assert_eq!(nav.label("javascript api"), "JAVASCRIPT API");
    }

    #[test]
    fn test_hidden_sections_compare_slugs() {
        let nav = NavigationOptions::default();

        assert!(nav.is_hidden("Cloud REST API"));
        assert!(nav.is_hidden("cloud rest api"));
        assert!(!nav.is_hidden("cloud"));
    }

    #[test]
    fn test_stub_exclusions() {
        let nav = NavigationOptions::default();

        assert!(!nav.has_stubs("JavaScript API", BuildMode::Staging));
        assert!(nav.has_stubs("Cloud REST API", BuildMode::Staging));
        assert!(!nav.has_stubs("Cloud REST API", BuildMode::Production));
        assert!(nav.has_stubs("guides", BuildMode::Production));
    }
}
