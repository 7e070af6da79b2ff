//! Path normalization.
//!
//! Pure string transforms turning source directories and titles into
//! canonical URL paths. The slug pipeline is an explicit ordered list of
//! [`Transform`]s; the order matters (de-duplication runs on raw segments,
//! before slugification changes them).

use std::sync::LazyLock;

use regex::Regex;

use crate::locale::Locales;

static ORDERING_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+[- ]").expect("invalid ordering prefix regex"));

static SEPARATOR_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s\-;:!?&,()\[\]]+").expect("invalid separator regex"));

static UNSAFE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[%@~]").expect("invalid unsafe chars regex"));

static HYPHEN_AROUND_SLASH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-*/-*").expect("invalid hyphen regex"));

static REPEATED_SLASH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/{2,}").expect("invalid slash regex"));

/// One step of a normalization pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transform {
    /// Strip numeric ordering prefixes from every segment.
    Unorderify,
    /// Collapse segments repeating their parent.
    DedupePath,
    /// Lower-case and hyphenate.
    Slugify,
    /// Drop a leading default-locale segment.
    StripDefaultLocale,
    AddLeadingSlash,
    AddTrailingSlash,
}

/// Steps of [`PathNormalizer::get_slug`], in application order.
pub const SLUG_PIPELINE: [Transform; 6] = [
    Transform::Unorderify,
    Transform::DedupePath,
    Transform::Slugify,
    Transform::StripDefaultLocale,
    Transform::AddLeadingSlash,
    Transform::AddTrailingSlash,
];

/// Strip a leading numeric ordering prefix (`01-intro`, `01 intro`) from
/// each `/`-separated segment.
#[must_use]
pub fn unorderify(path: &str) -> String {
    path.split('/')
        .map(|segment| ORDERING_PREFIX.replace(segment, ""))
        .collect::<Vec<_>>()
        .join("/")
}

/// Lower-case `text`, turn whitespace and punctuation runs into hyphens and
/// drop `%`, `@` and `~`. Path separators are kept; hyphens next to them
/// and at either end are trimmed.
#[must_use]
pub fn slugify(text: &str) -> String {
    let lower = text.to_lowercase();
    let safe = UNSAFE_CHARS.replace_all(&lower, "");
    let hyphenated = SEPARATOR_RUN.replace_all(&safe, "-");
    let tidy = HYPHEN_AROUND_SLASH.replace_all(&hyphenated, "/");
    let tidy = REPEATED_SLASH.replace_all(&tidy, "/");
    tidy.trim_matches('-').to_owned()
}

/// Collapse segments that repeat their parent (case-insensitively) and
/// drop empty segments. Leading and trailing slashes are preserved.
#[must_use]
pub fn dedupe_path(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        if segments
            .last()
            .is_some_and(|prev| prev.to_lowercase() == segment.to_lowercase())
        {
            continue;
        }
        segments.push(segment);
    }

    let mut out = segments.join("/");
    if path.starts_with('/') {
        out.insert(0, '/');
    }
    if path.ends_with('/') && !segments.is_empty() {
        out.push('/');
    }
    out
}

#[must_use]
pub fn add_leading_slash(path: &str) -> String {
    format!("/{}", path.trim_start_matches('/'))
}

#[must_use]
pub fn add_trailing_slash(path: &str) -> String {
    format!("{}/", path.trim_end_matches('/'))
}

/// The part of `directory` after the first `<root>/`; empty when
/// `directory` is the root itself, unchanged when the root is absent.
///
/// ```text
/// strip_directory_path("docs/01-using-k6", "docs")              -> "01-using-k6"
/// strip_directory_path("translated-guides/es/01-a", "translated-guides") -> "es/01-a"
/// ```
#[must_use]
pub fn strip_directory_path<'a>(directory: &'a str, root: &str) -> &'a str {
    if directory == root {
        return "";
    }
    let marker = format!("{root}/");
    directory
        .find(&marker)
        .map_or(directory, |idx| &directory[idx + marker.len()..])
}

/// Replace `/` in a title so titles like `k6/html` stay one segment.
#[must_use]
pub fn sanitize_title(title: &str) -> String {
    title.replace('/', "-")
}

/// First segment of `path` (the top-level section of a docs page).
#[must_use]
pub fn doc_section(path: &str) -> &str {
    path.trim_start_matches('/').split('/').next().unwrap_or("")
}

/// Custom slug from frontmatter, anchored with leading and trailing slashes.
#[must_use]
pub fn anchor_slug(custom: &str) -> String {
    add_trailing_slash(&add_leading_slash(custom.trim()))
}

/// Join a directory and a leaf with `/`, skipping an empty directory.
pub(crate) fn join_path(directory: &str, leaf: &str) -> String {
    if directory.is_empty() {
        leaf.to_owned()
    } else {
        format!("{directory}/{leaf}")
    }
}

/// Locale-aware path normalizer.
#[derive(Clone, Debug, Default)]
pub struct PathNormalizer {
    locales: Locales,
}

impl PathNormalizer {
    #[must_use]
    pub fn new(locales: Locales) -> Self {
        Self { locales }
    }

    #[must_use]
    pub fn locales(&self) -> &Locales {
        &self.locales
    }

    /// Apply a single transform.
    #[must_use]
    pub fn apply(&self, transform: Transform, input: &str) -> String {
        match transform {
            Transform::Unorderify => unorderify(input),
            Transform::DedupePath => dedupe_path(input),
            Transform::Slugify => slugify(input),
            Transform::StripDefaultLocale => self.remove_default_locale_prefix(input),
            Transform::AddLeadingSlash => add_leading_slash(input),
            Transform::AddTrailingSlash => add_trailing_slash(input),
        }
    }

    /// Apply `pipeline` left to right.
    #[must_use]
    pub fn run(&self, pipeline: &[Transform], input: &str) -> String {
        pipeline
            .iter()
            .fold(input.to_owned(), |acc, step| self.apply(*step, &acc))
    }

    /// Canonical slug for a source path (see [`SLUG_PIPELINE`]).
    ///
    /// The result starts and ends with `/`, or is exactly `/`.
    #[must_use]
    pub fn get_slug(&self, path: &str) -> String {
        self.run(&SLUG_PIPELINE, path)
    }

    /// Slug for a translated page: the translation root is stripped from
    /// `relative_directory`, the sanitized title appended, and the result
    /// carries the `locale` prefix unless `locale` is the default.
    #[must_use]
    pub fn get_translated_slug(
        &self,
        relative_directory: &str,
        title: &str,
        locale: &str,
        root: &str,
    ) -> String {
        let stripped = strip_directory_path(relative_directory, root);
        let slug = self.get_slug(&join_path(stripped, &sanitize_title(title)));
        if self.locales.is_default(locale) || slug.starts_with(&format!("/{locale}/")) {
            return slug;
        }
        format!("/{locale}{slug}")
    }

    /// Derived slug of a page under the content root `root`, prefixed with
    /// the locale owning its directory.
    #[must_use]
    pub fn page_slug(&self, relative_directory: &str, title: &str, root: &str) -> String {
        let locale = self
            .locales
            .locale_of(strip_directory_path(relative_directory, root));
        self.get_translated_slug(relative_directory, title, locale, root)
    }

    /// Replace a leading locale segment with `locale`, or insert one.
    #[must_use]
    pub fn translate_path(&self, path: &str, locale: &str) -> String {
        let body = path.trim_start_matches('/');
        let translated = match body.split_once('/') {
            Some((first, rest)) if self.locales.is_supported(first) => format!("{locale}/{rest}"),
            None if body.is_empty() || self.locales.is_supported(body) => locale.to_owned(),
            _ => format!("{locale}/{body}"),
        };
        if path.starts_with('/') {
            format!("/{translated}")
        } else {
            translated
        }
    }

    /// Drop a leading default-locale segment; the default locale is never
    /// part of a URL.
    #[must_use]
    pub fn remove_default_locale_prefix(&self, path: &str) -> String {
        let leading = if path.starts_with('/') { "/" } else { "" };
        let body = path.trim_start_matches('/');
        let default = self.locales.default_locale();

        if body == default {
            return leading.to_owned();
        }
        match body.strip_prefix(default).and_then(|r| r.strip_prefix('/')) {
            Some(rest) => format!("{leading}{rest}"),
            None => path.to_owned(),
        }
    }
}
