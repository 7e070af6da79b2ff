//! Content record types.
//!
//! A [`ContentRecord`] is one source document as delivered by a
//! [`ContentSource`](crate::ContentSource). Records are immutable once
//! fetched; every later stage only reads them.

use std::path::PathBuf;

use serde::{Deserialize, Deserializer, Serialize};

/// One source document plus its parsed markup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContentRecord {
    /// File name without the `.md` extension (e.g., "02-ssl-tls").
    pub name: String,
    /// Directory relative to the source root, `/`-separated
    /// (e.g., "docs/01-using-k6").
    pub relative_directory: String,
    /// Absolute source path. Records are processed in ascending order of this path.
    pub absolute_path: PathBuf,
    /// Parsed markup, `None` when the upstream parse failed.
    pub markup: Option<Markup>,
}

/// Parsed document: optional frontmatter and the markdown body.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Markup {
    /// Frontmatter, `None` when absent or malformed.
    pub frontmatter: Option<Frontmatter>,
    /// Markdown body following the frontmatter block.
    pub body: String,
}

/// Structured page metadata.
///
/// Every field has an explicit default: `draft` and `hide_from_sidebar` are
/// `false`, everything else is absent. Empty strings for `slug` and
/// `redirect` count as absent.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frontmatter {
    /// Page title. Required unless the record is a pure redirect.
    #[serde(
        default,
        deserialize_with = "scalar_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub title: Option<String>,

    /// Custom URL overriding the derived slug.
    #[serde(
        default,
        deserialize_with = "non_empty",
        skip_serializing_if = "Option::is_none"
    )]
    pub slug: Option<String>,

    /// Redirect target. When set the record gets no page of its own.
    #[serde(
        default,
        deserialize_with = "non_empty",
        skip_serializing_if = "Option::is_none"
    )]
    pub redirect: Option<String>,

    /// Draft pages are left out of production builds.
    #[serde(default, deserialize_with = "flag")]
    pub draft: bool,

    /// Keep the page reachable but out of sidebar rendering.
    #[serde(default, rename = "hideFromSidebar", deserialize_with = "flag")]
    pub hide_from_sidebar: bool,

    /// Title for the HTML `<title>` element.
    #[serde(
        default,
        deserialize_with = "scalar_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub head_title: Option<String>,

    /// Short summary for listings and meta tags.
    #[serde(
        default,
        deserialize_with = "scalar_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub excerpt: Option<String>,
}

/// Accepts `true`/`false` as booleans or as the strings `"true"`/`"false"`.
fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    match Option::<Flag>::deserialize(deserializer)? {
        None => Ok(false),
        Some(Flag::Bool(value)) => Ok(value),
        Some(Flag::Text(text)) => match text.trim() {
            "true" => Ok(true),
            "false" | "" => Ok(false),
            other => Err(serde::de::Error::custom(format!(
                "expected \"true\" or \"false\", got \"{other}\""
            ))),
        },
    }
}

/// Text that YAML may have typed as a number or boolean (`title: 2021`).
fn scalar_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Text(String),
        Signed(i64),
        Unsigned(u64),
        Float(f64),
        Bool(bool),
    }

    Ok(
        Option::<Scalar>::deserialize(deserializer)?.map(|scalar| match scalar {
            Scalar::Text(text) => text,
            Scalar::Signed(value) => value.to_string(),
            Scalar::Unsigned(value) => value.to_string(),
            Scalar::Float(value) => value.to_string(),
            Scalar::Bool(value) => value.to_string(),
        }),
    )
}

fn non_empty<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|v| !v.trim().is_empty()))
}

impl ContentRecord {
    /// Create a record from a `/`-separated path relative to the source root.
    ///
    /// `relative_path` may carry the `.md` extension
    /// (e.g., `"docs/01-using-k6/02-ssl-tls.md"`).
    #[must_use]
    pub fn from_relative_path(
        relative_path: &str,
        absolute_path: PathBuf,
        markup: Option<Markup>,
    ) -> Self {
        let without_ext = relative_path.strip_suffix(".md").unwrap_or(relative_path);
        let (relative_directory, name) = match without_ext.rsplit_once('/') {
            Some((dir, name)) => (dir.to_owned(), name.to_owned()),
            None => (String::new(), without_ext.to_owned()),
        };

        Self {
            name,
            relative_directory,
            absolute_path,
            markup,
        }
    }

    /// Human-readable source identifier used in diagnostics
    /// (e.g., "docs/01-using-k6/02-ssl-tls").
    #[must_use]
    pub fn source_name(&self) -> String {
        if self.relative_directory.is_empty() {
            self.name.clone()
        } else {
            format!("{}/{}", self.relative_directory, self.name)
        }
    }

    /// Frontmatter, if the record parsed and carried any.
    #[must_use]
    pub fn frontmatter(&self) -> Option<&Frontmatter> {
        self.markup.as_ref()?.frontmatter.as_ref()
    }
}

impl Frontmatter {
    /// Title with `/` replaced by `-`, so titles like `k6/html` are not
    /// mistaken for nested paths.
    #[must_use]
    pub fn path_safe_title(&self) -> Option<String> {
        self.title.as_deref().map(|t| t.replace('/', "-"))
    }
}
