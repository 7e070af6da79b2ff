//! Page descriptors: the output unit handed to page registration.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Serialize, Serializer};

use crate::breadcrumbs::Breadcrumb;
use crate::tree::{PageMeta, TreeNode};

/// Top-level navigation entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NavLink {
    pub label: String,
    pub to: String,
}

impl NavLink {
    #[must_use]
    pub fn new(label: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            to: to.into(),
        }
    }
}

/// Template a page is rendered with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TemplateRef {
    /// Regular content page.
    DocPage,
    /// Listing of a content-less category.
    BreadcrumbStub,
    NotFound,
    /// Landing page of a docs section, by section slug.
    Section(String),
    /// Landing page of a guides locale.
    Guides,
    /// Fixed page, by template name.
    Static(String),
}

impl fmt::Display for TemplateRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DocPage => f.write_str("doc-page"),
            Self::BreadcrumbStub => f.write_str("breadcrumb-stub"),
            Self::NotFound => f.write_str("not-found"),
            Self::Section(slug) => write!(f, "section:{slug}"),
            Self::Guides => f.write_str("guides"),
            Self::Static(name) => f.write_str(name),
        }
    }
}

impl Serialize for TemplateRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Content of a page backed by a record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PageContent {
    pub title: String,
    /// Canonical URL of the page.
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(rename = "hideFromSidebar")]
    pub hide_from_sidebar: bool,
    pub draft: bool,
    /// Link to the page source in the content repository.
    #[serde(rename = "fileOrigin")]
    pub file_origin: String,
    pub body: String,
}

/// Data handed to the template.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageContext {
    /// Sidebar shown next to the page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sidebar_tree: Option<Arc<TreeNode>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub breadcrumbs: Vec<Breadcrumb>,
    pub nav_links: Arc<[NavLink]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    /// Counterparts of this page per locale.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub translations: BTreeMap<String, PageMeta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<PageContent>,
    /// Title of a stub page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Children listed by a stub page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direct_children: Option<IndexMap<String, TreeNode>>,
}

/// A page to register: URL, template and template data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PageDescriptor {
    pub path: String,
    #[serde(rename = "component")]
    pub template: TemplateRef,
    pub context: PageContext,
}
