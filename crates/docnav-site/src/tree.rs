//! Sidebar navigation trees.
//!
//! A tree mirrors the content directory hierarchy with ordering prefixes
//! stripped. Intermediate nodes may have no [`PageMeta`]; they are pure
//! navigation containers. Children keep first-insertion order, so records
//! fed in ascending source-path order give a stable, human-meaningful
//! sidebar.

use docnav_source::ContentRecord;
use indexmap::IndexMap;
use serde::Serialize;

use crate::normalize::{PathNormalizer, anchor_slug, strip_directory_path, unorderify};
use crate::options::SiteOptions;

/// Link data attached to a tree node backed by a content record.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    /// Canonical URL of the page.
    pub path: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
    /// Present and reachable, but skipped by sidebar renderers.
    pub hide_from_sidebar: bool,
    pub is_active_sidebar_link: bool,
}

/// Node of a sidebar tree.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TreeNode {
    pub children: IndexMap<String, TreeNode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<PageMeta>,
}

impl TreeNode {
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&TreeNode> {
        self.children.get(name)
    }

    #[must_use]
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Descendants that have children of their own, pre-order, with their
    /// key path relative to `self`.
    #[must_use]
    pub fn containers(&self) -> Vec<(Vec<&str>, &TreeNode)> {
        fn collect<'a>(
            node: &'a TreeNode,
            prefix: &mut Vec<&'a str>,
            out: &mut Vec<(Vec<&'a str>, &'a TreeNode)>,
        ) {
            for (name, child) in &node.children {
                if !child.has_children() {
                    continue;
                }
                prefix.push(name);
                out.push((prefix.clone(), child));
                collect(child, prefix, out);
                prefix.pop();
            }
        }

        let mut out = Vec::new();
        collect(self, &mut Vec::new(), &mut out);
        out
    }
}

/// Descend from `tree` through `segments`; empty segments are skipped.
#[must_use]
pub fn lookup<'a, S: AsRef<str>>(tree: &'a TreeNode, segments: &[S]) -> Option<&'a TreeNode> {
    segments
        .iter()
        .map(AsRef::<str>::as_ref)
        .filter(|s| !s.is_empty())
        .try_fold(tree, |node, segment| node.child(segment))
}

/// Subtree of a top-level section (docs) or locale (guides).
#[must_use]
pub fn child_sidebar<'a>(tree: &'a TreeNode, name: &str) -> Option<&'a TreeNode> {
    tree.child(name)
}

/// Incremental tree construction.
#[derive(Debug, Default)]
pub struct SidebarTreeBuilder {
    root: TreeNode,
}

impl SidebarTreeBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Walk (creating as needed) one node per non-empty segment of
    /// `directory_path`, then the `leaf_name` node, and attach `meta` there.
    ///
    /// A node that already carries meta keeps it.
    pub fn add_node(&mut self, directory_path: &str, leaf_name: &str, meta: PageMeta) {
        let mut node = &mut self.root;
        for segment in directory_path
            .split('/')
            .chain(std::iter::once(leaf_name))
            .filter(|s| !s.is_empty())
        {
            node = node.children.entry(segment.to_owned()).or_default();
        }

        match &node.meta {
            Some(existing) => tracing::debug!(
                kept = %existing.path,
                ignored = %meta.path,
                "Tree node already has page meta"
            ),
            None => node.meta = Some(meta),
        }
    }

    #[must_use]
    pub fn tree(&self) -> &TreeNode {
        &self.root
    }

    #[must_use]
    pub fn into_tree(self) -> TreeNode {
        self.root
    }
}

/// Build the sidebar tree for the records of one content root.
///
/// Records must be sorted by absolute source path. Records without
/// frontmatter or title are left out (they are reported when pages are
/// assembled), as are drafts in production.
#[must_use]
pub fn generate_sidebar(
    records: &[ContentRecord],
    root: &str,
    normalizer: &PathNormalizer,
    options: &SiteOptions,
) -> TreeNode {
    let mut builder = SidebarTreeBuilder::new();

    for record in records {
        let Some(frontmatter) = record.frontmatter() else {
            continue;
        };
        let Some(title) = frontmatter.title.as_deref() else {
            continue;
        };
        if options.skips_draft(frontmatter.draft) {
            tracing::debug!(source = %record.source_name(), "Draft left out of sidebar");
            continue;
        }

        let path = frontmatter.slug.as_deref().map_or_else(
            || normalizer.page_slug(&record.relative_directory, title, root),
            anchor_slug,
        );
        let directory = unorderify(strip_directory_path(&record.relative_directory, root));

        builder.add_node(
            &directory,
            &unorderify(&record.name),
            PageMeta {
                path,
                title: title.to_owned(),
                redirect: options.sidebar_redirect(title, frontmatter.redirect.as_deref()),
                hide_from_sidebar: frontmatter.hide_from_sidebar,
                is_active_sidebar_link: true,
            },
        );
    }

    builder.into_tree()
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use docnav_source::Markup;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::options::BuildMode;

    fn record(path: &str, frontmatter: &str) -> ContentRecord {
        ContentRecord::from_relative_path(
            path,
            PathBuf::from("/data").join(path),
            Some(Markup::parse(&format!("---\n{frontmatter}\n---\n"))),
        )
    }

    fn meta(path: &str, title: &str) -> PageMeta {
        PageMeta {
            path: path.to_owned(),
            title: title.to_owned(),
            redirect: None,
            hide_from_sidebar: false,
            is_active_sidebar_link: true,
        }
    }

    fn keys(node: &TreeNode) -> Vec<&str> {
        node.children.keys().map(String::as_str).collect()
    }

    #[test]
    fn test_add_node_creates_intermediate_nodes() {
        let mut builder = SidebarTreeBuilder::new();
        builder.add_node("using k6/protocols", "ssl-tls", meta("/a/", "A"));

        let tree = builder.tree();
        let protocols = lookup(tree, &["using k6", "protocols"]).unwrap();
        assert!(protocols.meta.is_none());
        assert_eq!(
            protocols.child("ssl-tls").unwrap().meta,
            Some(meta("/a/", "A"))
        );
    }

    #[test]
    fn test_add_node_skips_empty_segments() {
        let mut builder = SidebarTreeBuilder::new();
        builder.add_node("/a//b/", "c", meta("/c/", "C"));

        assert!(lookup(builder.tree(), &["a", "b", "c"]).is_some());
    }

    #[test]
    fn test_add_node_first_meta_wins() {
        let mut builder = SidebarTreeBuilder::new();
        builder.add_node("a", "b", meta("/first/", "First"));
        builder.add_node("a", "b", meta("/second/", "Second"));

        let node = lookup(builder.tree(), &["a", "b"]).unwrap();
        assert_eq!(node.meta.as_ref().unwrap().path, "/first/");
    }

    #[test]
    fn test_children_keep_insertion_order() {
        let mut builder = SidebarTreeBuilder::new();
        builder.add_node("s", "zeta", meta("/z/", "Z"));
        builder.add_node("s", "alpha", meta("/a/", "A"));
        builder.add_node("s", "mid", meta("/m/", "M"));

        assert_eq!(
            keys(child_sidebar(builder.tree(), "s").unwrap()),
            vec!["zeta", "alpha", "mid"]
        );
    }

    #[test]
    fn test_lookup_missing() {
        let tree = TreeNode::default();

        assert!(lookup(&tree, &["nope"]).is_none());
        assert_eq!(lookup::<&str>(&tree, &[]), Some(&tree));
    }

    #[test]
    fn test_containers_lists_nodes_with_children() {
        let mut builder = SidebarTreeBuilder::new();
        builder.add_node("a/b", "c", meta("/c/", "C"));
        builder.add_node("a", "d", meta("/d/", "D"));

        let tree = builder.into_tree();
        let section = tree.child("a").unwrap();
        let paths: Vec<_> = section
            .containers()
            .into_iter()
            .map(|(path, _)| path.join("/"))
            .collect();
        assert_eq!(paths, vec!["b"]);
    }

    #[test]
    fn test_generate_sidebar_docs() {
        let records = vec![
            record("docs/01 guides/01-using-k6/01-http.md", "title: HTTP Requests"),
            record("docs/01 guides/01-using-k6/02-ssl-tls.md", "title: SSL/TLS"),
            record(
                "docs/02 javascript api/01-k6-http.md",
                "title: k6/http\nslug: /javascript-api/k6-http",
            ),
        ];

        let tree = generate_sidebar(
            &records,
            "docs",
            &PathNormalizer::default(),
            &SiteOptions::default(),
        );

        assert_eq!(keys(&tree), vec!["guides", "javascript api"]);
        let ssl = lookup(&tree, &["guides", "using-k6", "ssl-tls"]).unwrap();
        assert_eq!(ssl.meta.as_ref().unwrap().path, "/guides/using-k6/ssl-tls/");
        let http = lookup(&tree, &["javascript api", "k6-http"]).unwrap();
        assert_eq!(http.meta.as_ref().unwrap().path, "/javascript-api/k6-http/");
        assert_eq!(http.meta.as_ref().unwrap().title, "k6/http");
    }

    #[test]
    fn test_generate_sidebar_guides_per_locale() {
        let records = vec![
            record("translated-guides/en/01-getting-started/01-welcome.md", "title: Welcome"),
            record("translated-guides/es/01-getting-started/01-welcome.md", "title: Bienvenido"),
        ];

        let tree = generate_sidebar(
            &records,
            "translated-guides",
            &PathNormalizer::default(),
            &SiteOptions::default(),
        );

        assert_eq!(keys(&tree), vec!["en", "es"]);
        let en = lookup(&tree, &["en", "getting-started", "welcome"]).unwrap();
        assert_eq!(en.meta.as_ref().unwrap().path, "/getting-started/welcome/");
        let es = lookup(&tree, &["es", "getting-started", "welcome"]).unwrap();
        assert_eq!(es.meta.as_ref().unwrap().path, "/es/getting-started/bienvenido/");
    }

    #[test]
    fn test_generate_sidebar_drafts() {
        let records = vec![
            record("docs/a/01-draft.md", "title: Draft\ndraft: 'true'"),
            record("docs/a/02-live.md", "title: Live"),
        ];
        let normalizer = PathNormalizer::default();

        let staging = generate_sidebar(&records, "docs", &normalizer, &SiteOptions::default());
        let production = generate_sidebar(
            &records,
            "docs",
            &normalizer,
            &SiteOptions {
                mode: BuildMode::Production,
                ..SiteOptions::default()
            },
        );

        assert_eq!(keys(staging.child("a").unwrap()), vec!["draft", "live"]);
        assert_eq!(keys(production.child("a").unwrap()), vec!["live"]);
    }

    #[test]
    fn test_generate_sidebar_keeps_hidden_pages() {
        let records = vec![record("docs/a/01-hidden.md", "title: Hidden\nhideFromSidebar: true")];

        let tree = generate_sidebar(
            &records,
            "docs",
            &PathNormalizer::default(),
            &SiteOptions::default(),
        );

        let hidden = lookup(&tree, &["a", "hidden"]).unwrap();
        assert!(hidden.meta.as_ref().unwrap().hide_from_sidebar);
    }

    #[test]
    fn test_generate_sidebar_applies_migration_redirect() {
        let records = vec![record("docs/06 Cloud REST API/01-intro.md", "title: Cloud REST API")];

        let tree = generate_sidebar(
            &records,
            "docs",
            &PathNormalizer::default(),
            &SiteOptions::default(),
        );

        let node = lookup(&tree, &["Cloud REST API", "intro"]).unwrap();
        assert_eq!(
            node.meta.as_ref().unwrap().redirect.as_deref(),
            Some("/cloud-rest-api/introduction")
        );
    }

    #[test]
    fn test_generate_sidebar_is_idempotent() {
        let records = vec![
            record("docs/b/01-x.md", "title: X"),
            record("docs/a/01-y.md", "title: Y"),
        ];
        let normalizer = PathNormalizer::default();
        let options = SiteOptions::default();

        let first = generate_sidebar(&records, "docs", &normalizer, &options);
        let second = generate_sidebar(&records, "docs", &normalizer, &options);

        assert_eq!(first, second);
        assert_eq!(keys(&first), keys(&second));
    }

    #[test]
    fn test_generate_sidebar_skips_records_without_title() {
        let mut broken = record("docs/a/01-broken.md", "title: X");
        broken.markup = None;
        let records = vec![broken, record("docs/a/02-untitled.md", "slug: /u/")];

        let tree = generate_sidebar(
            &records,
            "docs",
            &PathNormalizer::default(),
            &SiteOptions::default(),
        );

        assert!(tree.children.is_empty());
    }
}
