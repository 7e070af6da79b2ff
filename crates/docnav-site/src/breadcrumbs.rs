//! Breadcrumb trails.

use serde::Serialize;

use crate::normalize::{PathNormalizer, slugify};
use crate::tree::TreeNode;

/// One ancestor link.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Breadcrumb {
    pub label: String,
    pub path: String,
}

/// Builds root-to-leaf breadcrumb trails.
///
/// Each segment of the input path yields one entry whose link is the slug
/// of the path up to and including that segment, so every link is a URL
/// the slug pipeline can produce. Labels come from the tree when a node
/// with page meta exists there, otherwise from the raw segment.
pub struct BreadcrumbBuilder<'a> {
    normalizer: &'a PathNormalizer,
    tree: Option<&'a TreeNode>,
}

impl<'a> BreadcrumbBuilder<'a> {
    #[must_use]
    pub fn new(normalizer: &'a PathNormalizer) -> Self {
        Self {
            normalizer,
            tree: None,
        }
    }

    /// Look labels up in `tree`. A leading locale segment is not part of
    /// the lookup, so guides pass the tree of their locale.
    #[must_use]
    pub fn with_tree(mut self, tree: &'a TreeNode) -> Self {
        self.tree = Some(tree);
        self
    }

    /// Trail for `path`, e.g. `using-k6/SSL-TLS`. Entries pointing at a
    /// bare locale (`/es/`) are dropped.
    #[must_use]
    pub fn build(&self, path: &str) -> Vec<Breadcrumb> {
        let locales = self.normalizer.locales();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let lookup_offset = usize::from(segments.first().is_some_and(|s| locales.is_supported(s)));

        let mut trail = Vec::with_capacity(segments.len());
        for (idx, segment) in segments.iter().enumerate() {
            let crumb_path = self.normalizer.get_slug(&segments[..=idx].join("/"));
            if locales.is_supported(crumb_path.trim_matches('/')) {
                continue;
            }

            let label = self
                .tree
                .and_then(|tree| find_node(tree, &segments[lookup_offset.min(idx + 1)..=idx]))
                .and_then(|node| node.meta.as_ref())
                .map_or_else(|| (*segment).to_owned(), |meta| meta.title.clone());

            trail.push(Breadcrumb {
                label,
                path: crumb_path,
            });
        }
        trail
    }
}

/// Descend by exact key, falling back to a key with the same slug
/// (tree keys come from file names, path segments from titles).
fn find_node<'t>(tree: &'t TreeNode, segments: &[&str]) -> Option<&'t TreeNode> {
    segments.iter().try_fold(tree, |node, segment| {
        node.child(segment).or_else(|| {
            let wanted = slugify(segment);
            node.children
                .iter()
                .find(|(key, _)| slugify(key) == wanted)
                .map(|(_, child)| child)
        })
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::tree::{PageMeta, SidebarTreeBuilder};

    fn crumb(label: &str, path: &str) -> Breadcrumb {
        Breadcrumb {
            label: label.to_owned(),
            path: path.to_owned(),
        }
    }

    #[test]
    fn test_build_without_tree() {
        let normalizer = PathNormalizer::default();

        let trail = BreadcrumbBuilder::new(&normalizer).build("using-k6/SSL-TLS");

        assert_eq!(
            trail,
            vec![
                crumb("using-k6", "/using-k6/"),
                crumb("SSL-TLS", "/using-k6/ssl-tls/"),
            ]
        );
    }

    #[test]
    fn test_build_uses_tree_titles() {
        let normalizer = PathNormalizer::default();
        let mut builder = SidebarTreeBuilder::new();
        builder.add_node(
            "",
            "using-k6",
            PageMeta {
                path: "/using-k6/".to_owned(),
                title: "Using k6".to_owned(),
                ..PageMeta::default()
            },
        );
        let tree = builder.into_tree();

        let trail = BreadcrumbBuilder::new(&normalizer)
            .with_tree(&tree)
            .build("using-k6/Cookies");

        assert_eq!(
            trail,
            vec![
                crumb("Using k6", "/using-k6/"),
                crumb("Cookies", "/using-k6/cookies/"),
            ]
        );
    }

    #[test]
    fn test_build_filters_bare_locale() {
        let normalizer = PathNormalizer::default();

        let trail = BreadcrumbBuilder::new(&normalizer).build("es/empezando/Bienvenido");

        assert_eq!(
            trail,
            vec![
                crumb("empezando", "/es/empezando/"),
                crumb("Bienvenido", "/es/empezando/bienvenido/"),
            ]
        );
    }

    #[test]
    fn test_build_locale_tree_lookup_skips_locale_segment() {
        let normalizer = PathNormalizer::default();
        let mut builder = SidebarTreeBuilder::new();
        builder.add_node(
            "",
            "empezando",
            PageMeta {
                path: "/es/empezando/".to_owned(),
                title: "Empezando".to_owned(),
                ..PageMeta::default()
            },
        );
        let es_tree = builder.into_tree();

        let trail = BreadcrumbBuilder::new(&normalizer)
            .with_tree(&es_tree)
            .build("es/empezando/Bienvenido");

        assert_eq!(trail[0], crumb("Empezando", "/es/empezando/"));
    }

    #[test]
    fn test_build_empty_path() {
        let normalizer = PathNormalizer::default();

        assert!(BreadcrumbBuilder::new(&normalizer).build("").is_empty());
    }
}
