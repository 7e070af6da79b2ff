//! Page assembly.
//!
//! Turns sorted content records plus the sidebar trees into the final set
//! of [`PageDescriptor`]s. Every emitted path goes through the shared
//! [`PathCollisionDetector`], in this order: docs pages, guides pages,
//! top-level pages, stub pages, the not-found page.

use std::collections::BTreeMap;
use std::sync::Arc;

use docnav_source::{ContentRecord, Frontmatter};
use indexmap::IndexMap;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::breadcrumbs::{Breadcrumb, BreadcrumbBuilder};
use crate::collision::{PathCollisionDetector, PathRecord};
use crate::descriptor::{NavLink, PageContent, PageContext, PageDescriptor, TemplateRef};
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::normalize::{
    PathNormalizer, anchor_slug, dedupe_path, doc_section, join_path, sanitize_title, slugify,
    strip_directory_path, unorderify,
};
use crate::options::{NavigationOptions, SiteOptions};
use crate::tree::{PageMeta, TreeNode, lookup};

/// Characters kept verbatim in source links: everything a URI may carry.
const URI_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b';')
    .remove(b',')
    .remove(b'/')
    .remove(b'?')
    .remove(b':')
    .remove(b'@')
    .remove(b'&')
    .remove(b'=')
    .remove(b'+')
    .remove(b'$')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'#');

/// Top-level navigation: the home link, the first `pinned_after` sections,
/// the pinned link, then the remaining sections. Hidden sections and
/// sections served at the home URL get no link.
#[must_use]
pub fn top_level_links<'s>(
    sections: impl IntoIterator<Item = &'s str>,
    navigation: &NavigationOptions,
) -> Vec<NavLink> {
    let section_links: Vec<NavLink> = sections
        .into_iter()
        .filter(|name| !navigation.is_hidden(name))
        .map(|name| NavLink::new(navigation.label(name), section_path(name, navigation)))
        .filter(|link| link.to != navigation.home_link.to)
        .collect();

    let split = navigation.pinned_after.min(section_links.len());
    let mut links = Vec::with_capacity(section_links.len() + 2);
    links.push(navigation.home_link.clone());
    links.extend_from_slice(&section_links[..split]);
    links.push(navigation.pinned_link.clone());
    links.extend_from_slice(&section_links[split..]);
    links
}

/// URL of a docs section landing page.
fn section_path(name: &str, navigation: &NavigationOptions) -> String {
    let slug = slugify(name);
    if slug == slugify(&navigation.home_link.label) {
        navigation.home_link.to.clone()
    } else {
        format!("/{slug}/")
    }
}

/// The last entry of a page's trail links to the page itself, which may
/// live under a custom slug.
fn link_to_page(mut trail: Vec<Breadcrumb>, slug: &str) -> Vec<Breadcrumb> {
    if let Some(last) = trail.last_mut() {
        slug.clone_into(&mut last.path);
    }
    trail
}

/// Log a diagnostic and hand it to the sink.
fn warn(sink: &mut dyn DiagnosticSink, diagnostic: Diagnostic) {
    tracing::warn!("{diagnostic}");
    sink.report(diagnostic);
}

/// A record that passed eligibility checks, with its resolved slug.
struct Candidate<'r> {
    record: &'r ContentRecord,
    frontmatter: &'r Frontmatter,
    title: &'r str,
    slug: String,
    custom_slug: bool,
}

/// Assembles the pages of one build pass.
pub struct PageAssembler<'a> {
    options: &'a SiteOptions,
    normalizer: &'a PathNormalizer,
    docs_tree: &'a TreeNode,
    sections: IndexMap<String, Arc<TreeNode>>,
    locale_trees: IndexMap<String, Arc<TreeNode>>,
    nav_links: Arc<[NavLink]>,
}

impl<'a> PageAssembler<'a> {
    /// `docs_tree` has one child per section; `guides_tree` one per locale.
    #[must_use]
    pub fn new(
        options: &'a SiteOptions,
        normalizer: &'a PathNormalizer,
        docs_tree: &'a TreeNode,
        guides_tree: &TreeNode,
    ) -> Self {
        let sections: IndexMap<_, _> = docs_tree
            .children
            .iter()
            .map(|(name, node)| (name.clone(), Arc::new(node.clone())))
            .collect();
        let locale_trees = options
            .locales
            .supported()
            .iter()
            .map(|locale| {
                let tree = guides_tree.child(locale).cloned().unwrap_or_default();
                (locale.clone(), Arc::new(tree))
            })
            .collect();
        let nav_links = top_level_links(sections.keys().map(String::as_str), &options.navigation);

        Self {
            options,
            normalizer,
            docs_tree,
            sections,
            locale_trees,
            nav_links: nav_links.into(),
        }
    }

    #[must_use]
    pub fn nav_links(&self) -> &[NavLink] {
        &self.nav_links
    }

    /// Produce every page of the site.
    ///
    /// `docs` and `guides` must be sorted by absolute source path.
    pub fn assemble(
        &self,
        docs: &[ContentRecord],
        guides: &[ContentRecord],
        detector: &mut PathCollisionDetector,
        sink: &mut dyn DiagnosticSink,
    ) -> Vec<PageDescriptor> {
        let mut pages = self.doc_pages(docs, detector, sink);
        pages.extend(self.guide_pages(guides, detector, sink));
        pages.extend(self.top_level_pages(detector, sink));
        pages.extend(self.doc_stub_pages(detector, sink));
        pages.extend(self.guide_stub_pages(detector, sink));
        pages.extend(self.not_found_page(detector, sink));
        self.resolve_breadcrumbs(&mut pages, detector);

        tracing::info!(
            pages = pages.len(),
            docs = docs.len(),
            guides = guides.len(),
            "Assembled pages"
        );
        pages
    }

    /// Frontmatter and title of a record that gets a page, or `None`.
    fn eligible<'r>(
        &self,
        record: &'r ContentRecord,
        sink: &mut dyn DiagnosticSink,
    ) -> Option<(&'r Frontmatter, &'r str)> {
        let file = || record.source_name();

        let Some(markup) = &record.markup else {
            warn(sink, Diagnostic::MissingBody { file: file() });
            return None;
        };
        let Some(frontmatter) = &markup.frontmatter else {
            warn(sink, Diagnostic::MissingFrontmatter { file: file() });
            return None;
        };
        if self.options.skips_draft(frontmatter.draft) {
            tracing::debug!(source = %file(), "Skipping draft");
            return None;
        }
        if let Some(target) = &frontmatter.redirect {
            tracing::debug!(source = %file(), target = %target, "Skipping redirect page");
            return None;
        }
        let Some(title) = frontmatter.title.as_deref() else {
            warn(sink, Diagnostic::MissingTitle { file: file() });
            return None;
        };

        Some((frontmatter, title))
    }

    fn candidates<'r>(
        &self,
        records: &'r [ContentRecord],
        root: &str,
        sink: &mut dyn DiagnosticSink,
    ) -> Vec<Candidate<'r>> {
        records
            .iter()
            .filter_map(|record| {
                let (frontmatter, title) = self.eligible(record, sink)?;
                let slug = frontmatter.slug.as_deref().map_or_else(
                    || {
                        self.normalizer
                            .page_slug(&record.relative_directory, title, root)
                    },
                    anchor_slug,
                );
                Some(Candidate {
                    record,
                    frontmatter,
                    title,
                    slug,
                    custom_slug: frontmatter.slug.is_some(),
                })
            })
            .collect()
    }

    /// Register candidates, custom slugs first, and keep the winners in
    /// input order.
    fn register<'r>(
        candidates: Vec<Candidate<'r>>,
        detector: &mut PathCollisionDetector,
        sink: &mut dyn DiagnosticSink,
    ) -> Vec<Candidate<'r>> {
        let mut accepted = vec![false; candidates.len()];
        let custom_first = candidates
            .iter()
            .enumerate()
            .filter(|(_, c)| c.custom_slug)
            .chain(candidates.iter().enumerate().filter(|(_, c)| !c.custom_slug));

        for (idx, candidate) in custom_first {
            let record = PathRecord::new(&candidate.slug, candidate.record.source_name());
            match detector.try_insert(record) {
                Ok(()) => accepted[idx] = true,
                Err(collision) => sink.report(collision.into()),
            }
        }

        candidates
            .into_iter()
            .zip(accepted)
            .filter_map(|(candidate, ok)| ok.then_some(candidate))
            .collect()
    }

    fn content(&self, candidate: &Candidate<'_>) -> PageContent {
        let record = candidate.record;
        let frontmatter = candidate.frontmatter;
        let origin = format!(
            "{}/{}/{}.md",
            self.options.repository_url.trim_end_matches('/'),
            record.relative_directory,
            record.name
        );

        PageContent {
            title: candidate.title.to_owned(),
            slug: candidate.slug.clone(),
            head_title: frontmatter.head_title.clone(),
            excerpt: frontmatter.excerpt.clone(),
            hide_from_sidebar: frontmatter.hide_from_sidebar,
            draft: frontmatter.draft,
            file_origin: utf8_percent_encode(&origin, URI_ENCODE_SET).to_string(),
            body: record
                .markup
                .as_ref()
                .map(|m| m.body.clone())
                .unwrap_or_default(),
        }
    }

    fn context(&self, sidebar_tree: Option<Arc<TreeNode>>) -> PageContext {
        PageContext {
            sidebar_tree,
            nav_links: Arc::clone(&self.nav_links),
            ..PageContext::default()
        }
    }

    fn doc_pages(
        &self,
        records: &[ContentRecord],
        detector: &mut PathCollisionDetector,
        sink: &mut dyn DiagnosticSink,
    ) -> Vec<PageDescriptor> {
        let root = self.options.docs_root.as_str();
        let candidates = self.candidates(records, root, sink);

        Self::register(candidates, detector, sink)
            .into_iter()
            .map(|candidate| {
                let stripped = strip_directory_path(&candidate.record.relative_directory, root);
                let path = join_path(stripped, &sanitize_title(candidate.title));
                let breadcrumbs = link_to_page(
                    BreadcrumbBuilder::new(self.normalizer)
                        .with_tree(self.docs_tree)
                        .build(&dedupe_path(&unorderify(&path))),
                    &candidate.slug,
                );
                let section = unorderify(stripped);
                let sidebar = self.sections.get(doc_section(&section)).map(Arc::clone);

                PageDescriptor {
                    path: candidate.slug.clone(),
                    template: TemplateRef::DocPage,
                    context: PageContext {
                        breadcrumbs,
                        content: Some(self.content(&candidate)),
                        ..self.context(sidebar)
                    },
                }
            })
            .collect()
    }

    fn guide_pages(
        &self,
        records: &[ContentRecord],
        detector: &mut PathCollisionDetector,
        sink: &mut dyn DiagnosticSink,
    ) -> Vec<PageDescriptor> {
        let root = self.options.guides_root.as_str();
        let locales = self.normalizer.locales();
        let candidates = self.candidates(records, root, sink);

        Self::register(candidates, detector, sink)
            .into_iter()
            .map(|candidate| {
                let stripped = strip_directory_path(&candidate.record.relative_directory, root);
                let locale = locales.locale_of(stripped);
                let mut path = unorderify(&join_path(stripped, &sanitize_title(candidate.title)));
                if !locales.is_default(locale) {
                    path = self.normalizer.translate_path(&path, locale);
                }
                let locale_tree = self.locale_trees.get(locale);
                let mut crumbs = BreadcrumbBuilder::new(self.normalizer);
                if let Some(tree) = locale_tree {
                    crumbs = crumbs.with_tree(tree);
                }
                let breadcrumbs = link_to_page(
                    crumbs.build(
                        &self
                            .normalizer
                            .remove_default_locale_prefix(&dedupe_path(&path)),
                    ),
                    &candidate.slug,
                );
                let translations = self.page_translations(candidate.record, stripped, sink);

                PageDescriptor {
                    path: candidate.slug.clone(),
                    template: TemplateRef::DocPage,
                    context: PageContext {
                        breadcrumbs,
                        locale: Some(locale.to_owned()),
                        translations,
                        content: Some(self.content(&candidate)),
                        ..self.context(locale_tree.map(Arc::clone))
                    },
                }
            })
            .collect()
    }

    /// Counterparts of a guide page in every locale, looked up by the
    /// page's directory and file name with ordering prefixes stripped.
    fn page_translations(
        &self,
        record: &ContentRecord,
        stripped_directory: &str,
        sink: &mut dyn DiagnosticSink,
    ) -> BTreeMap<String, PageMeta> {
        let locales = self.normalizer.locales();
        let directory = unorderify(stripped_directory);
        let leaf = unorderify(&record.name);
        let mut segments: Vec<&str> = directory.split('/').filter(|s| !s.is_empty()).collect();
        if segments.first().is_some_and(|s| locales.is_supported(s)) {
            segments.remove(0);
        }
        segments.push(&leaf);

        let mut translations = BTreeMap::new();
        for (locale, tree) in &self.locale_trees {
            match lookup(tree, &segments).and_then(|node| node.meta.as_ref()) {
                Some(meta) => {
                    translations.insert(locale.clone(), meta.clone());
                }
                None => warn(
                    sink,
                    Diagnostic::MissingTranslation {
                        file: record.source_name(),
                        locale: locale.clone(),
                    },
                ),
            }
        }
        translations
    }

    /// Claim `path` for `source`, reporting a collision.
    fn claim(
        path: &str,
        source: String,
        detector: &mut PathCollisionDetector,
        sink: &mut dyn DiagnosticSink,
    ) -> bool {
        match detector.try_insert(PathRecord::new(path, source)) {
            Ok(()) => true,
            Err(collision) => {
                sink.report(collision.into());
                false
            }
        }
    }

    /// Section landing pages, one landing page per locale, static pages.
    fn top_level_pages(
        &self,
        detector: &mut PathCollisionDetector,
        sink: &mut dyn DiagnosticSink,
    ) -> Vec<PageDescriptor> {
        let navigation = &self.options.navigation;
        let mut pages = Vec::new();

        for (name, tree) in &self.sections {
            let path = section_path(name, navigation);
            // The default-locale landing page serves the home URL.
            if navigation.is_hidden(name) || path == navigation.home_link.to {
                continue;
            }
            if !Self::claim(&path, format!("section:{name}"), detector, sink) {
                continue;
            }
            pages.push(PageDescriptor {
                path,
                template: TemplateRef::Section(slugify(name)),
                context: self.context(Some(Arc::clone(tree))),
            });
        }

        let locales = self.normalizer.locales();
        for (locale, tree) in &self.locale_trees {
            let path = if locales.is_default(locale) {
                navigation.home_link.to.clone()
            } else {
                format!("/{locale}/")
            };
            if !Self::claim(&path, format!("landing:{locale}"), detector, sink) {
                continue;
            }
            pages.push(PageDescriptor {
                path,
                template: TemplateRef::Guides,
                context: PageContext {
                    locale: Some(locale.clone()),
                    ..self.context(Some(Arc::clone(tree)))
                },
            });
        }

        let empty = Arc::new(TreeNode::default());
        for page in &navigation.static_pages {
            if !Self::claim(&page.path, format!("static:{}", page.template), detector, sink) {
                continue;
            }
            pages.push(PageDescriptor {
                path: page.path.clone(),
                template: TemplateRef::Static(page.template.clone()),
                context: self.context(Some(Arc::clone(&empty))),
            });
        }

        pages
    }

    /// A stub for `node` at `path`, unless a page already serves the path.
    ///
    /// A node can carry meta without any page behind it (a redirect index
    /// record, or a page published under a custom slug), so only a claimed
    /// path suppresses the stub.
    fn stub(
        node: &TreeNode,
        key_path: &str,
        path: String,
        detector: &mut PathCollisionDetector,
        sink: &mut dyn DiagnosticSink,
    ) -> Option<(String, String)> {
        if detector.contains(&path) {
            return None;
        }
        if !Self::claim(&path, format!("stub:{key_path}"), detector, sink) {
            return None;
        }
        let title = node.meta.as_ref().map_or_else(
            || key_path.rsplit('/').next().unwrap_or(key_path).to_owned(),
            |meta| meta.title.clone(),
        );
        Some((path, title))
    }

    /// Stub pages for content-less categories of the docs sections.
    fn doc_stub_pages(
        &self,
        detector: &mut PathCollisionDetector,
        sink: &mut dyn DiagnosticSink,
    ) -> Vec<PageDescriptor> {
        let mut pages = Vec::new();

        for (section, tree) in &self.sections {
            if !self
                .options
                .navigation
                .has_stubs(section, self.options.mode)
            {
                continue;
            }
            for (keys, node) in tree.containers() {
                let key_path = format!("{section}/{}", keys.join("/"));
                let path = self.normalizer.get_slug(&key_path);
                let Some((path, title)) = Self::stub(node, &key_path, path, detector, sink) else {
                    continue;
                };
                let breadcrumbs = BreadcrumbBuilder::new(self.normalizer)
                    .with_tree(self.docs_tree)
                    .build(&dedupe_path(&key_path));

                pages.push(PageDescriptor {
                    path,
                    template: TemplateRef::BreadcrumbStub,
                    context: PageContext {
                        breadcrumbs,
                        title: Some(title),
                        direct_children: Some(node.children.clone()),
                        ..self.context(Some(Arc::clone(tree)))
                    },
                });
            }
        }

        pages
    }

    /// Stub pages for content-less categories of every guides locale.
    fn guide_stub_pages(
        &self,
        detector: &mut PathCollisionDetector,
        sink: &mut dyn DiagnosticSink,
    ) -> Vec<PageDescriptor> {
        let mut pages = Vec::new();

        for (locale, tree) in &self.locale_trees {
            for (keys, node) in tree.containers() {
                let key_path = format!("{locale}/{}", keys.join("/"));
                let path = self.normalizer.get_slug(&key_path);
                let Some((path, title)) = Self::stub(node, &key_path, path, detector, sink) else {
                    continue;
                };
                let breadcrumbs = BreadcrumbBuilder::new(self.normalizer)
                    .with_tree(tree)
                    .build(
                        &self
                            .normalizer
                            .remove_default_locale_prefix(&dedupe_path(&key_path)),
                    );

                let mut translations = BTreeMap::new();
                for (other, other_tree) in &self.locale_trees {
                    match lookup(other_tree, &keys) {
                        Some(counterpart) => {
                            if let Some(meta) = &counterpart.meta {
                                translations.insert(other.clone(), meta.clone());
                            }
                        }
                        None => warn(
                            sink,
                            Diagnostic::MissingTranslation {
                                file: key_path.clone(),
                                locale: other.clone(),
                            },
                        ),
                    }
                }

                pages.push(PageDescriptor {
                    path,
                    template: TemplateRef::BreadcrumbStub,
                    context: PageContext {
                        breadcrumbs,
                        locale: Some(locale.clone()),
                        translations,
                        title: Some(title),
                        direct_children: Some(node.children.clone()),
                        ..self.context(Some(Arc::clone(tree)))
                    },
                });
            }
        }

        pages
    }

    /// Point every breadcrumb at a published page. The home section's entry
    /// links to the home page instead of its unpublished section URL; other
    /// entries without a page are dropped.
    fn resolve_breadcrumbs(
        &self,
        pages: &mut [PageDescriptor],
        detector: &PathCollisionDetector,
    ) {
        let navigation = &self.options.navigation;
        let home = &navigation.home_link;
        let home_sections: Vec<String> = self
            .sections
            .keys()
            .filter(|name| section_path(name, navigation) == home.to)
            .map(|name| format!("/{}/", slugify(name)))
            .collect();

        for PageDescriptor { path, context, .. } in pages {
            context.breadcrumbs.retain_mut(|crumb| {
                if detector.contains(&crumb.path) {
                    return true;
                }
                if home_sections.contains(&crumb.path) && detector.contains(&home.to) {
                    crumb.path.clone_from(&home.to);
                    crumb.label.clone_from(&home.label);
                    return true;
                }
                tracing::debug!(
                    page = %path,
                    link = %crumb.path,
                    "Dropping breadcrumb without a page"
                );
                false
            });
        }
    }

    fn not_found_page(
        &self,
        detector: &mut PathCollisionDetector,
        sink: &mut dyn DiagnosticSink,
    ) -> Option<PageDescriptor> {
        let navigation = &self.options.navigation;
        if !Self::claim(&navigation.not_found_path, "not-found".to_owned(), detector, sink) {
            return None;
        }
        let sidebar = self.sections.get(&navigation.not_found_section).map(Arc::clone);

        Some(PageDescriptor {
            path: navigation.not_found_path.clone(),
            template: TemplateRef::NotFound,
            context: self.context(sidebar),
        })
    }
}
