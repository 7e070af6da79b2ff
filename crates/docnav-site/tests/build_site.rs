//! End-to-end build passes over an in-memory content source.

use std::collections::HashSet;
use std::sync::Arc;

use docnav_site::{
    BuildError, BuildMode, Diagnostic, PageDescriptor, PathNormalizer, RedirectRegistry,
    SiteBuilder, SiteOptions, SiteOutput, TemplateRef, generate_sidebar,
};
use docnav_source::{ContentSource, MockContentSource, SourceErrorKind};
use pretty_assertions::assert_eq;

fn page(path: &str, title: &str) -> (String, String) {
    (path.to_owned(), format!("---\ntitle: {title}\n---\nBody of {title}"))
}

fn source(pages: &[(String, String)]) -> MockContentSource {
    pages
        .iter()
        .fold(MockContentSource::new(), |source, (path, text)| {
            source.with_markdown(path, text)
        })
}

fn build_with(
    source: MockContentSource,
    mode: BuildMode,
) -> Result<(SiteOutput, Vec<Diagnostic>), BuildError> {
    let options = SiteOptions {
        mode,
        ..SiteOptions::default()
    };
    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    let output = SiteBuilder::new(Arc::new(source), options).build(&mut diagnostics)?;
    Ok((output, diagnostics))
}

fn build(source: MockContentSource) -> (SiteOutput, Vec<Diagnostic>) {
    build_with(source, BuildMode::Staging).unwrap()
}

fn find<'a>(pages: &'a [PageDescriptor], path: &str) -> Option<&'a PageDescriptor> {
    pages.iter().find(|p| p.path == path)
}

fn sample_site() -> MockContentSource {
    source(&[
        page("docs/01 guides/01-using-k6/01-http-requests.md", "HTTP Requests"),
        page("docs/01 guides/01-using-k6/02-ssl-tls.md", "SSL/TLS"),
        page("docs/01 guides/02-testing-guides/01-api.md", "API load testing"),
        page("docs/02 javascript api/01-k6-http/01-get.md", "get( url, [params] )"),
        page("docs/03 cloud/01-creating-tests/01-recorder.md", "Recording a test script"),
        page("translated-guides/en/01-getting-started/01-welcome.md", "Welcome"),
        page("translated-guides/en/01-getting-started/02-installation.md", "Installation"),
        page("translated-guides/es/01-empezando/01-bienvenido.md", "Bienvenido"),
    ])
}

fn redirect(path: &str, title: &str, target: &str) -> (String, String) {
    (
        path.to_owned(),
        format!("---\ntitle: {title}\nredirect: {target}\n---\n"),
    )
}

/// The sample site plus index records that only redirect into their
/// category, and a page in a hidden section.
fn site_with_redirect_indexes() -> MockContentSource {
    let mut pages = vec![
        redirect(
            "docs/01 guides/01-using-k6.md",
            "Using k6",
            "/guides/using-k6/http-requests/",
        ),
        redirect(
            "translated-guides/en/01-getting-started.md",
            "Getting started",
            "/getting-started/welcome/",
        ),
        page("docs/04 Cloud REST API/01-auth/01-token.md", "Token"),
    ];
    pages.extend([
        page("docs/01 guides/01-using-k6/01-http-requests.md", "HTTP Requests"),
        page("docs/01 guides/01-using-k6/02-ssl-tls.md", "SSL/TLS"),
        page("docs/02 javascript api/01-k6-http/01-get.md", "get( url, [params] )"),
        page("translated-guides/en/01-getting-started/01-welcome.md", "Welcome"),
        page("translated-guides/es/01-empezando/01-bienvenido.md", "Bienvenido"),
    ]);
    source(&pages)
}

fn assert_breadcrumbs_resolve(output: &SiteOutput) {
    let published: HashSet<&str> = output.pages.iter().map(|p| p.path.as_str()).collect();
    for page in &output.pages {
        for crumb in &page.context.breadcrumbs {
            assert!(
                published.contains(crumb.path.as_str()),
                "breadcrumb {} on {} has no page",
                crumb.path,
                page.path
            );
        }
    }
}

#[test]
fn test_scenario_derived_slug() {
    let (output, diagnostics) = build(source(&[page(
        "docs/01-using-k6/02-ssl-tls.md",
        "SSL/TLS",
    )]));

    let ssl = find(&output.pages, "/using-k6/ssl-tls/").unwrap();
    assert_eq!(ssl.template, TemplateRef::DocPage);
    assert_eq!(ssl.context.content.as_ref().unwrap().title, "SSL/TLS");
    assert!(diagnostics.is_empty());
}

#[test]
fn test_scenario_collision_keeps_first_page() {
    let (output, diagnostics) = build(source(&[
        page("docs/01-using-k6/01-http.md", "HTTP"),
        page("docs/01-using-k6/02-http-requests.md", "HTTP"),
    ]));

    let matching: Vec<_> = output
        .pages
        .iter()
        .filter(|p| p.path == "/using-k6/http/")
        .collect();
    assert_eq!(matching.len(), 1);
    assert_eq!(
        matching[0].context.content.as_ref().unwrap().file_origin,
        "https://github.com/k6io/docs/blob/master/src/data/docs/01-using-k6/01-http.md"
    );
    assert_eq!(
        diagnostics,
        vec![Diagnostic::PathCollision {
            path: "/using-k6/http/".to_owned(),
            existing: "docs/01-using-k6/01-http".to_owned(),
            rejected: "docs/01-using-k6/02-http-requests".to_owned(),
        }]
    );
}

#[test]
fn test_scenario_missing_translation() {
    let (output, diagnostics) = build(source(&[page(
        "translated-guides/es/01-empezando/01-bienvenido.md",
        "Bienvenido",
    )]));

    let es = find(&output.pages, "/es/empezando/bienvenido/").unwrap();
    assert_eq!(es.context.locale.as_deref(), Some("es"));
    assert!(!es.context.translations.contains_key("en"));
    assert!(es.context.translations.contains_key("es"));
    assert!(diagnostics.contains(&Diagnostic::MissingTranslation {
        file: "translated-guides/es/01-empezando/01-bienvenido".to_owned(),
        locale: "en".to_owned(),
    }));
}

#[test]
fn test_paths_are_unique() {
    let mut pages = vec![
        page("docs/01-a/01-x.md", "Same"),
        page("docs/01-a/02-y.md", "Same"),
        page("docs/01-a/03-z.md", "Other"),
    ];
    pages.push((
        "docs/02-b/01-custom.md".to_owned(),
        "---\ntitle: Custom\nslug: /a/other\n---\n".to_owned(),
    ));
    let (output, _) = build(source(&pages));

    let mut seen = HashSet::new();
    for page in &output.pages {
        let key = page.path.trim_end_matches('/').to_owned();
        assert!(seen.insert(key), "duplicate page path {}", page.path);
    }
}

#[test]
fn test_derived_slugs_are_well_formed() {
    let (output, _) = build(sample_site());

    for page in output
        .pages
        .iter()
        .filter(|p| p.template == TemplateRef::DocPage)
    {
        assert!(page.path.starts_with('/'), "{}", page.path);
        assert!(page.path.ends_with('/'), "{}", page.path);
        assert!(!page.path.contains("//"), "{}", page.path);
    }
}

#[test]
fn test_locale_prefix_invariant() {
    let (output, _) = build(sample_site());

    let localized: Vec<_> = output
        .pages
        .iter()
        .filter(|p| p.template == TemplateRef::DocPage)
        .filter_map(|p| p.context.locale.as_deref().map(|locale| (locale, &p.path)))
        .collect();

    assert!(!localized.is_empty());
    for (locale, path) in localized {
        if locale == "en" {
            assert!(!path.starts_with("/en/"), "{path}");
        } else {
            assert!(path.starts_with(&format!("/{locale}/")), "{path}");
        }
    }
}

#[test]
fn test_draft_filtering_by_mode() {
    let pages = [(
        "docs/01-using-k6/01-draft.md".to_owned(),
        "---\ntitle: Upcoming\ndraft: true\n---\n".to_owned(),
    )];

    let (staging, _) = build_with(source(&pages), BuildMode::Staging).unwrap();
    let (production, _) = build_with(source(&pages), BuildMode::Production).unwrap();

    assert!(find(&staging.pages, "/using-k6/upcoming/").is_some());
    assert!(find(&production.pages, "/using-k6/upcoming/").is_none());
    assert!(production.docs_tree.child("using-k6").is_none());
}

#[test]
fn test_redirect_pages_are_not_generated() {
    let pages = [(
        "docs/01-using-k6/01-old.md".to_owned(),
        "---\ntitle: Old\nredirect: /using-k6/new/\n---\n".to_owned(),
    )];

    let (output, diagnostics) = build(source(&pages));

    assert!(find(&output.pages, "/using-k6/old/").is_none());
    let meta = output
        .docs_tree
        .child("using-k6")
        .and_then(|n| n.child("old"))
        .and_then(|n| n.meta.as_ref())
        .unwrap();
    assert_eq!(meta.redirect.as_deref(), Some("/using-k6/new/"));
    assert!(diagnostics.is_empty());
}

#[test]
fn test_sidebar_generation_is_idempotent() {
    let records = sample_site().fetch("docs").unwrap();
    let options = SiteOptions::default();
    let normalizer = PathNormalizer::new(options.locales.clone());

    let first = generate_sidebar(&records, "docs", &normalizer, &options);
    let second = generate_sidebar(&records, "docs", &normalizer, &options);

    assert_eq!(first, second);
    assert_eq!(
        first.children.keys().collect::<Vec<_>>(),
        vec!["guides", "javascript api", "cloud"]
    );
}

#[test]
fn test_build_is_deterministic() {
    let (first, first_diagnostics) = build(sample_site());
    let (second, second_diagnostics) = build(sample_site());

    assert_eq!(first.pages, second.pages);
    assert_eq!(first_diagnostics, second_diagnostics);
}

#[test]
fn test_stub_pages_for_content_less_categories() {
    let (output, _) = build(sample_site());

    let stub = find(&output.pages, "/guides/using-k6/").unwrap();
    assert_eq!(stub.template, TemplateRef::BreadcrumbStub);
    let children: Vec<_> = stub
        .context
        .direct_children
        .as_ref()
        .unwrap()
        .keys()
        .collect();
    assert_eq!(children, vec!["http-requests", "ssl-tls"]);

    assert!(find(&output.pages, "/getting-started/").is_some());
    assert!(find(&output.pages, "/javascript-api/k6-http/").is_none());
}

#[test]
fn test_stub_pages_for_redirect_index_categories() {
    let (output, _) = build(site_with_redirect_indexes());

    let using_k6 = find(&output.pages, "/guides/using-k6/").unwrap();
    assert_eq!(using_k6.template, TemplateRef::BreadcrumbStub);
    assert_eq!(using_k6.context.title.as_deref(), Some("Using k6"));

    let getting_started = find(&output.pages, "/getting-started/").unwrap();
    assert_eq!(getting_started.template, TemplateRef::BreadcrumbStub);
    assert_eq!(getting_started.context.title.as_deref(), Some("Getting started"));
    assert_eq!(
        getting_started.context.translations["en"].redirect.as_deref(),
        Some("/getting-started/welcome/")
    );
    let children: Vec<_> = getting_started
        .context
        .direct_children
        .as_ref()
        .unwrap()
        .keys()
        .collect();
    assert_eq!(children, vec!["welcome"]);
}

#[test]
fn test_every_breadcrumb_links_to_a_page() {
    let (sample, _) = build(sample_site());
    assert_breadcrumbs_resolve(&sample);

    for mode in [BuildMode::Staging, BuildMode::Production] {
        let (output, _) = build_with(site_with_redirect_indexes(), mode).unwrap();
        assert_breadcrumbs_resolve(&output);
    }
}

#[test]
fn test_breadcrumbs_of_home_and_hidden_sections() {
    let (output, _) = build(site_with_redirect_indexes());

    let trail = |path: &str| -> Vec<String> {
        find(&output.pages, path)
            .unwrap()
            .context
            .breadcrumbs
            .iter()
            .map(|c| c.path.clone())
            .collect()
    };
    assert_eq!(
        trail("/guides/using-k6/ssl-tls/"),
        vec!["/", "/guides/using-k6/", "/guides/using-k6/ssl-tls/"]
    );
    assert_eq!(
        trail("/cloud-rest-api/auth/token/"),
        vec!["/cloud-rest-api/auth/", "/cloud-rest-api/auth/token/"]
    );
    assert_eq!(
        trail("/getting-started/welcome/"),
        vec!["/getting-started/", "/getting-started/welcome/"]
    );
}

#[test]
fn test_breadcrumbs_use_tree_titles() {
    let (output, _) = build(sample_site());

    let ssl = find(&output.pages, "/guides/using-k6/ssl-tls/").unwrap();
    let trail: Vec<_> = ssl
        .context
        .breadcrumbs
        .iter()
        .map(|c| (c.label.as_str(), c.path.as_str()))
        .collect();

    assert_eq!(
        trail,
        vec![
            ("guides", "/"),
            ("using-k6", "/guides/using-k6/"),
            ("SSL/TLS", "/guides/using-k6/ssl-tls/"),
        ]
    );
}

#[test]
fn test_every_build_ends_with_not_found_page() {
    let (output, _) = build(sample_site());

    let last = output.pages.last().unwrap();
    assert_eq!(last.path, "/404");
    assert_eq!(last.template, TemplateRef::NotFound);
}

#[test]
fn test_redirects_are_complete() {
    let (output, _) = build(sample_site());

    assert_eq!(output.redirects, RedirectRegistry::legacy().into_entries());
    let ssl: Vec<_> = output
        .redirects
        .iter()
        .filter(|r| r.to_path == "/using-k6/protocols/ssl-tls/")
        .map(|r| r.from_path.as_str())
        .collect();
    assert!(ssl.contains(&"/using-k6/ssl-tls"));
    assert!(ssl.contains(&"/using-k6/ssl-tls/"));
}

#[test]
fn test_fetch_failure_aborts_build() {
    let failing = sample_site().with_failure(SourceErrorKind::NotFound);

    let result = build_with(failing, BuildMode::Staging);

    assert!(matches!(
        result,
        Err(BuildError::Fetch(ref err)) if err.kind == SourceErrorKind::NotFound
    ));
}
