//! Legacy URL redirects.
//!
//! Pages move; old links must keep working. The registry holds the static
//! legacy-to-canonical table and expands it into [`RedirectEntry`] values:
//! hand-picked exceptional redirects first, then every table entry with and
//! without a trailing slash, then the deprecated page families that all
//! collapse onto one parent page.

use serde::Serialize;

/// A redirect handed to redirect registration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RedirectEntry {
    #[serde(rename = "fromPath")]
    pub from_path: String,
    #[serde(rename = "toPath")]
    pub to_path: String,
    #[serde(rename = "isPermanent")]
    pub permanent: bool,
    /// Also redirect client-side.
    #[serde(rename = "redirectInBrowser", skip_serializing_if = "is_false")]
    pub browser_redirect: bool,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_false(value: &bool) -> bool {
    !*value
}

impl RedirectEntry {
    /// Permanent server-side redirect.
    #[must_use]
    pub fn permanent(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from_path: from.into(),
            to_path: to.into(),
            permanent: true,
            browser_redirect: false,
        }
    }

    #[must_use]
    pub fn in_browser(mut self) -> Self {
        self.browser_redirect = true;
        self
    }
}

/// `(from, to, redirect in browser)`, registered as is.
const EXCEPTIONAL_REDIRECTS: &[(&str, &str, bool)] = &[
    ("/getting-started/welcome/", "/", true),
    ("/es/empezando/bienvenido/", "/es/", true),
    (
        "/cloud/analyzing-results/logs-tab/",
        "/cloud/analyzing-results/logs/",
        false,
    ),
    (
        "/cloud/cloud-faq/calculating-virtual-uses-with-google-analytics",
        "https://k6.io/blog/monthly-visits-concurrent-users",
        false,
    ),
];

/// Registered both with and without a trailing slash.
pub(crate) const LEGACY_REDIRECTS: &[(&str, &str)] = &[
    ("/javascript-api/k6-http/cookiejar-k6-http", "/javascript-api/k6-http/cookiejar/"),
    (
        "/javascript-api/k6-http/cookiejar-k6-http/cookiejar-cookiesforurl-url",
        "/javascript-api/k6-http/cookiejar/cookiejar-cookiesforurl-url/",
    ),
    (
        "/javascript-api/k6-http/cookiejar-k6-http/cookiejar-set-name-value-options",
        "/javascript-api/k6-http/cookiejar/cookiejar-set-url-name-value-options/",
    ),
    (
        "/javascript-api/k6-http/cookiejar/cookiejar-set-name-value-options",
        "/javascript-api/k6-http/cookiejar/cookiejar-set-url-name-value-options/",
    ),
    ("/javascript-api/k6-http/filedata-k6-http", "/javascript-api/k6-http/filedata/"),
    ("/javascript-api/k6-http/params-k6-http", "/javascript-api/k6-http/params/"),
    ("/javascript-api/k6-http/response-k6-http", "/javascript-api/k6-http/response/"),
    (
        "/javascript-api/k6-http/response-k6-http/response-clicklink-params",
        "/javascript-api/k6-http/response/response-clicklink-params/",
    ),
    (
        "/javascript-api/k6-http/response-k6-http/response-html",
        "/javascript-api/k6-http/response/response-html/",
    ),
    (
        "/javascript-api/k6-http/response-k6-http/response-json-selector",
        "/javascript-api/k6-http/response/response-json-selector/",
    ),
    (
        "/javascript-api/k6-http/response-k6-http/response-submitform-params",
        "/javascript-api/k6-http/response/response-submitform-params/",
    ),
    ("/javascript-api/k6-metrics/counter-k6-metrics", "/javascript-api/k6-metrics/counter/"),
    ("/javascript-api/k6-metrics/gauge-k6-metrics", "/javascript-api/k6-metrics/gauge/"),
    ("/javascript-api/k6-metrics/rate-k6-metrics", "/javascript-api/k6-metrics/rate/"),
    ("/javascript-api/k6-metrics/trend-k6-metrics", "/javascript-api/k6-metrics/trend/"),
    ("/using-k6/archives-for-bundling-sharing-a-test", "/misc/archive-command/"),
    ("/using-k6/ssl-tls", "/using-k6/protocols/ssl-tls/"),
    (
        "/using-k6/ssl-tls/online-certificate-status-protocol-ocsp",
        "/using-k6/protocols/ssl-tls/online-certificate-status-protocol-ocsp/",
    ),
    (
        "/using-k6/ssl-tls/ssl-tls-client-certificates",
        "/using-k6/protocols/ssl-tls/ssl-tls-client-certificates/",
    ),
    (
        "/using-k6/ssl-tls/ssl-tls-version-and-ciphers",
        "/using-k6/protocols/ssl-tls/ssl-tls-version-and-ciphers/",
    ),
    ("/using-k6/multipart-requests-file-uploads", "/examples/data-uploads/"),
    ("/getting-started/results-output/apache-kafka", "/results-visualization/apache-kafka/"),
    ("/getting-started/results-output/cloud", "/results-visualization/cloud/"),
    ("/results-visualization/k6-cloud-test-results", "/results-visualization/cloud/"),
    ("/getting-started/results-output/datadog", "/results-visualization/datadog/"),
    ("/getting-started/results-output/influxdb", "/results-visualization/influxdb-+-grafana/"),
    ("/getting-started/results-output/json", "/results-visualization/json/"),
    ("/getting-started/results-output/statsd", "/results-visualization/statsd/"),
    (
        "/javascript-api/k6-metrics/counter-k6-metrics/counter-add-value-tags",
        "/javascript-api/k6-metrics/counter/counter-add-value-tags/",
    ),
    (
        "/javascript-api/k6-metrics/gauge-k6-metrics/gauge-add-value-tags",
        "/javascript-api/k6-metrics/gauge/gauge-add-value-tags/",
    ),
    (
        "/javascript-api/k6-metrics/rate-k6-metrics/rate-add-value-tags",
        "/javascript-api/k6-metrics/rate/rate-add-value-tags/",
    ),
    (
        "/javascript-api/k6-metrics/trend-k6-metrics/trend-add-value-tags",
        "/javascript-api/k6-metrics/trend/trend-add-value-tags/",
    ),
    ("/using-k6/cloud-execution", "/cloud/creating-and-running-a-test/cloud-tests-from-the-cli/"),
    ("/using-k6/html/working-with-html-forms", "/examples/html-forms/"),
    ("/using-k6/html", "/javascript-api/k6-html/"),
    ("/using-k6/session-recording-har-support", "/test-authoring/recording-a-session/"),
    ("/cloud/creating-and-running-a-test/test-builder", "/test-authoring/test-builder/"),
    (
        "/cloud/creating-and-running-a-test/in-app-script-editor",
        "/cloud/creating-and-running-a-test/script-editor/",
    ),
    (
        "/cloud/creating-and-running-a-test/recording-a-test-script",
        "/test-authoring/recording-a-session/browser-recorder/",
    ),
    ("/cloud/creating-and-running-a-test/converters", "/integrations/"),
    ("/cloud/integrations/ci", "/integrations/"),
    ("/cloud/cloud-faq/what-is-data-retention", "/cloud/billing-user-menu/data-retention/"),
    ("/cloud/cloud-faq/pricing-faq", "/cloud/cloud-faq/pricing-questions/"),
    (
        "/cloud/cloud-faq/what-ip-addresses-are-used-by-the-k6-cloud",
        "/cloud/cloud-faq/general-questions/",
    ),
    (
        "/cloud/cloud-faq/what-is-the-best-way-to-debug-my-load-test-scripts",
        "/cloud/cloud-faq/general-questions/",
    ),
    (
        "/cloud/cloud-faq/i-was-invited-to-an-organization-and-i-cannot-run-tests",
        "/cloud/cloud-faq/general-questions/",
    ),
    (
        "/cloud/cloud-faq/how-to-open-your-firewall-to-k6-cloud-service-for-cloud-executed-tests",
        "/cloud/cloud-faq/general-questions/",
    ),
    ("/cloud/cloud-faq/test-status-codes", "/cloud/cloud-faq/general-questions/"),
    ("/cloud/cloud-faq/what-are-vus-virtual-users", "/cloud/cloud-faq/general-questions/"),
    ("/cloud/cloud-faq/data-uploads-with-k6-cloud", "/cloud/cloud-faq/general-questions/"),
    ("/misc/usage-reports", "/misc/usage-collection/"),
    ("/using-k6/using-node-modules", "/using-k6/modules/"),
];

/// Deprecated pages collapsing onto one parent: `(prefix, variants, target)`.
const REDIRECT_FAMILIES: &[(&str, &[&str], &str)] = &[
    (
        "/javascript-api/k6-html/selection",
        &[
            "/selection-findselector/",
            "/selection-attrname/",
            "/selection-getindex/",
            "/selection-nextselector/",
            "/selection-nextallselector/",
            "/selection-prevallselector/",
            "/selection-parentselector/",
            "/selection-parentsselector/",
            "/selection-prevuntilselector/",
            "/selection-nextuntilselector/",
            "/selection-parentsuntilselector/",
            "/selection-childrenselector/",
            "/selection/",
        ],
        "/javascript-api/k6-html/selection/",
    ),
    (
        "/javascript-api/6-crypto/hmac",
        &[
            "/md4-input-outputencoding/",
            "/md5-input-outputencoding/",
            "/sha1-input-outputencoding/",
            "/sha256-input-outputencoding/",
            "/sha384-input-outputencoding/",
            "/sha512-input-outputencoding/",
            "/sha512_224-input-outputencoding/",
            "/sha512_256-input-outputencoding/",
            "/ripemd160-input-outputencoding/",
        ],
        "/javascript-api/k6-crypto/",
    ),
];

/// Ordered collection of redirects for one build.
#[derive(Clone, Debug, Default)]
pub struct RedirectRegistry {
    entries: Vec<RedirectEntry>,
}

impl RedirectRegistry {
    /// Empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the full legacy redirect set.
    #[must_use]
    pub fn legacy() -> Self {
        let mut registry = Self::new();

        for (from, to, browser) in EXCEPTIONAL_REDIRECTS {
            let entry = RedirectEntry::permanent(*from, *to);
            registry.add(if *browser { entry.in_browser() } else { entry });
        }
        for (from, to) in LEGACY_REDIRECTS {
            registry.add_slash_variants(from, to);
        }
        for (prefix, variants, to) in REDIRECT_FAMILIES {
            registry.add_family(prefix, variants, to);
        }

        tracing::debug!(count = registry.len(), "Registered legacy redirects");
        registry
    }

    pub fn add(&mut self, entry: RedirectEntry) {
        self.entries.push(entry);
    }

    /// Register `from` without and with a trailing slash, both pointing at `to`.
    pub fn add_slash_variants(&mut self, from: &str, to: &str) {
        let bare = from.trim_end_matches('/');
        self.add(RedirectEntry::permanent(bare, to));
        self.add(RedirectEntry::permanent(format!("{bare}/"), to));
    }

    /// Redirect `<prefix><variant>` to `to` for every variant.
    pub fn add_family(&mut self, prefix: &str, variants: &[&str], to: &str) {
        for variant in variants {
            self.add(RedirectEntry::permanent(format!("{prefix}{variant}"), to));
        }
    }

    #[must_use]
    pub fn entries(&self) -> &[RedirectEntry] {
        &self.entries
    }

    #[must_use]
    pub fn into_entries(self) -> Vec<RedirectEntry> {
        self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
