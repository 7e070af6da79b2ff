//! Supported locales.

/// The set of supported locale codes and the default among them.
///
/// The default locale is never used as a URL prefix.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Locales {
    default: String,
    supported: Vec<String>,
}

impl Locales {
    /// Create a locale set. The default locale is added to `supported`
    /// (in front) when missing.
    #[must_use]
    pub fn new(default: impl Into<String>, supported: Vec<String>) -> Self {
        let default = default.into();
        let mut supported = supported;
        if !supported.contains(&default) {
            supported.insert(0, default.clone());
        }
        Self { default, supported }
    }

    #[must_use]
    pub fn default_locale(&self) -> &str {
        &self.default
    }

    /// Supported locale codes in configuration order.
    #[must_use]
    pub fn supported(&self) -> &[String] {
        &self.supported
    }

    #[must_use]
    pub fn is_supported(&self, code: &str) -> bool {
        self.supported.iter().any(|l| l == code)
    }

    #[must_use]
    pub fn is_default(&self, code: &str) -> bool {
        self.default == code
    }

    /// Locale owning `path`: its leading segment when that is a supported
    /// locale code, otherwise the default locale.
    #[must_use]
    pub fn locale_of<'a>(&'a self, path: &str) -> &'a str {
        let first = path.trim_start_matches('/').split('/').next().unwrap_or("");
        self.supported
            .iter()
            .find(|l| *l == first)
            .map_or(self.default.as_str(), String::as_str)
    }
}

impl Default for Locales {
    fn default() -> Self {
        Self::new("en", vec!["en".to_owned(), "es".to_owned()])
    }
}
