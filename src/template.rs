//! URL template handling
//!
//! Upstream URLs are configured as templates carrying `__path__`, `__since__`
//! and `__limit__` placeholders, e.g.
//! `https://api.example.com/__path__?updatedSince=__since__&ms_do_sort=true`.

use crate::error::{Error, Result};
use crate::types::StringMap;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use url::Url;

/// Regex for matching any known placeholder
static PLACEHOLDER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"__(path|since|limit)__").unwrap());

/// Placeholders understood in URL templates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    /// Inbound request path, without the leading slash
    Path,
    /// Client cursor after classification
    Since,
    /// Client row cap
    Limit,
}

impl Placeholder {
    /// The literal token as written in templates
    pub fn token(self) -> &'static str {
        match self {
            Placeholder::Path => "__path__",
            Placeholder::Since => "__since__",
            Placeholder::Limit => "__limit__",
        }
    }

    /// Check whether `text` contains this placeholder
    pub fn is_in(self, text: &str) -> bool {
        text.contains(self.token())
    }

    /// Replace every occurrence of this placeholder in `text`
    pub fn substitute(self, text: &str, value: &str) -> String {
        text.replace(self.token(), value)
    }
}

/// A validated upstream URL template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTemplate {
    raw: String,
}

impl UrlTemplate {
    /// Validate and wrap a template.
    ///
    /// The template must become an absolute http(s) URL once every
    /// placeholder is replaced with a sample value.
    pub fn parse(field: &str, raw: impl Into<String>) -> Result<Self> {
        let raw = raw.into();
        let raw = raw.trim().to_string();
        if raw.is_empty() {
            return Err(Error::missing_field(field));
        }

        let sample = Placeholder::Path.substitute(&raw, "sample/path");
        let sample = Placeholder::Since.substitute(&sample, "1");
        let sample = Placeholder::Limit.substitute(&sample, "1");
        let url = Url::parse(&sample)
            .map_err(|e| Error::invalid_value(field, format!("'{raw}' is not a valid URL: {e}")))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::invalid_value(
                field,
                format!("unsupported scheme '{}'", url.scheme()),
            ));
        }

        Ok(Self { raw })
    }

    /// The template text as configured
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Check whether the template uses a placeholder anywhere
    pub fn has(&self, placeholder: Placeholder) -> bool {
        placeholder.is_in(&self.raw)
    }

    /// Substitute the inbound path and split the result into its base URL
    /// and the query string embedded in the template
    pub fn with_path(&self, path: &str) -> SplitUrl {
        SplitUrl::split(&Placeholder::Path.substitute(&self.raw, path))
    }
}

impl fmt::Display for UrlTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// A URL split into everything but the query, and the raw query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitUrl {
    /// Scheme, authority, path and fragment
    pub base: String,
    /// Raw query string, without the leading `?`
    pub query: Option<String>,
}

impl SplitUrl {
    /// Split a URL string at its query component
    pub fn split(url: &str) -> Self {
        let (without_fragment, fragment) = match url.find('#') {
            Some(pos) => (&url[..pos], Some(&url[pos..])),
            None => (url, None),
        };

        let (path, query) = match without_fragment.find('?') {
            Some(pos) => (
                &without_fragment[..pos],
                Some(without_fragment[pos + 1..].to_string()),
            ),
            None => (without_fragment, None),
        };

        Self {
            base: format!("{path}{}", fragment.unwrap_or("")),
            query: query.filter(|q| !q.is_empty()),
        }
    }

    /// Parse the embedded query into a map
    pub fn query_params(&self) -> StringMap {
        self.query.as_deref().map(parse_query).unwrap_or_default()
    }
}

/// Parse an `application/x-www-form-urlencoded` query string.
///
/// The first value of a repeated key wins and blank values are dropped.
pub fn parse_query(query: &str) -> StringMap {
    let mut params = StringMap::new();
    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        if value.is_empty() {
            continue;
        }
        params
            .entry(key.into_owned())
            .or_insert_with(|| value.into_owned());
    }
    params
}

/// Check if a string still contains template placeholders
pub fn has_placeholders(s: &str) -> bool {
    PLACEHOLDER_REGEX.is_match(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_substitute() {
        assert_eq!(
            Placeholder::Since.substitute("a/__since__/b?x=__since__", "5"),
            "a/5/b?x=5"
        );
        assert!(Placeholder::Limit.is_in("x?top=__limit__"));
        assert!(!Placeholder::Limit.is_in("x?top=10"));
    }

    #[test]
    fn test_parse_valid_template() {
        let template =
            UrlTemplate::parse("FULL_URL_PATTERN", "https://api.example.com/__path__").unwrap();
        assert_eq!(template.as_str(), "https://api.example.com/__path__");
        assert!(template.has(Placeholder::Path));
        assert!(!template.has(Placeholder::Since));
    }

    #[test]
    fn test_parse_rejects_relative_url() {
        let err = UrlTemplate::parse("FULL_URL_PATTERN", "/__path__").unwrap_err();
        assert!(err.to_string().contains("FULL_URL_PATTERN"));
    }

    #[test]
    fn test_parse_rejects_other_scheme() {
        let err = UrlTemplate::parse("FULL_URL_PATTERN", "ftp://host/__path__").unwrap_err();
        assert!(err.to_string().contains("unsupported scheme"));
    }

    #[test]
    fn test_parse_rejects_empty() {
        let err = UrlTemplate::parse("UPDATED_URL_PATTERN", "  ").unwrap_err();
        assert!(matches!(err, Error::MissingConfigField { .. }));
    }

    #[test]
    fn test_with_path_splits_query() {
        let template = UrlTemplate::parse(
            "FULL_URL_PATTERN",
            "https://api.example.com/v1/__path__?ms_do_sort=true&top=__limit__",
        )
        .unwrap();
        let split = template.with_path("orders/open");
        assert_eq!(split.base, "https://api.example.com/v1/orders/open");
        assert_eq!(
            split.query.as_deref(),
            Some("ms_do_sort=true&top=__limit__")
        );

        let params = split.query_params();
        assert_eq!(params.get("ms_do_sort"), Some(&"true".to_string()));
        assert_eq!(params.get("top"), Some(&"__limit__".to_string()));
    }

    #[test]
    fn test_split_keeps_fragment() {
        let split = SplitUrl::split("https://h/p?a=1#frag");
        assert_eq!(split.base, "https://h/p#frag");
        assert_eq!(split.query.as_deref(), Some("a=1"));

        let split = SplitUrl::split("https://h/p?");
        assert_eq!(split.base, "https://h/p");
        assert!(split.query.is_none());
    }

    #[test]
    fn test_parse_query_first_wins_and_blank_dropped() {
        let params = parse_query("a=1&a=2&b=&c=x%3Ay&d=hello+world");
        assert_eq!(params.get("a"), Some(&"1".to_string()));
        assert!(!params.contains_key("b"));
        assert_eq!(params.get("c"), Some(&"x:y".to_string()));
        assert_eq!(params.get("d"), Some(&"hello world".to_string()));
    }

    #[test]
    fn test_has_placeholders() {
        assert!(has_placeholders("__limit__"));
        assert!(has_placeholders("x__since__y"));
        assert!(!has_placeholders("__other__"));
        assert!(!has_placeholders("plain"));
    }
}
