//! Auth configuration types
//!
//! These types represent the runtime auth configuration after the `CONFIG`
//! blob has been parsed.

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

/// Authentication configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthConfig {
    /// No authentication required
    #[default]
    None,

    /// Static headers attached to every request
    Headers {
        /// Headers to add to each request
        headers: HashMap<String, String>,
    },

    /// OAuth2 Client Credentials flow
    Oauth2ClientCredentials {
        /// Token endpoint URL
        token_url: String,
        /// Client ID
        client_id: String,
        /// Client secret
        client_secret: String,
        /// Requested scopes
        scopes: Vec<String>,
        /// Additional token request body parameters
        token_body: HashMap<String, String>,
        /// Headers sent next to the bearer token
        headers: HashMap<String, String>,
    },
}

/// Authentication mode selected at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    /// Static headers from the config blob
    #[default]
    Headers,
    /// OAuth2 client credentials from the config blob
    Oauth2,
}

impl AuthMode {
    /// Parse the mode selector. Absent or blank selects static headers.
    pub fn parse(raw: Option<&str>) -> Result<Self> {
        match raw.map(str::trim) {
            None | Some("") => Ok(Self::Headers),
            Some(mode) if mode.eq_ignore_ascii_case("oauth2") => Ok(Self::Oauth2),
            Some(mode) => Err(Error::invalid_value(
                "AUTHENTICATION",
                format!("unsupported authentication '{mode}', expected 'oauth2' or nothing"),
            )),
        }
    }
}

/// Shape of the `CONFIG` JSON blob
#[derive(Debug, Default, Deserialize)]
struct ConfigBlob {
    #[serde(default)]
    headers: Option<HashMap<String, String>>,
    #[serde(default)]
    oauth2: Option<Oauth2Blob>,
}

#[derive(Debug, Deserialize)]
struct Oauth2Blob {
    token_url: String,
    client_id: String,
    client_secret: String,
    #[serde(default)]
    scope: Option<Scope>,
    #[serde(flatten)]
    extra: HashMap<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Scope {
    One(String),
    Many(Vec<String>),
}

impl Scope {
    fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(scope) => scope.split_whitespace().map(str::to_string).collect(),
            Self::Many(scopes) => scopes,
        }
    }
}

impl AuthConfig {
    /// Build the auth configuration from the mode selector and `CONFIG` blob.
    ///
    /// A missing or blank blob is an empty object. In header mode an empty
    /// header set means no authentication.
    pub fn from_blob(mode: AuthMode, blob: Option<&str>) -> Result<Self> {
        let blob: ConfigBlob = match blob.map(str::trim) {
            None | Some("") => ConfigBlob::default(),
            Some(raw) => serde_json::from_str(raw)
                .map_err(|e| Error::invalid_value("CONFIG", format!("not valid JSON: {e}")))?,
        };
        let headers = blob.headers.unwrap_or_default();
        header_map(&headers)?;

        match mode {
            AuthMode::Headers if headers.is_empty() => Ok(Self::None),
            AuthMode::Headers => Ok(Self::Headers { headers }),
            AuthMode::Oauth2 => {
                let oauth2 = blob.oauth2.ok_or_else(|| {
                    Error::invalid_value("CONFIG", "oauth2 authentication needs an 'oauth2' section")
                })?;
                let token_body = oauth2
                    .extra
                    .into_iter()
                    .map(|(key, value)| match value {
                        Value::String(s) => (key, s),
                        other => (key, other.to_string()),
                    })
                    .collect();

                Ok(Self::Oauth2ClientCredentials {
                    token_url: oauth2.token_url,
                    client_id: oauth2.client_id,
                    client_secret: oauth2.client_secret,
                    scopes: oauth2.scope.map(Scope::into_vec).unwrap_or_default(),
                    token_body,
                    headers,
                })
            }
        }
    }

    /// Short name for logs
    pub fn describe(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Headers { .. } => "static headers",
            Self::Oauth2ClientCredentials { .. } => "oauth2 client credentials",
        }
    }
}

/// Convert configured headers into a `HeaderMap`, rejecting names or
/// values that cannot go on the wire
pub(crate) fn header_map(headers: &HashMap<String, String>) -> Result<HeaderMap> {
    let mut map = HeaderMap::new();
    for (key, value) in headers {
        let name = HeaderName::from_bytes(key.as_bytes()).map_err(|e| {
            Error::invalid_value("CONFIG", format!("bad header name '{key}': {e}"))
        })?;
        let value = HeaderValue::from_str(value).map_err(|e| {
            Error::invalid_value("CONFIG", format!("bad value for header '{key}': {e}"))
        })?;
        map.insert(name, value);
    }
    Ok(map)
}

/// Cached token with expiration
#[derive(Debug, Clone)]
pub struct CachedToken {
    /// The access token
    pub token: String,
    /// When the token expires
    pub expires_at: Option<DateTime<Utc>>,
}

impl CachedToken {
    /// Create a new cached token
    pub fn new(token: String, expires_at: Option<DateTime<Utc>>) -> Self {
        Self { token, expires_at }
    }

    /// Create a token that expires in N seconds from now
    pub fn expires_in(token: String, seconds: i64) -> Self {
        let expires_at = Utc::now() + chrono::Duration::seconds(seconds);
        Self {
            token,
            expires_at: Some(expires_at),
        }
    }

    /// Check if the token is expired (with 30 second buffer)
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => {
                let buffer = chrono::Duration::seconds(30);
                Utc::now() + buffer >= expires_at
            }
            None => false,
        }
    }
}
