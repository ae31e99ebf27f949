//! Error types for the incremental JSON adapter
//!
//! This module defines the error hierarchy for the whole service.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use thiserror::Error;

/// The main error type for the adapter
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Authentication Errors
    // ============================================================================
    #[error("Authentication failed: {message}")]
    Auth { message: String },

    #[error("OAuth2 error: {message}")]
    OAuth2 { message: String },

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream answered with a status outside {200, 204}
    #[error("HTTP {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Data Processing Errors
    // ============================================================================
    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an auth error
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    /// Create an upstream status error
    pub fn upstream(status: u16, body: impl Into<String>) -> Self {
        Self::Upstream {
            status,
            body: body.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Status code to mirror back to the caller, if this is an upstream error
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            Error::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Short name of the error kind, used in diagnostic response bodies
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Config { .. } => "ConfigError",
            Error::MissingConfigField { .. } => "MissingConfigField",
            Error::InvalidConfigValue { .. } => "InvalidConfigValue",
            Error::JsonParse(_) => "JsonParseError",
            Error::Auth { .. } => "AuthError",
            Error::OAuth2 { .. } => "OAuth2Error",
            Error::Http(_) => "HttpError",
            Error::Upstream { .. } => "UpstreamError",
            Error::InvalidUrl(_) => "InvalidUrl",
            Error::Decode { .. } => "DecodeError",
            Error::Io(_) => "IoError",
            Error::Other(_) | Error::Anyhow(_) => "InternalError",
        }
    }

    /// Diagnostic string returned as the body of a failed request
    pub fn diagnostic(&self) -> String {
        format!("{} - {}", self.kind(), self)
    }
}

/// Result type alias for the adapter
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::config("test message");
        assert_eq!(err.to_string(), "Configuration error: test message");

        let err = Error::missing_field("FULL_URL_PATTERN");
        assert_eq!(
            err.to_string(),
            "Missing required config field: FULL_URL_PATTERN"
        );

        let err = Error::upstream(404, "not found");
        assert_eq!(err.to_string(), "HTTP 404: not found");
    }

    #[test]
    fn test_upstream_status() {
        assert_eq!(Error::upstream(404, "").upstream_status(), Some(404));
        assert_eq!(Error::upstream(503, "busy").upstream_status(), Some(503));
        assert_eq!(Error::config("x").upstream_status(), None);
        assert_eq!(Error::decode("x").upstream_status(), None);
    }

    #[test]
    fn test_diagnostic() {
        let err = Error::decode("unexpected token");
        assert_eq!(
            err.diagnostic(),
            "DecodeError - Failed to decode response: unexpected token"
        );
    }

    #[test]
    fn test_result_context() {
        let result: Result<()> = Err(Error::config("inner"));
        let with_context = result.context("outer");
        assert!(with_context
            .unwrap_err()
            .to_string()
            .contains("outer: Configuration error: inner"));
    }
}
