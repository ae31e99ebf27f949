//! Service configuration
//!
//! Raw settings come from command-line flags or their environment variables.
//! They are validated once at startup and turned into an immutable
//! [`ServiceConfig`] that the translator and engine read by reference.

use crate::auth::{AuthConfig, AuthMode};
use crate::error::{Error, Result};
use crate::http::HttpClientConfig;
use crate::query::{OptionDefaults, UrlTemplates};
use crate::template::UrlTemplate;
use crate::types::{parse_flag, OptionStringExt};
use std::time::Duration;
use tracing::info;

/// Default listening port
pub const DEFAULT_PORT: u16 = 5000;

// ============================================================================
// Raw Settings
// ============================================================================

/// Settings as read from flags and environment, before validation
#[derive(Debug, Clone)]
pub struct Settings {
    /// Template for full fetches
    pub full_url_pattern: Option<String>,
    /// Template for incremental fetches
    pub updated_url_pattern: Option<String>,
    /// Default `ms_updated_property`
    pub updated_property: Option<String>,
    /// Default `ms_offset_bigger_and_equal`
    pub offset_bigger_and_equal: Option<String>,
    /// Authentication mode selector
    pub authentication: Option<String>,
    /// JSON blob with headers or OAuth2 parameters
    pub config: Option<String>,
    /// Listening port
    pub port: u16,
    /// Transport timeout for upstream calls
    pub upstream_timeout_secs: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            full_url_pattern: None,
            updated_url_pattern: None,
            updated_property: None,
            offset_bigger_and_equal: None,
            authentication: None,
            config: None,
            port: DEFAULT_PORT,
            upstream_timeout_secs: None,
        }
    }
}

// ============================================================================
// Validated Config
// ============================================================================

/// Immutable configuration shared by every request
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// URL templates for both fetch modes
    pub templates: UrlTemplates,
    /// Process-wide option defaults
    pub defaults: OptionDefaults,
    /// Upstream authentication
    pub auth: AuthConfig,
    /// Upstream HTTP client settings
    pub http: HttpClientConfig,
    /// Listening port
    pub port: u16,
}

impl ServiceConfig {
    /// Validate raw settings
    pub fn from_settings(settings: Settings) -> Result<Self> {
        let full_raw = settings
            .full_url_pattern
            .none_if_empty()
            .ok_or_else(|| Error::missing_field("FULL_URL_PATTERN"))?;
        let full = UrlTemplate::parse("FULL_URL_PATTERN", full_raw)?;

        let updated = match settings.updated_url_pattern.none_if_empty() {
            Some(raw) => UrlTemplate::parse("UPDATED_URL_PATTERN", raw)?,
            None => full.clone(),
        };

        let offset_bigger_and_equal = match settings.offset_bigger_and_equal.none_if_empty() {
            None => false,
            Some(raw) => parse_flag(&raw).ok_or_else(|| {
                Error::invalid_value(
                    "OFFSET_BIGGER_AND_EQUAL",
                    format!("expected a boolean, got '{raw}'"),
                )
            })?,
        };

        let mode = AuthMode::parse(settings.authentication.as_deref())?;
        let auth = AuthConfig::from_blob(mode, settings.config.as_deref())?;

        let mut http = HttpClientConfig::default();
        if let Some(secs) = settings.upstream_timeout_secs.filter(|secs| *secs > 0) {
            http.timeout = Some(Duration::from_secs(secs));
        }

        Ok(Self {
            templates: UrlTemplates::new(full, updated),
            defaults: OptionDefaults {
                updated_property: settings.updated_property.none_if_empty(),
                offset_bigger_and_equal,
            },
            auth,
            http,
            port: settings.port,
        })
    }

    /// Log the effective configuration without secrets
    pub fn log_summary(&self) {
        info!("FULL_URL_PATTERN={}", self.templates.full);
        info!("UPDATED_URL_PATTERN={}", self.templates.updated);
        info!(
            "UPDATED_PROPERTY={}",
            self.defaults.updated_property.as_deref().unwrap_or("<none>")
        );
        info!("OFFSET_BIGGER_AND_EQUAL={}", self.defaults.offset_bigger_and_equal);
        info!("Authentication: {}", self.auth.describe());
    }
}
