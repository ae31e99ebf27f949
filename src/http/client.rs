//! HTTP client for upstream calls
//!
//! Wraps a shared `reqwest::Client` together with the authenticator. No
//! retries and no rate limiting: an upstream failure ends the request.

use super::session::{Session, SessionProvider};
use crate::auth::{AuthConfig, Authenticator};
use crate::error::Result;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Transport timeout; `None` waits for the upstream indefinitely
    pub timeout: Option<Duration>,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: None,
            user_agent: format!("incremental-json/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// HTTP client handing out authenticated sessions
pub struct HttpClient {
    client: Client,
    authenticator: Authenticator,
}

impl HttpClient {
    /// Create a client without authentication
    pub fn new(config: HttpClientConfig) -> Result<Self> {
        Self::with_auth(config, AuthConfig::None)
    }

    /// Create a client with authentication
    pub fn with_auth(config: HttpClientConfig, auth_config: AuthConfig) -> Result<Self> {
        let mut builder = Client::builder().user_agent(&config.user_agent);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        let authenticator = Authenticator::with_client(auth_config, client.clone())?;
        Ok(Self {
            client,
            authenticator,
        })
    }
}

#[async_trait]
impl SessionProvider for HttpClient {
    async fn acquire_session(&self) -> Result<Session> {
        let credentials = self.authenticator.credentials().await?;
        Ok(Session::new(self.client.clone(), credentials))
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("authenticator", &self.authenticator)
            .finish_non_exhaustive()
    }
}
