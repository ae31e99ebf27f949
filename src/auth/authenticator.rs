//! Authenticator implementation
//!
//! Handles applying authentication to requests and managing token refresh.

use super::types::{header_map, AuthConfig, CachedToken};
use crate::error::{Error, Result};
use reqwest::header::HeaderMap;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Credentials resolved for one session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    /// Static headers attached to every request
    pub headers: HeaderMap,
    /// Bearer token, if the auth mode issues one
    pub bearer: Option<String>,
}

impl Credentials {
    /// Apply the credentials to a request builder
    pub fn apply(&self, req: RequestBuilder) -> RequestBuilder {
        let req = req.headers(self.headers.clone());
        match &self.bearer {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }
}

/// Authenticator handles applying authentication to HTTP requests
pub struct Authenticator {
    /// Auth configuration
    config: AuthConfig,
    /// Static headers, validated once
    headers: HeaderMap,
    /// Cached token shared by all requests
    cached_token: Arc<RwLock<Option<CachedToken>>>,
    /// HTTP client for token requests
    http_client: Client,
}

impl Authenticator {
    /// Create an authenticator that fetches tokens with `http_client`.
    ///
    /// Fails when a configured header cannot be sent.
    pub fn with_client(config: AuthConfig, http_client: Client) -> Result<Self> {
        let headers = match &config {
            AuthConfig::None => HeaderMap::new(),
            AuthConfig::Headers { headers }
            | AuthConfig::Oauth2ClientCredentials { headers, .. } => header_map(headers)?,
        };

        Ok(Self {
            config,
            headers,
            cached_token: Arc::new(RwLock::new(None)),
            http_client,
        })
    }

    /// Resolve the credentials for the next upstream call, refreshing the
    /// token when needed
    pub async fn credentials(&self) -> Result<Credentials> {
        let bearer = match &self.config {
            AuthConfig::None | AuthConfig::Headers { .. } => None,
            AuthConfig::Oauth2ClientCredentials { .. } => {
                Some(self.get_or_refresh_token().await?)
            }
        };

        Ok(Credentials {
            headers: self.headers.clone(),
            bearer,
        })
    }

    /// Get a valid token, refreshing if necessary
    async fn get_or_refresh_token(&self) -> Result<String> {
        {
            let cached = self.cached_token.read().await;
            if let Some(token) = cached.as_ref() {
                if !token.is_expired() {
                    return Ok(token.token.clone());
                }
            }
        }

        let mut cached = self.cached_token.write().await;

        // Another task may have refreshed while we waited for the write lock
        if let Some(token) = cached.as_ref() {
            if !token.is_expired() {
                return Ok(token.token.clone());
            }
        }

        let new_token = self.fetch_new_token().await?;
        let token_str = new_token.token.clone();
        *cached = Some(new_token);

        Ok(token_str)
    }

    /// Fetch a new token based on auth type
    async fn fetch_new_token(&self) -> Result<CachedToken> {
        match &self.config {
            AuthConfig::Oauth2ClientCredentials {
                token_url,
                client_id,
                client_secret,
                scopes,
                token_body,
                ..
            } => {
                self.fetch_oauth2_client_credentials(
                    token_url,
                    client_id,
                    client_secret,
                    scopes,
                    token_body,
                )
                .await
            }

            _ => Err(Error::auth(
                "Token refresh not supported for this auth type",
            )),
        }
    }

    /// Fetch OAuth2 token using client credentials flow
    async fn fetch_oauth2_client_credentials(
        &self,
        token_url: &str,
        client_id: &str,
        client_secret: &str,
        scopes: &[String],
        extra_body: &HashMap<String, String>,
    ) -> Result<CachedToken> {
        info!("Updating token from {token_url}");

        let mut form = vec![
            ("grant_type", "client_credentials".to_string()),
            ("client_id", client_id.to_string()),
            ("client_secret", client_secret.to_string()),
        ];

        if !scopes.is_empty() {
            form.push(("scope", scopes.join(" ")));
        }

        for (key, value) in extra_body {
            form.push((key.as_str(), value.clone()));
        }

        let response = self
            .http_client
            .post(token_url)
            .form(&form)
            .send()
            .await
            .map_err(Error::Http)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::OAuth2 {
                message: format!("Token request failed with status {status}: {body}"),
            });
        }

        let token_response: TokenResponse = response.json().await.map_err(Error::Http)?;
        let token = token_response.into_cached_token();
        debug!("Token expires at {:?}", token.expires_at);
        Ok(token)
    }

}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator")
            .field("mode", &self.config.describe())
            .finish_non_exhaustive()
    }
}

/// OAuth2 token response
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    #[allow(dead_code)]
    token_type: Option<String>,
}

impl TokenResponse {
    fn into_cached_token(self) -> CachedToken {
        match self.expires_in {
            Some(secs) => CachedToken::expires_in(self.access_token, secs),
            None => CachedToken::new(self.access_token, None),
        }
    }
}
