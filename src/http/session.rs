//! Authenticated sessions
//!
//! The fetch engine asks a [`SessionProvider`] for a fresh [`Session`] before
//! every upstream call, so token refreshes between pages are picked up
//! without the engine knowing about them.

use crate::auth::Credentials;
use crate::error::{Error, Result};
use crate::types::ForwardParams;
use async_trait::async_trait;
use reqwest::{Client, Response};
use tracing::debug;

/// Source of authenticated sessions
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Acquire a session carrying currently valid credentials
    async fn acquire_session(&self) -> Result<Session>;
}

/// Handle that issues authenticated GET requests
#[derive(Debug, Clone)]
pub struct Session {
    client: Client,
    credentials: Credentials,
}

impl Session {
    /// Create a session from a client and resolved credentials
    pub fn new(client: Client, credentials: Credentials) -> Self {
        Self {
            client,
            credentials,
        }
    }

    /// Issue a GET request with the given query parameters.
    ///
    /// The response is returned whatever its status; callers decide which
    /// statuses are acceptable.
    pub async fn get(&self, url: &str, params: &ForwardParams) -> Result<Response> {
        let mut req = self.client.get(url);
        if !params.is_empty() {
            req = req.query(params);
        }
        let req = self.credentials.apply(req);

        let response = req.send().await.map_err(Error::Http)?;
        debug!("GET {} -> {}", response.url(), response.status().as_u16());
        Ok(response)
    }
}
