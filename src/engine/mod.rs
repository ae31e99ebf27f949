//! Execution engine module
//!
//! Paginating fetch loop that turns a translated query into a lazy stream of
//! entities.
//!
//! # Overview
//!
//! The engine module provides:
//! - `FetchEngine` - Drives the page loop against the upstream API
//! - `UpdatedStamp` - How `_updated` is filled for a request
//!
//! Pages are fetched strictly in order and only one page is held in memory
//! at a time. Any failure ends the stream with an `Err` item.

mod types;

pub use types::{UpdatedStamp, UPDATED_FIELD};

use crate::decode::{sort_by_path, JsonDecoder, RecordDecoder};
use crate::error::{Error, Result};
use crate::http::{Session, SessionProvider};
use crate::pagination::{paginator_for, PageBudget};
use crate::query::TranslatedQuery;
use crate::types::ForwardParams;
use async_stream::try_stream;
use chrono::Utc;
use futures::Stream;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Fetch engine for one upstream API
#[derive(Clone)]
pub struct FetchEngine {
    /// Source of authenticated sessions
    provider: Arc<dyn SessionProvider>,
}

impl FetchEngine {
    /// Create a new fetch engine
    pub fn new(provider: Arc<dyn SessionProvider>) -> Self {
        Self { provider }
    }

    /// Stream the entities for a translated query.
    ///
    /// Nothing is fetched until the stream is polled. The stream ends after
    /// the last page, or with a single `Err` item on the first failure.
    pub fn stream(
        &self,
        query: TranslatedQuery,
    ) -> impl Stream<Item = Result<Value>> + Send + 'static {
        let provider = Arc::clone(&self.provider);

        try_stream! {
            let start = Instant::now();
            let TranslatedQuery { url, options, mut forward } = query;

            let stamp = UpdatedStamp::from_options(&options, Utc::now());
            let decoder = JsonDecoder::from_option(options.data_property.as_deref());
            let sort_path = options.updated_property.clone().filter(|_| options.do_sort);
            let mut budget = PageBudget::new(options.limit);
            let (paginator, mut state) = paginator_for(&options, &forward);

            loop {
                let session = provider.acquire_session().await?;
                let mut entities = fetch_page(&session, &url, &forward, &decoder).await?;
                debug!(
                    "Page {} of {url}: {} entities",
                    state.pages_fetched + 1,
                    entities.len()
                );

                if let Some(path) = &sort_path {
                    sort_by_path(&mut entities, path);
                }
                let limit_reached = budget.consume(&mut entities);
                let count = entities.len();

                for mut entity in entities {
                    stamp.apply(&mut entity);
                    yield entity;
                }

                let next = paginator.process_page(count, limit_reached, &mut state);
                if let Some(reason) = next.apply(&mut forward) {
                    debug!("Stopping after page {}: {reason}", state.pages_fetched);
                    break;
                }
            }

            debug!(
                "Fetched {} entities in {} pages from {url} in {}ms",
                state.total_fetched,
                state.pages_fetched,
                start.elapsed().as_millis()
            );
        }
    }
}

impl std::fmt::Debug for FetchEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchEngine").finish_non_exhaustive()
    }
}

/// Issue one upstream call and decode its entities
async fn fetch_page(
    session: &Session,
    url: &str,
    forward: &ForwardParams,
    decoder: &JsonDecoder,
) -> Result<Vec<Value>> {
    let response = session.get(url, forward).await?;
    let status = response.status().as_u16();
    if status == 204 {
        return Ok(Vec::new());
    }

    let body = response.text().await.map_err(Error::Http)?;
    if status != 200 {
        return Err(Error::upstream(status, body));
    }
    decoder.decode(&body)
}
