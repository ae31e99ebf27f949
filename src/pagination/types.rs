//! Pagination types and traits
//!
//! Defines the page loop abstractions shared by the fetch engine.

use crate::types::ForwardParams;
use serde_json::Value;

/// Result of the next page computation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextPage {
    /// More pages available with these parameters
    Continue {
        /// Query parameters to add/replace
        query_params: ForwardParams,
    },
    /// No more pages
    Done(StopReason),
}

impl NextPage {
    /// Create a continuation with a single parameter
    pub fn with_param(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut params = ForwardParams::new();
        params.insert(key.into(), value.into());
        Self::Continue {
            query_params: params,
        }
    }

    /// Apply a continuation to the forwarded parameters
    pub fn apply(self, forward: &mut ForwardParams) -> Option<StopReason> {
        match self {
            Self::Continue { query_params } => {
                forward.extend(query_params);
                None
            }
            Self::Done(reason) => Some(reason),
        }
    }
}

/// Why the page loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The request is not paginated, one call only
    NotPaginated,
    /// The upstream returned no entities
    EmptyPage,
    /// The client limit was reached
    LimitReached,
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotPaginated => write!(f, "not paginated"),
            Self::EmptyPage => write!(f, "empty page"),
            Self::LimitReached => write!(f, "limit reached"),
        }
    }
}

/// Tracks pagination state during iteration
#[derive(Debug, Clone, Default)]
pub struct PaginationState {
    /// Current page number
    pub page: i64,
    /// Number of upstream calls issued so far
    pub pages_fetched: usize,
    /// Total entities emitted so far
    pub total_fetched: usize,
}

impl PaginationState {
    /// Create a new pagination state
    pub fn new() -> Self {
        Self::default()
    }

    /// Create state with a starting page
    pub fn with_page(page: i64) -> Self {
        Self {
            page,
            ..Default::default()
        }
    }

    /// Increment page number
    pub fn next_page(&mut self) {
        self.page = self.page.saturating_add(1);
    }

    /// Record one fetched page
    pub fn add_page(&mut self, count: usize) {
        self.pages_fetched += 1;
        self.total_fetched += count;
    }
}

/// Running entity budget derived from the client `limit`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageBudget {
    remaining: Option<u64>,
}

impl PageBudget {
    /// Budget for an optional limit; `None` is unlimited
    pub fn new(limit: Option<u64>) -> Self {
        Self { remaining: limit }
    }

    /// Charge a page against the budget.
    ///
    /// Entities beyond the remaining budget are dropped from the end of the
    /// page. Returns `true` when the budget is exhausted afterwards.
    pub fn consume(&mut self, page: &mut Vec<Value>) -> bool {
        let Some(remaining) = self.remaining else {
            return false;
        };
        let allowed = usize::try_from(remaining).unwrap_or(usize::MAX);
        if page.len() > allowed {
            page.truncate(allowed);
        }
        let left = remaining - page.len() as u64;
        self.remaining = Some(left);
        left == 0
    }
}

/// Core trait for pagination strategies.
///
/// The first request always goes out with the forwarded parameters exactly
/// as the client sent them; a paginator only rewrites them between pages.
pub trait Paginator: Send + Sync {
    /// Record the page just fetched and decide whether another page follows
    fn process_page(
        &self,
        records_count: usize,
        limit_reached: bool,
        state: &mut PaginationState,
    ) -> NextPage;
}
