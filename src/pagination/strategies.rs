//! Pagination strategy implementations
//!
//! The upstream APIs served here either answer in one call or page through a
//! numeric query parameter.

use super::types::{NextPage, PaginationState, Paginator, StopReason};
use crate::query::MicroserviceOptions;
use crate::types::ForwardParams;
use tracing::debug;

// ============================================================================
// Page Number Pagination
// ============================================================================

/// Page number pagination
///
/// Increments the page parameter after every non-empty page.
/// Common patterns:
/// - `?page=2`
/// - `?pageNumber=2&pageSize=50`
#[derive(Debug, Clone)]
pub struct PageNumberPaginator {
    /// Query parameter name for page number
    pub page_param: String,
}

impl PageNumberPaginator {
    /// Create a new page number paginator
    pub fn new(page_param: impl Into<String>) -> Self {
        Self {
            page_param: page_param.into(),
        }
    }
}

impl Paginator for PageNumberPaginator {
    fn process_page(
        &self,
        records_count: usize,
        limit_reached: bool,
        state: &mut PaginationState,
    ) -> NextPage {
        state.add_page(records_count);

        if records_count == 0 {
            return NextPage::Done(StopReason::EmptyPage);
        }
        if limit_reached {
            return NextPage::Done(StopReason::LimitReached);
        }

        state.next_page();
        NextPage::with_param(&self.page_param, state.page.to_string())
    }
}

// ============================================================================
// No Pagination
// ============================================================================

/// Single upstream call
#[derive(Debug, Clone, Default)]
pub struct NoPaginator;

impl NoPaginator {
    /// Create a new no-op paginator
    pub fn new() -> Self {
        Self
    }
}

impl Paginator for NoPaginator {
    fn process_page(
        &self,
        records_count: usize,
        limit_reached: bool,
        state: &mut PaginationState,
    ) -> NextPage {
        state.add_page(records_count);
        if limit_reached {
            NextPage::Done(StopReason::LimitReached)
        } else {
            NextPage::Done(StopReason::NotPaginated)
        }
    }
}

// ============================================================================
// Factory
// ============================================================================

/// Pick the paginator for a translated request.
///
/// Page-number pagination needs an active flag and a numeric start value in
/// the forwarded parameters; anything else falls back to a single call. The
/// start value itself is left in place, so the first call carries the
/// client's text unchanged.
pub fn paginator_for(
    options: &MicroserviceOptions,
    forward: &ForwardParams,
) -> (Box<dyn Paginator>, PaginationState) {
    let page_param = options
        .pagenum_param_at_src
        .as_deref()
        .filter(|_| options.paginate);

    if let Some(param) = page_param {
        if let Some(start) = forward.get(param).and_then(|v| v.trim().parse::<i64>().ok()) {
            debug!("Paginating on '{param}' starting at {start}");
            return (
                Box::new(PageNumberPaginator::new(param)),
                PaginationState::with_page(start),
            );
        }
    }

    (Box::new(NoPaginator::new()), PaginationState::new())
}
