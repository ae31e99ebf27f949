//! Pagination module
//!
//! Supports: Page Number, single call
//!
//! # Overview
//!
//! The engine fetches pages strictly in order. A [`Paginator`] decides after
//! each page whether another call follows, and a [`PageBudget`] enforces the
//! client `limit` across pages.

mod strategies;
mod types;

pub use strategies::{paginator_for, NoPaginator, PageNumberPaginator};
pub use types::{NextPage, PageBudget, PaginationState, Paginator, StopReason};
