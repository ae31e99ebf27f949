//! HTTP client module
//!
//! Provides the authenticated sessions used for upstream calls.
//!
//! # Features
//!
//! - **Sessions**: one [`Session`] per upstream call, with fresh credentials
//! - **Authentication**: integration with the auth module
//! - **Timeouts**: optional transport-level timeout

mod client;
mod session;

pub use client::{HttpClient, HttpClientConfig};
pub use session::{Session, SessionProvider};
