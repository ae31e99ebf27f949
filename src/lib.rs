// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # Incremental JSON
//!
//! An incremental-sync adapter for REST APIs without change data capture.
//! A client asks for `GET /<path>?since=<cursor>&limit=<n>`; the adapter
//! fills a URL template, pages through the upstream API and streams the
//! entities back as one JSON array, each stamped with `_updated`.
//!
//! ## Features
//!
//! - **Query Translation**: URL templates with `__path__`, `__since__` and
//!   `__limit__`, layered `ms_*` options, ISO-8601 or integer cursors
//! - **Paginated Fetching**: page-number pagination with a client limit
//!   enforced across pages
//! - **Entity Normalization**: envelope unwrapping, per-page sorting and
//!   `_updated` stamping
//! - **Streaming Output**: bounded memory, one page at a time
//! - **Auth**: static headers or OAuth2 client credentials with token caching
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use incremental_json::config::{ServiceConfig, Settings};
//! use incremental_json::cli::serve;
//!
//! #[tokio::main]
//! async fn main() -> incremental_json::Result<()> {
//!     let config = ServiceConfig::from_settings(Settings {
//!         full_url_pattern: Some("https://api.example.com/__path__".into()),
//!         updated_url_pattern: Some("https://api.example.com/__path__?since=__since__".into()),
//!         ..Default::default()
//!     })?;
//!     serve(config).await
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! GET /<path>?since=..&limit=..
//!        │
//! ┌──────┴──────────┐   ┌──────────────────────────────┐   ┌──────────────┐
//! │ Query Translator│──▶│       Fetch Engine           │──▶│    Output    │
//! │ template, cursor│   │ session → GET → decode → sort│   │ [ e , e , e ]│
//! │ option layers   │   │ → budget → stamp → next page │   │  streamed    │
//! └─────────────────┘   └──────────────────────────────┘   └──────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(missing_docs)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Service configuration
pub mod config;

/// URL templates and placeholders
pub mod template;

/// Query translation
pub mod query;

/// Response decoding and entity paths
pub mod decode;

/// Page loop control
pub mod pagination;

/// Authentication implementations
pub mod auth;

/// HTTP client and sessions
pub mod http;

/// Paginating fetch engine
pub mod engine;

/// Streamed JSON array output
pub mod output;

/// Command-line interface and HTTP server
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

pub use config::{ServiceConfig, Settings};
pub use engine::FetchEngine;
pub use query::{translate, TranslatedQuery};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
