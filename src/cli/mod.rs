//! CLI module
//!
//! Command-line interface for running the adapter.
//!
//! # Commands
//!
//! - `serve` - Start the HTTP server (default)
//! - `translate` - Show the upstream URL and parameters for a request

mod commands;
mod runner;
mod server;

pub use commands::{Cli, Commands};
pub use runner::Runner;
pub use server::{build_router, serve, AppState};
