//! Output module
//!
//! Turns the engine's entity stream into a streamed JSON array body.
//!
//! # Overview
//!
//! - [`JsonArrayWriter`] handles the `[`, `,` and `]` framing
//! - [`stream_json_array`] separates failures before the first byte from
//!   failures mid-stream

mod writer;

pub use writer::{stream_json_array, JsonArrayWriter};
