//! Response decoding and entity helpers
//!
//! # Overview
//!
//! - [`JsonDecoder`] turns an upstream body into a flat list of entities,
//!   unwrapping envelopes through a data property
//! - [`resolve_path`] and friends look up dotted paths inside entities
//! - [`sort_by_path`] orders a page by its modification marker

mod decoders;
mod path;
mod types;

pub use decoders::JsonDecoder;
pub use path::{compare_markers, marker_string, resolve_path, resolve_path_mut, sort_by_path};
pub use types::RecordDecoder;
