//! Query translation
//!
//! Derives the upstream URL, the per-request [`MicroserviceOptions`] and the
//! parameters to forward from an inbound request.
//!
//! # Overview
//!
//! - [`Cursor`] classifies the client `since` value (timestamp, integer, or neither)
//! - [`OptionLayer`] / [`merge_layers`] apply defaults, template and request in a fixed order
//! - [`translate`] ties it together

mod cursor;
mod options;
mod translator;

pub use cursor::Cursor;
pub use options::{
    merge_layers, split_params, LayerSource, MicroserviceOptions, OptionDefaults, OptionKey,
    OptionLayer,
};
pub use translator::{translate, TranslatedQuery, UrlTemplates};

#[cfg(test)]
mod tests;
