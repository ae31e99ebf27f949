//! Decoder traits
//!
//! Defines the core decoder abstraction.

use crate::error::Result;
use serde_json::Value;

/// Trait for turning an upstream response body into entities
pub trait RecordDecoder: Send + Sync {
    /// Decode a response body into a list of entities
    fn decode(&self, body: &str) -> Result<Vec<Value>>;
}
