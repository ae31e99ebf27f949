//! Common types used throughout the adapter
//!
//! This module contains shared type definitions, type aliases,
//! and utility types used across multiple modules.

use std::collections::{BTreeMap, HashMap};

// ============================================================================
// Type Aliases
// ============================================================================

/// Generic key-value map with string keys and values
pub type StringMap = HashMap<String, String>;

/// Query parameters forwarded to the upstream API.
///
/// Ordered so that logs and upstream URLs are stable across calls.
pub type ForwardParams = BTreeMap<String, String>;

// ============================================================================
// Flags
// ============================================================================

/// Strict boolean parsing for configuration values.
///
/// Accepts `true/false`, `1/0`, `yes/no` and `on/off`, case-insensitive.
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

// ============================================================================
// Utilities
// ============================================================================

/// Extension trait for Option<String> to handle empty strings
pub trait OptionStringExt {
    /// Returns None if the string is empty
    fn none_if_empty(self) -> Option<String>;
}

impl OptionStringExt for Option<String> {
    fn none_if_empty(self) -> Option<String> {
        self.filter(|s| !s.is_empty())
    }
}

impl OptionStringExt for String {
    fn none_if_empty(self) -> Option<String> {
        if self.is_empty() {
            None
        } else {
            Some(self)
        }
    }
}
