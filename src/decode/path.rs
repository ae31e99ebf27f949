//! Dotted-path helpers over JSON values
//!
//! Paths look like `meta.updated` or `data.items.0`. A leading `$.` is
//! accepted. Missing segments resolve to `None` instead of failing.

use serde_json::Value;
use std::cmp::Ordering;

/// Resolve a dotted path inside a JSON value
pub fn resolve_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let path = path.strip_prefix("$.").unwrap_or(path);

    let mut current = value;
    for part in path.split('.') {
        current = match current {
            Value::Object(map) => map.get(part)?,
            Value::Array(items) => items.get(part.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Resolve a dotted path, returning a mutable reference
pub fn resolve_path_mut<'a>(value: &'a mut Value, path: &str) -> Option<&'a mut Value> {
    let path = path.strip_prefix("$.").unwrap_or(path);

    let mut current = value;
    for part in path.split('.') {
        current = match current {
            Value::Object(map) => map.get_mut(part)?,
            Value::Array(items) => items.get_mut(part.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Render a modification marker as the string stored in `_updated`.
///
/// Strings are used as-is, numbers and booleans in their JSON spelling,
/// arrays and objects as compact JSON. `null` has no rendering.
pub fn marker_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => serde_json::to_string(value).ok(),
    }
}

/// Order two modification markers.
///
/// Missing values and `null` sort first, then booleans, numbers, strings,
/// arrays and objects. Values of the same kind compare naturally; arrays and
/// objects compare equal.
pub fn compare_markers(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let (a, b) = match (a, b) {
        (Some(a), Some(b)) => (a, b),
        (a, b) => return rank(a).cmp(&rank(b)),
    };

    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => x.cmp(&y),
            _ => x
                .as_f64()
                .zip(y.as_f64())
                .and_then(|(x, y)| x.partial_cmp(&y))
                .unwrap_or(Ordering::Equal),
        },
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => rank(Some(a)).cmp(&rank(Some(b))),
    }
}

fn rank(value: Option<&Value>) -> u8 {
    match value {
        None | Some(Value::Null) => 0,
        Some(Value::Bool(_)) => 1,
        Some(Value::Number(_)) => 2,
        Some(Value::String(_)) => 3,
        Some(Value::Array(_)) => 4,
        Some(Value::Object(_)) => 5,
    }
}

/// Stable ascending sort of entities by the value at `path`
pub fn sort_by_path(entities: &mut [Value], path: &str) {
    entities.sort_by(|a, b| compare_markers(resolve_path(a, path), resolve_path(b, path)));
}
