//! Engine types
//!
//! Entity stamping for the fetch engine.

use crate::decode::{marker_string, resolve_path};
use crate::query::MicroserviceOptions;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;
use tracing::debug;

/// Name of the synthesized modification marker
pub const UPDATED_FIELD: &str = "_updated";

/// How `_updated` is filled for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdatedStamp {
    /// Time the request started, identical for every entity
    CallTime(String),
    /// Stringified value at this dotted path of each entity
    Property(String),
    /// Entities pass through unstamped
    None,
}

impl UpdatedStamp {
    /// Pick the stamp for a request. The call time wins over the property.
    pub fn from_options(options: &MicroserviceOptions, started: DateTime<Utc>) -> Self {
        if options.use_current_time_as_updated {
            Self::CallTime(started.to_rfc3339_opts(SecondsFormat::Micros, true))
        } else if let Some(path) = &options.updated_property {
            Self::Property(path.clone())
        } else {
            Self::None
        }
    }

    /// Stamp an entity in place. Non-object entities are left alone.
    pub fn apply(&self, entity: &mut Value) {
        let stamp = match self {
            Self::CallTime(time) => Some(time.clone()),
            Self::Property(path) => {
                let stamp = resolve_path(entity, path).and_then(marker_string);
                if stamp.is_none() {
                    debug!("No value at '{path}', leaving entity without {UPDATED_FIELD}");
                }
                stamp
            }
            Self::None => return,
        };

        if let (Some(stamp), Value::Object(map)) = (stamp, entity) {
            map.insert(UPDATED_FIELD.to_string(), Value::String(stamp));
        }
    }
}
