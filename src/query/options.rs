//! Microservice options and their layered resolution
//!
//! Every option starts from a process-wide default, may be overridden by a
//! parameter embedded in the URL template's query string, and is overridden
//! again by the inbound request. Layers are merged in that fixed order by
//! [`merge_layers`].

use crate::types::{parse_flag, ForwardParams, StringMap};
use serde::Serialize;
use std::collections::HashMap;
use tracing::warn;

/// Query parameter names interpreted by the adapter instead of forwarded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionKey {
    Since,
    Limit,
    UpdatedProperty,
    OffsetBiggerAndEqual,
    DoSort,
    DataProperty,
    SinceParamAtSrc,
    LimitParamAtSrc,
    PagenumParamAtSrc,
    UseCurrentTimeAsUpdated,
}

impl OptionKey {
    /// Every option key
    pub const ALL: [OptionKey; 10] = [
        OptionKey::Since,
        OptionKey::Limit,
        OptionKey::UpdatedProperty,
        OptionKey::OffsetBiggerAndEqual,
        OptionKey::DoSort,
        OptionKey::DataProperty,
        OptionKey::SinceParamAtSrc,
        OptionKey::LimitParamAtSrc,
        OptionKey::PagenumParamAtSrc,
        OptionKey::UseCurrentTimeAsUpdated,
    ];

    /// Query parameter name
    pub fn as_str(self) -> &'static str {
        match self {
            OptionKey::Since => "since",
            OptionKey::Limit => "limit",
            OptionKey::UpdatedProperty => "ms_updated_property",
            OptionKey::OffsetBiggerAndEqual => "ms_offset_bigger_and_equal",
            OptionKey::DoSort => "ms_do_sort",
            OptionKey::DataProperty => "ms_data_property",
            OptionKey::SinceParamAtSrc => "ms_since_param_at_src",
            OptionKey::LimitParamAtSrc => "ms_limit_param_at_src",
            OptionKey::PagenumParamAtSrc => "ms_pagenum_param_at_src",
            OptionKey::UseCurrentTimeAsUpdated => "ms_use_currenttime_as_updated",
        }
    }

    /// Look up a key by its query parameter name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.as_str() == name)
    }

    /// Whether the option holds a boolean
    pub fn is_flag(self) -> bool {
        matches!(
            self,
            OptionKey::OffsetBiggerAndEqual | OptionKey::DoSort | OptionKey::UseCurrentTimeAsUpdated
        )
    }
}

/// Where a set of parameters came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerSource {
    /// Query string embedded in the URL template
    Template,
    /// Query string of the inbound request
    Request,
}

impl LayerSource {
    /// Whether `key` is interpreted as an option from this source.
    ///
    /// Templates cannot carry a cursor or a client limit: a `since` or `limit`
    /// pair in a template is an ordinary upstream parameter.
    fn interprets(self, key: OptionKey) -> bool {
        match self {
            LayerSource::Template => !matches!(key, OptionKey::Since | OptionKey::Limit),
            LayerSource::Request => true,
        }
    }
}

/// Raw option values contributed by a single source
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionLayer {
    values: HashMap<OptionKey, String>,
}

impl OptionLayer {
    /// Create an empty layer
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a raw value
    pub fn set(&mut self, key: OptionKey, value: impl Into<String>) {
        self.values.insert(key, value.into());
    }

    /// Get a raw value
    pub fn get(&self, key: OptionKey) -> Option<&str> {
        self.values.get(&key).map(String::as_str)
    }

    /// Check whether the layer is empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Separate option parameters from parameters to forward upstream
pub fn split_params(params: &StringMap, source: LayerSource) -> (OptionLayer, ForwardParams) {
    let mut layer = OptionLayer::new();
    let mut forward = ForwardParams::new();

    for (name, value) in params {
        match OptionKey::from_name(name).filter(|key| source.interprets(*key)) {
            Some(key) => layer.set(key, value.clone()),
            None => {
                forward.insert(name.clone(), value.clone());
            }
        }
    }

    (layer, forward)
}

/// Merge layers in order; a value in a later layer replaces an earlier one
pub fn merge_layers(layers: &[&OptionLayer]) -> OptionLayer {
    let mut merged = OptionLayer::new();
    for layer in layers {
        for (key, value) in &layer.values {
            if !value.is_empty() {
                merged.set(*key, value.clone());
            }
        }
    }
    merged
}

/// Process-wide option defaults, fixed at startup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionDefaults {
    /// Default dotted path of the modification marker
    pub updated_property: Option<String>,
    /// Default inclusivity of the upstream `since` for integer cursors
    pub offset_bigger_and_equal: bool,
}

/// Per-request options resolved from defaults, template and request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MicroserviceOptions {
    /// Raw cursor from the client
    pub since: Option<String>,
    /// Maximum number of entities the client wants back
    pub limit: Option<u64>,
    /// Dotted path of each entity's modification marker
    pub updated_property: Option<String>,
    /// Upstream `since` is inclusive for integer cursors
    pub offset_bigger_and_equal: bool,
    /// Sort each page ascending by `updated_property`
    pub do_sort: bool,
    /// Dotted path of the entities inside each response envelope
    pub data_property: Option<String>,
    /// Upstream parameter that receives the raw cursor
    pub since_param_at_src: Option<String>,
    /// Upstream parameter that receives the limit
    pub limit_param_at_src: Option<String>,
    /// Upstream page-number parameter
    pub pagenum_param_at_src: Option<String>,
    /// Stamp `_updated` with the time the call was issued
    pub use_current_time_as_updated: bool,
    /// Page-number pagination is active for this request
    pub paginate: bool,
}

impl MicroserviceOptions {
    /// Resolve options from defaults and an already merged layer
    pub fn resolve(defaults: &OptionDefaults, merged: &OptionLayer) -> Self {
        let text = |key: OptionKey| merged.get(key).map(str::to_string);

        Self {
            since: text(OptionKey::Since),
            limit: merged.get(OptionKey::Limit).and_then(parse_limit),
            updated_property: text(OptionKey::UpdatedProperty)
                .or_else(|| defaults.updated_property.clone()),
            offset_bigger_and_equal: flag(
                merged,
                OptionKey::OffsetBiggerAndEqual,
                defaults.offset_bigger_and_equal,
            ),
            do_sort: flag(merged, OptionKey::DoSort, false),
            data_property: text(OptionKey::DataProperty),
            since_param_at_src: text(OptionKey::SinceParamAtSrc),
            limit_param_at_src: text(OptionKey::LimitParamAtSrc),
            pagenum_param_at_src: text(OptionKey::PagenumParamAtSrc),
            use_current_time_as_updated: flag(merged, OptionKey::UseCurrentTimeAsUpdated, false),
            paginate: false,
        }
    }
}

fn flag(merged: &OptionLayer, key: OptionKey, default: bool) -> bool {
    match merged.get(key) {
        None => default,
        Some(raw) => parse_flag(raw).unwrap_or_else(|| {
            warn!("Ignoring non-boolean value '{raw}' for {}", key.as_str());
            default
        }),
    }
}

/// Parse the client limit. Zero means no limit.
fn parse_limit(raw: &str) -> Option<u64> {
    match raw.trim().parse::<u64>() {
        Ok(0) => None,
        Ok(limit) => Some(limit),
        Err(_) => {
            warn!("Ignoring non-numeric limit '{raw}'");
            None
        }
    }
}
