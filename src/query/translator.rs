//! Query translation
//!
//! Turns an inbound request (path and query parameters) into the upstream
//! URL, the resolved [`MicroserviceOptions`] and the parameters to forward.
//! Translation performs no I/O and never fails; an unclassifiable cursor is
//! logged and substituted as-is.

use super::cursor::Cursor;
use super::options::{
    merge_layers, split_params, LayerSource, MicroserviceOptions, OptionDefaults, OptionKey,
};
use crate::template::{has_placeholders, Placeholder, UrlTemplate};
use crate::types::{ForwardParams, StringMap};
use serde::Serialize;
use tracing::{debug, warn};

/// URL templates for the two fetch modes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTemplates {
    /// Used when the client sends no cursor
    pub full: UrlTemplate,
    /// Used when the client sends `since`
    pub updated: UrlTemplate,
}

impl UrlTemplates {
    /// Create templates for both modes
    pub fn new(full: UrlTemplate, updated: UrlTemplate) -> Self {
        Self { full, updated }
    }
}

/// Everything the fetch engine needs for one inbound request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranslatedQuery {
    /// Upstream URL without query string
    pub url: String,
    /// Resolved options
    pub options: MicroserviceOptions,
    /// Query parameters sent with every upstream call
    pub forward: ForwardParams,
}

/// Translate an inbound request.
///
/// `path` is the inbound path; a leading slash is ignored. `request_query`
/// holds the inbound query parameters.
pub fn translate(
    path: &str,
    request_query: &StringMap,
    templates: &UrlTemplates,
    defaults: &OptionDefaults,
) -> TranslatedQuery {
    let path = path.trim_start_matches('/');
    let (request_layer, request_forward) = split_params(request_query, LayerSource::Request);

    let template = if request_layer.get(OptionKey::Since).is_some() {
        &templates.updated
    } else {
        &templates.full
    };
    let split = template.with_path(path);
    let (template_layer, template_forward) =
        split_params(&split.query_params(), LayerSource::Template);

    let merged = merge_layers(&[&template_layer, &request_layer]);
    let mut options = MicroserviceOptions::resolve(defaults, &merged);

    let cursor = options
        .since
        .as_deref()
        .filter(|_| template.has(Placeholder::Since))
        .map(classify_cursor);
    let limit_raw = request_layer.get(OptionKey::Limit);

    // URL text gets the encoded cursor; query values are encoded later by the client.
    let mut url = split.base.clone();
    if let Some(cursor) = &cursor {
        let since = cursor.substitution(options.offset_bigger_and_equal);
        url = Placeholder::Since.substitute(&url, &since);
    }
    if let Some(limit) = limit_raw {
        let encoded: String = url::form_urlencoded::byte_serialize(limit.as_bytes()).collect();
        url = Placeholder::Limit.substitute(&url, &encoded);
    }

    let mut forward = ForwardParams::new();
    for (name, value) in template_forward {
        let mut value = value;
        if let Some(cursor) = &cursor {
            let since = cursor.value(options.offset_bigger_and_equal);
            value = Placeholder::Since.substitute(&value, &since);
        }
        if let Some(limit) = limit_raw {
            value = Placeholder::Limit.substitute(&value, limit);
        }
        if has_placeholders(&value) {
            debug!("Dropping template parameter '{name}' with unresolved placeholder");
            continue;
        }
        forward.insert(name, value);
    }
    forward.extend(request_forward);

    if let (Some(param), Some(since)) = (&options.since_param_at_src, &options.since) {
        forward.insert(param.clone(), since.clone());
    }
    if let (Some(param), Some(limit)) = (&options.limit_param_at_src, limit_raw) {
        forward.insert(param.clone(), limit.to_string());
    }

    if let Some(param) = &options.pagenum_param_at_src {
        match forward.get(param) {
            Some(page) if page.trim().parse::<i64>().is_ok() => options.paginate = true,
            Some(page) => {
                warn!("Page parameter '{param}' has non-numeric value '{page}', not paginating");
            }
            None => debug!("Page parameter '{param}' has no start value, not paginating"),
        }
    }

    debug!(
        "Translated /{path} to url={url}, forward={forward:?}, paginate={}",
        options.paginate
    );

    TranslatedQuery {
        url,
        options,
        forward,
    }
}

fn classify_cursor(raw: &str) -> Cursor {
    let cursor = Cursor::classify(raw);
    match &cursor {
        Cursor::IsoTimestamp(_) => debug!("Since is an ISO-8601 timestamp: {raw}"),
        Cursor::IntegerOffset(_) => debug!("Since is an integer offset: {raw}"),
        Cursor::Unparsed(_) => warn!(
            "Since value '{raw}' is neither an ISO-8601 timestamp nor an integer, substituting it unmodified"
        ),
    }
    cursor
}
