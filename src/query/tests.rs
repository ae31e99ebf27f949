//! Tests for the query translator

use super::*;
use crate::template::UrlTemplate;
use crate::types::StringMap;
use pretty_assertions::assert_eq;

fn templates(full: &str, updated: &str) -> UrlTemplates {
    UrlTemplates::new(
        UrlTemplate::parse("FULL_URL_PATTERN", full).unwrap(),
        UrlTemplate::parse("UPDATED_URL_PATTERN", updated).unwrap(),
    )
}

fn default_templates() -> UrlTemplates {
    templates(
        "https://api.example.com/__path__",
        "https://api.example.com/__path__/since/__since__",
    )
}

fn query(pairs: &[(&str, &str)]) -> StringMap {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

// ============================================================================
// Template Selection
// ============================================================================

#[test]
fn test_full_template_without_since() {
    let result = translate(
        "/orders",
        &StringMap::new(),
        &default_templates(),
        &OptionDefaults::default(),
    );
    assert_eq!(result.url, "https://api.example.com/orders");
    assert!(result.options.since.is_none());
    assert!(result.forward.is_empty());
}

#[test]
fn test_updated_template_with_since() {
    let result = translate(
        "orders",
        &query(&[("since", "10")]),
        &default_templates(),
        &OptionDefaults::default(),
    );
    assert_eq!(result.url, "https://api.example.com/orders/since/10");
    assert_eq!(result.options.since.as_deref(), Some("10"));
}

#[test]
fn test_nested_path() {
    let result = translate(
        "/v2/customers/active",
        &StringMap::new(),
        &default_templates(),
        &OptionDefaults::default(),
    );
    assert_eq!(result.url, "https://api.example.com/v2/customers/active");
}

// ============================================================================
// Cursor Substitution
// ============================================================================

#[test]
fn test_integer_cursor_bumped_when_inclusive() {
    let defaults = OptionDefaults {
        updated_property: None,
        offset_bigger_and_equal: true,
    };
    let result = translate("e", &query(&[("since", "41")]), &default_templates(), &defaults);
    assert_eq!(result.url, "https://api.example.com/e/since/42");
}

#[test]
fn test_integer_cursor_unchanged_when_exclusive() {
    let result = translate(
        "e",
        &query(&[("since", "41"), ("ms_offset_bigger_and_equal", "false")]),
        &default_templates(),
        &OptionDefaults {
            updated_property: None,
            offset_bigger_and_equal: true,
        },
    );
    assert_eq!(result.url, "https://api.example.com/e/since/41");
}

#[test]
fn test_integer_cursor_text_preserved_when_exclusive() {
    let result = translate(
        "orders",
        &query(&[("since", "007")]),
        &default_templates(),
        &OptionDefaults::default(),
    );
    assert_eq!(result.url, "https://api.example.com/orders/since/007");
}

#[test]
fn test_large_integer_cursor_bumped_when_inclusive() {
    let result = translate(
        "orders",
        &query(&[
            ("since", "18446744073709551616"),
            ("ms_offset_bigger_and_equal", "true"),
        ]),
        &default_templates(),
        &OptionDefaults::default(),
    );
    assert_eq!(
        result.url,
        "https://api.example.com/orders/since/18446744073709551617"
    );
}

#[test]
fn test_iso_cursor_percent_encoded() {
    let result = translate(
        "e",
        &query(&[("since", "2024-03-01T10:15:00+02:00")]),
        &default_templates(),
        &OptionDefaults::default(),
    );
    assert_eq!(
        result.url,
        "https://api.example.com/e/since/2024-03-01T10%3A15%3A00%2B02%3A00"
    );
}

#[test]
fn test_iso_cursor_not_bumped() {
    let result = translate(
        "e",
        &query(&[("since", "2024-03-01T10:15:00Z"), ("ms_offset_bigger_and_equal", "true")]),
        &default_templates(),
        &OptionDefaults::default(),
    );
    assert_eq!(result.url, "https://api.example.com/e/since/2024-03-01T10%3A15%3A00Z");
}

#[test]
fn test_unparsed_cursor_substituted_raw() {
    let result = translate(
        "e",
        &query(&[("since", "not-a-date-or-int")]),
        &default_templates(),
        &OptionDefaults {
            updated_property: None,
            offset_bigger_and_equal: true,
        },
    );
    assert_eq!(result.url, "https://api.example.com/e/since/not-a-date-or-int");
}

#[test]
fn test_cursor_in_template_query_is_not_double_encoded() {
    let templates = templates(
        "https://api.example.com/__path__",
        "https://api.example.com/__path__?modifiedSince=__since__",
    );
    let result = translate(
        "e",
        &query(&[("since", "2024-03-01T10:15:00Z")]),
        &templates,
        &OptionDefaults::default(),
    );
    assert_eq!(result.url, "https://api.example.com/e");
    assert_eq!(
        result.forward.get("modifiedSince"),
        Some(&"2024-03-01T10:15:00Z".to_string())
    );
}

#[test]
fn test_since_without_placeholder_only_passthrough() {
    let templates = templates(
        "https://api.example.com/__path__",
        "https://api.example.com/__path__",
    );
    let result = translate(
        "e",
        &query(&[("since", "7"), ("ms_since_param_at_src", "after")]),
        &templates,
        &OptionDefaults {
            updated_property: None,
            offset_bigger_and_equal: true,
        },
    );
    assert_eq!(result.url, "https://api.example.com/e");
    assert_eq!(result.forward.get("after"), Some(&"7".to_string()));
}

// ============================================================================
// Passthrough Parameters
// ============================================================================

#[test]
fn test_since_passthrough_uses_raw_cursor() {
    let result = translate(
        "e",
        &query(&[("since", "41"), ("ms_since_param_at_src", "from")]),
        &default_templates(),
        &OptionDefaults {
            updated_property: None,
            offset_bigger_and_equal: true,
        },
    );
    assert_eq!(result.url, "https://api.example.com/e/since/42");
    assert_eq!(result.forward.get("from"), Some(&"41".to_string()));
}

#[test]
fn test_limit_passthrough() {
    let result = translate(
        "e",
        &query(&[("limit", "50"), ("ms_limit_param_at_src", "top")]),
        &default_templates(),
        &OptionDefaults::default(),
    );
    assert_eq!(result.forward.get("top"), Some(&"50".to_string()));
    assert_eq!(result.options.limit, Some(50));
    assert!(!result.forward.contains_key("limit"));
}

#[test]
fn test_limit_placeholder_substitution() {
    let templates = templates(
        "https://api.example.com/__path__?top=__limit__&format=json",
        "https://api.example.com/__path__",
    );

    let result = translate("e", &query(&[("limit", "5")]), &templates, &OptionDefaults::default());
    assert_eq!(result.forward.get("top"), Some(&"5".to_string()));
    assert_eq!(result.forward.get("format"), Some(&"json".to_string()));

    let result = translate("e", &StringMap::new(), &templates, &OptionDefaults::default());
    assert!(!result.forward.contains_key("top"));
    assert_eq!(result.forward.get("format"), Some(&"json".to_string()));
}

#[test]
fn test_unknown_params_forwarded() {
    let result = translate(
        "e",
        &query(&[("filter", "active"), ("ms_do_sort", "true")]),
        &default_templates(),
        &OptionDefaults::default(),
    );
    assert_eq!(result.forward.get("filter"), Some(&"active".to_string()));
    assert!(!result.forward.contains_key("ms_do_sort"));
    assert!(result.options.do_sort);
}

#[test]
fn test_request_param_wins_over_template_param() {
    let templates = templates(
        "https://api.example.com/__path__?format=xml&pageSize=100",
        "https://api.example.com/__path__",
    );
    let result = translate(
        "e",
        &query(&[("format", "json")]),
        &templates,
        &OptionDefaults::default(),
    );
    assert_eq!(result.forward.get("format"), Some(&"json".to_string()));
    assert_eq!(result.forward.get("pageSize"), Some(&"100".to_string()));
}

// ============================================================================
// Option Precedence
// ============================================================================

#[test]
fn test_option_precedence_default_template_request() {
    let defaults = OptionDefaults {
        updated_property: Some("default.ts".to_string()),
        offset_bigger_and_equal: false,
    };
    let templates = templates(
        "https://api.example.com/__path__?ms_updated_property=template.ts&ms_data_property=data",
        "https://api.example.com/__path__",
    );

    let result = translate("e", &StringMap::new(), &templates, &defaults);
    assert_eq!(result.options.updated_property.as_deref(), Some("template.ts"));
    assert_eq!(result.options.data_property.as_deref(), Some("data"));

    let result = translate(
        "e",
        &query(&[("ms_updated_property", "request.ts")]),
        &templates,
        &defaults,
    );
    assert_eq!(result.options.updated_property.as_deref(), Some("request.ts"));
    assert_eq!(result.options.data_property.as_deref(), Some("data"));
    assert!(!result.forward.contains_key("ms_data_property"));
}

#[test]
fn test_template_flag_coerced() {
    let templates = templates(
        "https://api.example.com/__path__?ms_do_sort=true&ms_use_currenttime_as_updated=False",
        "https://api.example.com/__path__",
    );
    let result = translate("e", &StringMap::new(), &templates, &OptionDefaults::default());
    assert!(result.options.do_sort);
    assert!(!result.options.use_current_time_as_updated);
}

// ============================================================================
// Pagination Activation
// ============================================================================

#[test]
fn test_pagination_active_with_start_page() {
    let result = translate(
        "e",
        &query(&[("ms_pagenum_param_at_src", "page"), ("page", "1")]),
        &default_templates(),
        &OptionDefaults::default(),
    );
    assert!(result.options.paginate);
    assert_eq!(result.forward.get("page"), Some(&"1".to_string()));
}

#[test]
fn test_pagination_start_page_from_template() {
    let templates = templates(
        "https://api.example.com/__path__?ms_pagenum_param_at_src=p&p=0",
        "https://api.example.com/__path__",
    );
    let result = translate("e", &StringMap::new(), &templates, &OptionDefaults::default());
    assert!(result.options.paginate);
    assert_eq!(result.forward.get("p"), Some(&"0".to_string()));
}

#[test]
fn test_pagination_inactive_without_start_page() {
    let result = translate(
        "e",
        &query(&[("ms_pagenum_param_at_src", "page")]),
        &default_templates(),
        &OptionDefaults::default(),
    );
    assert!(!result.options.paginate);
}

#[test]
fn test_pagination_inactive_with_non_numeric_page() {
    let result = translate(
        "e",
        &query(&[("ms_pagenum_param_at_src", "page"), ("page", "first")]),
        &default_templates(),
        &OptionDefaults::default(),
    );
    assert!(!result.options.paginate);
    assert_eq!(result.forward.get("page"), Some(&"first".to_string()));
}

// ============================================================================
// Properties
// ============================================================================

#[test]
fn test_translation_is_idempotent() {
    let templates = templates(
        "https://api.example.com/__path__?ms_do_sort=true&format=json",
        "https://api.example.com/__path__/__since__?top=__limit__",
    );
    let request = query(&[
        ("since", "2024-01-01T00:00:00Z"),
        ("limit", "10"),
        ("ms_pagenum_param_at_src", "page"),
        ("page", "3"),
        ("x", "y"),
    ]);
    let defaults = OptionDefaults {
        updated_property: Some("updated".to_string()),
        offset_bigger_and_equal: true,
    };

    let first = translate("items", &request, &templates, &defaults);
    let second = translate("items", &request, &templates, &defaults);
    assert_eq!(first, second);
}

#[test]
fn test_integer_cursor_property() {
    let defaults_inclusive = OptionDefaults {
        updated_property: None,
        offset_bigger_and_equal: true,
    };
    let defaults_exclusive = OptionDefaults::default();

    for since in [0_i64, 1, 99, 123_456_789, -3] {
        let request = query(&[("since", &since.to_string())]);
        let bumped = translate("e", &request, &default_templates(), &defaults_inclusive);
        let kept = translate("e", &request, &default_templates(), &defaults_exclusive);
        assert_eq!(
            bumped.url,
            format!("https://api.example.com/e/since/{}", since + 1)
        );
        assert_eq!(kept.url, format!("https://api.example.com/e/since/{since}"));
    }
}
