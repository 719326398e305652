//! Property-based tests using proptest
//!
//! These tests verify the output renderers and property parsing against
//! randomized JSON payloads and arguments.

use mmaictl::output::{extract_path, filter_fields, flatten, render};
use mmaictl::resource::parse_properties;
use mmaictl::OutputMode;
use proptest::prelude::*;
use serde_json::{json, Map, Value};

/// Generate arbitrary scalar JSON values (no floats, so equality is exact)
fn arb_leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        "[a-zA-Z0-9 _.-]{0,12}".prop_map(Value::String),
    ]
}

/// Generate nested JSON documents
fn arb_json() -> impl Strategy<Value = Value> {
    arb_leaf().prop_recursive(4, 64, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::vec(("[a-z]{1,6}", inner), 0..6)
                .prop_map(|pairs| Value::Object(pairs.into_iter().collect::<Map<_, _>>())),
        ]
    })
}

/// Generate a platform-style list of named objects
fn arb_named_list() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z][a-z0-9-]{0,20}", 0..50)
}

fn count_leaves(value: &Value) -> usize {
    match value {
        Value::Object(map) => map.values().map(count_leaves).sum(),
        Value::Array(items) => items.iter().map(count_leaves).sum(),
        _ => 1,
    }
}

proptest! {
    /// Dot output has exactly one line per leaf
    #[test]
    fn dot_has_one_line_per_leaf(value in arb_json()) {
        let lines = render(&value, OutputMode::Dot);
        let expected = if value.is_null() { 0 } else { count_leaves(&value) };
        prop_assert_eq!(lines.len(), expected);
        prop_assert_eq!(flatten(&value).len(), count_leaves(&value));
    }

    /// JSON output parses back to the same value
    #[test]
    fn json_output_round_trips(value in arb_json()) {
        prop_assume!(!value.is_null());
        let text = render(&value, OutputMode::Json).join("\n");
        let reparsed: Value = serde_json::from_str(&text).unwrap();
        prop_assert_eq!(reparsed, value);
    }

    /// Names output keeps the order of the list
    #[test]
    fn names_keep_input_order(names in arb_named_list()) {
        let value = Value::Array(names.iter().map(|n| json!({"name": n, "uid": "x"})).collect());
        prop_assert_eq!(render(&value, OutputMode::Names), names);
    }

    /// Dot paths always point back at the leaf they came from
    #[test]
    fn dot_paths_resolve(value in arb_json()) {
        for (path, leaf) in flatten(&value) {
            // Only object-rooted paths without array indices map onto extract_path
            if path.is_empty() || path.contains('[') {
                continue;
            }
            let found = extract_path(&value, &path);
            prop_assert!(found.is_some(), "{} did not resolve", path);
            let text = match found.unwrap() {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            prop_assert_eq!(text, leaf);
        }
    }

    /// Filtering keeps exactly the requested fields, in request order
    #[test]
    fn filter_keeps_requested_fields(
        value in arb_json(),
        fields in prop::collection::vec("[a-z]{1,6}", 1..4)
    ) {
        prop_assume!(value.is_object());
        let mut wanted: Vec<&str> = Vec::new();
        for f in &fields {
            if !wanted.contains(&f.as_str()) {
                wanted.push(f.as_str());
            }
        }
        let filtered = filter_fields(&value, &wanted);
        let keys: Vec<&str> = filtered.as_object().unwrap().keys().map(String::as_str).collect();
        prop_assert_eq!(keys, wanted);
    }
}

/// Tests for positional key=value parsing
mod property_parsing_tests {
    use super::*;

    proptest! {
        /// Well-formed pairs parse back to their keys and values
        #[test]
        fn key_value_round_trips(
            pairs in prop::collection::vec(("[a-zA-Z_][a-zA-Z0-9_.]{0,10}", "[^\n]{0,20}"), 0..10)
        ) {
            let args: Vec<String> = pairs.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
            let props = parse_properties(&args).unwrap();

            // Later duplicates win
            let mut expected = Map::new();
            for (k, v) in &pairs {
                expected.insert(k.clone(), Value::String(v.clone()));
            }
            prop_assert_eq!(props, expected);
        }

        /// Only the first '=' splits; the rest belongs to the value
        #[test]
        fn value_may_contain_equals(key in "[a-z]{1,8}", value in "[a-z=]{0,12}") {
            let props = parse_properties(&[format!("{}={}", key, value)]).unwrap();
            prop_assert_eq!(props.get(&key), Some(&Value::String(value)));
        }

        /// Arguments without '=' are rejected
        #[test]
        fn missing_equals_rejected(arg in "[a-zA-Z0-9_]{0,16}") {
            let err = parse_properties(&[arg]).unwrap_err();
            prop_assert_eq!(err.exit_code(), 2);
        }
    }
}
