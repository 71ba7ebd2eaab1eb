// Insertion helpers for the final (JSON) document
use crate::metadata::raw::VALUE_KEY;
use serde_json::{Map, Value as JsonValue};

/// Collapse the values gathered for one key: a single value stays a scalar,
/// several become a list in arrival order.
pub fn collapse_values(mut values: Vec<String>) -> JsonValue {
    if values.len() == 1 {
        JsonValue::String(values.remove(0))
    } else {
        JsonValue::Array(values.into_iter().map(JsonValue::String).collect())
    }
}

/// Insert a scalar under `key` below the nested `path` of `map`.
///
/// Mirrors the raw tree collision rules: intermediate scalars move into
/// `__value__`, a scalar landing on a mapping goes to its `__value__`, and a
/// scalar landing on a scalar promotes both to a list.
pub fn insert_at(map: &mut Map<String, JsonValue>, path: &[&str], key: &str, value: JsonValue) {
    let mut current = map;
    for segment in path {
        current = descend(current, segment);
    }
    insert_scalar(current, key, value);
}

/// Merge a whole subtree under `key`. Two mappings merge key by key; any
/// other collision falls back to [`insert_at`] value by value.
pub fn merge_into(map: &mut Map<String, JsonValue>, key: &str, value: JsonValue) {
    if !map.contains_key(key) {
        map.insert(key.to_string(), value);
        return;
    }

    match value {
        JsonValue::Object(incoming) => {
            if let Some(JsonValue::Object(existing)) = map.get_mut(key) {
                for (inner_key, inner_value) in incoming {
                    merge_into(existing, &inner_key, inner_value);
                }
            } else {
                insert_at(map, &[], key, JsonValue::Object(incoming));
            }
        }
        JsonValue::Array(items) => {
            for item in items {
                insert_at(map, &[], key, item);
            }
        }
        other => insert_at(map, &[], key, other),
    }
}

fn descend<'a>(map: &'a mut Map<String, JsonValue>, segment: &str) -> &'a mut Map<String, JsonValue> {
    let node = map
        .entry(segment.to_string())
        .or_insert_with(|| JsonValue::Object(Map::new()));

    if !node.is_object() {
        let previous = node.take();
        let mut promoted = Map::new();
        promoted.insert(VALUE_KEY.to_string(), previous);
        *node = JsonValue::Object(promoted);
    }

    match node {
        JsonValue::Object(inner) => inner,
        _ => unreachable!("non-object was promoted above"),
    }
}

fn insert_scalar(map: &mut Map<String, JsonValue>, key: &str, value: JsonValue) {
    match map.get_mut(key) {
        None => {
            map.insert(key.to_string(), value);
        }
        Some(JsonValue::Object(inner)) => insert_scalar(inner, VALUE_KEY, value),
        Some(JsonValue::Array(items)) => items.push(value),
        Some(existing) => {
            let previous = existing.take();
            *existing = JsonValue::Array(vec![previous, value]);
        }
    }
}
