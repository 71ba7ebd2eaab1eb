use crate::error::Result;
use crate::filter::spec::FilterSpec;
use serde_json::{Map, Value as JsonValue};

/// Return a pruned copy of `document` holding only what `spec` selects.
///
/// Names missing from the document are skipped. A restricting spec applied
/// to a list of records filters every record; scalars are kept as they are.
pub fn filter_metadata_dict(document: &JsonValue, spec: &FilterSpec) -> JsonValue {
    if spec.keeps_all() {
        return document.clone();
    }

    match document {
        JsonValue::Object(map) => JsonValue::Object(filter_object(map, spec)),
        JsonValue::Array(items) => JsonValue::Array(
            items
                .iter()
                .map(|item| filter_metadata_dict(item, spec))
                .collect(),
        ),
        scalar => scalar.clone(),
    }
}

/// Same as [`filter_metadata_dict`], taking the spec in its dynamic form
/// (`null`, a list of names, or a nested mapping).
pub fn filter_with_value(document: &JsonValue, spec: JsonValue) -> Result<JsonValue> {
    let spec = FilterSpec::try_from(spec)?;
    Ok(filter_metadata_dict(document, &spec))
}

fn filter_object(map: &Map<String, JsonValue>, spec: &FilterSpec) -> Map<String, JsonValue> {
    let mut filtered = Map::new();
    match spec {
        FilterSpec::Unspecified => return map.clone(),
        FilterSpec::Names(names) => {
            for name in names {
                match map.get(name) {
                    Some(value) => {
                        filtered.insert(name.clone(), value.clone());
                    }
                    None => log::debug!("Filter name '{}' not in document, skipping", name),
                }
            }
        }
        FilterSpec::Nested(nested) => {
            for (key, sub) in nested {
                match map.get(key) {
                    Some(value) => {
                        filtered.insert(key.clone(), filter_metadata_dict(value, sub));
                    }
                    None => log::debug!("Filter key '{}' not in document, skipping", key),
                }
            }
        }
    }
    filtered
}
