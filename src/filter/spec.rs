use crate::error::MangoError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

/// Which parts of a document to keep.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(try_from = "JsonValue", into = "JsonValue")]
pub enum FilterSpec {
    // Keep everything
    #[default]
    Unspecified,
    // Keep these top-level keys with their whole subtrees
    Names(Vec<String>),
    // Keep these keys, filtering each subtree with its own spec;
    // an empty nested spec keeps the subtree whole
    Nested(IndexMap<String, FilterSpec>),
}

impl FilterSpec {
    pub fn names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FilterSpec::Names(names.into_iter().map(Into::into).collect())
    }

    /// True when applying this spec keeps the whole subtree.
    pub fn keeps_all(&self) -> bool {
        match self {
            FilterSpec::Unspecified => true,
            FilterSpec::Nested(map) => map.is_empty(),
            FilterSpec::Names(_) => false,
        }
    }
}

impl TryFrom<JsonValue> for FilterSpec {
    type Error = MangoError;

    fn try_from(value: JsonValue) -> Result<Self, Self::Error> {
        match value {
            JsonValue::Null => Ok(FilterSpec::Unspecified),
            JsonValue::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    JsonValue::String(name) => Ok(name),
                    other => Err(MangoError::invalid(format!(
                        "filter names must be strings, got {}",
                        other
                    ))),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(FilterSpec::Names),
            JsonValue::Object(map) => map
                .into_iter()
                .map(|(key, sub)| FilterSpec::try_from(sub).map(|spec| (key, spec)))
                .collect::<Result<IndexMap<_, _>, _>>()
                .map(FilterSpec::Nested),
            other => Err(MangoError::invalid(format!(
                "unsupported filter specification: {} (expected null, a list of names or a mapping)",
                other
            ))),
        }
    }
}

impl From<FilterSpec> for JsonValue {
    fn from(spec: FilterSpec) -> Self {
        match spec {
            FilterSpec::Unspecified => JsonValue::Null,
            FilterSpec::Names(names) => {
                JsonValue::Array(names.into_iter().map(JsonValue::String).collect())
            }
            FilterSpec::Nested(map) => JsonValue::Object(
                map.into_iter()
                    .map(|(key, sub)| (key, JsonValue::from(sub)))
                    .collect::<Map<_, _>>(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_shapes() {
        assert_eq!(
            FilterSpec::try_from(JsonValue::Null).unwrap(),
            FilterSpec::Unspecified
        );
        assert_eq!(
            FilterSpec::try_from(json!(["schema", "mg"])).unwrap(),
            FilterSpec::names(["schema", "mg"])
        );

        let nested = FilterSpec::try_from(json!({"schema": {"book": {"author": {}}}})).unwrap();
        let FilterSpec::Nested(root) = nested else {
            panic!("Expected nested spec");
        };
        let Some(FilterSpec::Nested(schema)) = root.get("schema") else {
            panic!("Expected nested schema spec");
        };
        let Some(FilterSpec::Nested(book)) = schema.get("book") else {
            panic!("Expected nested book spec");
        };
        assert!(book.get("author").unwrap().keeps_all());
    }

    #[test]
    fn test_unsupported_shapes_fail() {
        for value in [json!("schema"), json!(3), json!(true), json!(["a", 1])] {
            let err = FilterSpec::try_from(value).unwrap_err();
            assert!(matches!(err, MangoError::InvalidArgument(_)));
        }
        assert!(FilterSpec::try_from(json!({"schema": 1})).is_err());
    }

    #[test]
    fn test_serde_uses_plain_shapes() {
        let spec: FilterSpec = serde_json::from_str(r#"{"schema": ["book"]}"#).unwrap();
        assert_eq!(
            serde_json::to_value(&spec).unwrap(),
            json!({"schema": ["book"]})
        );
        assert!(serde_json::from_str::<FilterSpec>("42").is_err());
    }
}
