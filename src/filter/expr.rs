// Filter expressions as typed on the command line
use crate::error::{MangoError, Result};
use crate::filter::spec::FilterSpec;
use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value as JsonValue;

lazy_static! {
    /// One dotted path: non-empty segments without separators or whitespace.
    /// Examples: "schema", "schema.book.author"
    static ref PATH_PATTERN: Regex = Regex::new(r"^[^.,\s]+(\.[^.,\s]+)*$").unwrap();
}

/// Parse a filter expression.
///
/// Accepts JSON (`["schema", "mg"]`, `{"schema": {"book": {}}}`, `null`) or
/// a comma-separated list of dotted paths (`schema.book.author,mg`). Plain
/// names give a name list; any dotted path gives a nested spec.
pub fn parse_filter_expression(expr: &str) -> Result<FilterSpec> {
    let trimmed = expr.trim();
    if trimmed.is_empty() {
        return Err(MangoError::invalid("filter expression cannot be empty"));
    }

    if trimmed.starts_with('[') || trimmed.starts_with('{') || trimmed == "null" {
        let value: JsonValue = serde_json::from_str(trimmed)
            .map_err(|e| MangoError::invalid(format!("malformed JSON filter: {}", e)))?;
        return FilterSpec::try_from(value);
    }

    let mut paths = Vec::new();
    for part in trimmed.split(',') {
        let part = part.trim();
        if !PATH_PATTERN.is_match(part) {
            return Err(MangoError::invalid(format!(
                "invalid filter path '{}' in '{}'",
                part, trimmed
            )));
        }
        paths.push(part);
    }

    if paths.iter().all(|path| !path.contains('.')) {
        return Ok(FilterSpec::names(paths));
    }

    let mut root = IndexMap::new();
    for path in paths {
        let segments: Vec<&str> = path.split('.').collect();
        insert_path(&mut root, &segments);
    }
    Ok(FilterSpec::Nested(root))
}

// A shorter path keeps the whole subtree and wins over deeper ones
fn insert_path(map: &mut IndexMap<String, FilterSpec>, segments: &[&str]) {
    let Some((first, rest)) = segments.split_first() else {
        return;
    };

    if rest.is_empty() {
        map.insert(first.to_string(), FilterSpec::Nested(IndexMap::new()));
        return;
    }

    match map.get_mut(*first) {
        // Already selected whole
        Some(FilterSpec::Nested(inner)) if inner.is_empty() => {}
        Some(FilterSpec::Nested(inner)) => insert_path(inner, rest),
        _ => {
            let mut inner = IndexMap::new();
            insert_path(&mut inner, rest);
            map.insert(first.to_string(), FilterSpec::Nested(inner));
        }
    }
}
