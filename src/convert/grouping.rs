use crate::convert::document::{collapse_values, insert_at, merge_into};
use crate::metadata::raw::{Leaf, RawBranch, RawNode, VALUE_KEY};
use indexmap::IndexMap;
use serde_json::{Map, Value as JsonValue};
use std::cmp::Ordering;

/// Units containing this separator name a namespace rather than an instance.
pub const NAMESPACE_UNIT_SEPARATOR: char = '/';

// A direct child of the branch being grouped
enum Child {
    Leaves(Vec<Leaf>),
    Resolved(JsonValue),
}

// Result of grouping one level. When the level splits into records,
// `hoisted` holds its unit-less entries, which belong to the enclosing level.
struct Grouped {
    value: JsonValue,
    hoisted: Map<String, JsonValue>,
}

/// Turn the raw root into the final document mapping.
///
/// Children are resolved first. Leaves tagged with a namespace unit
/// (`analysis/reading`) are moved to that namespace. Below the root, a level
/// whose remaining leaves carry two or more distinct units becomes a list of
/// records, one per unit, and its unit-less entries are merged into the
/// enclosing mapping. Any other level stays a mapping with every unit
/// dropped. The root itself is always a mapping.
pub fn group_branch(branch: RawBranch) -> JsonValue {
    let grouped = group_level(branch, false);
    debug_assert!(grouped.hoisted.is_empty());
    grouped.value
}

fn group_level(branch: RawBranch, allow_split: bool) -> Grouped {
    let RawBranch { children, value } = branch;

    let mut entries: Vec<(String, Child)> = Vec::with_capacity(children.len() + 1);
    // Unit-less entries handed up by children that split into records
    let mut from_children: Vec<Map<String, JsonValue>> = Vec::new();
    // (namespace unit, key) -> values, in arrival order
    let mut relocated: IndexMap<(String, String), Vec<String>> = IndexMap::new();

    let mut take_leaves = |key: String, leaves: Vec<Leaf>, entries: &mut Vec<(String, Child)>| {
        let mut kept = Vec::with_capacity(leaves.len());
        for leaf in leaves {
            match leaf {
                Leaf::Tagged { value, unit } if unit.contains(NAMESPACE_UNIT_SEPARATOR) => {
                    relocated.entry((unit, key.clone())).or_default().push(value);
                }
                other => kept.push(other),
            }
        }
        if !kept.is_empty() {
            entries.push((key, Child::Leaves(kept)));
        }
    };

    for (key, node) in children {
        match node {
            RawNode::Branch(child) => {
                let grouped = group_level(child, true);
                entries.push((key, Child::Resolved(grouped.value)));
                if !grouped.hoisted.is_empty() {
                    from_children.push(grouped.hoisted);
                }
            }
            RawNode::Leaf(slot) => take_leaves(key, slot.into_leaves(), &mut entries),
        }
    }
    if let Some(slot) = value {
        take_leaves(VALUE_KEY.to_string(), slot.into_leaves(), &mut entries);
    }

    let units = distinct_units(&entries);

    if units.len() <= 1 || !allow_split {
        let mut map = Map::new();
        for (key, child) in entries {
            let value = match child {
                Child::Leaves(leaves) => {
                    collapse_values(leaves.into_iter().map(Leaf::into_value).collect())
                }
                Child::Resolved(value) => value,
            };
            map.insert(key, value);
        }
        merge_hoisted(&mut map, from_children);
        apply_relocations(&mut map, relocated);
        return Grouped {
            value: JsonValue::Object(map),
            hoisted: Map::new(),
        };
    }

    log::debug!(
        "Splitting {} keys into {} records by unit: {:?}",
        entries.len(),
        units.len(),
        units
    );

    let mut records: Vec<Map<String, JsonValue>> = vec![Map::new(); units.len()];
    let mut shared = Map::new();

    for (key, child) in entries {
        match child {
            Child::Resolved(value) => merge_into(&mut shared, &key, value),
            Child::Leaves(leaves) => {
                let mut per_unit: Vec<Vec<String>> = vec![Vec::new(); units.len()];
                let mut unitless = Vec::new();
                for leaf in leaves {
                    match leaf {
                        Leaf::Tagged { value, unit } => {
                            if let Some(idx) = units.iter().position(|u| *u == unit) {
                                per_unit[idx].push(value);
                            }
                        }
                        Leaf::Plain(value) => unitless.push(value),
                    }
                }
                for (record, values) in records.iter_mut().zip(per_unit) {
                    if !values.is_empty() {
                        record.insert(key.clone(), collapse_values(values));
                    }
                }
                if !unitless.is_empty() {
                    merge_into(&mut shared, &key, collapse_values(unitless));
                }
            }
        }
    }

    merge_hoisted(&mut shared, from_children);
    apply_relocations(&mut shared, relocated);

    Grouped {
        value: JsonValue::Array(records.into_iter().map(JsonValue::Object).collect()),
        hoisted: shared,
    }
}

fn merge_hoisted(map: &mut Map<String, JsonValue>, hoisted: Vec<Map<String, JsonValue>>) {
    for entries in hoisted {
        for (key, value) in entries {
            log::debug!("Keeping unit-less '{}' beside its records", key);
            merge_into(map, &key, value);
        }
    }
}

// Distinct units among direct leaf children, sorted so the record order does
// not depend on the order the triples arrived in.
fn distinct_units(entries: &[(String, Child)]) -> Vec<String> {
    let mut units: Vec<String> = Vec::new();
    for (_, child) in entries {
        if let Child::Leaves(leaves) = child {
            for unit in leaves.iter().filter_map(Leaf::unit) {
                if !units.iter().any(|u| u == unit) {
                    units.push(unit.to_string());
                }
            }
        }
    }
    units.sort_by(|a, b| compare_units(a, b));
    units
}

/// Order units numerically when both are integers, otherwise lexically;
/// numeric units sort first.
pub fn compare_units(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

fn apply_relocations(
    map: &mut Map<String, JsonValue>,
    relocated: IndexMap<(String, String), Vec<String>>,
) {
    for ((unit, key), values) in relocated {
        let path: Vec<&str> = unit
            .split(NAMESPACE_UNIT_SEPARATOR)
            .filter(|segment| !segment.is_empty())
            .collect();
        log::debug!("Moving '{}' into namespace '{}'", key, path.join("."));
        for value in values {
            insert_at(map, &path, &key, JsonValue::String(value));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::unflatten::unflatten_into;
    use serde_json::json;

    fn tree(items: &[(&str, &str, Option<&str>)]) -> RawBranch {
        let mut tree = RawBranch::new();
        for (path, value, unit) in items {
            unflatten_into(&mut tree, path, value, true, *unit);
        }
        tree
    }

    #[test]
    fn test_single_unit_is_dropped() {
        let raw = tree(&[
            ("name", "Fulano De Tal", Some("1")),
            ("age", "50", Some("1")),
            ("title", "A title", None),
        ]);
        assert_eq!(
            group_branch(raw),
            json!({"name": "Fulano De Tal", "age": "50", "title": "A title"})
        );
    }

    #[test]
    fn test_single_unit_mixed_with_plain_merges() {
        let raw = tree(&[
            ("third_name", "third_value", Some("units")),
            ("third_name", "fourth_value", None),
        ]);
        assert_eq!(
            group_branch(raw),
            json!({"third_name": ["third_value", "fourth_value"]})
        );
    }

    #[test]
    fn test_two_units_split_into_records() {
        let raw = tree(&[
            ("author.pet", "dog", Some("2")),
            ("author.name", "Jane Doe", Some("2")),
            ("author.name", "Fulano De Tal", Some("1")),
            ("author.pet", "cat", Some("2")),
        ]);
        assert_eq!(
            group_branch(raw),
            json!({"author": [
                {"name": "Fulano De Tal"},
                {"pet": ["dog", "cat"], "name": "Jane Doe"},
            ]})
        );
    }

    #[test]
    fn test_unitless_siblings_of_records_move_to_enclosing_level() {
        let raw = tree(&[
            ("author.name", "A", Some("1")),
            ("author.name", "B", Some("2")),
            ("author.note", "shared", None),
            ("author.extra.depth", "x", None),
            ("title", "T", None),
        ]);
        assert_eq!(
            group_branch(raw),
            json!({
                "author": [{"name": "A"}, {"name": "B"}],
                "note": "shared",
                "extra": {"depth": "x"},
                "title": "T",
            })
        );
    }

    #[test]
    fn test_hoisted_entries_collide_like_scalars() {
        let raw = tree(&[
            ("book.author.name", "A", Some("1")),
            ("book.author.name", "B", Some("2")),
            ("book.author.title", "from author", None),
            ("book.title", "T", None),
        ]);
        assert_eq!(
            group_branch(raw),
            json!({"book": {
                "author": [{"name": "A"}, {"name": "B"}],
                "title": ["T", "from author"],
            }})
        );
    }

    #[test]
    fn test_nested_splits_hoist_through_split_parent() {
        // The inner level splits and hands `note` to `outer`, which also splits
        let raw = tree(&[
            ("outer.inner.v", "a", Some("1")),
            ("outer.inner.v", "b", Some("2")),
            ("outer.inner.note", "n", None),
            ("outer.k", "x", Some("3")),
            ("outer.k", "y", Some("4")),
        ]);
        assert_eq!(
            group_branch(raw),
            json!({
                "outer": [{"k": "x"}, {"k": "y"}],
                "inner": [{"v": "a"}, {"v": "b"}],
                "note": "n",
            })
        );
    }

    #[test]
    fn test_root_never_splits() {
        let raw = tree(&[
            ("x", "a", Some("1")),
            ("x", "b", Some("2")),
            ("mgs.book.title", "T", None),
        ]);
        assert_eq!(
            group_branch(raw),
            json!({"x": ["a", "b"], "mgs": {"book": {"title": "T"}}})
        );
    }

    #[test]
    fn test_namespace_units_relocate() {
        let raw = tree(&[
            ("page_n", "567", Some("analysis/reading")),
            ("chapter_n", "15", Some("analysis/reading")),
            ("mg.mime_type", "text/plain", None),
        ]);
        assert_eq!(
            group_branch(raw),
            json!({
                "mg": {"mime_type": "text/plain"},
                "analysis": {"reading": {"page_n": "567", "chapter_n": "15"}},
            })
        );
    }

    #[test]
    fn test_namespace_units_do_not_trigger_split() {
        let raw = tree(&[
            ("name", "A", Some("1")),
            ("page_n", "1", Some("analysis/reading")),
        ]);
        assert_eq!(
            group_branch(raw),
            json!({"name": "A", "analysis": {"reading": {"page_n": "1"}}})
        );
    }

    #[test]
    fn test_value_slot_is_a_leaf_child() {
        let raw = tree(&[
            ("level2.level3", "value", None),
            ("level2", "value2", Some("units")),
        ]);
        assert_eq!(
            group_branch(raw),
            json!({"level2": {"level3": "value", "__value__": "value2"}})
        );
    }

    #[test]
    fn test_compare_units() {
        assert_eq!(compare_units("2", "10"), Ordering::Less);
        assert_eq!(compare_units("10", "a"), Ordering::Less);
        assert_eq!(compare_units("b", "a"), Ordering::Greater);
        let mut units = vec!["10", "b", "2", "a", "1"];
        units.sort_by(|a, b| compare_units(a, b));
        assert_eq!(units, vec!["1", "2", "10", "a", "b"]);
    }
}
