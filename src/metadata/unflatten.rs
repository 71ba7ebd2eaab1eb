use crate::metadata::raw::{Leaf, LeafSlot, RawBranch, RawNode};
use indexmap::IndexMap;

/// Insert `value` at the dotted `path` of `tree`.
///
/// The value is stored as a `(value, unit)` pair when `use_unit` is set and
/// `unit` is non-empty, otherwise bare. Inserting at a key that already holds
/// values appends to them in arrival order. A leaf and a branch at the same
/// path are reconciled through the branch's `__value__` slot, whichever
/// arrives first.
pub fn unflatten_into(
    tree: &mut RawBranch,
    path: &str,
    value: &str,
    use_unit: bool,
    unit: Option<&str>,
) {
    let leaf = match unit {
        Some(unit) if use_unit && !unit.is_empty() => Leaf::Tagged {
            value: value.to_string(),
            unit: unit.to_string(),
        },
        _ => Leaf::Plain(value.to_string()),
    };

    let (parents, key) = match path.rsplit_once('.') {
        Some((parents, key)) => (Some(parents), key),
        None => (None, path),
    };

    let mut current = tree;
    if let Some(parents) = parents {
        for segment in parents.split('.') {
            current = descend(current, segment);
        }
    }

    match current.children.get_mut(key) {
        None => {
            current
                .children
                .insert(key.to_string(), RawNode::Leaf(LeafSlot::Single(leaf)));
        }
        Some(RawNode::Leaf(slot)) => slot.push(leaf),
        Some(RawNode::Branch(branch)) => match &mut branch.value {
            Some(slot) => slot.push(leaf),
            None => branch.value = Some(LeafSlot::Single(leaf)),
        },
    }
}

// Get or create the branch under `segment`, moving an existing leaf there
// into the new branch's value slot.
fn descend<'a>(branch: &'a mut RawBranch, segment: &str) -> &'a mut RawBranch {
    let node = branch
        .children
        .entry(segment.to_string())
        .or_insert_with(|| RawNode::Branch(RawBranch::new()));

    if let RawNode::Leaf(slot) = node {
        let slot = std::mem::replace(slot, LeafSlot::Many(Vec::new()));
        *node = RawNode::Branch(RawBranch {
            children: IndexMap::new(),
            value: Some(slot),
        });
    }

    match node {
        RawNode::Branch(branch) => branch,
        RawNode::Leaf(_) => unreachable!("leaf was promoted to a branch above"),
    }
}
