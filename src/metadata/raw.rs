// Intermediate tree built by unpacking triples, before unit grouping
use indexmap::IndexMap;
use serde_json::{Map, Value as JsonValue};

/// Reserved key holding a leaf that collided with a branch at the same path.
pub const VALUE_KEY: &str = "__value__";

/// A single stored value, with the unit it was inserted with (if any).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Leaf {
    Plain(String),
    Tagged { value: String, unit: String },
}

impl Leaf {
    pub fn unit(&self) -> Option<&str> {
        match self {
            Leaf::Plain(_) => None,
            Leaf::Tagged { unit, .. } => Some(unit),
        }
    }

    pub fn into_value(self) -> String {
        match self {
            Leaf::Plain(value) => value,
            Leaf::Tagged { value, .. } => value,
        }
    }

    fn to_json(&self) -> JsonValue {
        match self {
            Leaf::Plain(value) => JsonValue::String(value.clone()),
            Leaf::Tagged { value, unit } => JsonValue::Array(vec![
                JsonValue::String(value.clone()),
                JsonValue::String(unit.clone()),
            ]),
        }
    }
}

/// One or more leaves stored under the same key, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeafSlot {
    Single(Leaf),
    Many(Vec<Leaf>),
}

impl LeafSlot {
    /// Add a leaf, promoting a single value to a sequence on first collision.
    pub fn push(&mut self, leaf: Leaf) {
        let existing = std::mem::replace(self, LeafSlot::Many(Vec::new()));
        *self = match existing {
            LeafSlot::Single(first) => LeafSlot::Many(vec![first, leaf]),
            LeafSlot::Many(mut leaves) => {
                leaves.push(leaf);
                LeafSlot::Many(leaves)
            }
        };
    }

    pub fn into_leaves(self) -> Vec<Leaf> {
        match self {
            LeafSlot::Single(leaf) => vec![leaf],
            LeafSlot::Many(leaves) => leaves,
        }
    }

    fn to_json(&self) -> JsonValue {
        match self {
            LeafSlot::Single(leaf) => leaf.to_json(),
            LeafSlot::Many(leaves) => JsonValue::Array(leaves.iter().map(Leaf::to_json).collect()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawNode {
    Leaf(LeafSlot),
    Branch(RawBranch),
}

/// A namespace level. `value` is the leaf stored at this exact path when a
/// deeper path also passes through it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawBranch {
    pub children: IndexMap<String, RawNode>,
    pub value: Option<LeafSlot>,
}

impl RawBranch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty() && self.value.is_none()
    }

    /// Render the raw tree as JSON. Tagged leaves become `[value, unit]`
    /// pairs and the collision slot appears under `__value__`.
    pub fn to_json(&self) -> JsonValue {
        let mut map = Map::new();
        for (key, node) in &self.children {
            let value = match node {
                RawNode::Leaf(slot) => slot.to_json(),
                RawNode::Branch(branch) => branch.to_json(),
            };
            map.insert(key.clone(), value);
        }
        if let Some(slot) = &self.value {
            map.insert(VALUE_KEY.to_string(), slot.to_json());
        }
        JsonValue::Object(map)
    }
}
