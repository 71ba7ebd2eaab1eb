use serde::{Deserialize, Serialize};

/// One metadata record as exported from the data-management platform
/// (an attribute/value/unit triple).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MetadataTriple {
    #[serde(alias = "attribute")]
    pub name: String,

    pub value: String,

    // Absent and empty units mean the same thing
    #[serde(default, alias = "unit", skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
}

impl MetadataTriple {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            units: None,
        }
    }

    pub fn with_units(
        name: impl Into<String>,
        value: impl Into<String>,
        units: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            units: Some(units.into()),
        }
    }

    /// The unit, or `None` when it is absent or empty.
    pub fn unit(&self) -> Option<&str> {
        self.units.as_deref().filter(|u| !u.is_empty())
    }
}
