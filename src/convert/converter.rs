use crate::config::ConversionConfig;
use crate::convert::document::merge_into;
use crate::convert::grouping::group_branch;
use crate::error::Result;
use crate::metadata::{unpack_into, MetadataTriple, RawBranch};
use serde_json::{Map, Value as JsonValue};

/// Converts flat metadata triples into the nested mango document.
pub struct MetadataConverter {
    config: ConversionConfig,
}

impl Default for MetadataConverter {
    fn default() -> Self {
        Self::new(ConversionConfig::default())
    }
}

impl MetadataConverter {
    pub fn new(config: ConversionConfig) -> Self {
        Self { config }
    }

    /// Unpack every triple, in order, into a fresh raw tree.
    pub fn build_raw_tree<'a, I>(&self, triples: I) -> Result<RawBranch>
    where
        I: IntoIterator<Item = &'a MetadataTriple>,
    {
        let mut tree = RawBranch::new();
        for triple in triples {
            unpack_into(&mut tree, triple)?;
        }
        Ok(tree)
    }

    pub fn convert<'a, I>(&self, triples: I) -> Result<JsonValue>
    where
        I: IntoIterator<Item = &'a MetadataTriple>,
    {
        let tree = self.build_raw_tree(triples)?;
        if tree.is_empty() {
            log::debug!("No metadata to convert");
        }
        let namespaces = tree.children.len();
        let document = self.rename_schema(group_branch(tree));

        log::debug!(
            "Converted metadata from {} root namespaces into {} top-level keys",
            namespaces,
            document.as_object().map(Map::len).unwrap_or(0)
        );

        Ok(document)
    }

    /// Rename the schema namespace at the root.
    ///
    /// The renamed subtree takes the position of whichever of the prefix or
    /// the target key comes first. When both exist their subtrees are merged
    /// with the usual collision rules rather than one replacing the other.
    fn rename_schema(&self, document: JsonValue) -> JsonValue {
        let prefix = &self.config.schema_prefix;
        let key = &self.config.schema_key;

        match document {
            JsonValue::Object(map) if map.contains_key(prefix.as_str()) && prefix != key => {
                if map.contains_key(key.as_str()) {
                    log::warn!(
                        "Both '{}' and '{}' present at the root; merging them under '{}'",
                        prefix,
                        key,
                        key
                    );
                }
                let mut renamed = Map::with_capacity(map.len());
                for (name, value) in map {
                    let name = if name == *prefix { key.clone() } else { name };
                    merge_into(&mut renamed, &name, value);
                }
                JsonValue::Object(renamed)
            }
            other => other,
        }
    }
}

/// Convert triples with the default settings.
pub fn convert_metadata_to_dict(triples: &[MetadataTriple]) -> Result<JsonValue> {
    MetadataConverter::default().convert(triples)
}
