use crate::error::Result;
use crate::filter::FilterSpec;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File name looked up next to the input when no config path is given.
pub const CONFIG_FILE_NAME: &str = "mango.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub conversion: ConversionConfig,

    #[serde(default)]
    pub output: OutputConfig,

    // Default filter applied by `convert` when none is given on the command line
    #[serde(default)]
    pub filter: FilterConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConversionConfig {
    // Root namespace holding schema metadata
    #[serde(default = "default_schema_prefix")]
    pub schema_prefix: String,

    // Key the schema namespace is renamed to
    #[serde(default = "default_schema_key")]
    pub schema_key: String,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            schema_prefix: default_schema_prefix(),
            schema_key: default_schema_key(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default = "default_pretty")]
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pretty: default_pretty(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FilterConfig {
    #[serde(default)]
    pub spec: FilterSpec,
}

fn default_schema_prefix() -> String {
    "mgs".to_string()
}

fn default_schema_key() -> String {
    "schema".to_string()
}

fn default_pretty() -> bool {
    true
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_config_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.conversion.schema_prefix, "mgs");
        assert_eq!(config.conversion.schema_key, "schema");
        assert!(config.output.pretty);
        assert_eq!(config.filter.spec, FilterSpec::Unspecified);
    }

    #[test]
    fn test_full_config() {
        let config = Config::from_toml(
            r#"
[conversion]
schema_prefix = "mango"

[output]
pretty = false

[filter]
spec = { schema = { book = {} } }
"#,
        )
        .unwrap();

        assert_eq!(config.conversion.schema_prefix, "mango");
        assert_eq!(config.conversion.schema_key, "schema");
        assert!(!config.output.pretty);
        match &config.filter.spec {
            FilterSpec::Nested(map) => {
                assert!(matches!(
                    map.get("schema"),
                    Some(FilterSpec::Nested(inner)) if inner.contains_key("book")
                ));
            }
            other => panic!("Expected nested filter, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_filter_shape_is_rejected() {
        let result = Config::from_toml("[filter]\nspec = 3\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[filter]\nspec = [\"schema\", \"mg\"]").unwrap();

        let config = Config::load_from_file(file.path()).unwrap();
        assert_eq!(
            config.filter.spec,
            FilterSpec::Names(vec!["schema".to_string(), "mg".to_string()])
        );
    }
}
