// WebAssembly bindings for the metadata converter
use crate::config::Config;
use crate::convert::MetadataConverter;
use crate::filter::{filter_metadata_dict, FilterSpec};
use crate::loader::{load_triples_from_content, InputFormat};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub struct MangoWasm {
    config: Config,
}

impl Default for MangoWasm {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_filter(filter_json: Option<String>) -> Result<Option<FilterSpec>, JsValue> {
    filter_json
        .map(|json| {
            serde_json::from_str::<FilterSpec>(&json)
                .map_err(|e| JsValue::from_str(&format!("Invalid filter: {}", e)))
        })
        .transpose()
}

#[wasm_bindgen]
impl MangoWasm {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            config: Config::empty(),
        }
    }

    /// Create a converter from `mango.toml` contents
    #[wasm_bindgen]
    pub fn with_config(config_content: &str) -> Result<MangoWasm, JsValue> {
        let config = Config::from_toml(config_content)
            .map_err(|e| JsValue::from_str(&format!("Failed to load config: {}", e)))?;
        Ok(Self { config })
    }

    /// Convert a JSON array of triples into the nested document.
    /// `filter_json` overrides the configured default filter.
    /// Returns JSON string of the document
    #[wasm_bindgen]
    pub fn convert(&self, triples_json: &str, filter_json: Option<String>) -> Result<String, JsValue> {
        let triples = load_triples_from_content(triples_json, InputFormat::Json)
            .map_err(|e| JsValue::from_str(&format!("Failed to parse triples: {}", e)))?;

        let converter = MetadataConverter::new(self.config.conversion.clone());
        let document = converter
            .convert(&triples)
            .map_err(|e| JsValue::from_str(&format!("Conversion failed: {}", e)))?;

        let filter = parse_filter(filter_json)?.unwrap_or_else(|| self.config.filter.spec.clone());
        let filtered = filter_metadata_dict(&document, &filter);

        serde_json::to_string(&filtered)
            .map_err(|e| JsValue::from_str(&format!("Failed to serialize document: {}", e)))
    }

    /// Filter an already converted document.
    /// Returns JSON string of the pruned document
    #[wasm_bindgen]
    pub fn filter(&self, document_json: &str, filter_json: &str) -> Result<String, JsValue> {
        let document: serde_json::Value = serde_json::from_str(document_json)
            .map_err(|e| JsValue::from_str(&format!("Failed to parse document: {}", e)))?;
        let filter = parse_filter(Some(filter_json.to_string()))?.unwrap_or_default();

        serde_json::to_string(&filter_metadata_dict(&document, &filter))
            .map_err(|e| JsValue::from_str(&format!("Failed to serialize document: {}", e)))
    }
}
