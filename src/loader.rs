// Reading exported metadata triples from disk
use crate::error::{MangoError, Result};
use crate::metadata::MetadataTriple;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Json,
    Toml,
}

impl InputFormat {
    /// Pick the format from the file extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        match path.extension().and_then(|s| s.to_str()) {
            Some("json") => Ok(InputFormat::Json),
            Some("toml") => Ok(InputFormat::Toml),
            _ => Err(MangoError::UnsupportedFormat(format!(
                "{} (expected a .json or .toml file)",
                path.display()
            ))),
        }
    }
}

// TOML uses [[avu]] array syntax
#[derive(Debug, Deserialize)]
struct AvuFile {
    #[serde(default)]
    avu: Vec<MetadataTriple>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonInput {
    // Plain array of triples
    List(Vec<MetadataTriple>),
    // Same layout as the TOML file: {"avu": [...]}
    File(AvuFile),
}

pub fn load_triples_from_file<P: AsRef<Path>>(path: P) -> Result<Vec<MetadataTriple>> {
    let path = path.as_ref();

    if !path.is_file() {
        return Err(MangoError::invalid(format!(
            "input file does not exist: {}",
            path.display()
        )));
    }

    let format = InputFormat::from_path(path)?;
    let content = fs::read_to_string(path)?;
    let triples = load_triples_from_content(&content, format)?;

    log::info!("Loaded {} metadata triples from {}", triples.len(), path.display());
    Ok(triples)
}

pub fn load_triples_from_content(content: &str, format: InputFormat) -> Result<Vec<MetadataTriple>> {
    let triples = match format {
        InputFormat::Json => match serde_json::from_str::<JsonInput>(content)? {
            JsonInput::List(triples) => triples,
            JsonInput::File(file) => file.avu,
        },
        InputFormat::Toml => toml::from_str::<AvuFile>(content)?.avu,
    };
    Ok(triples)
}
