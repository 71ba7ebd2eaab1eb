pub mod config;
pub mod convert;
pub mod error;
pub mod filter;
pub mod loader;
pub mod metadata;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use convert::{convert_metadata_to_dict, MetadataConverter};
pub use error::{MangoError, Result};
pub use filter::{filter_metadata_dict, FilterSpec};
pub use metadata::MetadataTriple;
