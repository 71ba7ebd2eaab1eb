use thiserror::Error;

pub type Result<T> = std::result::Result<T, MangoError>;

#[derive(Error, Debug)]
pub enum MangoError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unsupported input format: {0}")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl MangoError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        MangoError::InvalidArgument(msg.into())
    }
}
