use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConsolidatorError {
    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("XML parsing failed: {0}")]
    XmlParse(#[from] roxmltree::Error),

    #[error("XML writing failed: {0}")]
    XmlWrite(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown source format: {0}")]
    UnknownFormat(String),
}

pub type Result<T> = std::result::Result<T, ConsolidatorError>;
