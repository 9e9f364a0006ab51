#[derive(Debug, thiserror::Error)]
pub enum SkyError {
    #[error("Catalog document could not be parsed")]
    CatalogParse(#[from] serde_json::Error),
    #[error("Catalog document has no star list")]
    MissingStarList,
    #[error("Malformed star record {name}: {reason}")]
    MalformedRecord { name: String, reason: String },
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, SkyError>;

impl SkyError {
    pub fn malformed(name: impl Into<String>, reason: impl Into<String>) -> Self {
        SkyError::MalformedRecord {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
