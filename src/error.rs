use thiserror::Error;

#[derive(Error, Debug)]
pub enum MapperError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("TOML serialization failed: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Input contains no header row")]
    EmptyInput,

    #[error("Unknown profile: {0}")]
    UnknownProfile(String),
}

pub type Result<T> = std::result::Result<T, MapperError>;
