use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("directory walk failed: {0}")]
    WalkDir(#[from] walkdir::Error),

    #[error("{0}")]
    StripPrefix(#[from] std::path::StripPrefixError),

    #[error("failed to parse configuration: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to parse manifest.json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration file not found: {0}")]
    ConfigNotFound(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("working directory not found: {0}")]
    BaseDirNotFound(String),
}
