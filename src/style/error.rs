use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StyleError {
    #[error("Style '{name}' is not registered. Available styles: {}", .available.join(", "))]
    UnknownStyle { name: String, available: Vec<String> },

    #[error("Invalid paper size '{0}'")]
    UnknownPaperSize(String),

    #[error("Style definition is malformed: {0}")]
    Malformed(String),

    #[error("Failed to read style file '{0}'")]
    Read(PathBuf, #[source] std::io::Error),

    #[error("Failed to parse style document")]
    Parse(#[from] serde_json::Error),

    #[error("Failed to parse YAML style document")]
    ParseYaml(#[from] serde_yaml::Error),
}
