//! Unified Error Model
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModerationError {
    #[error("PARSE/JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("PARSE/YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("SETTINGS/{0}")]
    InvalidSettings(String),
}

pub type Result<T> = std::result::Result<T, ModerationError>;
