use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("No candidate paths supplied for unit {0:?}")]
    NoCandidatePaths(crate::core::types::UnitId),

    #[error("Unknown consideration kind: {0}")]
    UnknownConsideration(String),

    #[error("Consideration '{consideration}' produced a non-finite score on fixture '{fixture}'")]
    NonFiniteScore {
        consideration: String,
        fixture: &'static str,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlDecode(#[from] toml::de::Error),

    #[error("TOML write error: {0}")]
    TomlEncode(#[from] toml::ser::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PlannerError>;
