use thiserror::Error;

use crate::sim::runner::Termination;

/// Problems with a vehicle configuration record. Raised before integration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read vehicle configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed vehicle record: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid vehicle parameter `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("invalid solver settings: {0}")]
    Settings(String),
    #[error("unknown sweep parameter `{0}` (expected `initial_angle` or `ballistic_coefficient`)")]
    UnknownParameter(String),
    #[error("integration failed: {}", .0.message())]
    Failed(Termination),
}
