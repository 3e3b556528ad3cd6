//! Error types for Sweepr
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

use crate::engine::EngineError;

/// All error types that can occur in Sweepr
#[derive(Debug, Error)]
pub enum SweeprError {
    /// Engine RPC error that escaped the fetch/remediate boundary
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// Invalid connection parameters
    #[error("Invalid connection URL: {0}")]
    InvalidUrl(String),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML configuration parse error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type alias for Sweepr operations
pub type Result<T> = std::result::Result<T, SweeprError>;
