//! Error types for the access-control engine

use thiserror::Error;

/// Result type alias for the engine
pub type Result<T> = std::result::Result<T, AccessError>;

/// Main error type for the engine
///
/// Every variant is recoverable from the caller's point of view: a bad request never leaves
/// the engine in an unusable state.
#[derive(Error, Debug)]
pub enum AccessError {
    /// Authorization or visibility denial
    #[error("Not enough privileges. {0}")]
    InsufficientPrivilege(String),

    /// Reference to a role that does not exist or is not granted
    #[error("Unknown role: {0}")]
    UnknownRole(String),

    /// Reference to a user or role name that does not exist
    #[error("Unknown principal: {0}")]
    UnknownPrincipal(String),

    /// Creation of an entity whose name is taken
    #[error("{0} already exists")]
    AlreadyExists(String),

    /// Removal of an entity that is not there
    #[error("{0} does not exist")]
    DoesNotExist(String),

    /// Malformed statements: bad grant level, role cycles, empty names
    #[error("Validation error: {0}")]
    Validation(String),

    /// Session registry errors
    #[error("Session error: {0}")]
    Session(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Snapshot storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
