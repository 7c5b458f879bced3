//! Error types for overmind
//!
//! Every error here is caught at the narrowest possible boundary:
//! per-agent during load and execution, per-call for store and
//! promotion I/O. Nothing in this taxonomy is allowed to terminate
//! the controller or spill across agents.

#![allow(dead_code)]

use thiserror::Error;

/// Main error type for overmind
#[derive(Error, Debug)]
pub enum ControllerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    #[error("Execution error: {0}")]
    Execution(#[from] ExecutionError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Promotion error: {0}")]
    Promote(#[from] PromoteError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(String),

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Failed to write config file: {0}")]
    Write(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Errors raised while loading an agent into the live registry.
///
/// All of these are non-fatal to a load cycle: the offending candidate
/// is skipped and the remaining candidates are still processed.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("agent '{0}' rejected by allow-list")]
    Rejected(String),

    #[error("no registered factory for '{0}'")]
    NoFactory(String),

    #[error("agent '{name}' failed to initialize: {reason}")]
    Init { name: String, reason: String },

    #[error("agent '{0}' is already loaded")]
    Conflict(String),
}

/// Per-agent execution failures, captured at the agent boundary.
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("agent '{name}' failed: {reason}")]
    Failed { name: String, reason: String },

    #[error("agent '{0}' exceeded its deadline")]
    DeadlineExceeded(String),
}

/// Result store errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("payload from '{0}' failed validation")]
    Invalid(String),

    #[error("failed to serialize result store: {0}")]
    Serialize(String),

    #[error("failed to write result store: {0}")]
    Write(String),

    #[error("failed to read result store: {0}")]
    Read(String),

    #[error("failed to parse result store: {0}")]
    Parse(String),
}

/// Unload errors: logged, never fatal.
#[derive(Error, Debug)]
pub enum UnloadError {
    #[error("agent '{0}' not found in registry")]
    NotFound(String),
}

/// Promotion pipeline errors
#[derive(Error, Debug)]
pub enum PromoteError {
    #[error("source artifact missing for '{0}'")]
    MissingSource(String),

    #[error("failed to copy artifact for '{name}': {reason}")]
    Copy { name: String, reason: String },
}

/// Result type alias using ControllerError
pub type Result<T> = std::result::Result<T, ControllerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_error_display() {
        let err = LoadError::Rejected("RogueAgent".to_string());
        assert_eq!(err.to_string(), "agent 'RogueAgent' rejected by allow-list");
    }

    #[test]
    fn test_execution_error_display() {
        let err = ExecutionError::DeadlineExceeded("SlowAgent".to_string());
        assert!(err.to_string().contains("deadline"));
    }

    #[test]
    fn test_controller_error_from() {
        let err: ControllerError = LoadError::Conflict("EchoAgent".to_string()).into();
        assert!(matches!(err, ControllerError::Load(_)));
    }
}
