//! Core error types for fitpulse-core.
//!
//! Workout errors are precondition violations surfaced straight to the
//! caller. Storage and configuration errors are caught at the boundary and
//! never corrupt in-memory timer state.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for fitpulse-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Sequence or timer precondition violations
    #[error("Workout error: {0}")]
    Workout(#[from] WorkoutError),

    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<ValidationError> for CoreError {
    fn from(err: ValidationError) -> Self {
        CoreError::Workout(WorkoutError::Validation(err))
    }
}

/// Errors raised by the sequence builder and the interval timer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WorkoutError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Index {index} out of bounds for sequence (length: {len})")]
    Index { index: usize, len: usize },

    #[error("Invalid state: {0}")]
    State(String),

    #[error("Cannot start a workout with an empty sequence")]
    EmptySequence,

    #[error("A workout is already running; reset it first")]
    AlreadyRunning,

    #[error("No workout is running")]
    NotRunning,
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Exercise name must not be empty")]
    EmptyName,

    #[error("Duration {seconds}s is outside {min}..={max} seconds")]
    DurationOutOfRange { seconds: u32, min: u32, max: u32 },

    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,

    /// Clear was requested without a matching armed confirmation
    #[error("History clear was not confirmed; arm it first and pass the returned token")]
    ClearNotArmed,

    /// A completed session carried no exercises
    #[error("Completed session has no exercises to store")]
    EmptyRecord,

    /// The data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Key does not exist in the configuration
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(code, _msg) => {
                if code.code == rusqlite::ErrorCode::DatabaseLocked {
                    DatabaseError::Locked
                } else {
                    DatabaseError::QueryFailed(err.to_string())
                }
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
