//! Error types for kartei operations.
//!
//! Absence outcomes (no learned data, nothing due, unknown title) are not
//! errors and never appear here; they are returned as plain enum results by
//! the scheduler. This module covers genuine failures: a broken store, bad
//! configuration, invalid input.

use std::collections::HashMap;
use thiserror::Error;

/// Result type alias for kartei operations.
pub type KarteiResult<T> = Result<T, KarteiError>;

/// Main error type for all kartei operations.
#[derive(Error, Debug)]
pub enum KarteiError {
    /// Input validation failed.
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        code: ErrorCode,
        details: HashMap<String, String>,
        suggestion: Option<String>,
    },

    /// The learner item store could not be read or written.
    #[error("Store error: {message}")]
    Storage {
        message: String,
        code: ErrorCode,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Database operation failed.
    #[error("Database error: {message}")]
    Database {
        message: String,
        code: ErrorCode,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error codes for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Validation (VAL_xxx)
    ValInvalidInput,
    ValMissingField,
    ValOutOfRange,

    // Store (STORE_xxx)
    StoreUnavailable,
    StoreReadFailed,
    StoreWriteFailed,
    StoreCorrupted,

    // Database (DB_xxx)
    DbConnectionFailed,
    DbOperationFailed,

    // Parse (PARSE_xxx)
    ParseInvalidJson,

    // Internal
    Internal,
}

impl ErrorCode {
    /// Get the string representation of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ValInvalidInput => "VAL_001",
            ErrorCode::ValMissingField => "VAL_002",
            ErrorCode::ValOutOfRange => "VAL_003",
            ErrorCode::StoreUnavailable => "STORE_001",
            ErrorCode::StoreReadFailed => "STORE_002",
            ErrorCode::StoreWriteFailed => "STORE_003",
            ErrorCode::StoreCorrupted => "STORE_004",
            ErrorCode::DbConnectionFailed => "DB_001",
            ErrorCode::DbOperationFailed => "DB_002",
            ErrorCode::ParseInvalidJson => "PARSE_001",
            ErrorCode::Internal => "INT_001",
        }
    }
}

impl KarteiError {
    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            code: ErrorCode::ValInvalidInput,
            details: HashMap::new(),
            suggestion: None,
        }
    }

    /// Create a validation error for a required field that was empty.
    pub fn missing_field(field: &str) -> Self {
        let mut details = HashMap::new();
        details.insert("field".to_string(), field.to_string());
        Self::Validation {
            message: format!("'{}' must not be empty", field),
            code: ErrorCode::ValMissingField,
            details,
            suggestion: Some(format!("Provide a non-empty '{}'", field)),
        }
    }

    /// Create a validation error for a value the schedule cannot represent.
    pub fn out_of_range(field: &str, message: impl Into<String>) -> Self {
        let mut details = HashMap::new();
        details.insert("field".to_string(), field.to_string());
        Self::Validation {
            message: message.into(),
            code: ErrorCode::ValOutOfRange,
            details,
            suggestion: None,
        }
    }

    /// Create a store read error.
    pub fn store_read(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
            code: ErrorCode::StoreReadFailed,
            source: None,
        }
    }

    /// Create a store write error.
    pub fn store_write(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
            code: ErrorCode::StoreWriteFailed,
            source: None,
        }
    }

    /// Create an error for a store whose contents cannot be decoded.
    pub fn store_corrupted(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Storage {
            message: message.into(),
            code: ErrorCode::StoreCorrupted,
            source: Some(Box::new(source)),
        }
    }

    /// Create a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
            code: ErrorCode::DbOperationFailed,
            source: None,
        }
    }

    /// Get the error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Validation { code, .. } => *code,
            Self::Storage { code, .. } => *code,
            Self::Database { code, .. } => *code,
            Self::Io(_) => ErrorCode::StoreUnavailable,
            Self::Serialization(_) => ErrorCode::ParseInvalidJson,
            _ => ErrorCode::Internal,
        }
    }

    /// Whether this failure originates in the item store collaborator.
    pub fn is_store_failure(&self) -> bool {
        matches!(
            self,
            Self::Storage { .. } | Self::Database { .. } | Self::Io(_) | Self::Serialization(_)
        )
    }

    /// Get a user-friendly suggestion for resolving this error.
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::Validation { suggestion, .. } => suggestion.as_deref(),
            Self::Storage { .. } | Self::Io(_) => {
                Some("Please check that the item store path exists and is writable")
            }
            Self::Database { .. } => Some("Please check the sqlite database file"),
            Self::Configuration(_) => Some("Please check your kartei configuration file"),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for KarteiError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Database {
            message: err.to_string(),
            code: ErrorCode::DbOperationFailed,
            source: Some(Box::new(err)),
        }
    }
}
