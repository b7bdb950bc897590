//! Error types for the PTV translation engine
//!
//! This module defines the error handling system for the engine, using
//! thiserror for the error enum and anyhow for wrapped collaborator failures.
//!
//! Copyright (c) 2025 PTV Team
//! Licensed under the Apache-2.0 license

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Main error type for translation operations
#[derive(Error, Debug)]
pub enum Error {
    /// No translator is registered for a nested type pair
    #[error("No translator registered for {source_type} -> {target_type}")]
    TranslatorNotRegistered {
        source_type: &'static str,
        target_type: &'static str,
    },

    /// A stable code is missing from a reference table
    #[error("Reference table '{table}' has no entry for code '{code}'")]
    UnknownReferenceCode { table: &'static str, code: String },

    /// A generated identifier is missing from a reference table
    #[error("Reference table '{table}' has no entry with id {id}")]
    UnknownReferenceId { table: &'static str, id: Uuid },

    /// The reference-data store could not be loaded
    #[error("Reference data unavailable: {message}")]
    ReferenceDataUnavailable {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// An update item points at a row that does not exist
    #[error("Orphan reference in '{collection}': no existing row with id {id}")]
    OrphanReference { collection: String, id: Uuid },

    /// The same existing row is referenced by more than one incoming item
    #[error("Duplicate reference in '{collection}': row {id} is referenced more than once")]
    DuplicateReference { collection: String, id: Uuid },

    /// An entity to update was not found in the store
    #[error("{entity} with id {id} not found")]
    EntityNotFound { entity: &'static str, id: Uuid },

    /// Malformed upstream input
    #[error("Validation error: {field} - {message}")]
    Validation {
        field: String,
        message: String,
        expected: Option<String>,
    },

    /// A propagation callback failed after materialization
    #[error("Propagation failed: {message}")]
    Propagation {
        message: String,
        #[source]
        source: anyhow::Error,
    },

    /// Invalid engine or translator configuration
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// JSON parsing and serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// YAML parsing errors
    #[error("YAML error: {message}")]
    Yaml {
        message: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic internal error with context
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy used by callers to decide how a failure surfaces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCategory {
    /// Deployment or registration bug; never retried
    Configuration,
    /// Bad upstream input; reported back as a validation failure
    InputFormat,
    /// A post-materialization callback aborted the translation
    Propagation,
    /// Serialization, IO and other infrastructure failures
    Internal,
}

/// Severity levels for errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    /// Informational, no action required
    Info,
    /// Warning, should be reviewed
    Warning,
    /// Error, the request fails
    Error,
    /// Critical, the deployment is misconfigured
    Critical,
}

impl Error {
    /// Classify this error according to the engine's error taxonomy
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::TranslatorNotRegistered { .. }
            | Error::UnknownReferenceCode { .. }
            | Error::UnknownReferenceId { .. }
            | Error::ReferenceDataUnavailable { .. }
            | Error::OrphanReference { .. }
            | Error::DuplicateReference { .. }
            | Error::EntityNotFound { .. }
            | Error::Configuration { .. } => ErrorCategory::Configuration,
            Error::Validation { .. } => ErrorCategory::InputFormat,
            Error::Propagation { .. } => ErrorCategory::Propagation,
            Error::Json { .. } | Error::Yaml { .. } | Error::Io { .. } | Error::Internal { .. } => {
                ErrorCategory::Internal
            }
        }
    }

    /// Severity of this error
    pub fn severity(&self) -> Severity {
        match self.category() {
            ErrorCategory::Configuration => Severity::Critical,
            ErrorCategory::InputFormat => Severity::Warning,
            ErrorCategory::Propagation | ErrorCategory::Internal => Severity::Error,
        }
    }

    /// True for errors that indicate a deployment or registration bug
    pub fn is_configuration(&self) -> bool {
        self.category() == ErrorCategory::Configuration
    }

    /// True for errors caused by malformed upstream input
    pub fn is_input_format(&self) -> bool {
        self.category() == ErrorCategory::InputFormat
    }

    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
            source: None,
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::Configuration => write!(f, "configuration"),
            ErrorCategory::InputFormat => write!(f, "input-format"),
            ErrorCategory::Propagation => write!(f, "propagation"),
            ErrorCategory::Internal => write!(f, "internal"),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

// Conversion implementations
impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::Yaml {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Internal {
            message: err.to_string(),
            source: err,
        }
    }
}
