//! Error types for nestbase
//!
//! This module provides unified error handling across the generator:
//! schema decoding errors, structural inconsistencies in the data model,
//! configuration problems and file-system failures.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for nestbase
#[derive(Debug, Error)]
pub enum EngineError {
    // ========================================================================
    // Naming Errors
    // ========================================================================
    /// An identifier cannot be turned into a usable name
    #[error("Invalid identifier '{0}': names must be ASCII and contain at least one letter or digit")]
    InvalidName(String),

    // ========================================================================
    // Structural Errors
    // ========================================================================
    /// A model references one of its own fields that does not exist
    #[error("Field '{field}' not found in model '{model}'")]
    FieldNotFound { model: String, field: String },

    /// A field references a model that is not part of the data model
    #[error("Model '{model}' referenced by '{referenced_by}' does not exist")]
    ModelNotFound { model: String, referenced_by: String },

    /// A field references an enum that is not part of the data model
    #[error("Enum '{name}' referenced by '{model}.{field}' does not exist")]
    EnumNotFound {
        model: String,
        field: String,
        name: String,
    },

    /// Two models, enums or fields share a name, either as declared or
    /// after case normalization
    #[error("Duplicate {kind} name: {detail}")]
    DuplicateName { kind: &'static str, detail: String },

    // ========================================================================
    // Schema Decoding Errors
    // ========================================================================
    /// The schema document is not a valid data model description
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    /// Schema file does not exist
    #[error("Schema not found at path: {0}")]
    SchemaNotFound(PathBuf),

    /// JSON decoding error
    #[error("JSON serialization error: {0}")]
    JsonSerialization(#[from] serde_json::Error),

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Missing required configuration
    #[error("Missing required configuration: {0}")]
    MissingConfig(String),

    // ========================================================================
    // IO Errors
    // ========================================================================
    /// File IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// File read error
    #[error("Failed to read file '{path}': {message}")]
    FileRead { path: PathBuf, message: String },

    /// File write error
    #[error("Failed to write file '{path}': {message}")]
    FileWrite { path: PathBuf, message: String },

    /// Directory creation failed
    #[error("Failed to create directory '{path}': {message}")]
    DirectoryCreate { path: PathBuf, message: String },

    // ========================================================================
    // Generic Errors
    // ========================================================================
    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl EngineError {
    /// Create an invalid schema error
    pub fn invalid_schema(msg: impl Into<String>) -> Self {
        EngineError::InvalidSchema(msg.into())
    }

    /// Create a field-not-found error
    pub fn field_not_found(model: impl Into<String>, field: impl Into<String>) -> Self {
        EngineError::FieldNotFound {
            model: model.into(),
            field: field.into(),
        }
    }

    /// Create a model-not-found error
    pub fn model_not_found(model: impl Into<String>, referenced_by: impl Into<String>) -> Self {
        EngineError::ModelNotFound {
            model: model.into(),
            referenced_by: referenced_by.into(),
        }
    }

    /// Create an error for a name declared more than once
    pub fn duplicate_name(kind: &'static str, name: impl AsRef<str>) -> Self {
        EngineError::DuplicateName {
            kind,
            detail: format!("'{}' is declared more than once", name.as_ref()),
        }
    }

    /// Create an error for two distinct names that normalize to the same
    /// identifier
    pub fn name_collision(
        kind: &'static str,
        first: impl AsRef<str>,
        second: impl AsRef<str>,
        normalized: impl AsRef<str>,
    ) -> Self {
        EngineError::DuplicateName {
            kind,
            detail: format!(
                "'{}' and '{}' both normalize to '{}'",
                first.as_ref(),
                second.as_ref(),
                normalized.as_ref()
            ),
        }
    }

    /// Create an invalid configuration error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        EngineError::InvalidConfig(msg.into())
    }

    /// Create a missing configuration error
    pub fn missing_config(msg: impl Into<String>) -> Self {
        EngineError::MissingConfig(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        EngineError::Internal(msg.into())
    }

    /// Check if this error is a structural inconsistency in the data model
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            EngineError::FieldNotFound { .. }
                | EngineError::ModelNotFound { .. }
                | EngineError::EnumNotFound { .. }
                | EngineError::DuplicateName { .. }
        )
    }

    /// Check if this error is a configuration error
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            EngineError::InvalidConfig(_) | EngineError::MissingConfig(_)
        )
    }

    /// Check if this error is an IO error
    pub fn is_io(&self) -> bool {
        matches!(
            self,
            EngineError::Io(_)
                | EngineError::FileRead { .. }
                | EngineError::FileWrite { .. }
                | EngineError::DirectoryCreate { .. }
        )
    }
}

/// Result type alias using EngineError
pub type EngineResult<T> = Result<T, EngineError>;

// ============================================================================
// Tests
// ============================================================================
