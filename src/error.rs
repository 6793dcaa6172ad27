//! Error types for vocabulary resolution and document conversion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors while materializing a vocabulary annotation into a capability record.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("annotation '{term}' has invalid shape: expected {expected}, got {actual}")]
    InvalidAnnotationShape {
        term: String,
        expected: String,
        actual: String,
    },

    #[error("invalid {kind} literal \"{value}\"")]
    InvalidLiteral { kind: String, value: String },

    #[error("record '{type_name}' is missing required property '{property}'")]
    MissingRecordProperty {
        type_name: String,
        property: String,
    },

    #[error("property '{property}' of record '{type_name}': expected {expected}, got {actual}")]
    InvalidPropertyType {
        type_name: String,
        property: String,
        expected: String,
        actual: String,
    },

    #[error("unknown record type '{type_name}'")]
    UnknownRecordType { type_name: String },
}

/// Errors during OpenAPI document assembly.
///
/// A conversion either succeeds with a complete document or fails with one of
/// these; there is no partial output mode.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("annotation '{term}' on '{element}': {source}")]
    Annotation {
        element: String,
        term: String,
        #[source]
        source: ResolveError,
    },

    #[error("'{source_name}' references unknown entity type '{entity_type}'")]
    UnknownEntityType {
        source_name: String,
        entity_type: String,
    },

    #[error("operation import '{import}' references unknown operation '{operation}'")]
    UnknownOperation { import: String, operation: String },
}

/// Errors while loading a serialized EDM model.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid model JSON: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },
}

impl ResolveError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        2
    }
}

impl ConvertError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        2
    }
}

impl LoadError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            LoadError::FileNotFound { .. } | LoadError::ReadError { .. } => 3,
            LoadError::InvalidJson { .. } => 2,
        }
    }
}
