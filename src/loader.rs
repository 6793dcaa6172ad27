//! Loading serialized EDM models from disk.

use std::path::Path;

use crate::error::LoadError;
use crate::model::EdmModel;

/// Load a model from a JSON file.
///
/// # Errors
///
/// Returns `LoadError::FileNotFound`, `LoadError::ReadError`, or
/// `LoadError::InvalidJson`.
pub fn load_model(path: &Path) -> Result<EdmModel, LoadError> {
    if !path.exists() {
        return Err(LoadError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(path).map_err(|source| LoadError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;
    load_model_str(&content)
}

/// Parse a model from JSON text.
///
/// # Errors
///
/// Returns `LoadError::InvalidJson` on malformed JSON or a JSON shape that
/// does not match the model format.
pub fn load_model_str(text: &str) -> Result<EdmModel, LoadError> {
    serde_json::from_str(text).map_err(|source| LoadError::InvalidJson { source })
}
