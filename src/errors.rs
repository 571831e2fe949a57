//! Error types for the moodrecipes application.
//!
//! This module defines custom error types that categorize the failures
//! that can occur while storing and querying recipes.

use std::{io, path::PathBuf};

use thiserror::Error;

/// The main error type for the moodrecipes application.
#[derive(Error, Debug)]
pub enum RecipeError {
    /// Errors related to file I/O operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Errors related to serialization/deserialization operations.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The underlying key-value storage could not be read or written.
    #[error("Storage unavailable: {message}")]
    StorageUnavailable { message: String },

    /// Persisted data exists but is not a valid serialized collection.
    #[error("Stored value for key '{key}' could not be decoded: {message}")]
    Deserialization { key: String, message: String },

    /// Recipe was not found when performing an operation.
    #[error("Recipe not found: {id}")]
    RecipeNotFound { id: String },

    /// A recipe was rejected at the store boundary.
    #[error("Invalid recipe: {message}")]
    InvalidRecipe { message: String },

    /// Storage keys are restricted to `[A-Za-z0-9_-]`.
    #[error("Invalid storage key: '{key}'")]
    InvalidKey { key: String },

    /// Errors related to configuration and preferences.
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// Directory creation or access failed.
    #[error("Failed to create or access directory: {path}")]
    DirectoryError { path: PathBuf },

    #[error("{message}")]
    EditorError { message: String },
}
