//! Error types for the boundary crate.

use std::path::PathBuf;

use city_common::CommonError;
use thiserror::Error;

/// Errors that can occur while extracting township boundaries.
#[derive(Error, Debug)]
pub enum BoundaryError {
    #[error("Failed to open shapefile {}: {message}", path.display())]
    Open { path: PathBuf, message: String },

    #[error("Failed to open attribute table {}: {message}", path.display())]
    AttributeTable { path: PathBuf, message: String },

    #[error("Failed to read shape record {index}: {message}")]
    Read { index: usize, message: String },

    #[error("Attribute table {} has no column named '{field}'", path.display())]
    MissingField { path: PathBuf, field: String },

    #[error("Unsupported shape type: {0}")]
    UnsupportedShape(String),

    #[error(transparent)]
    Output(#[from] CommonError),
}

/// Result type for boundary operations.
pub type Result<T> = std::result::Result<T, BoundaryError>;
