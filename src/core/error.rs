//! Error type for the command-line surface
//!
//! The transformation engine itself cannot fail; everything here comes from
//! reading input, parsing documents, importing or editing.

use super::edit::EditError;
use super::import::ImportError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Import failed: {0}")]
    Import(#[from] ImportError),

    #[error("Edit rejected: {0}")]
    Edit(#[from] EditError),

    #[error("Entity '{0}' not found")]
    EntityNotFound(String),
}

pub type AppResult<T> = Result<T, AppError>;
