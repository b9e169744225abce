//! Error types for recipe storage operations.

use thiserror::Error;

use crate::models::RecipeType;

/// Errors returned by the repository and search index.
#[derive(Error, Debug)]
pub enum RecipeError {
    #[error("Invalid recipe type '{0}'. Valid options: drink, food")]
    InvalidVariant(String),

    #[error("Recipe not found: {variant} #{id}")]
    NotFound { variant: RecipeType, id: i64 },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// Storage failure. The operation was rolled back and is not retried.
    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

impl RecipeError {
    pub fn validation(message: impl Into<String>) -> Self {
        RecipeError::Validation(message.into())
    }
}
