//! Mapping of repository errors onto HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::error::RecipeError;

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
}

/// Handler error; wraps [`RecipeError`] so it can be returned with `?`.
#[derive(Debug)]
pub struct ApiError(pub RecipeError);

impl From<RecipeError> for ApiError {
    fn from(e: RecipeError) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match &self.0 {
            RecipeError::InvalidVariant(_) => (
                StatusCode::BAD_REQUEST,
                "invalid_recipe_type",
                "Invalid recipe type.".to_string(),
            ),
            RecipeError::NotFound { .. } => (
                StatusCode::NOT_FOUND,
                "recipe_not_found",
                "Recipe not found.".to_string(),
            ),
            RecipeError::Validation(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_failed",
                msg.clone(),
            ),
            RecipeError::Storage(e) => {
                tracing::error!("Storage failure: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "storage_error",
                    "The operation failed and no changes were saved.".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error, message })).into_response()
    }
}
