//! Recipebox
//!
//! Storage and normalization layer for drink and food recipes: the recipe
//! repository with replace-on-edit updates, custom CSS sanitization, editor
//! address anonymization and cross-variant search.

pub mod config;
pub mod css;
pub mod db;
pub mod error;
pub mod ip;
pub mod models;
pub mod render;
pub mod server;

pub use css::{sanitize, SanitizedCss};
pub use db::{init_db, RecipeRepository, SearchIndex};
pub use error::RecipeError;
pub use ip::anonymize;
pub use models::{
    Direction, Ingredient, ParentRef, Recipe, RecipeDetail, RecipeForm, RecipeInput,
    RecipeSummary, RecipeType, SearchHit, Unit,
};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
