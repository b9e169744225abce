//! HTTP surface for the recipe store.
//!
//! # Endpoints
//!
//! - `GET /health`: Health check
//! - `GET /`: Index page listing drinks and foods
//! - `GET /recipes`: Recipe summaries as JSON
//! - `POST /recipes`: Create a recipe (`type` is `drink` or `food`)
//! - `GET|PUT|DELETE /recipes/{type}/{id}`: Read, replace or delete one recipe
//! - `GET /recipes/{type}/{id}/page`: Public HTML page with the custom CSS inlined
//! - `GET /search?q=`: Substring search across both recipe types

mod error;
mod handlers;

pub use error::{ApiError, ErrorBody};

use axum::{routing::get, Router};
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

use crate::db::{RecipeRepository, SearchIndex};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub repo: RecipeRepository,
    pub search: SearchIndex,
}

impl AppState {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            repo: RecipeRepository::new(pool.clone()),
            search: SearchIndex::new(pool),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/", get(handlers::index_page))
        .route(
            "/recipes",
            get(handlers::list_recipes).post(handlers::create_recipe),
        )
        .route(
            "/recipes/{variant}/{id}",
            get(handlers::get_recipe)
                .put(handlers::update_recipe)
                .delete(handlers::delete_recipe),
        )
        .route("/recipes/{variant}/{id}/page", get(handlers::recipe_page))
        .route("/search", get(handlers::search))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
