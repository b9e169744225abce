use axum::{
    extract::{ConnectInfo, Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse},
    Json,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

use super::error::ApiError;
use super::AppState;
use crate::models::{RecipeDetail, RecipeForm, RecipeInput, RecipeSummary, RecipeType, SearchHit};
use crate::render;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Serialize)]
pub struct RecipeList {
    drinks: Vec<RecipeSummary>,
    foods: Vec<RecipeSummary>,
}

pub async fn index_page(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let (drinks, foods) = state.repo.list_all().await?;
    Ok(Html(render::index_page(&drinks, &foods)))
}

pub async fn list_recipes(State(state): State<AppState>) -> Result<Json<RecipeList>, ApiError> {
    let (drinks, foods) = state.repo.list_all().await?;
    Ok(Json(RecipeList { drinks, foods }))
}

#[derive(Deserialize)]
pub struct CreateRequest {
    #[serde(rename = "type")]
    recipe_type: String,
    #[serde(flatten)]
    form: RecipeForm,
}

#[derive(Serialize)]
pub struct Created {
    #[serde(rename = "type")]
    recipe_type: RecipeType,
    id: i64,
}

pub async fn create_recipe(
    State(state): State<AppState>,
    Json(request): Json<CreateRequest>,
) -> Result<(StatusCode, Json<Created>), ApiError> {
    let variant: RecipeType = request.recipe_type.parse()?;
    let input = RecipeInput::from(request.form);
    let id = state.repo.create(variant, &input).await?;
    Ok((
        StatusCode::CREATED,
        Json(Created {
            recipe_type: variant,
            id,
        }),
    ))
}

/// Recipe detail as served to clients: the editor address is anonymized.
#[derive(Serialize)]
pub struct RecipeResponse {
    #[serde(flatten)]
    detail: RecipeDetail,
    last_edited_by: String,
}

pub async fn get_recipe(
    State(state): State<AppState>,
    Path((variant, id)): Path<(String, i64)>,
) -> Result<Json<RecipeResponse>, ApiError> {
    let detail = state.repo.fetch(variant.parse()?, id).await?;
    let last_edited_by = detail.recipe.editor_ip_display();
    Ok(Json(RecipeResponse {
        detail,
        last_edited_by,
    }))
}

/// The editor address comes from the connection, never from the body.
pub async fn update_recipe(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    Path((variant, id)): Path<(String, i64)>,
    Json(form): Json<RecipeForm>,
) -> Result<StatusCode, ApiError> {
    let variant: RecipeType = variant.parse()?;
    let input = RecipeInput::from(form);
    state
        .repo
        .update(variant, id, &input, &peer.ip().to_string())
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_recipe(
    State(state): State<AppState>,
    Path((variant, id)): Path<(String, i64)>,
) -> Result<StatusCode, ApiError> {
    state.repo.delete(variant.parse()?, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn recipe_page(
    State(state): State<AppState>,
    Path((variant, id)): Path<(String, i64)>,
) -> Result<impl IntoResponse, ApiError> {
    let detail = state.repo.fetch(variant.parse()?, id).await?;
    Ok((
        [(header::CONTENT_SECURITY_POLICY, render::CONTENT_SECURITY_POLICY)],
        Html(render::recipe_page(&detail)),
    ))
}

#[derive(Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    q: String,
}

pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<SearchHit>>, ApiError> {
    Ok(Json(state.search.search(&params.q).await?))
}
