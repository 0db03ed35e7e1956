// src/routes/tree.rs

use axum::{extract::{Path, State}, Json};

use super::{fetch_view, parse_id};
use crate::error::{AppError, AppResult};
use crate::models::Tree;
use crate::tree::{build, Shape};
use crate::views::View;
use crate::AppState;

async fn render(state: &AppState, shape: Shape) -> AppResult<Json<Tree>> {
    let (view, id) = View::for_shape(shape);
    let rows = fetch_view(state, view, id).await?;
    Ok(Json(build(shape, rows)?))
}

/// GET /tree
pub async fn all_bins(State(state): State<AppState>) -> AppResult<Json<Tree>> {
    render(&state, Shape::BinCounts).await
}

/// GET /tree/bin/:n
pub async fn similar_bins(State(state): State<AppState>, Path(raw): Path<String>) -> AppResult<Json<Tree>> {
    let bin = parse_id(&raw)?;
    render(&state, Shape::SimilarBins { bin }).await
}

/// GET /tree/feature/:n
///
/// `n` has to be an integer but every bin's features are returned.
pub async fn bin_features(State(state): State<AppState>, Path(raw): Path<String>) -> AppResult<Json<Tree>> {
    parse_id(&raw)?;
    render(&state, Shape::BinFeatures).await
}

/// GET /tree/entityfeatures
pub async fn entity_features(State(state): State<AppState>) -> AppResult<Json<Tree>> {
    render(&state, Shape::EntityFeatures).await
}

/// GET /tree/bin/entities/:n
pub async fn bin_entities(State(state): State<AppState>, Path(raw): Path<String>) -> AppResult<Json<Tree>> {
    let bin = parse_id(&raw)?;
    render(&state, Shape::BinEntities { bin }).await
}

/// GET /tree/bin/, /tree/feature/, /tree/bin/entities/
pub async fn missing_id() -> AppError {
    AppError::BadRequest("missing bin id".into())
}
