use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::{
    error::AppResult,
    models::{Genre, GenreInput, GenreStats},
    services::genres,
};

use super::{movies::validate_search_query, ApiResponse, AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/search", get(search))
        .route("/stats", get(stats))
        .route("/:id", get(detail).put(update).delete(delete_genre))
}

/// All genres
async fn list(State(state): State<AppState>) -> AppResult<Json<ApiResponse<Vec<Genre>>>> {
    let items = genres::list(&state.pool).await?;
    Ok(Json(ApiResponse::ok(items)))
}

/// Single genre
async fn detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Genre>>> {
    let genre = genres::get(&state.pool, id).await?;
    Ok(Json(ApiResponse::ok(genre)))
}

/// Creates a genre
async fn create(
    State(state): State<AppState>,
    Json(input): Json<GenreInput>,
) -> AppResult<(StatusCode, Json<ApiResponse<Genre>>)> {
    let genre = genres::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(genre))))
}

/// Updates a genre
async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<GenreInput>,
) -> AppResult<Json<ApiResponse<Genre>>> {
    let genre = genres::update(&state.pool, id, &input).await?;
    Ok(Json(ApiResponse::ok(genre)))
}

/// Deletes a genre unless movies still reference it
async fn delete_genre(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<()>>> {
    genres::delete(&state.pool, id).await?;
    Ok(Json(ApiResponse::message("Genre deleted")))
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    q: Option<String>,
}

/// Genre name search
async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> AppResult<Json<ApiResponse<Vec<Genre>>>> {
    let query = validate_search_query(params.q.as_deref())?;
    let items = genres::search(&state.pool, query).await?;
    Ok(Json(ApiResponse::ok(items)))
}

/// Per-genre usage statistics
async fn stats(State(state): State<AppState>) -> AppResult<Json<ApiResponse<Vec<GenreStats>>>> {
    let items = genres::stats(&state.pool).await?;
    Ok(Json(ApiResponse::ok(items)))
}
