use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::{
    error::AppResult,
    models::{Actor, ActorInput, ActorStats, Movie},
    services::actors,
};

use super::{movies::validate_search_query, ApiResponse, AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/search", get(search))
        .route("/stats", get(stats))
        .route("/:id", get(detail).put(update).delete(delete_actor))
        .route("/:id/movies", get(actor_movies))
}

/// All actors
async fn list(State(state): State<AppState>) -> AppResult<Json<ApiResponse<Vec<Actor>>>> {
    let items = actors::list(&state.pool).await?;
    Ok(Json(ApiResponse::ok(items)))
}

/// Single actor
async fn detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Actor>>> {
    let actor = actors::get(&state.pool, id).await?;
    Ok(Json(ApiResponse::ok(actor)))
}

/// Creates an actor
async fn create(
    State(state): State<AppState>,
    Json(input): Json<ActorInput>,
) -> AppResult<(StatusCode, Json<ApiResponse<Actor>>)> {
    let actor = actors::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(actor))))
}

/// Updates an actor
async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<ActorInput>,
) -> AppResult<Json<ApiResponse<Actor>>> {
    let actor = actors::update(&state.pool, id, &input).await?;
    Ok(Json(ApiResponse::ok(actor)))
}

/// Deletes an actor unless movies still reference them
async fn delete_actor(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<()>>> {
    actors::delete(&state.pool, id).await?;
    Ok(Json(ApiResponse::message("Actor deleted")))
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    q: Option<String>,
}

/// Actor name search
async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> AppResult<Json<ApiResponse<Vec<Actor>>>> {
    let query = validate_search_query(params.q.as_deref())?;
    let items = actors::search(&state.pool, query).await?;
    Ok(Json(ApiResponse::ok(items)))
}

/// Per-actor usage statistics
async fn stats(State(state): State<AppState>) -> AppResult<Json<ApiResponse<Vec<ActorStats>>>> {
    let items = actors::stats(&state.pool).await?;
    Ok(Json(ApiResponse::ok(items)))
}

/// An actor's filmography
async fn actor_movies(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Vec<Movie>>>> {
    let items = actors::movies(&state.pool, id).await?;
    Ok(Json(ApiResponse::ok(items)))
}
