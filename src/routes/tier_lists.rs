use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::{
    error::AppResult,
    models::{
        AddTierMovieInput, MoveTierMovieInput, TierList, TierListDetail, TierListInput,
        TierListRename, TierListSummary,
    },
    services::tier_lists,
};

use super::{ApiResponse, AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:id", get(detail).put(rename).delete(delete_list))
        .route("/:id/movies", axum::routing::post(add_movie))
        .route(
            "/:id/movies/:movie_id",
            axum::routing::put(move_movie).delete(remove_movie),
        )
}

/// All tier lists with assignment counts
async fn list(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<TierListSummary>>>> {
    let items = tier_lists::list(&state.pool).await?;
    Ok(Json(ApiResponse::ok(items)))
}

/// Creates a tier list, optionally seeding initial movies into tier C
async fn create(
    State(state): State<AppState>,
    Json(input): Json<TierListInput>,
) -> AppResult<(StatusCode, Json<ApiResponse<TierListDetail>>)> {
    let detail = tier_lists::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(detail))))
}

/// Full board state of one tier list
async fn detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<TierListDetail>>> {
    let detail = tier_lists::get(&state.pool, id).await?;
    Ok(Json(ApiResponse::ok(detail)))
}

/// Renames a tier list
async fn rename(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<TierListRename>,
) -> AppResult<Json<ApiResponse<TierList>>> {
    let tier_list = tier_lists::rename(&state.pool, id, &input.name).await?;
    Ok(Json(ApiResponse::ok(tier_list)))
}

/// Deletes a tier list and its assignments
async fn delete_list(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<()>>> {
    tier_lists::delete(&state.pool, id).await?;
    Ok(Json(ApiResponse::message("Tier list deleted")))
}

/// Places a movie into a bucket of the list
async fn add_movie(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<AddTierMovieInput>,
) -> AppResult<(StatusCode, Json<ApiResponse<()>>)> {
    tier_lists::add_movie(&state.pool, id, &input).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::message("Movie added to tier list")),
    ))
}

/// Moves a movie to a tier and position
async fn move_movie(
    State(state): State<AppState>,
    Path((id, movie_id)): Path<(i64, i64)>,
    Json(input): Json<MoveTierMovieInput>,
) -> AppResult<Json<ApiResponse<()>>> {
    tier_lists::move_movie(&state.pool, id, movie_id, &input).await?;
    Ok(Json(ApiResponse::message("Movie position updated")))
}

/// Removes a movie from the list entirely
async fn remove_movie(
    State(state): State<AppState>,
    Path((id, movie_id)): Path<(i64, i64)>,
) -> AppResult<Json<ApiResponse<()>>> {
    tier_lists::remove_movie(&state.pool, id, movie_id).await?;
    Ok(Json(ApiResponse::message("Movie removed from tier list")))
}
