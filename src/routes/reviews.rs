use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::{
        Review, ReviewFilters, ReviewInput, ReviewStats, ReviewUpdate, ReviewWithMovie, Reviewer,
    },
    services::reviews,
};

use super::{ApiResponse, AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list))
        .route("/stats", get(stats))
        .route("/top-rated", get(top_rated))
        .route("/filtered", get(filtered))
        .route("/reviewer/:name", get(by_reviewer))
        .route("/movie/:movie_id", get(for_movie).post(create))
        .route("/:id", axum::routing::put(update).delete(delete_review))
}

/// Every review with its movie title
async fn list(State(state): State<AppState>) -> AppResult<Json<ApiResponse<Vec<ReviewWithMovie>>>> {
    let items = reviews::list(&state.pool).await?;
    Ok(Json(ApiResponse::ok(items)))
}

/// Reviews of one movie
async fn for_movie(
    State(state): State<AppState>,
    Path(movie_id): Path<i64>,
) -> AppResult<Json<ApiResponse<Vec<Review>>>> {
    let items = reviews::for_movie(&state.pool, movie_id).await?;
    Ok(Json(ApiResponse::ok(items)))
}

/// Creates a review for a movie
async fn create(
    State(state): State<AppState>,
    Path(movie_id): Path<i64>,
    Json(input): Json<ReviewInput>,
) -> AppResult<(StatusCode, Json<ApiResponse<Review>>)> {
    let review = reviews::create(&state.pool, movie_id, &input).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(review))))
}

/// Updates a review's rating and text
async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<ReviewUpdate>,
) -> AppResult<Json<ApiResponse<Review>>> {
    let review = reviews::update(&state.pool, id, &input).await?;
    Ok(Json(ApiResponse::ok(review)))
}

/// Deletes a review
async fn delete_review(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<()>>> {
    reviews::delete(&state.pool, id).await?;
    Ok(Json(ApiResponse::message("Review deleted")))
}

/// Aggregate review statistics
async fn stats(State(state): State<AppState>) -> AppResult<Json<ApiResponse<ReviewStats>>> {
    let stats = reviews::stats(&state.pool).await?;
    Ok(Json(ApiResponse::ok(stats)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TopRatedQuery {
    min_rating: Option<i32>,
    limit: Option<i64>,
}

/// Highest-rated reviews, best first
async fn top_rated(
    State(state): State<AppState>,
    Query(params): Query<TopRatedQuery>,
) -> AppResult<Json<ApiResponse<Vec<ReviewWithMovie>>>> {
    let min_rating = params.min_rating.unwrap_or(8);
    let limit = params.limit.unwrap_or(10).clamp(1, 100);
    let items = reviews::top_rated(&state.pool, min_rating, limit).await?;
    Ok(Json(ApiResponse::ok(items)))
}

/// All reviews by one reviewer; the name must be one of the two personas
async fn by_reviewer(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<Json<ApiResponse<Vec<ReviewWithMovie>>>> {
    let reviewer: Reviewer = name.parse().map_err(AppError::validation)?;
    let items = reviews::by_reviewer(&state.pool, reviewer).await?;
    Ok(Json(ApiResponse::ok(items)))
}

/// Reviews matching the optional reviewer/rating/movie filters
async fn filtered(
    State(state): State<AppState>,
    Query(filters): Query<ReviewFilters>,
) -> AppResult<Json<ApiResponse<Vec<ReviewWithMovie>>>> {
    let items = reviews::filtered(&state.pool, &filters).await?;
    Ok(Json(ApiResponse::ok(items)))
}
