use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::{
        Movie, MovieDetail, MovieFilters, MovieInput, MovieStatus, PageParams, WatchlistEntry,
        WatchlistInput,
    },
    services::{movies, watchlist},
};

use super::{ApiResponse, AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/search", get(search))
        .route("/watchlist", get(get_watchlist))
        .route("/:id", get(detail).put(update).delete(delete_movie))
        .route(
            "/:movie_id/watchlist",
            post(add_to_watchlist).delete(remove_from_watchlist),
        )
}

/// Query parameters of the movie list endpoint
///
/// Flat on purpose: axum's Query extractor cannot see through serde(flatten),
/// so pagination and filters are split out here.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MovieListQuery {
    page: Option<i64>,
    limit: Option<i64>,
    genre: Option<String>,
    min_rating: Option<f64>,
    max_rating: Option<f64>,
    search: Option<String>,
    status: Option<MovieStatus>,
    sort_by: Option<String>,
    sort_order: Option<String>,
}

/// Paginated, filtered movie listing
async fn list(
    State(state): State<AppState>,
    Query(query): Query<MovieListQuery>,
) -> AppResult<Json<ApiResponse<Vec<Movie>>>> {
    let filters = MovieFilters {
        genre: query.genre,
        min_rating: query.min_rating,
        max_rating: query.max_rating,
        search: query.search,
        status: query.status,
        sort_by: query.sort_by,
        sort_order: query.sort_order,
    };
    let (page, limit) = PageParams {
        page: query.page,
        limit: query.limit,
    }
    .resolve();

    let (items, pagination) = movies::list(&state.pool, &filters, page, limit).await?;
    Ok(Json(ApiResponse::paginated(items, pagination)))
}

/// Movie detail with genres, actors and reviews
async fn detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<MovieDetail>>> {
    let movie = movies::get(&state.pool, id).await?;
    Ok(Json(ApiResponse::ok(movie)))
}

/// Creates a movie
async fn create(
    State(state): State<AppState>,
    Json(input): Json<MovieInput>,
) -> AppResult<(StatusCode, Json<ApiResponse<MovieDetail>>)> {
    let movie = movies::create(&state.pool, input).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(movie))))
}

/// Full update of a movie
async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<MovieInput>,
) -> AppResult<Json<ApiResponse<MovieDetail>>> {
    let movie = movies::update(&state.pool, id, input).await?;
    Ok(Json(ApiResponse::ok(movie)))
}

/// Deletes a movie
async fn delete_movie(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<()>>> {
    movies::delete(&state.pool, id).await?;
    Ok(Json(ApiResponse::message("Movie deleted")))
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    q: Option<String>,
}

/// Free-text movie search; queries must be at least two characters
async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> AppResult<Json<ApiResponse<Vec<Movie>>>> {
    let query = validate_search_query(params.q.as_deref())?;
    let items = movies::search(&state.pool, query).await?;
    Ok(Json(ApiResponse::ok(items)))
}

/// The full watchlist, most urgent first
async fn get_watchlist(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<WatchlistEntry>>>> {
    let entries = watchlist::list(&state.pool).await?;
    Ok(Json(ApiResponse::ok(entries)))
}

/// Adds a movie to the watchlist and flips its status
async fn add_to_watchlist(
    State(state): State<AppState>,
    Path(movie_id): Path<i64>,
    Json(input): Json<WatchlistInput>,
) -> AppResult<Json<ApiResponse<()>>> {
    watchlist::add(&state.pool, movie_id, &input).await?;
    Ok(Json(ApiResponse::message("Movie added to watchlist")))
}

/// Removes a movie from the watchlist, flipping it back to watched
async fn remove_from_watchlist(
    State(state): State<AppState>,
    Path(movie_id): Path<i64>,
) -> AppResult<Json<ApiResponse<()>>> {
    watchlist::remove(&state.pool, movie_id).await?;
    Ok(Json(ApiResponse::message("Movie removed from watchlist")))
}

/// Shared search-query validation used by the search endpoints
pub(crate) fn validate_search_query(q: Option<&str>) -> AppResult<&str> {
    let q = q.unwrap_or("").trim();
    if q.chars().count() < 2 {
        return Err(AppError::validation(
            "Search query must be at least 2 characters",
        ));
    }
    Ok(q)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_query_min_length() {
        assert!(validate_search_query(None).is_err());
        assert!(validate_search_query(Some("")).is_err());
        assert!(validate_search_query(Some(" a ")).is_err());
        assert!(validate_search_query(Some("ab")).is_ok());
        // Two Cyrillic characters count as two, not four bytes
        assert!(validate_search_query(Some("Бр")).is_ok());
    }
}
