use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    error::{AppError, AppResult},
    models::{
        Review, ReviewFilters, ReviewInput, ReviewStats, ReviewUpdate, ReviewWithMovie, Reviewer,
        ReviewerStats,
    },
};

const REVIEW_WITH_MOVIE_SELECT: &str =
    "SELECT r.id, r.movie_id, m.title AS movie_title, r.reviewer_name, r.rating, \
     r.review_text, r.review_date \
     FROM reviews r JOIN movies m ON m.id = r.movie_id WHERE 1=1";

/// Every review, newest first, with movie titles
pub async fn list(pool: &PgPool) -> AppResult<Vec<ReviewWithMovie>> {
    let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(REVIEW_WITH_MOVIE_SELECT);
    qb.push(" ORDER BY r.review_date DESC");
    Ok(qb.build_query_as().fetch_all(pool).await?)
}

/// Reviews of one movie
pub async fn for_movie(pool: &PgPool, movie_id: i64) -> AppResult<Vec<Review>> {
    let reviews: Vec<Review> =
        sqlx::query_as("SELECT * FROM reviews WHERE movie_id = $1 ORDER BY review_date DESC")
            .bind(movie_id)
            .fetch_all(pool)
            .await?;
    Ok(reviews)
}

/// Creates a review for a movie
///
/// Each reviewer may hold at most one review per movie; the existence check
/// runs in the same transaction as the insert.
pub async fn create(pool: &PgPool, movie_id: i64, input: &ReviewInput) -> AppResult<Review> {
    let reviewer = input.validate().map_err(AppError::validation)?;

    let mut tx = pool.begin().await?;

    let movie: Option<(i64,)> = sqlx::query_as("SELECT id FROM movies WHERE id = $1")
        .bind(movie_id)
        .fetch_optional(&mut *tx)
        .await?;
    if movie.is_none() {
        return Err(AppError::not_found("Movie not found"));
    }

    let existing: Option<(i64,)> = sqlx::query_as(
        "SELECT id FROM reviews WHERE movie_id = $1 AND reviewer_name = $2",
    )
    .bind(movie_id)
    .bind(reviewer.as_str())
    .fetch_optional(&mut *tx)
    .await?;
    if existing.is_some() {
        return Err(AppError::conflict(format!(
            "{} has already reviewed this movie",
            reviewer
        )));
    }

    let review: Review = sqlx::query_as(
        "INSERT INTO reviews (movie_id, reviewer_name, rating, review_text) \
         VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(movie_id)
    .bind(reviewer.as_str())
    .bind(input.rating)
    .bind(input.review_text.trim())
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!(
        review_id = %review.id,
        movie_id = %movie_id,
        reviewer = %reviewer,
        rating = %input.rating,
        "Review created"
    );

    Ok(review)
}

/// Updates an existing review's rating and text
pub async fn update(pool: &PgPool, id: i64, input: &ReviewUpdate) -> AppResult<Review> {
    input.validate().map_err(AppError::validation)?;

    sqlx::query_as(
        "UPDATE reviews SET rating = $1, review_text = $2, review_date = now() \
         WHERE id = $3 RETURNING *",
    )
    .bind(input.rating)
    .bind(input.review_text.trim())
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::not_found("Review not found"))
}

/// Deletes a review
pub async fn delete(pool: &PgPool, id: i64) -> AppResult<()> {
    let deleted = sqlx::query("DELETE FROM reviews WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?
        .rows_affected();

    if deleted == 0 {
        return Err(AppError::not_found("Review not found"));
    }

    tracing::info!(review_id = %id, "Review deleted");

    Ok(())
}

/// Overall counts and averages, with the per-reviewer breakdown
pub async fn stats(pool: &PgPool) -> AppResult<ReviewStats> {
    let (total_reviews, avg_rating): (i64, Option<f64>) =
        sqlx::query_as("SELECT COUNT(*), AVG(rating)::float8 FROM reviews")
            .fetch_one(pool)
            .await?;

    let reviewers: Vec<ReviewerStats> = sqlx::query_as(
        "SELECT reviewer_name, COUNT(*) AS review_count, AVG(rating)::float8 AS avg_rating \
         FROM reviews GROUP BY reviewer_name ORDER BY reviewer_name",
    )
    .fetch_all(pool)
    .await?;

    Ok(ReviewStats {
        total_reviews,
        avg_rating,
        reviewers,
    })
}

/// Reviews at or above the rating threshold, best first
pub async fn top_rated(pool: &PgPool, min_rating: i32, limit: i64) -> AppResult<Vec<ReviewWithMovie>> {
    let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(REVIEW_WITH_MOVIE_SELECT);
    qb.push(" AND r.rating >= ")
        .push_bind(min_rating)
        .push(" ORDER BY r.rating DESC, r.review_date DESC LIMIT ")
        .push_bind(limit);
    Ok(qb.build_query_as().fetch_all(pool).await?)
}

/// All reviews by one of the two reviewers
pub async fn by_reviewer(pool: &PgPool, reviewer: Reviewer) -> AppResult<Vec<ReviewWithMovie>> {
    let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(REVIEW_WITH_MOVIE_SELECT);
    qb.push(" AND r.reviewer_name = ")
        .push_bind(reviewer.as_str())
        .push(" ORDER BY r.review_date DESC");
    Ok(qb.build_query_as().fetch_all(pool).await?)
}

/// Reviews matching the optional reviewer/rating/movie filters
pub async fn filtered(pool: &PgPool, filters: &ReviewFilters) -> AppResult<Vec<ReviewWithMovie>> {
    if let Some(ref reviewer) = filters.reviewer {
        reviewer
            .parse::<Reviewer>()
            .map_err(AppError::validation)?;
    }

    let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(REVIEW_WITH_MOVIE_SELECT);
    if let Some(ref reviewer) = filters.reviewer {
        qb.push(" AND r.reviewer_name = ").push_bind(reviewer.clone());
    }
    if let Some(min_rating) = filters.min_rating {
        qb.push(" AND r.rating >= ").push_bind(min_rating);
    }
    if let Some(max_rating) = filters.max_rating {
        qb.push(" AND r.rating <= ").push_bind(max_rating);
    }
    if let Some(movie_id) = filters.movie_id {
        qb.push(" AND r.movie_id = ").push_bind(movie_id);
    }
    qb.push(" ORDER BY r.review_date DESC");

    Ok(qb.build_query_as().fetch_all(pool).await?)
}
