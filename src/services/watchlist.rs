use sqlx::PgPool;

use crate::{
    error::{AppError, AppResult},
    models::{WatchlistEntry, WatchlistInput},
};

/// Watchlist entries joined with their movies, most urgent first
pub async fn list(pool: &PgPool) -> AppResult<Vec<WatchlistEntry>> {
    let entries: Vec<WatchlistEntry> = sqlx::query_as(
        "SELECT w.movie_id, m.title, m.original_title, m.release_year, m.poster_url, \
         w.priority, w.notes, w.added_date \
         FROM watchlist w JOIN movies m ON m.id = w.movie_id \
         ORDER BY CASE w.priority WHEN 'high' THEN 0 WHEN 'medium' THEN 1 ELSE 2 END, \
         w.added_date DESC",
    )
    .fetch_all(pool)
    .await?;

    Ok(entries)
}

/// Adds (or re-prioritizes) a movie on the watchlist
///
/// The watchlist upsert and the movie status flip happen in one transaction,
/// so membership and status can never disagree.
pub async fn add(pool: &PgPool, movie_id: i64, input: &WatchlistInput) -> AppResult<()> {
    let mut tx = pool.begin().await?;

    let exists: Option<(i64,)> = sqlx::query_as("SELECT id FROM movies WHERE id = $1")
        .bind(movie_id)
        .fetch_optional(&mut *tx)
        .await?;
    if exists.is_none() {
        return Err(AppError::not_found("Movie not found"));
    }

    sqlx::query(
        "INSERT INTO watchlist (movie_id, priority, notes) VALUES ($1, $2, $3) \
         ON CONFLICT (movie_id) DO UPDATE SET priority = EXCLUDED.priority, \
         notes = EXCLUDED.notes",
    )
    .bind(movie_id)
    .bind(input.priority().as_str())
    .bind(&input.notes)
    .execute(&mut *tx)
    .await?;

    sqlx::query("UPDATE movies SET status = 'watchlist', updated_at = now() WHERE id = $1")
        .bind(movie_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::info!(movie_id = %movie_id, "Movie added to watchlist");

    Ok(())
}

/// Removes a movie from the watchlist, flipping it back to watched
pub async fn remove(pool: &PgPool, movie_id: i64) -> AppResult<()> {
    let mut tx = pool.begin().await?;

    let deleted = sqlx::query("DELETE FROM watchlist WHERE movie_id = $1")
        .bind(movie_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    if deleted == 0 {
        return Err(AppError::not_found("Movie is not on the watchlist"));
    }

    sqlx::query("UPDATE movies SET status = 'watched', updated_at = now() WHERE id = $1")
        .bind(movie_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::info!(movie_id = %movie_id, "Movie removed from watchlist");

    Ok(())
}
