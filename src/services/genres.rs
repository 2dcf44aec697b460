use sqlx::PgPool;

use crate::{
    error::{AppError, AppResult},
    models::{Genre, GenreInput, GenreStats},
};

/// All genres, alphabetically
pub async fn list(pool: &PgPool) -> AppResult<Vec<Genre>> {
    let genres: Vec<Genre> = sqlx::query_as("SELECT * FROM genres ORDER BY name")
        .fetch_all(pool)
        .await?;
    Ok(genres)
}

/// Single genre by id
pub async fn get(pool: &PgPool, id: i64) -> AppResult<Genre> {
    sqlx::query_as("SELECT * FROM genres WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::not_found("Genre not found"))
}

/// Creates a genre; names are unique
pub async fn create(pool: &PgPool, input: &GenreInput) -> AppResult<Genre> {
    input.validate().map_err(AppError::validation)?;

    let name = input.name.trim();
    if name_taken(pool, name, None).await? {
        return Err(AppError::conflict("Genre with this name already exists"));
    }

    let genre: Genre =
        sqlx::query_as("INSERT INTO genres (name, description) VALUES ($1, $2) RETURNING *")
            .bind(name)
            .bind(&input.description)
            .fetch_one(pool)
            .await?;

    tracing::info!(genre_id = %genre.id, name = %genre.name, "Genre created");

    Ok(genre)
}

/// Updates a genre's name and description
pub async fn update(pool: &PgPool, id: i64, input: &GenreInput) -> AppResult<Genre> {
    input.validate().map_err(AppError::validation)?;

    let name = input.name.trim();
    if name_taken(pool, name, Some(id)).await? {
        return Err(AppError::conflict("Genre with this name already exists"));
    }

    sqlx::query_as("UPDATE genres SET name = $1, description = $2 WHERE id = $3 RETURNING *")
        .bind(name)
        .bind(&input.description)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::not_found("Genre not found"))
}

/// Deletes a genre, refused while any movie references it
pub async fn delete(pool: &PgPool, id: i64) -> AppResult<()> {
    let (movie_count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM movie_genres WHERE genre_id = $1")
            .bind(id)
            .fetch_one(pool)
            .await?;

    if movie_count > 0 {
        return Err(AppError::conflict(format!(
            "Genre is referenced by {} movie(s) and cannot be deleted",
            movie_count
        )));
    }

    let deleted = sqlx::query("DELETE FROM genres WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?
        .rows_affected();

    if deleted == 0 {
        return Err(AppError::not_found("Genre not found"));
    }

    tracing::info!(genre_id = %id, "Genre deleted");

    Ok(())
}

/// Name search
pub async fn search(pool: &PgPool, query: &str) -> AppResult<Vec<Genre>> {
    let genres: Vec<Genre> =
        sqlx::query_as("SELECT * FROM genres WHERE name ILIKE $1 ORDER BY name LIMIT 20")
            .bind(format!("%{}%", query))
            .fetch_all(pool)
            .await?;
    Ok(genres)
}

/// Movie counts and average ratings per genre
pub async fn stats(pool: &PgPool) -> AppResult<Vec<GenreStats>> {
    let stats: Vec<GenreStats> = sqlx::query_as(
        "SELECT g.id, g.name, COUNT(mg.movie_id) AS movie_count, \
         (SELECT AVG(r.rating)::float8 FROM reviews r \
            JOIN movie_genres mg2 ON mg2.movie_id = r.movie_id \
            WHERE mg2.genre_id = g.id) AS avg_rating \
         FROM genres g LEFT JOIN movie_genres mg ON mg.genre_id = g.id \
         GROUP BY g.id, g.name ORDER BY movie_count DESC, g.name",
    )
    .fetch_all(pool)
    .await?;
    Ok(stats)
}

async fn name_taken(pool: &PgPool, name: &str, exclude_id: Option<i64>) -> AppResult<bool> {
    let existing: Option<(i64,)> = sqlx::query_as("SELECT id FROM genres WHERE name = $1")
        .bind(name)
        .fetch_optional(pool)
        .await?;

    Ok(match (existing, exclude_id) {
        (Some((found,)), Some(id)) => found != id,
        (Some(_), None) => true,
        (None, _) => false,
    })
}
