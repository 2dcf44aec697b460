use sqlx::PgPool;

use crate::{
    error::{AppError, AppResult},
    models::{Actor, ActorInput, ActorStats, Movie},
};

/// All actors, alphabetically
pub async fn list(pool: &PgPool) -> AppResult<Vec<Actor>> {
    let actors: Vec<Actor> = sqlx::query_as("SELECT * FROM actors ORDER BY name")
        .fetch_all(pool)
        .await?;
    Ok(actors)
}

/// Single actor by id
pub async fn get(pool: &PgPool, id: i64) -> AppResult<Actor> {
    sqlx::query_as("SELECT * FROM actors WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::not_found("Actor not found"))
}

/// Creates an actor; names are unique
pub async fn create(pool: &PgPool, input: &ActorInput) -> AppResult<Actor> {
    input.validate().map_err(AppError::validation)?;

    let name = input.name.trim();
    if name_taken(pool, name, None).await? {
        return Err(AppError::conflict("Actor with this name already exists"));
    }

    let actor: Actor = sqlx::query_as(
        "INSERT INTO actors (name, biography, birth_date, photo_url) \
         VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(name)
    .bind(&input.biography)
    .bind(input.birth_date)
    .bind(&input.photo_url)
    .fetch_one(pool)
    .await?;

    tracing::info!(actor_id = %actor.id, name = %actor.name, "Actor created");

    Ok(actor)
}

/// Updates an actor
pub async fn update(pool: &PgPool, id: i64, input: &ActorInput) -> AppResult<Actor> {
    input.validate().map_err(AppError::validation)?;

    let name = input.name.trim();
    if name_taken(pool, name, Some(id)).await? {
        return Err(AppError::conflict("Actor with this name already exists"));
    }

    sqlx::query_as(
        "UPDATE actors SET name = $1, biography = $2, birth_date = $3, photo_url = $4 \
         WHERE id = $5 RETURNING *",
    )
    .bind(name)
    .bind(&input.biography)
    .bind(input.birth_date)
    .bind(&input.photo_url)
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::not_found("Actor not found"))
}

/// Deletes an actor, refused while any movie references them
pub async fn delete(pool: &PgPool, id: i64) -> AppResult<()> {
    let (movie_count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM movie_actors WHERE actor_id = $1")
            .bind(id)
            .fetch_one(pool)
            .await?;

    if movie_count > 0 {
        return Err(AppError::conflict(format!(
            "Actor is referenced by {} movie(s) and cannot be deleted",
            movie_count
        )));
    }

    let deleted = sqlx::query("DELETE FROM actors WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?
        .rows_affected();

    if deleted == 0 {
        return Err(AppError::not_found("Actor not found"));
    }

    tracing::info!(actor_id = %id, "Actor deleted");

    Ok(())
}

/// Name search
pub async fn search(pool: &PgPool, query: &str) -> AppResult<Vec<Actor>> {
    let actors: Vec<Actor> =
        sqlx::query_as("SELECT * FROM actors WHERE name ILIKE $1 ORDER BY name LIMIT 20")
            .bind(format!("%{}%", query))
            .fetch_all(pool)
            .await?;
    Ok(actors)
}

/// Movie counts per actor
pub async fn stats(pool: &PgPool) -> AppResult<Vec<ActorStats>> {
    let stats: Vec<ActorStats> = sqlx::query_as(
        "SELECT a.id, a.name, COUNT(ma.movie_id) AS movie_count \
         FROM actors a LEFT JOIN movie_actors ma ON ma.actor_id = a.id \
         GROUP BY a.id, a.name ORDER BY movie_count DESC, a.name",
    )
    .fetch_all(pool)
    .await?;
    Ok(stats)
}

/// All movies an actor appears in
pub async fn movies(pool: &PgPool, id: i64) -> AppResult<Vec<Movie>> {
    // 404 for an unknown actor rather than an empty filmography
    get(pool, id).await?;

    let movies: Vec<Movie> = sqlx::query_as(
        "SELECT m.* FROM movies m JOIN movie_actors ma ON ma.movie_id = m.id \
         WHERE ma.actor_id = $1 ORDER BY m.release_year DESC",
    )
    .bind(id)
    .fetch_all(pool)
    .await?;

    Ok(movies)
}

async fn name_taken(pool: &PgPool, name: &str, exclude_id: Option<i64>) -> AppResult<bool> {
    let existing: Option<(i64,)> = sqlx::query_as("SELECT id FROM actors WHERE name = $1")
        .bind(name)
        .fetch_optional(pool)
        .await?;

    Ok(match (existing, exclude_id) {
        (Some((found,)), Some(id)) => found != id,
        (Some(_), None) => true,
        (None, _) => false,
    })
}
