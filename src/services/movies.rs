use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};

use crate::{
    error::{AppError, AppResult},
    models::{
        Actor, Genre, Movie, MovieDetail, MovieFilters, MovieInput, Pagination, Reference, Review,
    },
};

/// Select list shared by every movie query: the row plus the comma-joined
/// genre names and the average review rating.
const MOVIE_SELECT: &str = r#"
    SELECT m.*,
        (SELECT string_agg(g.name, ', ' ORDER BY g.name)
            FROM movie_genres mg JOIN genres g ON g.id = mg.genre_id
            WHERE mg.movie_id = m.id) AS genres,
        (SELECT AVG(r.rating)::float8 FROM reviews r WHERE r.movie_id = m.id) AS avg_rating
    FROM movies m
    WHERE 1=1
"#;

/// Appends the optional filter predicates, ANDed together
///
/// Every value goes through a bind parameter; the only text spliced into the
/// SQL is the whitelisted sort column, which never comes from user input.
fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filters: &MovieFilters) {
    if let Some(ref genre) = filters.genre {
        qb.push(
            " AND EXISTS (SELECT 1 FROM movie_genres mg JOIN genres g ON g.id = mg.genre_id \
             WHERE mg.movie_id = m.id AND g.name = ",
        )
        .push_bind(genre.clone())
        .push(")");
    }
    if let Some(min_rating) = filters.min_rating {
        qb.push(" AND (SELECT AVG(r.rating)::float8 FROM reviews r WHERE r.movie_id = m.id) >= ")
            .push_bind(min_rating);
    }
    if let Some(max_rating) = filters.max_rating {
        qb.push(" AND (SELECT AVG(r.rating)::float8 FROM reviews r WHERE r.movie_id = m.id) <= ")
            .push_bind(max_rating);
    }
    if let Some(ref search) = filters.search {
        let pattern = format!("%{}%", search);
        qb.push(" AND (m.title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR m.original_title ILIKE ")
            .push_bind(pattern.clone())
            .push(
                " OR EXISTS (SELECT 1 FROM movie_actors ma JOIN actors a ON a.id = ma.actor_id \
                 WHERE ma.movie_id = m.id AND a.name ILIKE ",
            )
            .push_bind(pattern)
            .push("))");
    }
    if let Some(status) = filters.status {
        qb.push(" AND m.status = ").push_bind(status.as_str());
    }
}

/// Paginated, filtered movie listing
pub async fn list(
    pool: &PgPool,
    filters: &MovieFilters,
    page: i64,
    limit: i64,
) -> AppResult<(Vec<Movie>, Pagination)> {
    let mut count_qb: QueryBuilder<Postgres> =
        QueryBuilder::new("SELECT COUNT(*) FROM movies m WHERE 1=1");
    push_filters(&mut count_qb, filters);
    let total: i64 = count_qb.build_query_scalar().fetch_one(pool).await?;

    let pagination = Pagination::new(page, limit, total);

    let (sort_column, sort_direction) = filters.sort();
    let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(MOVIE_SELECT);
    push_filters(&mut qb, filters);
    qb.push(" ORDER BY m.")
        .push(sort_column)
        .push(" ")
        .push(sort_direction)
        .push(" LIMIT ")
        .push_bind(limit)
        .push(" OFFSET ")
        .push_bind(pagination.offset());

    let movies: Vec<Movie> = qb.build_query_as().fetch_all(pool).await?;

    Ok((movies, pagination))
}

/// Movie detail with genres, actors and reviews
pub async fn get(pool: &PgPool, id: i64) -> AppResult<MovieDetail> {
    let mut movie = fetch_movie(pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Movie not found"))?;
    // The detail payload carries the full genre list; the concatenated names
    // would collide with it under the flattened serialization
    movie.genres = None;

    let genres: Vec<Genre> = sqlx::query_as(
        "SELECT g.* FROM genres g JOIN movie_genres mg ON mg.genre_id = g.id \
         WHERE mg.movie_id = $1 ORDER BY g.name",
    )
    .bind(id)
    .fetch_all(pool)
    .await?;

    let actors: Vec<Actor> = sqlx::query_as(
        "SELECT a.* FROM actors a JOIN movie_actors ma ON ma.actor_id = a.id \
         WHERE ma.movie_id = $1 ORDER BY a.name",
    )
    .bind(id)
    .fetch_all(pool)
    .await?;

    let reviews: Vec<Review> = sqlx::query_as(
        "SELECT * FROM reviews WHERE movie_id = $1 ORDER BY review_date DESC",
    )
    .bind(id)
    .fetch_all(pool)
    .await?;

    Ok(MovieDetail {
        movie,
        genres,
        actors,
        reviews,
    })
}

async fn fetch_movie(pool: &PgPool, id: i64) -> AppResult<Option<Movie>> {
    let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(MOVIE_SELECT);
    qb.push(" AND m.id = ").push_bind(id);
    Ok(qb.build_query_as().fetch_optional(pool).await?)
}

/// Creates a movie together with its genre and actor links
///
/// Name references are resolved inside the same transaction as the movie
/// write, so a half-created movie never becomes visible.
pub async fn create(pool: &PgPool, input: MovieInput) -> AppResult<MovieDetail> {
    input.validate().map_err(AppError::validation)?;

    let mut tx = pool.begin().await?;

    let (movie_id,): (i64,) = sqlx::query_as(
        "INSERT INTO movies (title, original_title, release_year, director, poster_url, \
         trailer_url, duration, description, country, language) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING id",
    )
    .bind(&input.title)
    .bind(&input.original_title)
    .bind(input.release_year)
    .bind(&input.director)
    .bind(&input.poster_url)
    .bind(&input.trailer_url)
    .bind(input.duration)
    .bind(&input.description)
    .bind(&input.country)
    .bind(&input.language)
    .fetch_one(&mut *tx)
    .await?;

    link_genres(&mut tx, movie_id, &input.genres).await?;
    link_actors(&mut tx, movie_id, &input.actors).await?;

    tx.commit().await?;

    tracing::info!(movie_id = %movie_id, title = %input.title, "Movie created");

    get(pool, movie_id).await
}

/// Full update of a movie and its genre/actor links
pub async fn update(pool: &PgPool, id: i64, input: MovieInput) -> AppResult<MovieDetail> {
    input.validate().map_err(AppError::validation)?;

    let mut tx = pool.begin().await?;

    let updated = sqlx::query(
        "UPDATE movies SET title = $1, original_title = $2, release_year = $3, director = $4, \
         poster_url = $5, trailer_url = $6, duration = $7, description = $8, country = $9, \
         language = $10, updated_at = now() WHERE id = $11",
    )
    .bind(&input.title)
    .bind(&input.original_title)
    .bind(input.release_year)
    .bind(&input.director)
    .bind(&input.poster_url)
    .bind(&input.trailer_url)
    .bind(input.duration)
    .bind(&input.description)
    .bind(&input.country)
    .bind(&input.language)
    .bind(id)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    if updated == 0 {
        return Err(AppError::not_found("Movie not found"));
    }

    // The payload is authoritative for links: rewrite both join tables
    sqlx::query("DELETE FROM movie_genres WHERE movie_id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM movie_actors WHERE movie_id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    link_genres(&mut tx, id, &input.genres).await?;
    link_actors(&mut tx, id, &input.actors).await?;

    tx.commit().await?;

    tracing::info!(movie_id = %id, "Movie updated");

    get(pool, id).await
}

/// Deletes a movie; reviews, links and watchlist rows cascade
pub async fn delete(pool: &PgPool, id: i64) -> AppResult<()> {
    let deleted = sqlx::query("DELETE FROM movies WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?
        .rows_affected();

    if deleted == 0 {
        return Err(AppError::not_found("Movie not found"));
    }

    tracing::info!(movie_id = %id, "Movie deleted");

    Ok(())
}

/// Free-text search across title, original title and actor names
pub async fn search(pool: &PgPool, query: &str) -> AppResult<Vec<Movie>> {
    let pattern = format!("%{}%", query);
    let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(MOVIE_SELECT);
    qb.push(" AND (m.title ILIKE ")
        .push_bind(pattern.clone())
        .push(" OR m.original_title ILIKE ")
        .push_bind(pattern.clone())
        .push(
            " OR EXISTS (SELECT 1 FROM movie_actors ma JOIN actors a ON a.id = ma.actor_id \
             WHERE ma.movie_id = m.id AND a.name ILIKE ",
        )
        .push_bind(pattern)
        .push(")) ORDER BY m.title LIMIT 20");

    Ok(qb.build_query_as().fetch_all(pool).await?)
}

/// Resolves genre references and writes the join rows
async fn link_genres(
    tx: &mut Transaction<'_, Postgres>,
    movie_id: i64,
    refs: &[Reference],
) -> AppResult<()> {
    let mut seen = Vec::new();
    for reference in refs {
        let genre_id = match reference {
            Reference::ById(id) => *id,
            Reference::ByName { name } => {
                resolve_by_name(tx, "genres", name).await?
            }
        };
        if seen.contains(&genre_id) {
            continue;
        }
        seen.push(genre_id);
        sqlx::query("INSERT INTO movie_genres (movie_id, genre_id) VALUES ($1, $2)")
            .bind(movie_id)
            .bind(genre_id)
            .execute(&mut **tx)
            .await?;
    }
    Ok(())
}

/// Resolves actor references and writes the join rows
async fn link_actors(
    tx: &mut Transaction<'_, Postgres>,
    movie_id: i64,
    refs: &[Reference],
) -> AppResult<()> {
    let mut seen = Vec::new();
    for reference in refs {
        let actor_id = match reference {
            Reference::ById(id) => *id,
            Reference::ByName { name } => {
                resolve_by_name(tx, "actors", name).await?
            }
        };
        if seen.contains(&actor_id) {
            continue;
        }
        seen.push(actor_id);
        sqlx::query("INSERT INTO movie_actors (movie_id, actor_id) VALUES ($1, $2)")
            .bind(movie_id)
            .bind(actor_id)
            .execute(&mut **tx)
            .await?;
    }
    Ok(())
}

/// Lookup-or-create on a unique name within the surrounding transaction
///
/// `table` is always one of the two literal names passed above; user data only
/// travels through the bind parameter.
async fn resolve_by_name(
    tx: &mut Transaction<'_, Postgres>,
    table: &str,
    name: &str,
) -> AppResult<i64> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::validation("Reference name must not be empty"));
    }

    let existing: Option<(i64,)> =
        sqlx::query_as(&format!("SELECT id FROM {} WHERE name = $1", table))
            .bind(name)
            .fetch_optional(&mut **tx)
            .await?;

    if let Some((id,)) = existing {
        return Ok(id);
    }

    let (id,): (i64,) =
        sqlx::query_as(&format!("INSERT INTO {} (name) VALUES ($1) RETURNING id", table))
            .bind(name)
            .fetch_one(&mut **tx)
            .await?;

    Ok(id)
}
