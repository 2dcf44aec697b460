use sqlx::{FromRow, PgPool, Postgres, Transaction};

use crate::{
    error::{AppError, AppResult},
    models::{
        AddTierMovieInput, BoardError, Movie, MoveTierMovieInput, Tier, TierBoard, TierList,
        TierListDetail, TierListInput, TierListSummary, TierMovie,
    },
};

/// All tier lists with their assignment counts, newest first
pub async fn list(pool: &PgPool) -> AppResult<Vec<TierListSummary>> {
    let lists: Vec<TierListSummary> = sqlx::query_as(
        "SELECT tl.id, tl.name, tl.created_at, COUNT(tlm.movie_id) AS movie_count \
         FROM tier_lists tl LEFT JOIN tier_list_movies tlm ON tlm.tier_list_id = tl.id \
         GROUP BY tl.id ORDER BY tl.created_at DESC",
    )
    .fetch_all(pool)
    .await?;
    Ok(lists)
}

/// Creates a tier list, seeding any initial movies into the default tier
///
/// Initial movies land in tier C at dense positions in the order given.
pub async fn create(pool: &PgPool, input: &TierListInput) -> AppResult<TierListDetail> {
    input.validate().map_err(AppError::validation)?;

    let mut tx = pool.begin().await?;

    let tier_list: TierList =
        sqlx::query_as("INSERT INTO tier_lists (name) VALUES ($1) RETURNING *")
            .bind(input.name.trim())
            .fetch_one(&mut *tx)
            .await?;

    let mut seen = Vec::new();
    for &movie_id in &input.movie_ids {
        if seen.contains(&movie_id) {
            continue;
        }
        ensure_movie_exists(&mut tx, movie_id).await?;
        sqlx::query(
            "INSERT INTO tier_list_movies (tier_list_id, movie_id, tier, position) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(tier_list.id)
        .bind(movie_id)
        .bind(Tier::DEFAULT.as_str())
        .bind(seen.len() as i32)
        .execute(&mut *tx)
        .await?;
        seen.push(movie_id);
    }

    tx.commit().await?;

    tracing::info!(
        tier_list_id = %tier_list.id,
        name = %tier_list.name,
        initial_movies = %seen.len(),
        "Tier list created"
    );

    get(pool, tier_list.id).await
}

/// Tier list detail: buckets in position order plus the unassigned pool
///
/// The unassigned pool is only computed once the list holds at least one
/// assignment; a freshly created empty list reports an empty pool.
pub async fn get(pool: &PgPool, id: i64) -> AppResult<TierListDetail> {
    let tier_list: TierList = sqlx::query_as("SELECT * FROM tier_lists WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::not_found("Tier list not found"))?;

    let rows = fetch_bucket_rows(pool, id).await?;

    let unassigned: Vec<Movie> = if rows.is_empty() {
        Vec::new()
    } else {
        sqlx::query_as(
            "SELECT m.* FROM movies m WHERE m.id NOT IN \
             (SELECT movie_id FROM tier_list_movies WHERE tier_list_id = $1) \
             ORDER BY m.title",
        )
        .bind(id)
        .fetch_all(pool)
        .await?
    };

    Ok(TierListDetail::assemble(tier_list, rows, unassigned))
}

/// Renames a tier list
pub async fn rename(pool: &PgPool, id: i64, name: &str) -> AppResult<TierList> {
    if name.trim().is_empty() {
        return Err(AppError::validation("Tier list name is required"));
    }

    sqlx::query_as("UPDATE tier_lists SET name = $1 WHERE id = $2 RETURNING *")
        .bind(name.trim())
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::not_found("Tier list not found"))
}

/// Deletes a tier list; its movie assignments cascade
pub async fn delete(pool: &PgPool, id: i64) -> AppResult<()> {
    let deleted = sqlx::query("DELETE FROM tier_lists WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?
        .rows_affected();

    if deleted == 0 {
        return Err(AppError::not_found("Tier list not found"));
    }

    tracing::info!(tier_list_id = %id, "Tier list deleted");

    Ok(())
}

/// Places a movie into a bucket
///
/// Fails with a conflict when the movie already sits anywhere in this list.
/// The insert and the bucket renumbering share one transaction, so positions
/// stay dense no matter where the call fails.
pub async fn add_movie(pool: &PgPool, list_id: i64, input: &AddTierMovieInput) -> AppResult<()> {
    let mut tx = pool.begin().await?;

    ensure_list_exists(&mut tx, list_id).await?;
    ensure_movie_exists(&mut tx, input.movie_id).await?;

    let mut board = load_board(&mut tx, list_id).await?;
    let index = input.position.unwrap_or(0).max(0) as usize;
    board
        .insert(input.movie_id, input.tier, index)
        .map_err(board_error)?;

    sqlx::query(
        "INSERT INTO tier_list_movies (tier_list_id, movie_id, tier, position) \
         VALUES ($1, $2, $3, $4)",
    )
    .bind(list_id)
    .bind(input.movie_id)
    .bind(input.tier.as_str())
    .bind(index as i32)
    .execute(&mut *tx)
    .await?;

    renumber_bucket(&mut tx, list_id, input.tier, board.bucket(input.tier)).await?;

    tx.commit().await?;

    tracing::info!(
        tier_list_id = %list_id,
        movie_id = %input.movie_id,
        tier = %input.tier,
        "Movie added to tier list"
    );

    Ok(())
}

/// Moves an assigned movie to a tier and position
///
/// Handles both the within-tier reorder and the cross-tier drop; every
/// affected bucket is renumbered densely in the same transaction.
pub async fn move_movie(
    pool: &PgPool,
    list_id: i64,
    movie_id: i64,
    input: &MoveTierMovieInput,
) -> AppResult<()> {
    let mut tx = pool.begin().await?;

    ensure_list_exists(&mut tx, list_id).await?;

    let mut board = load_board(&mut tx, list_id).await?;
    let source_tier = board
        .find(movie_id)
        .map(|(tier, _)| tier)
        .ok_or_else(|| AppError::not_found("Movie is not in this tier list"))?;

    let index = input.position.max(0) as usize;
    board.move_to(movie_id, input.tier, index).map_err(board_error)?;

    sqlx::query(
        "UPDATE tier_list_movies SET tier = $1 \
         WHERE tier_list_id = $2 AND movie_id = $3",
    )
    .bind(input.tier.as_str())
    .bind(list_id)
    .bind(movie_id)
    .execute(&mut *tx)
    .await?;

    renumber_bucket(&mut tx, list_id, input.tier, board.bucket(input.tier)).await?;
    if source_tier != input.tier {
        renumber_bucket(&mut tx, list_id, source_tier, board.bucket(source_tier)).await?;
    }

    tx.commit().await?;

    tracing::info!(
        tier_list_id = %list_id,
        movie_id = %movie_id,
        from = %source_tier,
        to = %input.tier,
        position = %input.position,
        "Tier list movie moved"
    );

    Ok(())
}

/// Removes a movie from a tier list, returning it to the unassigned pool
pub async fn remove_movie(pool: &PgPool, list_id: i64, movie_id: i64) -> AppResult<()> {
    let mut tx = pool.begin().await?;

    ensure_list_exists(&mut tx, list_id).await?;

    let mut board = load_board(&mut tx, list_id).await?;
    let tier = board
        .remove(movie_id)
        .map_err(|_| AppError::not_found("Movie is not in this tier list"))?;

    sqlx::query("DELETE FROM tier_list_movies WHERE tier_list_id = $1 AND movie_id = $2")
        .bind(list_id)
        .bind(movie_id)
        .execute(&mut *tx)
        .await?;

    renumber_bucket(&mut tx, list_id, tier, board.bucket(tier)).await?;

    tx.commit().await?;

    tracing::info!(
        tier_list_id = %list_id,
        movie_id = %movie_id,
        tier = %tier,
        "Movie removed from tier list"
    );

    Ok(())
}

#[derive(FromRow)]
struct BucketRow {
    tier: String,
    movie_id: i64,
    title: String,
    original_title: Option<String>,
    release_year: i32,
    poster_url: Option<String>,
    position: i32,
}

async fn fetch_bucket_rows(pool: &PgPool, list_id: i64) -> AppResult<Vec<(Tier, TierMovie)>> {
    let rows: Vec<BucketRow> = sqlx::query_as(
        "SELECT tlm.tier, tlm.movie_id, m.title, m.original_title, m.release_year, \
         m.poster_url, tlm.position \
         FROM tier_list_movies tlm JOIN movies m ON m.id = tlm.movie_id \
         WHERE tlm.tier_list_id = $1 ORDER BY tlm.tier, tlm.position",
    )
    .bind(list_id)
    .fetch_all(pool)
    .await?;

    rows.into_iter()
        .map(|row| {
            let tier: Tier = row.tier.parse().map_err(AppError::Internal)?;
            Ok((
                tier,
                TierMovie {
                    movie_id: row.movie_id,
                    title: row.title,
                    original_title: row.original_title,
                    release_year: row.release_year,
                    poster_url: row.poster_url,
                    position: row.position,
                },
            ))
        })
        .collect()
}

/// Loads the list's board state ordered by stored position
async fn load_board(tx: &mut Transaction<'_, Postgres>, list_id: i64) -> AppResult<TierBoard> {
    let rows: Vec<(String, i64)> = sqlx::query_as(
        "SELECT tier, movie_id FROM tier_list_movies \
         WHERE tier_list_id = $1 ORDER BY tier, position",
    )
    .bind(list_id)
    .fetch_all(&mut **tx)
    .await?;

    let mut parsed = Vec::with_capacity(rows.len());
    for (tier, movie_id) in rows {
        let tier: Tier = tier.parse().map_err(AppError::Internal)?;
        parsed.push((tier, movie_id));
    }
    Ok(TierBoard::from_rows(parsed))
}

/// Rewrites one bucket's positions to match the given order, densely from 0
///
/// A single statement renumbers the whole bucket, so no interleaving of
/// per-row updates can ever be observed.
async fn renumber_bucket(
    tx: &mut Transaction<'_, Postgres>,
    list_id: i64,
    tier: Tier,
    ordered_ids: &[i64],
) -> AppResult<()> {
    if ordered_ids.is_empty() {
        return Ok(());
    }

    sqlx::query(
        "UPDATE tier_list_movies AS tlm SET position = (u.ord - 1)::INT \
         FROM UNNEST($3::BIGINT[]) WITH ORDINALITY AS u(movie_id, ord) \
         WHERE tlm.tier_list_id = $1 AND tlm.tier = $2 AND tlm.movie_id = u.movie_id",
    )
    .bind(list_id)
    .bind(tier.as_str())
    .bind(ordered_ids.to_vec())
    .execute(&mut **tx)
    .await?;

    Ok(())
}

async fn ensure_list_exists(tx: &mut Transaction<'_, Postgres>, list_id: i64) -> AppResult<()> {
    let exists: Option<(i64,)> = sqlx::query_as("SELECT id FROM tier_lists WHERE id = $1")
        .bind(list_id)
        .fetch_optional(&mut **tx)
        .await?;
    if exists.is_none() {
        return Err(AppError::not_found("Tier list not found"));
    }
    Ok(())
}

async fn ensure_movie_exists(tx: &mut Transaction<'_, Postgres>, movie_id: i64) -> AppResult<()> {
    let exists: Option<(i64,)> = sqlx::query_as("SELECT id FROM movies WHERE id = $1")
        .bind(movie_id)
        .fetch_optional(&mut **tx)
        .await?;
    if exists.is_none() {
        return Err(AppError::not_found("Movie not found"));
    }
    Ok(())
}

fn board_error(err: BoardError) -> AppError {
    match err {
        BoardError::AlreadyAssigned(_) => {
            AppError::conflict("Movie is already in this tier list")
        }
        BoardError::NotAssigned(_) => AppError::not_found("Movie is not in this tier list"),
    }
}
