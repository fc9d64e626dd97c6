use crate::models;
use sqlx::PgPool;
use tracing::Instrument;

/// Creates the session row if it does not exist yet, otherwise bumps
/// `updated_at` so the session moves to the top of the recency listing.
pub async fn upsert(pool: &PgPool, id: &str) -> Result<models::Session, sqlx::Error> {
    let query_span = tracing::info_span!("Upserting session");
    sqlx::query_as::<_, models::Session>(
        r#"
        INSERT INTO sessions (id)
        VALUES ($1)
        ON CONFLICT (id) DO UPDATE SET updated_at = NOW()
        RETURNING id, title, created_at, updated_at
        "#,
    )
    .bind(id)
    .fetch_one(pool)
    .instrument(query_span)
    .await
}

/// Most recently touched sessions first.
pub async fn fetch_latest(pool: &PgPool, limit: i64) -> Result<Vec<models::Session>, sqlx::Error> {
    let query_span = tracing::info_span!("Fetching latest sessions");
    sqlx::query_as::<_, models::Session>(
        r#"
        SELECT id, title, created_at, updated_at
        FROM sessions
        ORDER BY updated_at DESC
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .instrument(query_span)
    .await
}

pub async fn update_title(pool: &PgPool, id: &str, title: &str) -> Result<u64, sqlx::Error> {
    let query_span = tracing::info_span!("Updating session title");
    let result = sqlx::query(
        r#"
        UPDATE sessions
        SET title = $2, updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(title)
    .execute(pool)
    .instrument(query_span)
    .await?;
    Ok(result.rows_affected())
}

/// Marks the session as having a title generation in flight. Only one caller
/// ever gets `true` for a given session; everyone else loses the race and
/// must not generate.
pub async fn claim_title_generation(pool: &PgPool, id: &str) -> Result<bool, sqlx::Error> {
    let query_span = tracing::info_span!("Claiming title generation");
    let result = sqlx::query(
        r#"
        UPDATE sessions
        SET title_requested_at = NOW()
        WHERE id = $1 AND title_requested_at IS NULL
        "#,
    )
    .bind(id)
    .execute(pool)
    .instrument(query_span)
    .await?;
    Ok(result.rows_affected() == 1)
}

/// Removes the session; messages go with it through the cascading foreign
/// key. Returns the number of sessions removed.
pub async fn delete(pool: &PgPool, id: &str) -> Result<u64, sqlx::Error> {
    let query_span = tracing::info_span!("Deleting session");
    let result = sqlx::query(
        r#"
        DELETE FROM sessions WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(pool)
    .instrument(query_span)
    .await?;
    Ok(result.rows_affected())
}
