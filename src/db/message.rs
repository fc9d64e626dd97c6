use crate::models;
use sqlx::PgPool;
use tracing::Instrument;

pub async fn insert(
    pool: &PgPool,
    session_id: &str,
    role: models::MessageRole,
    content: &str,
) -> Result<models::Message, sqlx::Error> {
    let query_span = tracing::info_span!("Inserting message");
    sqlx::query_as::<_, models::Message>(
        r#"
        INSERT INTO messages (session_id, role, content)
        VALUES ($1, $2, $3)
        RETURNING id, session_id, role, content, created_at
        "#,
    )
    .bind(session_id)
    .bind(role.to_string())
    .bind(content)
    .fetch_one(pool)
    .instrument(query_span)
    .await
}

/// Full transcript in chronological order. The serial id breaks ties between
/// messages stored within the same timestamp tick.
pub async fn fetch_by_session(
    pool: &PgPool,
    session_id: &str,
) -> Result<Vec<models::Message>, sqlx::Error> {
    let query_span = tracing::info_span!("Fetching session messages");
    sqlx::query_as::<_, models::Message>(
        r#"
        SELECT id, session_id, role, content, created_at
        FROM messages
        WHERE session_id = $1
        ORDER BY created_at, id
        "#,
    )
    .bind(session_id)
    .fetch_all(pool)
    .instrument(query_span)
    .await
}

/// The opening exchange, used to decide whether a title should be generated.
pub async fn fetch_first_two(
    pool: &PgPool,
    session_id: &str,
) -> Result<Vec<models::Message>, sqlx::Error> {
    let query_span = tracing::info_span!("Fetching first exchange");
    sqlx::query_as::<_, models::Message>(
        r#"
        SELECT id, session_id, role, content, created_at
        FROM messages
        WHERE session_id = $1
        ORDER BY created_at, id
        LIMIT 2
        "#,
    )
    .bind(session_id)
    .fetch_all(pool)
    .instrument(query_span)
    .await
}

pub async fn count_by_session(pool: &PgPool, session_id: &str) -> Result<i64, sqlx::Error> {
    let query_span = tracing::info_span!("Counting session messages");
    sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM messages WHERE session_id = $1
        "#,
    )
    .bind(session_id)
    .fetch_one(pool)
    .instrument(query_span)
    .await
}
