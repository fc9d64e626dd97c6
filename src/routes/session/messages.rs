use crate::db;
use crate::helpers::JsonResponse;
use actix_web::{get, web, Responder, Result};
use sqlx::PgPool;

/// GET /sessions/{id}/messages
/// Full transcript of a session in chronological order. An unknown session
/// yields an empty list.
#[tracing::instrument(name = "List session messages.", skip(pg_pool))]
#[get("/{id}/messages")]
pub async fn messages_handler(
    path: web::Path<String>,
    pg_pool: web::Data<PgPool>,
) -> Result<impl Responder> {
    let session_id = path.into_inner();
    db::message::fetch_by_session(pg_pool.get_ref(), &session_id)
        .await
        .map(|messages| JsonResponse::build().set_list(messages).ok("OK"))
        .map_err(|err| JsonResponse::internal_server_error(err.to_string()))
}
