use crate::db;
use crate::helpers::JsonResponse;
use actix_web::{get, web, Responder, Result};
use sqlx::PgPool;

const SESSION_LIST_LIMIT: i64 = 50;

/// GET /sessions
/// Most recently touched sessions first, capped at 50. The response carries
/// `Cache-Control: no-store`.
#[tracing::instrument(name = "List sessions.", skip(pg_pool))]
#[get("")]
pub async fn list_handler(pg_pool: web::Data<PgPool>) -> Result<impl Responder> {
    db::session::fetch_latest(pg_pool.get_ref(), SESSION_LIST_LIMIT)
        .await
        .map(|sessions| {
            JsonResponse::build()
                .set_list(sessions)
                .ok("OK")
                .customize()
                .insert_header(("Cache-Control", "no-store"))
        })
        .map_err(|err| JsonResponse::internal_server_error(err.to_string()))
}
