use crate::db;
use crate::helpers::JsonResponse;
use actix_web::{delete, web, Responder, Result};
use sqlx::PgPool;

/// DELETE /sessions/{id}
/// Removes a session and, through the cascade, its messages. Deleting a
/// session that does not exist still reports success; the operation is
/// idempotent.
#[tracing::instrument(name = "Delete session.", skip(pg_pool))]
#[delete("/{id}")]
pub async fn delete_handler(
    path: web::Path<String>,
    pg_pool: web::Data<PgPool>,
) -> Result<impl Responder> {
    let session_id = path.into_inner();
    db::session::delete(pg_pool.get_ref(), &session_id)
        .await
        .map(|_| {
            JsonResponse::build()
                .set_item(serde_json::json!({"success": true}))
                .ok("OK")
        })
        .map_err(|err| JsonResponse::internal_server_error(err.to_string()))
}
