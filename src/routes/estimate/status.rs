use crate::helpers::JsonResponse;
use crate::services::ResultCache;
use actix_web::{get, web, Responder, Result};
use std::sync::Arc;
use uuid::Uuid;

/// GET /estimate/status/{job_id}
/// Reports the cached state of a job. Ids the cache has never seen poll as
/// `processing`; ids whose result outlived its TTL report `expired`. Reading
/// a result does not consume it.
#[tracing::instrument(name = "Poll estimate status.", skip(cache))]
#[get("/status/{job_id}")]
pub async fn status_handler(
    path: web::Path<Uuid>,
    cache: web::Data<Arc<ResultCache>>,
) -> Result<impl Responder> {
    let job_id = path.into_inner();
    let result = cache.lookup(&job_id).await;
    Ok(JsonResponse::build()
        .set_id(job_id)
        .set_item(result)
        .ok("OK"))
}
