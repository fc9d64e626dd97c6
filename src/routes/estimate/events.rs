use crate::services::ResultCache;
use actix_web::{get, web, HttpResponse, Responder, Result};
use futures_util::stream;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

const FRAME_INTERVAL: Duration = Duration::from_secs(1);
/// Frame cap, the same ten minute ceiling the polling loop enforces.
const MAX_FRAMES: u32 = 600;

/// GET /estimate/events/{job_id}
/// Streams the job state as server-sent events, one frame per second. The
/// stream closes after the first terminal frame or at the frame cap. Push
/// alternative to polling the status endpoint.
#[tracing::instrument(name = "Stream estimate events.", skip(cache))]
#[get("/events/{job_id}")]
pub async fn events_handler(
    path: web::Path<Uuid>,
    cache: web::Data<Arc<ResultCache>>,
) -> Result<impl Responder> {
    let job_id = path.into_inner();
    let cache = cache.get_ref().clone();

    let frames = stream::unfold(0u32, move |tick| {
        let cache = cache.clone();
        async move {
            if tick >= MAX_FRAMES {
                return None;
            }
            if tick > 0 {
                tokio::time::sleep(FRAME_INTERVAL).await;
            }
            let result = cache.lookup(&job_id).await;
            // A terminal frame is still delivered; the sentinel ends the
            // stream on the next pull.
            let next = if result.status.is_terminal() {
                MAX_FRAMES
            } else {
                tick + 1
            };
            let json = serde_json::to_string(&result).unwrap_or_else(|_| String::from("{}"));
            let frame = web::Bytes::from(format!("data: {}\n\n", json));
            Some((Ok::<_, Infallible>(frame), next))
        }
    });

    Ok(HttpResponse::Ok()
        .content_type("text/event-stream")
        .insert_header(("Cache-Control", "no-cache"))
        .streaming(frames))
}
