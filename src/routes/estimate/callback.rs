use crate::configuration::Settings;
use crate::forms;
use crate::helpers::JsonResponse;
use crate::models::JobResult;
use crate::services::ResultCache;
use actix_web::{post, web, HttpRequest, Responder, Result};
use std::sync::Arc;

/// POST /estimate/callback
/// Receives the terminal result from the estimate engine. Unknown job ids are
/// accepted so a result stays recoverable with nothing but the id; a second
/// terminal write for the same job is rejected and leaves the stored result
/// untouched.
#[tracing::instrument(name = "Receive estimate callback.", skip(req, cache, settings))]
#[post("/callback")]
pub async fn callback_handler(
    req: HttpRequest,
    web::Json(form): web::Json<forms::CallbackForm>,
    cache: web::Data<Arc<ResultCache>>,
    settings: web::Data<Settings>,
) -> Result<impl Responder> {
    if let Some(expected) = settings.webhook.callback_token.as_deref() {
        let presented = req
            .headers()
            .get("X-Callback-Token")
            .and_then(|value| value.to_str().ok());
        if presented != Some(expected) {
            return Err(JsonResponse::forbidden("Invalid callback token"));
        }
    }

    let status = match form.terminal_status() {
        Some(status) => status,
        None => {
            return Err(JsonResponse::bad_request(format!(
                "Unsupported callback status: {}",
                form.status
            )));
        }
    };

    let job_id = form.job_id;
    let result = JobResult {
        status,
        response: form.response,
        error: form.error,
        pdf_url: form.pdf_url,
    };

    if !cache.store(job_id, result).await {
        return Err(JsonResponse::conflict("Job already has a terminal result"));
    }

    tracing::info!("Stored {} result for job {}", status, job_id);
    Ok(JsonResponse::<serde_json::Value>::build()
        .set_id(job_id)
        .ok("Result stored"))
}
