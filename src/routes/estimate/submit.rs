use crate::forms;
use crate::helpers::JsonResponse;
use crate::models;
use crate::services::{ResultCache, WebhookClient};
use actix_web::{post, web, Responder, Result};
use serde_valid::Validate;
use std::sync::Arc;
use uuid::Uuid;

/// POST /estimate
/// Accepts an estimate request, registers a job and hands the work to the
/// external engine. The response carries only the job id; the answer arrives
/// later through the callback receiver. Engine unreachability never fails a
/// submission.
#[tracing::instrument(name = "Submit estimate request.", skip(cache, webhook))]
#[post("")]
pub async fn submit_handler(
    web::Json(form): web::Json<forms::SubmitEstimateForm>,
    cache: web::Data<Arc<ResultCache>>,
    webhook: web::Data<WebhookClient>,
) -> Result<impl Responder> {
    if let Err(errors) = form.validate() {
        return Err(JsonResponse::<models::JobAccepted>::build().form_error(errors.to_string()));
    }

    let job_id = Uuid::new_v4();
    cache.register(job_id).await;
    webhook
        .dispatch_estimate(job_id, form.message, form.session_id, form.attachment_url)
        .await;

    Ok(JsonResponse::build()
        .set_id(job_id)
        .set_item(models::JobAccepted { job_id })
        .ok("Accepted"))
}
