use crate::db;
use crate::forms;
use crate::helpers::JsonResponse;
use crate::models;
use crate::services::TitleGenerator;
use actix_web::{post, web, Responder, Result};
use serde_valid::Validate;
use sqlx::PgPool;

/// POST /sessions/{id}/messages
/// Persists one side of an exchange, creating the session on first use. An
/// assistant save may kick off title generation for the session's opening
/// exchange; that runs detached and never delays the response.
#[tracing::instrument(name = "Save session message.", skip(pg_pool, title_generator))]
#[post("/{id}/messages")]
pub async fn save_handler(
    path: web::Path<String>,
    web::Json(form): web::Json<forms::SaveMessageForm>,
    pg_pool: web::Data<PgPool>,
    title_generator: web::Data<TitleGenerator>,
) -> Result<impl Responder> {
    if let Err(errors) = form.validate() {
        return Err(JsonResponse::<models::Message>::build().form_error(errors.to_string()));
    }

    let session_id = path.into_inner();
    db::session::upsert(pg_pool.get_ref(), &session_id)
        .await
        .map_err(|err| JsonResponse::internal_server_error(err.to_string()))?;

    let saved = db::message::insert(pg_pool.get_ref(), &session_id, form.role, &form.content)
        .await
        .map_err(|err| JsonResponse::internal_server_error(err.to_string()))?;

    if matches!(form.role, models::MessageRole::Assistant) {
        spawn_title_generation(pg_pool.clone(), title_generator.clone(), session_id);
    }

    Ok(JsonResponse::build().set_item(saved).ok("OK"))
}

/// Titles the session when this save completed the opening exchange. The
/// claim column guarantees at most one generation per session even when
/// assistant saves race.
fn spawn_title_generation(
    pg_pool: web::Data<PgPool>,
    title_generator: web::Data<TitleGenerator>,
    session_id: String,
) {
    tokio::spawn(async move {
        let count = match db::message::count_by_session(pg_pool.get_ref(), &session_id).await {
            Ok(count) => count,
            Err(err) => {
                tracing::error!("Title check failed for session {}: {}", session_id, err);
                return;
            }
        };
        if count != 2 {
            return;
        }

        let opening = match db::message::fetch_first_two(pg_pool.get_ref(), &session_id).await {
            Ok(messages) => messages,
            Err(err) => {
                tracing::error!("Title check failed for session {}: {}", session_id, err);
                return;
            }
        };
        let (user_message, assistant_message) = match opening.as_slice() {
            [first, second] if first.role == "user" && second.role == "assistant" => {
                (first.content.clone(), second.content.clone())
            }
            _ => return,
        };

        match db::session::claim_title_generation(pg_pool.get_ref(), &session_id).await {
            Ok(true) => {}
            Ok(false) => return,
            Err(err) => {
                tracing::error!("Title claim failed for session {}: {}", session_id, err);
                return;
            }
        }

        let title = title_generator
            .title_for_exchange(&user_message, &assistant_message)
            .await;
        match db::session::update_title(pg_pool.get_ref(), &session_id, &title).await {
            Ok(_) => tracing::info!("Generated title for session {}: {}", session_id, title),
            Err(err) => {
                tracing::error!("Failed to store title for session {}: {}", session_id, err)
            }
        }
    });
}
