use crate::configuration::Settings;
use crate::routes;
use crate::services::{self, ResultCache, TitleGenerator, WebhookClient};
use actix_cors::Cors;
use actix_web::{dev::Server, error, http, web, App, HttpServer};
use sqlx::{Pool, Postgres};
use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;
use tracing_actix_web::TracingLogger;

pub async fn run(
    listener: TcpListener,
    pg_pool: Pool<Postgres>,
    settings: Settings,
) -> Result<Server, std::io::Error> {
    let http_client = reqwest::Client::builder()
        .pool_idle_timeout(Duration::from_secs(90))
        .build()
        .map_err(|err| std::io::Error::new(std::io::ErrorKind::Other, err))?;

    let webhook_client = WebhookClient::new(
        http_client.clone(),
        settings.webhook.url.clone(),
        settings.callback_url(),
        Duration::from_millis(settings.webhook.dispatch_wait_ms),
    );
    let webhook_client = web::Data::new(webhook_client);

    let title_provider = services::AnthropicTitleProvider::new(
        http_client,
        settings.title.endpoint.clone(),
        settings.title.api_key.clone(),
        settings.title.model.clone(),
    );
    let title_generator = web::Data::new(TitleGenerator::new(Arc::new(title_provider)));

    let result_cache = Arc::new(ResultCache::new(Duration::from_secs(
        settings.results.ttl_seconds,
    )));
    services::spawn_sweeper(
        result_cache.clone(),
        Duration::from_secs(settings.results.sweep_interval_seconds),
    );
    let result_cache = web::Data::new(result_cache);

    let settings = web::Data::new(settings);
    let pg_pool = web::Data::new(pg_pool);

    let json_config = web::JsonConfig::default().error_handler(|err, _req| {
        let msg: String = match err {
            error::JsonPayloadError::Deserialize(err) => format!(
                "{{\"kind\":\"deserialize\",\"line\":{}, \"column\":{}, \"msg\":\"{}\"}}",
                err.line(),
                err.column(),
                err
            ),
            _ => format!("{{\"kind\":\"other\",\"msg\":\"{}\"}}", err),
        };
        error::InternalError::new(msg, http::StatusCode::BAD_REQUEST).into()
    });

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(Cors::permissive())
            .service(web::scope("/health_check").service(routes::health_check))
            .service(
                web::scope("/estimate")
                    .service(routes::estimate::submit_handler)
                    .service(routes::estimate::callback_handler)
                    .service(routes::estimate::status_handler)
                    .service(routes::estimate::events_handler),
            )
            .service(
                web::scope("/sessions")
                    .service(routes::session::list_handler)
                    .service(routes::session::messages_handler)
                    .service(routes::session::save_handler)
                    .service(routes::session::delete_handler),
            )
            .app_data(json_config.clone())
            .app_data(pg_pool.clone())
            .app_data(result_cache.clone())
            .app_data(webhook_client.clone())
            .app_data(title_generator.clone())
            .app_data(settings.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
