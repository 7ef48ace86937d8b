//! # Quill API Server
//!
//! The main entry point for the Actix-web HTTP server.

use std::sync::Arc;

use actix_web::middleware::Condition;
use actix_web::{App, HttpServer, web};
use quill_core::ports::RateLimiter;
use quill_infra::InMemoryRateLimiter;
use tracing_actix_web::TracingLogger;

mod config;
mod handlers;
mod middleware;
mod observability;
mod state;
mod telemetry;

use config::AppConfig;
use middleware::rate_limit::RateLimitMiddleware;
use observability::RequestIdMiddleware;
use state::AppState;
use telemetry::TelemetryConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    telemetry::init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env()?;

    tracing::info!(
        "Starting Quill API Server on {}:{}",
        config.host,
        config.port
    );

    let state = AppState::new(&config).await?;

    let rate_limit_enabled = config.rate_limit.is_some();
    let limiter: Arc<dyn RateLimiter> = Arc::new(InMemoryRateLimiter::new(
        config.rate_limit.clone().unwrap_or_default(),
    ));
    if !rate_limit_enabled {
        tracing::info!("Rate limiting disabled");
    }

    let upload_limit = config.upload_max_bytes;

    HttpServer::new(move || {
        App::new()
            .wrap(Condition::new(
                rate_limit_enabled,
                RateLimitMiddleware::new(limiter.clone()),
            ))
            .wrap(TracingLogger::default())
            .wrap(RequestIdMiddleware)
            .app_data(web::Data::new(state.clone()))
            .app_data(web::PayloadConfig::new(upload_limit))
            .configure(handlers::configure_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    Ok(())
}
