use std::sync::Arc;

use actix_web::{web, HttpServer};
use anyhow::Context;

use nest_api::app::{build_auth_service, create_app};
use nest_api::config;
use nest_api::routes::AppState;
use nest_api::telemetry::init_tracing;
use nest_core::services::{OtpSweeper, OtpSweeperConfig};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let app_config = config::load().context("Failed to load configuration")?;
    init_tracing(&app_config.logging)?;

    tracing::info!(
        environment = %app_config.environment,
        event = "server_starting",
        "Starting OurNest Auth API"
    );

    let secrets = config::resolve_secrets(&app_config)?;
    let auth_service = Arc::new(
        build_auth_service(&app_config, &secrets).context("Failed to initialise auth service")?,
    );

    let sweeper = Arc::new(OtpSweeper::new(
        auth_service.ledger().clone(),
        OtpSweeperConfig::from_interval(app_config.auth.otp.sweep_interval_seconds),
    ));
    let sweeper_handle = sweeper.start_background_task();

    let app_state = web::Data::new(AppState::new(auth_service));
    let bind_address = app_config.server.bind_address();
    tracing::info!(address = %bind_address, "Server will bind to address");

    let mut server = HttpServer::new(move || create_app(app_state.clone()));
    if app_config.server.workers > 0 {
        server = server.workers(app_config.server.workers);
    }

    server
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?
        .run()
        .await
        .context("Server error")?;

    if let Some(handle) = sweeper_handle {
        handle.abort();
    }

    tracing::info!(event = "server_stopped", "OurNest Auth API shut down");
    Ok(())
}
