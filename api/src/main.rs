use actix_web::{web, HttpServer};
use anyhow::Context;
use rc_api::{app, telemetry};
use rc_shared::AppConfig;
use tracing::info;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env().context("invalid configuration")?;
    telemetry::init(&config.logging)?;

    info!(
        environment = ?config.environment,
        store = ?config.store,
        notifier = ?config.notifier,
        "Starting RotaCode API server"
    );

    let state = web::Data::new(app::build_state(&config).await?);
    let bind_address = config.server.bind_address();

    let mut server = HttpServer::new(move || app::create_app(state.clone()));
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    info!(address = %bind_address, "Listening");
    server
        .bind(&bind_address)
        .with_context(|| format!("failed to bind {}", bind_address))?
        .run()
        .await?;

    Ok(())
}
