use std::env;

use anyhow::Context;
use larder_core::RecipeScraper;
use larder_server::config::Config;
use larder_server::{api, app, db, telemetry, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Check for --openapi flag to dump spec and exit
    if env::args().any(|arg| arg == "--openapi") {
        println!("{}", api::openapi().to_pretty_json()?);
        return Ok(());
    }

    // A missing .env file is fine
    dotenv::dotenv().ok();
    telemetry::init_telemetry();

    let config = Config::from_env()?;
    tracing::debug!(?config, "loaded configuration");

    let pool = db::create_pool(&config.database_path)?;
    tracing::info!(path = %config.database_path.display(), "database ready");

    let scraper = RecipeScraper::with_web_client()?;
    let router = app(AppState::new(pool, scraper), &config.static_dir);

    let listener = tokio::net::TcpListener::bind(config.bind_addr())
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr()))?;
    let addr = listener.local_addr()?;

    tracing::info!("Server listening on {}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
