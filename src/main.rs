mod app;
mod auth;
mod catalog;
mod config;
mod db;
mod domain;
mod error;
mod estimate;
mod logging;
mod middleware;
mod routes;
mod storage;

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let settings = config::Settings::from_env()?;

    // Initialize logging
    logging::init_logging(&settings.env);

    tracing::info!(
        env = ?settings.env,
        server_addr = %settings.server_addr,
        "Starting ironbid backend"
    );

    // Create database pool and apply migrations
    let pool = db::create_pool(&settings).await?;
    db::run_migrations(&pool).await?;

    // JWT verifier for bearer auth
    let jwt = auth::JwtVerifier::new(
        &settings.jwt_secret,
        &settings.jwt_issuer,
        &settings.jwt_audience,
    );

    // Create application state
    let state = app::AppState::new(pool, settings.clone(), jwt);

    // Build application
    let app = app::create_app(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&settings.server_addr).await?;
    tracing::info!("Listening on {}", settings.server_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
