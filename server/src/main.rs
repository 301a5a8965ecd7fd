//! Bookstore server: resolves settings from the environment, prepares the database, serves the books API.
//!
//! Run from repo root: `cargo run -p bookstore-server`

use bookstore::{app, apply_migrations, ensure_database_exists, AppState, PgBookStore, Settings};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("bookstore=info,tower_http=info")),
        )
        .init();

    let settings = Settings::from_env()?;
    let database_url = settings.database_url();
    tracing::info!(mode = ?settings.run_mode, database = settings.run_mode.database_name(), "starting");

    ensure_database_exists(&database_url).await?;
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .connect(&database_url)
        .await?;
    apply_migrations(&pool).await?;

    let state = AppState::new(PgBookStore::new(pool.clone()));
    let router = app(state, settings.body_limit);

    let listener = TcpListener::bind(settings.bind_addr).await?;
    tracing::info!("listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    tracing::info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
