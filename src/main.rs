use bandstand_api::{app, config, database::Database};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = config::config();
    tracing::info!("Starting Bandstand API in {:?} mode", config.environment);

    // Apply migrations when the database is reachable; otherwise keep
    // serving so /health can report the degraded state.
    if let Err(e) = Database::migrate().await {
        tracing::warn!("skipping startup migrations: {}", e);
    }

    // Allow tests or deployments to override port via env
    let port = std::env::var("BANDSTAND_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    tracing::info!("Bandstand API listening on http://{}", bind_addr);

    axum::serve(listener, app()).await?;
    Ok(())
}
