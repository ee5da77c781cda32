#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, ADMIN_EMAILS, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "folio_api=info,tower_http=info".into()),
        )
        .init();

    let config = folio_api::config::config();
    tracing::info!("Starting Folio API in {:?} mode", config.environment);

    let app = folio_api::app();

    // Allow tests or deployments to override port via env
    let port = std::env::var("FOLIO_API_PORT")
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(config.server.port);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("Folio API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}
