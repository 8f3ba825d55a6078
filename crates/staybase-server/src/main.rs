use axum::http::{header, HeaderValue, Method};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use staybase_server::config::Config;
use staybase_server::db;
use staybase_server::routes::{create_router, AppState};

#[tokio::main]
async fn main() {
    // Load .env file (from repo root)
    dotenvy::from_filename("../../.env").ok();
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("staybase_server=debug,tower_http=debug")),
        )
        .init();

    let config = Config::from_env();
    let port = config.server_port;

    // Create database pool and run migrations
    let pool = db::create_pool(&config.sqlite_path);
    tracing::info!("Database initialized at {}", config.sqlite_path);

    // Photo uploads land here; ServeDir serves them back
    std::fs::create_dir_all(&config.uploads_dir).expect("Failed to create uploads dir");

    let state = AppState {
        db: pool,
        config: config.clone(),
    };

    // Build router with middleware
    let cors = CorsLayer::new()
        .allow_origin(config.cors_origin.parse::<HeaderValue>().unwrap())
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::COOKIE])
        .allow_credentials(true);

    let app = create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr = format!("0.0.0.0:{port}");
    tracing::info!("staybase-server listening on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app)
        .await
        .expect("Server failed");
}
