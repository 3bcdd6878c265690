use axum::{routing::get, routing::post, Router};
use metrics_exporter_prometheus::PrometheusBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use scrapewatch::app_state::AppState;
use scrapewatch::config::AppConfig;
use scrapewatch::routes;
use scrapewatch::services::{coinmarket::CoinMarketClient, store::JobStore};

#[tokio::main]
async fn main() {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    // Load configuration from environment
    let config = AppConfig::from_env().expect("Failed to load configuration from environment");

    tracing::info!("Initializing scrapewatch API server");

    // Initialize Prometheus metrics recorder
    let prometheus_handle = PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus metrics recorder");

    metrics::describe_counter!("scrape_jobs_total", "Scraping jobs submitted");
    metrics::describe_counter!("scrape_jobs_completed", "Scraping jobs run to completion");
    metrics::describe_counter!("scrape_coins_total", "Individual coin scrapes performed");
    metrics::describe_histogram!(
        "scrape_job_seconds",
        "Wall-clock duration of a job's scrape loop"
    );

    // Initialize the Redis job store
    tracing::info!("Connecting to Redis job store");
    let store = JobStore::new(&config.redis_url).expect("Failed to initialize job store");

    // Initialize the coin market client
    let coinmarket =
        CoinMarketClient::new(&config.coinmarket_url).expect("Failed to initialize market client");

    // Create shared application state
    let state = AppState::new(store, coinmarket);

    // Build API routes
    let app = Router::new()
        .route("/health", get(routes::health::health_check))
        .route(
            "/api/taskmanager/start_scraping",
            post(routes::taskmanager::start_scraping),
        )
        .route(
            "/api/taskmanager/scraping_status/{job_id}",
            get(routes::taskmanager::scraping_status),
        )
        .with_state(state)
        // Prometheus metrics endpoint (text exposition format)
        .route(
            "/metrics",
            get(move || {
                let handle = prometheus_handle.clone();
                async move { handle.render() }
            }),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(RequestBodyLimitLayer::new(64 * 1024)); // coin lists are tiny

    tracing::info!("Starting scrapewatch on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await.expect("Server error");
}
