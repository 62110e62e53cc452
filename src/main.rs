//! Points Payment Service - Main Application Entry Point
//!
//! This is a REST API server that charges cards for fixed-price reward tiers
//! and records each completed payment. A request to POST /pay is validated,
//! priced from its tier code, tokenized and charged at the external payment
//! processor, and persisted to PostgreSQL.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Database**: PostgreSQL with sqlx (async queries, pooled connections)
//! - **Processor**: Stripe-shaped card API over reqwest
//! - **Format**: JSON requests/responses
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Create database connection pool
//! 3. Run database migrations
//! 4. Build the processor client
//! 5. Build HTTP router and start server on configured port

mod config;
mod db;
mod error;
mod handlers;
mod models;
mod services;
mod state;

use tracing_subscriber::EnvFilter;

use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with tracing subscriber. Reads RUST_LOG environment variable (defaults to "info" level)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // Load configuration; the processor secret comes from API_KEY and nowhere else
    let config = config::Config::from_env()?;
    tracing::info!("Configuration loaded");

    // Create database pool
    let pool = db::create_pool(&config.database_url).await?;
    tracing::info!("Database pool created");

    // Run migrations
    db::run_migrations(&pool).await?;
    tracing::info!("Database migrations complete");

    // Build the processor client once; handlers clone it out of state
    let processor =
        services::processor::ProcessorClient::new(&config.processor_base_url, &config.api_key)?;

    let state = AppState {
        pool,
        processor,
        currency: config.currency.clone(),
    };

    // Browser checkout pages post card details directly, so allow
    // cross-origin POSTs with a JSON body
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE])
        .allow_origin(Any);

    let app = Router::new()
        .route("/pay", post(handlers::payments::create_payment))
        .route("/health", get(handlers::health::health_check))
        // Add distributed tracing middleware for observability
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state);

    // Bind to network address and start server
    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    // Start serving HTTP requests
    // This blocks forever, handling requests concurrently with tokio
    axum::serve(listener, app).await?;

    Ok(())
}
