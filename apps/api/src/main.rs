mod config;
mod errors;
mod explanation;
mod match_client;
mod models;
mod results;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::explanation::build_parser;
use crate::match_client::HttpMatcher;
use crate::routes::build_router;
use crate::state::{AppState, SubmissionGate};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Carbon Matcher v{}", env!("CARGO_PKG_VERSION"));

    // Initialize matching service client
    let matcher = HttpMatcher::new(&config.match_api_base_url, config.match_api_timeout)?;
    match config.match_api_timeout {
        Some(timeout) => info!(
            "Matching service: {} (timeout {}s)",
            matcher.endpoint(),
            timeout.as_secs()
        ),
        None => info!("Matching service: {} (no timeout)", matcher.endpoint()),
    }

    // Initialize explanation parser (ordered by default, swap via EXPLANATION_PARSER)
    let parser = build_parser(config.explanation_parser)?;
    info!("Explanation parser: {}", parser.backend());

    let state = AppState {
        matcher: Arc::new(matcher),
        parser,
        submissions: SubmissionGate::new(),
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // the browser front end is served from another origin

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
