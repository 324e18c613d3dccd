//! Assistant Relay - HTTP bridge to a hosted assistant
//!
//! Lets a chat front-end open conversation threads on a stateful assistant
//! service and exchange turns with it over two plain JSON endpoints.

mod api;
mod assistant;
mod config;
mod orchestrator;
mod session;

use api::{create_router, AppState};
use assistant::{AssistantService, LoggingAssistant, OpenAiAssistants};
use config::RelayConfig;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "assistant_relay=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Assistant relay starting");

    // Configuration; missing credentials are fatal
    let config = RelayConfig::from_env().inspect_err(|e| {
        tracing::error!(error = %e, "Invalid configuration");
    })?;

    // One client handle, shared read-only by every request
    let assistant: Arc<dyn AssistantService> = Arc::new(LoggingAssistant::new(Arc::new(
        OpenAiAssistants::new(
            config.api_key.clone(),
            &config.base_url,
            config.upstream_timeout,
        )?,
    )));

    tracing::info!(
        base_url = %config.base_url,
        assistant_id = %config.assistant_id,
        poll_interval_ms = %config.poll.interval.as_millis(),
        poll_budget = config.poll.budget,
        "Assistant client initialized"
    );

    let state = AppState::new(assistant, config.assistant_id.clone(), config.poll);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Assistant relay listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
