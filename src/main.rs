//! Cervereta chat - chatbot backend for the CerveretaDev website
//!
//! Answers visitor questions from a static FAQ table, falling back to a
//! Gemini completion enriched with text scraped from the site itself.

mod api;
mod chat;
mod config;
mod knowledge;
mod llm;
mod prompt;
mod shutdown;
mod site;

use api::{create_router, AppState};
use chat::ChatHandler;
use config::AppConfig;
use knowledge::KnowledgeBase;
use llm::{GeminiService, LoggingService};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env is fine; real deployments set the environment directly
    let dotenv = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cervereta_chat=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    if let Ok(path) = dotenv {
        tracing::debug!(path = %path.display(), "Loaded .env file");
    }

    // Configuration
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Cannot start without a Gemini API key");
            return Err(e.into());
        }
    };

    tracing::info!(
        model = %config.model,
        knowledge_base = %config.knowledge_base_path.display(),
        site = %config.site_html_path.display(),
        "Configuration loaded"
    );

    // Knowledge base (degrades to empty on failure)
    let knowledge = Arc::new(KnowledgeBase::load_or_empty(&config.knowledge_base_path));

    // Completion client
    let gemini = GeminiService::new(
        config.api_key.clone(),
        &config.model,
        config.base_url.as_deref(),
        config.llm_timeout,
    )?;
    let llm = Arc::new(LoggingService::new(Arc::new(gemini)));

    let chat = ChatHandler::new(
        knowledge,
        config.site_html_path.clone(),
        llm,
        config.generation,
    );
    let state = AppState::new(chat, !config.api_key.is_empty());

    let compression = CompressionLayer::new().gzip(true).br(true).deflate(true);

    let app = create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(compression);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Chat server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown::shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}
