use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use donorlink::api::{create_router, AppState};
use donorlink::config::Config;
use donorlink::db::{InMemoryProfileStore, ProfileStore};
use donorlink::embeddings::create_provider;
use donorlink::llm::LlmProvider;
use donorlink::services::seed::seed_from_file;

#[derive(Parser)]
#[command(name = "donorlink")]
#[command(about = "Hybrid semantic matching of patients with organ donors")]
struct Args {
    /// JSON array of profiles to store before serving
    #[arg(long, env = "DONORLINK_SEED_FILE")]
    seed: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "donorlink=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();

    tracing::info!("Initializing embedding provider: {}...", config.embeddings.model);
    let embeddings = create_provider(&config.embeddings).await?;

    if let Some(llm_config) = &config.llm {
        tracing::info!("Initializing LLM provider: {}...", llm_config.model);
    }
    let llm = LlmProvider::new(config.llm.as_ref());
    if !llm.is_available() {
        tracing::warn!("LLM unavailable - match summaries will be disabled");
    }

    let store: Arc<dyn ProfileStore> = Arc::new(InMemoryProfileStore::new());
    let state = AppState::new(config.clone(), store, embeddings, llm);

    if let Some(path) = args.seed {
        seed_from_file(&state.matching, &path)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to seed profiles from {}: {e}", path.display()))?;
    }

    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!("Donorlink starting on http://{}", addr);
    tracing::info!("  Health check: http://{}/api/v1/health", addr);
    tracing::info!("  API docs:     http://{}/api/v1/docs", addr);
    tracing::info!("  OpenAPI spec: http://{}/api/v1/openapi.json", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, stopping server...");
}
