use axum::extract::State;
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::v1::response::ApiResponse;
use crate::llm::LlmBackend;

/// Health data returned inside the v1 envelope.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct HealthData {
    pub status: String,
    pub version: String,
    pub store: StoreStatus,
    pub embeddings: EmbeddingsStatus,
    pub llm: LlmStatus,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct StoreStatus {
    pub status: String,
    pub profiles: usize,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct EmbeddingsStatus {
    pub status: String,
    pub model: String,
    pub dimensions: usize,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct LlmStatus {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// `GET /api/v1/health`
#[utoipa::path(
    get,
    path = "/api/v1/health",
    tag = "health",
    responses(
        (status = 200, description = "Service health status", body = HealthData),
    )
)]
pub async fn health_check(State(state): State<AppState>) -> ApiResponse<HealthData> {
    let store_status = match state.store.count().await {
        Ok(profiles) => StoreStatus {
            status: "ok".to_string(),
            profiles,
        },
        Err(e) => {
            tracing::warn!(error = %e, "Profile store health check failed");
            StoreStatus {
                status: "error".to_string(),
                profiles: 0,
            }
        }
    };

    let embeddings_status = EmbeddingsStatus {
        status: "ok".to_string(),
        model: state.config.embeddings.model.clone(),
        dimensions: state.embeddings.dimensions(),
    };

    let llm_status = if state.llm.is_available() {
        let provider = match state.llm.backend() {
            LlmBackend::OpenAI => "openai",
            LlmBackend::OpenRouter => "openrouter",
            LlmBackend::Ollama => "ollama",
            LlmBackend::LmStudio => "lmstudio",
            LlmBackend::OpenAICompatible { .. } => "openai-compatible",
            LlmBackend::Unavailable { .. } => "unavailable",
        };
        LlmStatus {
            status: "available".to_string(),
            provider: Some(provider.to_string()),
            model: state.llm.model().map(str::to_string),
        }
    } else {
        LlmStatus {
            status: "unavailable".to_string(),
            provider: None,
            model: None,
        }
    };

    ApiResponse::success(HealthData {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        store: store_status,
        embeddings: embeddings_status,
        llm: llm_status,
    })
}
