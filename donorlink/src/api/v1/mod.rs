pub mod dto;
pub mod handlers;
pub mod openapi;
pub mod response;
pub mod router;

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::api::routes::create_router;
    use crate::api::state::AppState;
    use crate::config::{Config, EmbeddingsConfig, MatchingConfig, ServerConfig};
    use crate::db::InMemoryProfileStore;
    use crate::embeddings::EmbeddingProvider;
    use crate::error::{MatchError, Result};
    use crate::llm::LlmProvider;

    struct StubEmbedder {
        fail: bool,
    }

    #[async_trait]
    impl EmbeddingProvider for StubEmbedder {
        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            if self.fail {
                return Err(MatchError::Provider("connection refused".to_string()));
            }
            Ok(texts
                .iter()
                .map(|t| {
                    let lower = t.to_lowercase();
                    vec![
                        lower.matches("kidney").count() as f32,
                        lower.matches("liver").count() as f32,
                        1.0,
                    ]
                })
                .collect())
        }

        fn dimensions(&self) -> usize {
            3
        }

        fn model(&self) -> &str {
            "stub"
        }
    }

    fn test_state(fail: bool) -> AppState {
        let config = Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3000,
            },
            embeddings: EmbeddingsConfig {
                model: "stub".to_string(),
                api_key: None,
                base_url: None,
                dimensions: 3,
                batch_size: 8,
                timeout_secs: 5,
                max_retries: 0,
                cache_size: 0,
            },
            llm: None,
            matching: MatchingConfig::default(),
        };

        AppState::new(
            config,
            Arc::new(InMemoryProfileStore::new()),
            Arc::new(StubEmbedder { fail }),
            LlmProvider::new(None),
        )
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn delete(uri: &str) -> Request<Body> {
        Request::builder()
            .method("DELETE")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn health_reports_store_and_llm() {
        let app = create_router(test_state(false));

        let response = app.oneshot(get("/api/v1/health")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["status"], "ok");
        assert_eq!(json["data"]["store"]["profiles"], 0);
        assert_eq!(json["data"]["embeddings"]["dimensions"], 3);
        assert_eq!(json["data"]["llm"]["status"], "unavailable");
    }

    #[tokio::test]
    async fn openapi_json_lists_paths() {
        let app = create_router(test_state(false));

        let response = app.oneshot(get("/api/v1/openapi.json")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert!(json["paths"]["/api/v1/matches"].is_object());
        assert!(json["paths"]["/api/v1/profiles/{profileId}"].is_object());
    }

    #[tokio::test]
    async fn create_profile_generates_id() {
        let app = create_router(test_state(false));

        let response = app
            .oneshot(post(
                "/api/v1/profiles",
                json!({"name": "Pat", "type": "patient", "description": "Need kidney"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let json = body_json(response).await;
        assert_eq!(json["data"]["id"].as_str().unwrap().len(), 21);
        assert_eq!(json["data"]["type"], "patient");
    }

    #[tokio::test]
    async fn create_profile_rejects_blank_description() {
        let app = create_router(test_state(false));

        let response = app
            .oneshot(post(
                "/api/v1/profiles",
                json!({"name": "Pat", "type": "patient", "description": " "}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "invalid_request");
    }

    #[tokio::test]
    async fn create_profile_reports_missing_field() {
        let app = create_router(test_state(false));

        let response = app
            .oneshot(post(
                "/api/v1/profiles",
                json!({"type": "donor", "description": "x"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "invalid_request");
        assert!(json["error"]["message"]
            .as_str()
            .unwrap()
            .contains("name"));
    }

    #[tokio::test]
    async fn provider_failure_is_bad_gateway() {
        let app = create_router(test_state(true));

        let response = app
            .oneshot(post(
                "/api/v1/profiles",
                json!({"id": "p1", "name": "Pat", "type": "patient", "description": "Need kidney"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "provider_error");
        assert!(!json["error"]["message"]
            .as_str()
            .unwrap()
            .contains("connection refused"));
    }

    #[tokio::test]
    async fn unknown_profile_is_not_found() {
        let state = test_state(false);

        let response = create_router(state.clone())
            .oneshot(get("/api/v1/profiles/ghost"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = create_router(state)
            .oneshot(delete("/api/v1/profiles/ghost"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn batch_then_list_then_clear() {
        let state = test_state(false);

        let response = create_router(state.clone())
            .oneshot(post(
                "/api/v1/profiles:batch",
                json!({"profiles": [
                    {"id": "d1", "name": "Dee", "type": "donor", "description": "Kidney donor"},
                    {"id": "d2", "name": "Lee", "type": "donor", "description": "Liver donor"}
                ]}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let json = body_json(response).await;
        assert_eq!(json["data"]["stored"], 2);
        assert_eq!(json["data"]["profileIds"], json!(["d1", "d2"]));

        let response = create_router(state.clone())
            .oneshot(get("/api/v1/profiles"))
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json["meta"]["total"], 2);
        assert_eq!(json["data"]["profiles"][0]["id"], "d1");

        let response = create_router(state.clone())
            .oneshot(delete("/api/v1/profiles"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = create_router(state)
            .oneshot(get("/api/v1/profiles"))
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json["meta"]["total"], 0);
    }

    #[tokio::test]
    async fn matches_are_ranked_and_filtered() {
        let state = test_state(false);
        state
            .matching
            .store_profiles(vec![
                crate::models::Profile {
                    description: "Healthy kidney donor".to_string(),
                    organ_type: Some("Kidney".to_string()),
                    ..crate::models::Profile::new("d1", "Dee", crate::models::Role::Donor)
                },
                crate::models::Profile {
                    description: "Liver donor".to_string(),
                    organ_type: Some("Liver".to_string()),
                    ..crate::models::Profile::new("d2", "Lee", crate::models::Role::Donor)
                },
            ])
            .await
            .unwrap();

        let response = create_router(state)
            .oneshot(post(
                "/api/v1/matches",
                json!({"profileText": "Need a kidney", "minSimilarity": 0.0, "summarize": true}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        let matches = json["data"]["matches"].as_array().unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0]["profileId"], "d1");
        assert_eq!(matches[0]["rank"], 1);
        assert!(matches[0]["scoreBreakdown"]["aiSimilarity"].is_number());
        // no LLM configured: the summary is silently omitted
        assert!(json["meta"].get("summary").is_none());
    }

    #[tokio::test]
    async fn match_without_query_is_invalid() {
        let app = create_router(test_state(false));

        let response = app
            .oneshot(post("/api/v1/matches", json!({"topN": 3})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn match_unknown_profile_is_not_found() {
        let app = create_router(test_state(false));

        let response = app
            .oneshot(post("/api/v1/matches", json!({"profileId": "ghost"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "not_found");
    }
}
