use axum::{
    routing::{get, post},
    Router,
};

use crate::api::state::AppState;

use super::handlers;

pub fn v1_router() -> Router<AppState> {
    let profiles = Router::new()
        .route(
            "/",
            get(handlers::profiles::list_profiles)
                .post(handlers::profiles::create_profile)
                .delete(handlers::profiles::clear_profiles),
        )
        .route(
            "/{profileId}",
            get(handlers::profiles::get_profile).delete(handlers::profiles::delete_profile),
        );

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/openapi.json", get(super::openapi::openapi_json))
        .merge(super::openapi::redoc_router())
        .nest("/profiles", profiles)
        .route(
            "/profiles:batch",
            post(handlers::profiles::batch_create_profiles),
        )
        .route("/matches", post(handlers::matches::find_matches))
}
