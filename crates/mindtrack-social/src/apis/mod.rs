use std::sync::Arc;

use axum::{middleware, routing::get, Json, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_axum::{router::OpenApiRouter, routes};
use utoipa_scalar::{Scalar, Servable};

use crate::{apis::api_models::response::HealthResponse, AppState};

pub mod api_models;
pub mod follower_handlers;
pub mod middlewares;

#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    tags(
        (name = "followers", description = "Follow relationships between users")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

pub fn setup_routes(app_state: Arc<AppState>) -> Router {
    let api_doc = ApiDoc::openapi();

    let follower_router = OpenApiRouter::new()
        .routes(routes!(follower_handlers::follow_user))
        .routes(routes!(follower_handlers::unfollow_user))
        .routes(routes!(follower_handlers::get_followers))
        .routes(routes!(follower_handlers::get_following))
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            middlewares::security::verify_jwt,
        ));

    let follower_router =
        OpenApiRouter::with_openapi(api_doc).nest("/followers", follower_router);

    let (api_router, api_openapi) = OpenApiRouter::new()
        .nest("/api", follower_router)
        .split_for_parts();

    Router::new()
        .merge(Scalar::with_url("/docs", api_openapi))
        .route("/health", get(health))
        .merge(api_router)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}
