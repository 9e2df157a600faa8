pub mod extract;
pub mod health;
pub mod openapi;
pub mod rules;
pub mod schemas;

use std::sync::Arc;

use axum::Router;
use axum::routing::{delete, get, post};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use rulr_store::RuleStore;

use self::openapi::ApiDoc;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The rule store backend.
    pub store: Arc<dyn RuleStore>,
}

/// Build the Axum router with all API routes, middleware, and Swagger UI.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route(
            "/v1/rules",
            get(rules::list_rules).post(rules::create_rule),
        )
        .route("/v1/rules/{id}", delete(rules::delete_rule))
        .route("/v1/rules/evaluate", post(rules::evaluate))
        .route("/v1/rules/combine", post(rules::combine_rules))
        .route("/v1/rules/diagram", post(rules::diagram))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
