use std::sync::Arc;

use axum::middleware;
use axum::routing::get;
use axum::{Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::{
    DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer,
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;
use service::company::{CompanyRepository, CompanyService};

use crate::auth::{self, ApiKeyConfig};
use crate::openapi::ApiDoc;

pub mod companies;

/// Company service behind its capability contract; the router never sees the
/// concrete repository.
pub type DynCompanyService = CompanyService<dyn CompanyRepository>;

#[derive(Clone)]
pub struct AppState {
    pub companies: Arc<DynCompanyService>,
    pub api: ApiKeyConfig,
}

#[utoipa::path(
    get, path = "/health", tag = "health",
    responses((status = 200, description = "Service healthy"))
)]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": "company-registry",
        "docs": "/swagger-ui",
        "health": "/health",
    }))
}

/// Build the full application router: public routes (root, health, docs) and
/// the key-guarded company API.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let public = Router::new()
        .route("/", get(root))
        .route("/health", get(health));

    let api = Router::new()
        .route(
            "/api/companies",
            get(companies::list).post(companies::create),
        )
        .route(
            "/api/companies/:id",
            get(companies::get_by_id)
                .put(companies::update)
                .delete(companies::delete),
        )
        .route("/api/companies/by-isin/:isin", get(companies::get_by_isin))
        .route_layer(middleware::from_fn_with_state(
            state.api.clone(),
            auth::require_api_key,
        ));

    public
        .merge(api)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
