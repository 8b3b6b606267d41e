pub mod api;
pub mod config;
pub mod infrastructure;
pub mod models;
pub mod services;
pub mod utils;

use crate::api::handlers;
use crate::api::middleware::request_id::request_id_middleware;
use crate::config::AppConfig;
use crate::services::document_pipeline::DocumentPipeline;
use crate::services::storage::ObjectStore;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware::from_fn,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Extra room on top of the file cap for the other multipart fields and boundaries
const MULTIPART_OVERHEAD: usize = 1024 * 1024;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::documents::root,
        handlers::documents::upload_document,
        handlers::documents::get_document,
        handlers::documents::delete_document,
        handlers::health::health_check,
        handlers::health::documents_health,
    ),
    components(
        schemas(
            handlers::documents::DocumentUploadForm,
            handlers::documents::WelcomeResponse,
            models::ProcessingResult,
            models::ProcessingStatus,
            models::HealthResponse,
            models::DependencyStatus,
        )
    ),
    tags(
        (name = "documents", description = "PDF upload and AI processing"),
        (name = "system", description = "Service status endpoints")
    )
)]
pub struct ApiDoc;

#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn ObjectStore>,
    pub pipeline: Arc<DocumentPipeline>,
    pub config: AppConfig,
}

pub fn create_app(state: AppState) -> Router {
    let body_limit = state.config.upload.max_upload_size + MULTIPART_OVERHEAD;

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/", get(handlers::documents::root))
        .route("/health", get(handlers::health::health_check))
        .route("/documents/health", get(handlers::health::documents_health))
        .route(
            "/documents",
            post(handlers::documents::upload_document).layer(DefaultBodyLimit::max(body_limit)),
        )
        .route(
            "/documents/:document_id",
            get(handlers::documents::get_document).delete(handlers::documents::delete_document),
        )
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    let request_id = request
                        .headers()
                        .get("x-request-id")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("unknown");
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = %request_id,
                    )
                })
                .on_request(|request: &axum::http::Request<_>, _span: &tracing::Span| {
                    info!("📥 {} {}", request.method(), request.uri());
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     _span: &tracing::Span| {
                        info!(
                            "📤 Finished in {:?} with status {}",
                            latency,
                            response.status()
                        );
                    },
                ),
        )
        .layer(from_fn(request_id_middleware))
        .layer(cors)
}
