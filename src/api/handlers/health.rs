use crate::AppState;
use crate::models::{DependencyStatus, HealthResponse};
use axum::{Json, extract::State};
use chrono::Utc;
use std::collections::BTreeMap;

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service and dependency health", body = HealthResponse)
    ),
    tag = "system"
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let storage = if state.storage.health_check().await {
        DependencyStatus::Healthy
    } else {
        DependencyStatus::Unhealthy
    };

    let ai_service = if state.pipeline.ai_available() {
        DependencyStatus::Healthy
    } else {
        DependencyStatus::Unavailable
    };

    let mut dependencies = BTreeMap::new();
    dependencies.insert("storage".to_string(), storage);
    dependencies.insert("ai_service".to_string(), ai_service);

    let status = if dependencies
        .values()
        .all(|s| *s == DependencyStatus::Healthy)
    {
        "ok"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status: status.to_string(),
        timestamp: Utc::now(),
        dependencies,
    })
}

#[utoipa::path(
    get,
    path = "/documents/health",
    responses(
        (status = 200, description = "Document service health", body = HealthResponse)
    ),
    tag = "documents"
)]
pub async fn documents_health(state: State<AppState>) -> Json<HealthResponse> {
    health_check(state).await
}
