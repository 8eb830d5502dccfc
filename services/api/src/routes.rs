use crate::infra::AppState;
use axum::extract::rejection::JsonRejection;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Extension;
use axum::Json;
use hiresignal::error::AppError;
use hiresignal::workflows::screening::{
    preview, screening_router, ComparisonResult, ComparisonStore, MetricsProvider,
    MetricsRecord, ProfileDraft, ScreeningService, StandardProfileStore,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

/// Body of `POST /api/comparisons/preview`: a metrics record scored against an unsaved rubric.
#[derive(Debug, Deserialize)]
pub(crate) struct PreviewRequest {
    pub(crate) metrics: MetricsRecord,
    pub(crate) standard: ProfileDraft,
}

pub(crate) fn with_screening_routes<P, C, M>(
    service: Arc<ScreeningService<P, C, M>>,
) -> axum::Router
where
    P: StandardProfileStore + 'static,
    C: ComparisonStore + 'static,
    M: MetricsProvider + 'static,
{
    screening_router(service)
        .route("/", get(welcome))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/comparisons/preview", post(preview_endpoint))
        .fallback(route_not_found)
}

pub(crate) async fn welcome() -> Json<serde_json::Value> {
    Json(json!({ "message": "Welcome to the hiresignal screening API" }))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn preview_endpoint(
    payload: Result<Json<PreviewRequest>, JsonRejection>,
) -> Result<Json<ComparisonResult>, AppError> {
    let Json(PreviewRequest { metrics, standard }) = payload?;
    let result = preview(&metrics, standard)?;
    Ok(Json(result))
}

async fn route_not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "route not found" })),
    )
}
