use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;

use crate::error::AppError;

use super::domain::{ComparisonId, ComparisonRequest, ProfileDraft, ProfileId};
use super::metrics::{MetricsError, MetricsProvider};
use super::repository::{ComparisonStore, StandardProfileStore};
use super::service::{ScreeningService, ScreeningServiceError};

type SharedService<P, C, M> = Arc<ScreeningService<P, C, M>>;

/// Router builder exposing the GitHub lookup, comparison and standard profile endpoints.
pub fn screening_router<P, C, M>(service: SharedService<P, C, M>) -> Router
where
    P: StandardProfileStore + 'static,
    C: ComparisonStore + 'static,
    M: MetricsProvider + 'static,
{
    Router::new()
        .route(
            "/api/github/profile/:username",
            get(github_profile_handler::<P, C, M>),
        )
        .route(
            "/api/github/metrics/:username",
            get(github_metrics_handler::<P, C, M>),
        )
        .route(
            "/api/comparisons",
            get(list_comparisons_handler::<P, C, M>).post(create_comparison_handler::<P, C, M>),
        )
        .route(
            "/api/comparisons/:id",
            get(get_comparison_handler::<P, C, M>).delete(delete_comparison_handler::<P, C, M>),
        )
        .route(
            "/api/standards",
            get(list_profiles_handler::<P, C, M>).post(create_profile_handler::<P, C, M>),
        )
        .route(
            "/api/standards/:id",
            get(get_profile_handler::<P, C, M>)
                .put(update_profile_handler::<P, C, M>)
                .delete(delete_profile_handler::<P, C, M>),
        )
        .with_state(service)
}

/// Maps service failures onto HTTP statuses with a `{"error": ...}` body.
pub fn error_response(error: ScreeningServiceError) -> Response {
    let status = error_status(&error);
    if status.is_server_error() {
        tracing::error!(%error, "screening request failed");
    }

    let payload = json!({ "error": error.to_string() });
    (status, Json(payload)).into_response()
}

pub fn error_status(error: &ScreeningServiceError) -> StatusCode {
    match error {
        ScreeningServiceError::Validation(_) => StatusCode::BAD_REQUEST,
        ScreeningServiceError::ProfileNotFound(_)
        | ScreeningServiceError::ComparisonNotFound(_)
        | ScreeningServiceError::Metrics(MetricsError::UnknownAccount(_)) => StatusCode::NOT_FOUND,
        ScreeningServiceError::ProtectedProfile(_) => StatusCode::FORBIDDEN,
        ScreeningServiceError::Metrics(MetricsError::Upstream(_)) => StatusCode::BAD_GATEWAY,
        ScreeningServiceError::Metrics(MetricsError::Cache(_))
        | ScreeningServiceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn respond<T: serde::Serialize>(
    status: StatusCode,
    outcome: Result<T, ScreeningServiceError>,
) -> Response {
    match outcome {
        Ok(body) => (status, Json(body)).into_response(),
        Err(error) => error_response(error),
    }
}

/// Malformed or mistyped JSON bodies become 400 responses with an `{"error": ...}` body.
fn rejected(rejection: JsonRejection) -> Response {
    AppError::from(rejection).into_response()
}

fn deleted(outcome: Result<(), ScreeningServiceError>) -> Response {
    respond(StatusCode::OK, outcome.map(|()| json!({ "success": true })))
}

pub(crate) async fn github_profile_handler<P, C, M>(
    State(service): State<SharedService<P, C, M>>,
    Path(username): Path<String>,
) -> Response
where
    P: StandardProfileStore + 'static,
    C: ComparisonStore + 'static,
    M: MetricsProvider + 'static,
{
    respond(StatusCode::OK, service.github_profile(&username))
}

pub(crate) async fn github_metrics_handler<P, C, M>(
    State(service): State<SharedService<P, C, M>>,
    Path(username): Path<String>,
) -> Response
where
    P: StandardProfileStore + 'static,
    C: ComparisonStore + 'static,
    M: MetricsProvider + 'static,
{
    respond(StatusCode::OK, service.metrics(&username))
}

pub(crate) async fn create_comparison_handler<P, C, M>(
    State(service): State<SharedService<P, C, M>>,
    payload: Result<Json<ComparisonRequest>, JsonRejection>,
) -> Response
where
    P: StandardProfileStore + 'static,
    C: ComparisonStore + 'static,
    M: MetricsProvider + 'static,
{
    match payload {
        Ok(Json(request)) => respond(StatusCode::CREATED, service.compare(request)),
        Err(rejection) => rejected(rejection),
    }
}

pub(crate) async fn list_comparisons_handler<P, C, M>(
    State(service): State<SharedService<P, C, M>>,
) -> Response
where
    P: StandardProfileStore + 'static,
    C: ComparisonStore + 'static,
    M: MetricsProvider + 'static,
{
    respond(StatusCode::OK, service.list_comparisons())
}

pub(crate) async fn get_comparison_handler<P, C, M>(
    State(service): State<SharedService<P, C, M>>,
    Path(id): Path<String>,
) -> Response
where
    P: StandardProfileStore + 'static,
    C: ComparisonStore + 'static,
    M: MetricsProvider + 'static,
{
    respond(StatusCode::OK, service.get_comparison(&ComparisonId(id)))
}

pub(crate) async fn delete_comparison_handler<P, C, M>(
    State(service): State<SharedService<P, C, M>>,
    Path(id): Path<String>,
) -> Response
where
    P: StandardProfileStore + 'static,
    C: ComparisonStore + 'static,
    M: MetricsProvider + 'static,
{
    deleted(service.delete_comparison(&ComparisonId(id)))
}

pub(crate) async fn list_profiles_handler<P, C, M>(
    State(service): State<SharedService<P, C, M>>,
) -> Response
where
    P: StandardProfileStore + 'static,
    C: ComparisonStore + 'static,
    M: MetricsProvider + 'static,
{
    respond(StatusCode::OK, service.list_profiles())
}

pub(crate) async fn get_profile_handler<P, C, M>(
    State(service): State<SharedService<P, C, M>>,
    Path(id): Path<String>,
) -> Response
where
    P: StandardProfileStore + 'static,
    C: ComparisonStore + 'static,
    M: MetricsProvider + 'static,
{
    respond(StatusCode::OK, service.get_profile(&ProfileId(id)))
}

pub(crate) async fn create_profile_handler<P, C, M>(
    State(service): State<SharedService<P, C, M>>,
    payload: Result<Json<ProfileDraft>, JsonRejection>,
) -> Response
where
    P: StandardProfileStore + 'static,
    C: ComparisonStore + 'static,
    M: MetricsProvider + 'static,
{
    match payload {
        Ok(Json(draft)) => respond(StatusCode::CREATED, service.create_profile(draft)),
        Err(rejection) => rejected(rejection),
    }
}

pub(crate) async fn update_profile_handler<P, C, M>(
    State(service): State<SharedService<P, C, M>>,
    Path(id): Path<String>,
    payload: Result<Json<ProfileDraft>, JsonRejection>,
) -> Response
where
    P: StandardProfileStore + 'static,
    C: ComparisonStore + 'static,
    M: MetricsProvider + 'static,
{
    match payload {
        Ok(Json(draft)) => respond(StatusCode::OK, service.update_profile(&ProfileId(id), draft)),
        Err(rejection) => rejected(rejection),
    }
}

pub(crate) async fn delete_profile_handler<P, C, M>(
    State(service): State<SharedService<P, C, M>>,
    Path(id): Path<String>,
) -> Response
where
    P: StandardProfileStore + 'static,
    C: ComparisonStore + 'static,
    M: MetricsProvider + 'static,
{
    deleted(service.delete_profile(&ProfileId(id)))
}
