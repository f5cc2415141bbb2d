use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::domain::{Application, ApplicationId, ReviewStatus};
use super::poller::{BoardSource, DashboardPoller};
use super::repository::{
    ApplicationRepository, EvaluationMode, EvaluationTrigger, RepositoryError,
};
use super::service::{AdminScoreInput, Notification, ReviewService, ReviewServiceError};

pub const DEFAULT_LIST_LIMIT: usize = 200;

/// Router exposing the application table, review cards, and reviewer actions.
pub fn review_router<R, E>(service: Arc<ReviewService<R, E>>) -> Router
where
    R: ApplicationRepository + 'static,
    E: EvaluationTrigger + 'static,
{
    Router::new()
        .route("/api/v1/applications", get(list_handler::<R, E>))
        .route(
            "/api/v1/applications/:application_id",
            get(review_handler::<R, E>),
        )
        .route(
            "/api/v1/applications/:application_id/evaluate",
            post(evaluate_handler::<R, E>),
        )
        .route(
            "/api/v1/applications/:application_id/score",
            post(score_handler::<R, E>),
        )
        .route(
            "/api/v1/applications/:application_id/status",
            post(status_handler::<R, E>),
        )
        .route("/api/v1/resolve", post(resolve_handler::<R, E>))
        .with_state(service)
}

/// Router exposing the polled dashboard board.
pub fn dashboard_router<S: BoardSource>(poller: Arc<DashboardPoller<S>>) -> Router {
    Router::new()
        .route("/api/v1/dashboard", get(board_handler::<S>))
        .route("/api/v1/dashboard/refresh", post(refresh_handler::<S>))
        .with_state(poller)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListParams {
    limit: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct EvaluateRequest {
    #[serde(default)]
    mode: EvaluationMode,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatusRequest {
    status: ReviewStatus,
}

/// Raw application posted for a storage-free preview.
#[derive(Debug, Deserialize)]
pub(crate) struct ResolveRequest {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    answers: Value,
    #[serde(default)]
    evaluation_data: Value,
}

pub(crate) async fn list_handler<R, E>(
    State(service): State<Arc<ReviewService<R, E>>>,
    Query(params): Query<ListParams>,
) -> Response
where
    R: ApplicationRepository + 'static,
    E: EvaluationTrigger + 'static,
{
    let limit = params.limit.unwrap_or(DEFAULT_LIST_LIMIT);
    match service.list(limit) {
        Ok(rows) => (StatusCode::OK, axum::Json(rows)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn review_handler<R, E>(
    State(service): State<Arc<ReviewService<R, E>>>,
    Path(application_id): Path<String>,
) -> Response
where
    R: ApplicationRepository + 'static,
    E: EvaluationTrigger + 'static,
{
    match service.review(&ApplicationId(application_id)) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn evaluate_handler<R, E>(
    State(service): State<Arc<ReviewService<R, E>>>,
    Path(application_id): Path<String>,
    axum::Json(request): axum::Json<EvaluateRequest>,
) -> Response
where
    R: ApplicationRepository + 'static,
    E: EvaluationTrigger + 'static,
{
    match service.trigger_evaluation(&ApplicationId(application_id), request.mode) {
        Ok(notification) => notification_response(notification, StatusCode::ACCEPTED),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn score_handler<R, E>(
    State(service): State<Arc<ReviewService<R, E>>>,
    Path(application_id): Path<String>,
    axum::Json(input): axum::Json<AdminScoreInput>,
) -> Response
where
    R: ApplicationRepository + 'static,
    E: EvaluationTrigger + 'static,
{
    match service.submit_score(&ApplicationId(application_id), input) {
        Ok(notification) => notification_response(notification, StatusCode::OK),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn status_handler<R, E>(
    State(service): State<Arc<ReviewService<R, E>>>,
    Path(application_id): Path<String>,
    axum::Json(request): axum::Json<StatusRequest>,
) -> Response
where
    R: ApplicationRepository + 'static,
    E: EvaluationTrigger + 'static,
{
    match service.set_review_status(&ApplicationId(application_id), request.status) {
        Ok(notification) => notification_response(notification, StatusCode::OK),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn resolve_handler<R, E>(
    State(service): State<Arc<ReviewService<R, E>>>,
    axum::Json(request): axum::Json<ResolveRequest>,
) -> Response
where
    R: ApplicationRepository + 'static,
    E: EvaluationTrigger + 'static,
{
    let id = request.id.unwrap_or_else(|| "preview".to_string());
    let mut application = Application::new(id, request.answers);
    application.evaluation_data = request.evaluation_data;

    let view = service.resolver().resolve(&application).review_view(&application);
    (StatusCode::OK, axum::Json(view)).into_response()
}

pub(crate) async fn board_handler<S: BoardSource>(
    State(poller): State<Arc<DashboardPoller<S>>>,
) -> Response {
    let board = poller.board().snapshot().await;
    (StatusCode::OK, axum::Json(board)).into_response()
}

pub(crate) async fn refresh_handler<S: BoardSource>(
    State(poller): State<Arc<DashboardPoller<S>>>,
) -> Response {
    let board = poller.refresh_now().await;
    (StatusCode::OK, axum::Json(board)).into_response()
}

fn notification_response(notification: Notification, success: StatusCode) -> Response {
    let status = if notification.is_error() {
        StatusCode::BAD_GATEWAY
    } else {
        success
    };
    (status, axum::Json(notification)).into_response()
}

fn error_response(error: ReviewServiceError) -> Response {
    let status = match &error {
        ReviewServiceError::NotFound(_)
        | ReviewServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        error if error.is_validation() => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
