use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use fellowship_review::review::{
    dashboard_router, review_router, ApplicationRepository, DashboardPoller, EvaluationTrigger,
    ReviewService,
};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_review_routes<R, E>(
    service: Arc<ReviewService<R, E>>,
    poller: Arc<DashboardPoller<ReviewService<R, E>>>,
) -> axum::Router
where
    R: ApplicationRepository + 'static,
    E: EvaluationTrigger + 'static,
{
    review_router(service)
        .merge(dashboard_router(poller))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{sample_applications, InMemoryApplicationRepository, QueuedEvaluationTrigger};
    use axum::body::Body;
    use axum::http::Request;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use serde_json::Value;
    use std::sync::atomic::AtomicBool;
    use tower::ServiceExt;

    fn app(ready: bool) -> axum::Router {
        let service = Arc::new(ReviewService::new(
            Arc::new(InMemoryApplicationRepository::seeded(sample_applications())),
            Arc::new(QueuedEvaluationTrigger::default()),
        ));
        let poller = Arc::new(DashboardPoller::new(service.clone(), 50));
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };
        with_review_routes(service, poller).layer(Extension(state))
    }

    async fn get(router: axum::Router, uri: &str) -> (StatusCode, Value) {
        let response = router
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), 256 * 1024)
            .await
            .expect("body");
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn readiness_reflects_flag() {
        let (status, body) = get(app(false), "/ready").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "initializing");

        let (status, _) = get(app(true), "/ready").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn health_is_always_ok() {
        let (status, body) = get(app(false), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn application_table_lists_sample_data() {
        let (status, body) = get(app(true), "/api/v1/applications").await;

        assert_eq!(status, StatusCode::OK);
        let rows = body.as_array().expect("rows");
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0]["application_id"], "app-1001");
        assert_eq!(rows[3]["stage_label"], "Cannot determine stage");
        assert_eq!(rows[3]["needs_attention"], true);
    }

    #[tokio::test]
    async fn legacy_sample_resolves_through_aliases() {
        let (status, body) = get(app(true), "/api/v1/applications/app-1003").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["stage"]["label"], "Early Revenue");
        assert_eq!(body["summary"]["answered"], 7);
        assert_eq!(body["questions"][1]["ai_score"], 9.0);
        assert_eq!(body["debug"]["payload_shape"], "flat");
    }

    #[tokio::test]
    async fn metrics_endpoint_renders_text() {
        let router = app(true);
        let response = router
            .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; version=0.0.4"
        );
    }
}
