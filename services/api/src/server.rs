use crate::cli::ServeArgs;
use crate::infra::{
    sample_applications, AppState, InMemoryApplicationRepository, QueuedEvaluationTrigger,
};
use crate::routes::with_review_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use fellowship_review::config::{AppConfig, AppEnvironment};
use fellowship_review::error::AppError;
use fellowship_review::review::{DashboardPoller, ReviewService};
use fellowship_review::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = match config.environment {
        AppEnvironment::Production => InMemoryApplicationRepository::default(),
        AppEnvironment::Development | AppEnvironment::Test => {
            InMemoryApplicationRepository::seeded(sample_applications())
        }
    };
    let trigger = QueuedEvaluationTrigger::default();
    let review_service = Arc::new(ReviewService::new(Arc::new(repository), Arc::new(trigger)));

    let poller = Arc::new(DashboardPoller::new(
        review_service.clone(),
        config.dashboard.list_limit,
    ));
    let poller_handle = poller.clone().spawn(config.dashboard.poll_interval());

    let app = with_review_routes(review_service, poller)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        poll_interval_secs = config.dashboard.poll_interval_secs,
        "fellowship review service ready"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    readiness_flag.store(false, Ordering::Release);
    poller_handle.shutdown().await;
    info!("fellowship review service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
