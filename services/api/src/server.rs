use crate::cli::ServeArgs;
use crate::infra::{
    AppState, FixtureGithubSource, InMemoryComparisonStore, InMemoryMetricsCache,
    InMemoryProfileStore,
};
use crate::routes::with_screening_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use hiresignal::config::AppConfig;
use hiresignal::error::AppError;
use hiresignal::telemetry;
use hiresignal::workflows::screening::{CachedMetricsProvider, ScreeningService};
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
    if let Some(fixtures) = args.fixtures.take() {
        config.github.fixtures_path = Some(fixtures);
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let source = match &config.github.fixtures_path {
        Some(path) => {
            let source = FixtureGithubSource::from_path(path)?;
            info!(
                path = %path.display(),
                accounts = source.account_count(),
                "loaded GitHub fixtures"
            );
            source
        }
        None => {
            warn!("APP_GITHUB_FIXTURES not set, GitHub lookups will report unknown accounts");
            FixtureGithubSource::default()
        }
    };
    let provider = Arc::new(CachedMetricsProvider::with_ttl(
        Arc::new(source),
        Arc::new(InMemoryMetricsCache::default()),
        config.github.metrics_ttl(),
    ));
    let screening_service = Arc::new(ScreeningService::new(
        Arc::new(InMemoryProfileStore::default()),
        Arc::new(InMemoryComparisonStore::default()),
        provider,
    )?);

    let app = with_screening_routes(screening_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        metrics_ttl_hours = config.github.metrics_ttl_hours,
        "screening service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
