use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_score_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use gap_score::config::AppConfig;
use gap_score::error::AppError;
use gap_score::scoring::{
    ApiGuard, HttpSiteFetcher, ReadinessEngine, ReadinessService, SignalCatalog, SystemClock,
};
use gap_score::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
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
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let catalog = Arc::new(SignalCatalog::standard());
    let engine = Arc::new(ReadinessEngine::new(catalog.clone(), config.scoring.clone()));
    let fetcher = Arc::new(HttpSiteFetcher::new(&config.fetch)?);
    let service = Arc::new(ReadinessService::new(engine, fetcher, Arc::new(SystemClock)));

    let guard = ApiGuard::from(&config.auth);
    if !guard.is_enforced() {
        warn!("GAP_SCORE_API_KEY not set; scoring endpoint is unauthenticated");
    }

    let app = with_score_routes(service, guard, &config.cors)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        catalog_version = catalog.version,
        compliance_model = ?config.scoring.compliance_model,
        origins = config.cors.allowed_origins.len(),
        "gap score service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
