use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::api_router;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use phone_match::catalog::Catalog;
use phone_match::config::AppConfig;
use phone_match::decision::DecisionEngine;
use phone_match::error::AppError;
use phone_match::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(path) = args.catalog.take() {
        config.catalog.path = Some(path);
    }

    telemetry::init(&config.telemetry)?;

    let catalog = Catalog::load(config.catalog.path.as_deref())?;
    info!(
        phones = catalog.len(),
        source = ?config.catalog.path,
        "catalog loaded"
    );

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        catalog,
        engine: DecisionEngine::new(config.engine),
    };

    let app = api_router()
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "phone match service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
