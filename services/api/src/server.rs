use crate::cli::ServeArgs;
use crate::infra::{load_catalog, AppState, InMemorySessionRepository};
use crate::routes::with_navigator_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;
use youth_navigator::config::AppConfig;
use youth_navigator::error::AppError;
use youth_navigator::telemetry;
use youth_navigator::workflows::intake::{IntakeService, QuestionFlow};

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

    let catalog = load_catalog(config.navigator.catalog_path.as_deref())?;
    let resources = catalog.len();
    let repository = Arc::new(InMemorySessionRepository::default());
    let intake_service = Arc::new(IntakeService::new(
        repository,
        QuestionFlow::standard(),
        catalog,
        config.navigator.session_ttl(),
    ));

    let app = with_navigator_routes(intake_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, resources, "youth resource navigator ready");

    axum::serve(listener, app).await?;
    Ok(())
}
