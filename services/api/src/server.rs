use crate::cli::ServeArgs;
use crate::infra::{intake_settings, load_catalog, AppState};
use crate::routes::with_intake_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use support_intake::config::AppConfig;
use support_intake::error::AppError;
use support_intake::intake::{IntakeService, NominatimGeocoder};
use support_intake::telemetry;
use tracing::info;

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

    let catalog = Arc::new(load_catalog(&config.catalog)?);
    let geocoder = Arc::new(NominatimGeocoder::new(&config.geocoder)?);
    let intake_service = Arc::new(IntakeService::new(
        catalog,
        geocoder,
        intake_settings(&config),
    ));

    let app = with_intake_routes(intake_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        max_radius_miles = config.matching.max_radius_miles,
        per_category_limit = config.matching.per_category_limit,
        "support intake service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
