use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use support_intake::config::{AppConfig, CatalogConfig};
use support_intake::intake::{
    CatalogError, Coordinate, FixedGeocoder, IntakeSettings, LookupPolicy, ResourceCategory,
    StaticCatalog,
};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn load_catalog(config: &CatalogConfig) -> Result<StaticCatalog, CatalogError> {
    match &config.path {
        Some(path) => StaticCatalog::from_path(path),
        None => {
            let catalog = StaticCatalog::sample();
            info!(entries = catalog.len(), "using bundled sample resource catalog");
            Ok(catalog)
        }
    }
}

pub(crate) fn intake_settings(config: &AppConfig) -> IntakeSettings {
    IntakeSettings {
        matching: config.matching.clone(),
        lookup: LookupPolicy::from(&config.geocoder),
        ..IntakeSettings::default()
    }
}

/// Offline geocoder covering the neighborhoods around the sample catalog.
pub(crate) fn demo_geocoder() -> FixedGeocoder {
    FixedGeocoder::new()
        .with_place("Lower Manhattan", Coordinate::new(40.7128, -74.0060))
        .with_place("Tribeca", Coordinate::new(40.7163, -74.0086))
        .with_place("Brooklyn", Coordinate::new(40.6782, -73.9442))
        .with_place("Harlem", Coordinate::new(40.8116, -73.9465))
        .with_place("Philadelphia", Coordinate::new(39.9526, -75.1652))
}

pub(crate) fn parse_category(raw: &str) -> Result<ResourceCategory, String> {
    raw.parse::<ResourceCategory>()
        .map_err(|err| err.to_string())
}
