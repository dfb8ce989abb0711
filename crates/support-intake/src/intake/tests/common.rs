use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::response::Response;
use serde_json::Value;

use crate::intake::catalog::{CatalogError, ResourceCatalog, StaticCatalog};
use crate::intake::domain::{Coordinate, NeedProfile, ResourceCategory, ResourceRecord};
use crate::intake::geocode::{FixedGeocoder, GeocodeError, GeocodeOutcome, Geocoder};
use crate::intake::matcher::{MatchingConfig, ResourceMatcher};
use crate::intake::service::{IntakeService, IntakeSettings, LookupPolicy};

pub(super) const LOWER_MANHATTAN: Coordinate = Coordinate::new(40.7128, -74.0060);
pub(super) const PHILADELPHIA: Coordinate = Coordinate::new(39.9526, -75.1652);

pub(super) fn resource(
    name: &str,
    category: ResourceCategory,
    coordinate: Coordinate,
) -> ResourceRecord {
    ResourceRecord {
        name: name.to_string(),
        address: format!("{name} address"),
        phone: "(555) 010-0000".to_string(),
        category,
        hours_text: "Mon-Fri 9am-5pm".to_string(),
        website: "https://example.org".to_string(),
        coordinate,
    }
}

/// Shelters at increasing distance north of lower Manhattan, plus one in Philadelphia.
pub(super) fn shelter_catalog() -> StaticCatalog {
    StaticCatalog::new(vec![
        resource(
            "Uptown Refuge",
            ResourceCategory::Shelter,
            Coordinate::new(40.7831, -73.9712),
        ),
        resource("Philadelphia Haven", ResourceCategory::Shelter, PHILADELPHIA),
        resource(
            "Tribeca House",
            ResourceCategory::Shelter,
            Coordinate::new(40.7163, -74.0086),
        ),
        resource(
            "Midtown Beds",
            ResourceCategory::Shelter,
            Coordinate::new(40.7549, -73.9840),
        ),
        resource(
            "Courthouse Legal Aid",
            ResourceCategory::Legal,
            Coordinate::new(40.7143, -74.0040),
        ),
    ])
}

pub(super) fn sample_matcher() -> ResourceMatcher<StaticCatalog> {
    ResourceMatcher::new(Arc::new(StaticCatalog::sample()), MatchingConfig::default())
}

pub(super) fn profile() -> NeedProfile {
    NeedProfile::default()
}

pub(super) fn fixed_geocoder() -> FixedGeocoder {
    FixedGeocoder::new()
        .with_place("Lower Manhattan", LOWER_MANHATTAN)
        .with_place("Philadelphia", PHILADELPHIA)
        .with_place("Honolulu", Coordinate::new(21.3069, -157.8583))
}

pub(super) fn settings() -> IntakeSettings {
    IntakeSettings {
        lookup: LookupPolicy {
            timeout: Duration::from_millis(200),
            max_retries: 1,
        },
        ..IntakeSettings::default()
    }
}

pub(super) fn build_service() -> IntakeService<StaticCatalog, FixedGeocoder> {
    IntakeService::new(
        Arc::new(StaticCatalog::sample()),
        Arc::new(fixed_geocoder()),
        settings(),
    )
}

pub(super) struct UnavailableCatalog;

impl ResourceCatalog for UnavailableCatalog {
    fn entries(&self) -> Result<Arc<[ResourceRecord]>, CatalogError> {
        Err(CatalogError::Unavailable("catalog store offline".to_string()))
    }
}

/// Fails with a transport error for the first `failures` calls, then resolves.
pub(super) struct FlakyGeocoder {
    failures: usize,
    calls: AtomicUsize,
    coordinate: Coordinate,
}

impl FlakyGeocoder {
    pub(super) fn new(failures: usize, coordinate: Coordinate) -> Self {
        Self {
            failures,
            calls: AtomicUsize::new(0),
            coordinate,
        }
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Geocoder for FlakyGeocoder {
    async fn geocode(&self, _text: &str) -> Result<GeocodeOutcome, GeocodeError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.failures {
            return Err(GeocodeError::Transport("connection reset".to_string()));
        }
        Ok(GeocodeOutcome::Located {
            coordinate: self.coordinate,
        })
    }
}

/// Never answers within any reasonable timeout.
pub(super) struct StalledGeocoder {
    pub(super) calls: AtomicUsize,
}

#[async_trait]
impl Geocoder for StalledGeocoder {
    async fn geocode(&self, _text: &str) -> Result<GeocodeOutcome, GeocodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(GeocodeOutcome::NotFound)
    }
}

/// Counts calls and always reports not found.
#[derive(Default)]
pub(super) struct CountingNotFoundGeocoder {
    pub(super) calls: AtomicUsize,
}

#[async_trait]
impl Geocoder for CountingNotFoundGeocoder {
    async fn geocode(&self, _text: &str) -> Result<GeocodeOutcome, GeocodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(GeocodeOutcome::NotFound)
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
