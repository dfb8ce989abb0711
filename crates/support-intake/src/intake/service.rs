use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::catalog::{CatalogError, ResourceCatalog};
use super::domain::{
    requested_categories, Coordinate, IntakeSubmission, MatchResult, NeedProfile,
    ResourceCategory,
};
use super::estimate::{EstimateConfig, EstimateResult, SupportEstimator};
use super::geocode::{GeocodeOutcome, Geocoder};
use super::matcher::{MatchingConfig, ResourceMatcher};
use crate::config::GeocoderConfig;

/// Per-attempt timeout and retry budget for location lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupPolicy {
    pub timeout: Duration,
    pub max_retries: u8,
}

impl Default for LookupPolicy {
    fn default() -> Self {
        Self::from(&GeocoderConfig::default())
    }
}

impl From<&GeocoderConfig> for LookupPolicy {
    fn from(config: &GeocoderConfig) -> Self {
        Self {
            timeout: config.timeout,
            max_retries: config.max_retries,
        }
    }
}

/// Tunables for a single intake service instance.
#[derive(Debug, Clone, Default)]
pub struct IntakeSettings {
    pub estimate: EstimateConfig,
    pub matching: MatchingConfig,
    pub lookup: LookupPolicy,
}

/// Whether the submitted location could be placed on the map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LocationStatus {
    Located { coordinate: Coordinate },
    Unresolved { reason: UnresolvedReason },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnresolvedReason {
    MissingLocation,
    NotFound,
    LookupFailed,
}

/// User-facing conditions the presentation layer should surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentNotice {
    UnableToLocate,
    NoResourcesFound,
}

impl AssessmentNotice {
    pub fn message(&self) -> &'static str {
        match self {
            AssessmentNotice::UnableToLocate => {
                "We were unable to locate that address, so nearby resources are not shown."
            }
            AssessmentNotice::NoResourcesFound => {
                "No matching resources were found near that location."
            }
        }
    }
}

/// Everything produced for one submitted form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntakeAssessment {
    pub assessed_at: DateTime<Utc>,
    pub estimate: EstimateResult,
    pub location: LocationStatus,
    pub resources: Vec<MatchResult>,
    pub notices: Vec<AssessmentNotice>,
}

/// Composes the estimator, geocoder and resource matcher for a submission.
pub struct IntakeService<C, G> {
    estimator: SupportEstimator,
    matcher: ResourceMatcher<C>,
    geocoder: Arc<G>,
    lookup: LookupPolicy,
}

impl<C, G> IntakeService<C, G>
where
    C: ResourceCatalog + 'static,
    G: Geocoder + 'static,
{
    pub fn new(catalog: Arc<C>, geocoder: Arc<G>, settings: IntakeSettings) -> Self {
        let IntakeSettings {
            estimate,
            matching,
            lookup,
        } = settings;

        Self {
            estimator: SupportEstimator::new(estimate),
            matcher: ResourceMatcher::new(catalog, matching),
            geocoder,
            lookup,
        }
    }

    pub fn estimate(&self, profile: &NeedProfile) -> EstimateResult {
        self.estimator.estimate(profile)
    }

    /// Direct matcher access with optional radius/limit overrides.
    pub fn resources_near(
        &self,
        origin: Coordinate,
        categories: &[ResourceCategory],
        max_radius_miles: Option<f64>,
        per_category_limit: Option<usize>,
    ) -> Result<Vec<MatchResult>, CatalogError> {
        let defaults = self.matcher.config();
        self.matcher.find_resources_with(
            origin,
            categories,
            max_radius_miles.unwrap_or(defaults.max_radius_miles),
            per_category_limit.unwrap_or(defaults.per_category_limit),
        )
    }

    /// Estimates support and, when the location resolves, matches nearby resources.
    ///
    /// Location problems never fail the assessment; only catalog failures do.
    pub async fn assess(
        &self,
        submission: IntakeSubmission,
    ) -> Result<IntakeAssessment, IntakeServiceError> {
        let IntakeSubmission { profile, location } = submission;
        let profile = profile.normalized();

        let estimate = self.estimator.estimate(&profile);
        let location = self.locate(&location).await;

        let mut notices = Vec::new();
        let resources = match location {
            LocationStatus::Located { coordinate } => {
                let categories = requested_categories(&profile);
                let resources = self.matcher.find_resources(coordinate, &categories)?;
                if resources.is_empty() {
                    notices.push(AssessmentNotice::NoResourcesFound);
                }
                resources
            }
            LocationStatus::Unresolved { .. } => {
                notices.push(AssessmentNotice::UnableToLocate);
                Vec::new()
            }
        };

        info!(
            total_amount = estimate.total_amount,
            located = matches!(location, LocationStatus::Located { .. }),
            resource_groups = resources.len(),
            "intake assessment complete"
        );

        Ok(IntakeAssessment {
            assessed_at: Utc::now(),
            estimate,
            location,
            resources,
            notices,
        })
    }

    async fn locate(&self, text: &str) -> LocationStatus {
        let text = text.trim();
        if text.is_empty() {
            return LocationStatus::Unresolved {
                reason: UnresolvedReason::MissingLocation,
            };
        }

        let attempts = u32::from(self.lookup.max_retries) + 1;
        for attempt in 1..=attempts {
            match tokio::time::timeout(self.lookup.timeout, self.geocoder.geocode(text)).await {
                Ok(Ok(GeocodeOutcome::Located { coordinate })) if coordinate.is_valid() => {
                    debug!(attempt, "location resolved");
                    return LocationStatus::Located { coordinate };
                }
                Ok(Ok(_)) => {
                    debug!(attempt, "location not found");
                    return LocationStatus::Unresolved {
                        reason: UnresolvedReason::NotFound,
                    };
                }
                Ok(Err(err)) => {
                    warn!(attempt, attempts, error = %err, "location lookup failed");
                }
                Err(_) => {
                    warn!(
                        attempt,
                        attempts,
                        timeout_secs = self.lookup.timeout.as_secs_f64(),
                        "location lookup timed out"
                    );
                }
            }
        }

        LocationStatus::Unresolved {
            reason: UnresolvedReason::LookupFailed,
        }
    }
}

/// Failures that prevent an assessment from being produced at all.
#[derive(Debug, thiserror::Error)]
pub enum IntakeServiceError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}
