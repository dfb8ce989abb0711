//! Needs intake: support estimation, resource matching and the HTTP surface
//! tying them to a submitted form.

pub mod catalog;
pub mod domain;
pub mod estimate;
pub mod geo;
pub mod geocode;
pub mod matcher;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use catalog::{CatalogError, ResourceCatalog, StaticCatalog};
pub use domain::{
    flatten, parse_financial_amount, requested_categories, Coordinate, IntakeSubmission,
    InvalidAmount, LocatedResource, MatchResult, NeedProfile, PoliceHelpfulness, PoliceReport,
    ResourceCategory, ResourceRecord, UnknownCategory, MAX_FINANCIAL_REQUEST,
};
pub use estimate::{
    estimate, EstimateConfig, EstimateLine, EstimateResult, EstimateRule, SupportEstimator,
};
pub use geo::distance_miles;
pub use geocode::{FixedGeocoder, GeocodeError, GeocodeOutcome, Geocoder, NominatimGeocoder};
pub use matcher::{MatchingConfig, ResourceMatcher};
pub use router::{intake_router, ResourceQuery, ResourcesResponse};
pub use service::{
    AssessmentNotice, IntakeAssessment, IntakeServiceError, IntakeService, IntakeSettings,
    LocationStatus, LookupPolicy, UnresolvedReason,
};
