use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::catalog::ResourceCatalog;
use super::domain::{
    Coordinate, IntakeSubmission, MatchResult, NeedProfile, ResourceCategory, UnknownCategory,
};
use super::estimate::EstimateResult;
use super::geocode::Geocoder;
use super::service::{IntakeAssessment, IntakeService};
use crate::error::AppError;

/// Router builder exposing the intake endpoints.
pub fn intake_router<C, G>(service: Arc<IntakeService<C, G>>) -> Router
where
    C: ResourceCatalog + 'static,
    G: Geocoder + 'static,
{
    Router::new()
        .route("/api/v1/intake/assessments", post(assess_handler::<C, G>))
        .route("/api/v1/intake/estimate", post(estimate_handler::<C, G>))
        .route("/api/v1/resources", get(resources_handler::<C, G>))
        .with_state(service)
}

/// Query string for direct resource lookups. `category` is comma separated.
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceQuery {
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub radius: Option<f64>,
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Nearest resources around a queried origin.
#[derive(Debug, Serialize)]
pub struct ResourcesResponse {
    pub origin_valid: bool,
    pub resources: Vec<MatchResult>,
}

impl ResourceQuery {
    fn categories(&self) -> Result<Vec<ResourceCategory>, UnknownCategory> {
        match self.category.as_deref().map(str::trim) {
            None | Some("") => Ok(ResourceCategory::ALL.to_vec()),
            Some(raw) => raw
                .split(',')
                .map(|value| value.parse::<ResourceCategory>())
                .collect(),
        }
    }
}

pub(crate) async fn assess_handler<C, G>(
    State(service): State<Arc<IntakeService<C, G>>>,
    payload: Result<Json<IntakeSubmission>, JsonRejection>,
) -> Result<Json<IntakeAssessment>, AppError>
where
    C: ResourceCatalog + 'static,
    G: Geocoder + 'static,
{
    let Json(submission) = payload?;
    let assessment = service.assess(submission).await?;
    Ok(Json(assessment))
}

pub(crate) async fn estimate_handler<C, G>(
    State(service): State<Arc<IntakeService<C, G>>>,
    payload: Result<Json<NeedProfile>, JsonRejection>,
) -> Result<Json<EstimateResult>, AppError>
where
    C: ResourceCatalog + 'static,
    G: Geocoder + 'static,
{
    let Json(profile) = payload?;
    Ok(Json(service.estimate(&profile.normalized())))
}

pub(crate) async fn resources_handler<C, G>(
    State(service): State<Arc<IntakeService<C, G>>>,
    query: Result<Query<ResourceQuery>, QueryRejection>,
) -> Result<Json<ResourcesResponse>, AppError>
where
    C: ResourceCatalog + 'static,
    G: Geocoder + 'static,
{
    let Query(query) = query?;
    let categories = query.categories()?;

    let origin = Coordinate::new(query.lat, query.lon);
    let resources = service.resources_near(origin, &categories, query.radius, query.limit)?;

    Ok(Json(ResourcesResponse {
        origin_valid: origin.is_valid(),
        resources,
    }))
}
