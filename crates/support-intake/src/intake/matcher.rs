use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use super::catalog::{CatalogError, ResourceCatalog};
use super::domain::{Coordinate, LocatedResource, MatchResult, ResourceCategory};
use super::geo::distance_miles;

/// Radius and per-category cap applied when the caller does not override them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchingConfig {
    pub max_radius_miles: f64,
    pub per_category_limit: usize,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            max_radius_miles: 25.0,
            per_category_limit: 2,
        }
    }
}

/// Selects the nearest catalog entries for each requested category.
pub struct ResourceMatcher<C> {
    catalog: Arc<C>,
    config: MatchingConfig,
}

impl<C> ResourceMatcher<C>
where
    C: ResourceCatalog,
{
    pub fn new(catalog: Arc<C>, config: MatchingConfig) -> Self {
        Self { catalog, config }
    }

    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    pub fn find_resources(
        &self,
        origin: Coordinate,
        categories: &[ResourceCategory],
    ) -> Result<Vec<MatchResult>, CatalogError> {
        self.find_resources_with(
            origin,
            categories,
            self.config.max_radius_miles,
            self.config.per_category_limit,
        )
    }

    /// Groups follow `categories` order, duplicates included. Categories with
    /// nothing in range produce no group. An invalid origin yields no matches
    /// without consulting the catalog.
    pub fn find_resources_with(
        &self,
        origin: Coordinate,
        categories: &[ResourceCategory],
        max_radius_miles: f64,
        per_category_limit: usize,
    ) -> Result<Vec<MatchResult>, CatalogError> {
        if !origin.is_valid() {
            debug!("origin outside coordinate range; skipping resource matching");
            return Ok(Vec::new());
        }
        if categories.is_empty()
            || per_category_limit == 0
            || max_radius_miles.is_nan()
            || max_radius_miles < 0.0
        {
            return Ok(Vec::new());
        }

        let entries = self.catalog.entries()?;
        let mut results = Vec::new();

        for &category in categories {
            let mut candidates: Vec<LocatedResource> = entries
                .iter()
                .filter(|entry| entry.category == category)
                .filter(|entry| entry.coordinate.is_valid())
                .map(|entry| LocatedResource {
                    distance_miles: distance_miles(origin, entry.coordinate),
                    resource: entry.clone(),
                })
                .filter(|candidate| candidate.distance_miles <= max_radius_miles)
                .collect();

            // stable: equal distances keep catalog order
            candidates.sort_by(|a, b| a.distance_miles.total_cmp(&b.distance_miles));
            candidates.truncate(per_category_limit);

            if candidates.is_empty() {
                continue;
            }

            results.push(MatchResult {
                category,
                entries: candidates,
            });
        }

        debug!(
            requested = categories.len(),
            matched_groups = results.len(),
            "resource matching complete"
        );

        Ok(results)
    }
}
