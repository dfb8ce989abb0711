use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use tracing::info;

use super::domain::{Coordinate, ResourceCategory, ResourceRecord};

/// Read-only source of assistance providers, injected into the matcher.
pub trait ResourceCatalog: Send + Sync {
    fn entries(&self) -> Result<Arc<[ResourceRecord]>, CatalogError>;
}

/// Catalog loading and access failures. Distinct from "no results".
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read resource catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid resource catalog CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("resource catalog line {line}: {reason}")]
    InvalidRow { line: usize, reason: String },
    #[error("resource catalog unavailable: {0}")]
    Unavailable(String),
}

/// In-memory catalog fixed at construction time.
#[derive(Debug, Clone)]
pub struct StaticCatalog {
    entries: Arc<[ResourceRecord]>,
}

impl StaticCatalog {
    pub fn new(entries: Vec<ResourceRecord>) -> Self {
        Self {
            entries: entries.into(),
        }
    }

    /// Reference catalog with one provider per category in lower Manhattan.
    pub fn sample() -> Self {
        Self::new(vec![
            sample_entry(
                "Safe Haven Shelter",
                "12 Chambers St, New York, NY 10007",
                "(212) 555-0140",
                ResourceCategory::Shelter,
                "Open 24 hours",
                "https://example.org/safe-haven",
                Coordinate::new(40.7128, -74.0060),
            ),
            sample_entry(
                "Women's Health Center",
                "80 Reade St, New York, NY 10007",
                "(212) 555-0162",
                ResourceCategory::Health,
                "Mon-Fri 8am-6pm",
                "https://example.org/womens-health",
                Coordinate::new(40.7138, -74.0050),
            ),
            sample_entry(
                "Food Assistance Program",
                "101 Duane St, New York, NY 10007",
                "(212) 555-0188",
                ResourceCategory::Food,
                "Tue-Sat 10am-4pm",
                "https://example.org/food-assistance",
                Coordinate::new(40.7148, -74.0040),
            ),
            sample_entry(
                "Family Justice Legal Clinic",
                "60 Worth St, New York, NY 10013",
                "(212) 555-0123",
                ResourceCategory::Legal,
                "Mon-Fri 9am-5pm",
                "https://example.org/family-justice",
                Coordinate::new(40.7158, -74.0030),
            ),
            sample_entry(
                "Hope Counseling Services",
                "25 Thomas St, New York, NY 10007",
                "(212) 555-0197",
                ResourceCategory::Counseling,
                "Mon-Sat 9am-8pm",
                "https://example.org/hope-counseling",
                Coordinate::new(40.7168, -74.0020),
            ),
        ])
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let catalog = Self::from_reader(file)?;
        info!(
            path = %path.display(),
            entries = catalog.len(),
            "resource catalog loaded"
        );
        Ok(catalog)
    }

    /// Loads `name,address,phone,category,hours,website,latitude,longitude` rows.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut entries = Vec::new();

        for (index, row) in csv_reader.deserialize::<CatalogRow>().enumerate() {
            // header occupies line 1
            let line = index + 2;
            entries.push(row?.into_record(line)?);
        }

        Ok(Self::new(entries))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ResourceCatalog for StaticCatalog {
    fn entries(&self) -> Result<Arc<[ResourceRecord]>, CatalogError> {
        Ok(Arc::clone(&self.entries))
    }
}

fn sample_entry(
    name: &str,
    address: &str,
    phone: &str,
    category: ResourceCategory,
    hours_text: &str,
    website: &str,
    coordinate: Coordinate,
) -> ResourceRecord {
    ResourceRecord {
        name: name.to_string(),
        address: address.to_string(),
        phone: phone.to_string(),
        category,
        hours_text: hours_text.to_string(),
        website: website.to_string(),
        coordinate,
    }
}

#[derive(Debug, Deserialize)]
struct CatalogRow {
    name: String,
    #[serde(default)]
    address: String,
    #[serde(default)]
    phone: String,
    category: String,
    #[serde(default)]
    hours: String,
    #[serde(default)]
    website: String,
    latitude: f64,
    longitude: f64,
}

impl CatalogRow {
    fn into_record(self, line: usize) -> Result<ResourceRecord, CatalogError> {
        if self.name.is_empty() {
            return Err(CatalogError::InvalidRow {
                line,
                reason: "missing provider name".to_string(),
            });
        }

        let category = self
            .category
            .parse::<ResourceCategory>()
            .map_err(|err| CatalogError::InvalidRow {
                line,
                reason: err.to_string(),
            })?;

        let coordinate = Coordinate::new(self.latitude, self.longitude);
        if !coordinate.is_valid() {
            return Err(CatalogError::InvalidRow {
                line,
                reason: format!(
                    "coordinate ({}, {}) out of range",
                    self.latitude, self.longitude
                ),
            });
        }

        Ok(ResourceRecord {
            name: self.name,
            address: self.address,
            phone: self.phone,
            category,
            hours_text: self.hours,
            website: self.website,
            coordinate,
        })
    }
}
