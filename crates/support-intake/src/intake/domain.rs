use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize};

/// Upper bound applied to a requested financial amount at the input boundary.
pub const MAX_FINANCIAL_REQUEST: u32 = 10_000;

/// Whether the incident was reported to police. `Unset` is a valid answer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoliceReport {
    #[default]
    Unset,
    Yes,
    No,
}

/// How helpful the police response felt to the person.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoliceHelpfulness {
    #[default]
    Unset,
    Yes,
    No,
    Somewhat,
}

/// Structured answer set describing a person's stated needs.
///
/// Missing keys deserialize to their false/zero/unset defaults so the estimator
/// always receives a fully populated record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NeedProfile {
    pub reported_to_police: PoliceReport,
    pub police_response_narrative: String,
    pub felt_helped_by_police: PoliceHelpfulness,
    pub needs_financial: bool,
    #[serde(deserialize_with = "deserialize_financial_amount")]
    pub financial_amount_requested: u32,
    pub financial_use_narrative: String,
    pub mental_health_concern: bool,
    pub physical_health_concern: bool,
    pub needs_shelter: bool,
    pub needs_food: bool,
    pub has_children_present: bool,
    pub unemployed: bool,
    pub in_school: bool,
}

impl NeedProfile {
    /// Applies input-boundary clamping.
    pub fn normalized(mut self) -> Self {
        self.financial_amount_requested = self.financial_amount_requested.min(MAX_FINANCIAL_REQUEST);
        self
    }
}

/// Free-text dollar amount coercion for the financial request field.
///
/// Accepts forms like `"1200"`, `"$1,200"` or `" 800.00 "`. Empty text means zero.
/// Cents are truncated and the result is clamped to [`MAX_FINANCIAL_REQUEST`].
pub fn parse_financial_amount(raw: &str) -> Result<u32, InvalidAmount> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }

    let cleaned: String = trimmed
        .trim_start_matches('$')
        .chars()
        .filter(|ch| *ch != ',' && !ch.is_whitespace())
        .collect();

    let whole = match cleaned.split_once('.') {
        Some((whole, cents)) if cents.chars().all(|ch| ch.is_ascii_digit()) => whole,
        Some(_) => return Err(InvalidAmount(raw.to_string())),
        None => cleaned.as_str(),
    };

    if whole.is_empty() || !whole.chars().all(|ch| ch.is_ascii_digit()) {
        return Err(InvalidAmount(raw.to_string()));
    }

    let amount = whole.parse::<u64>().unwrap_or(u64::MAX);
    Ok(clamp_amount(amount))
}

fn clamp_amount(amount: u64) -> u32 {
    amount.min(u64::from(MAX_FINANCIAL_REQUEST)) as u32
}

/// Reads the requested amount as either a JSON number or the form's free text.
fn deserialize_financial_amount<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawAmount {
        Whole(u64),
        Signed(i64),
        Fractional(f64),
        Text(String),
    }

    match Option::<RawAmount>::deserialize(deserializer)? {
        None => Ok(0),
        Some(RawAmount::Whole(amount)) => Ok(clamp_amount(amount)),
        Some(RawAmount::Fractional(amount)) if amount.is_finite() && amount >= 0.0 => {
            Ok(clamp_amount(amount.trunc() as u64))
        }
        Some(RawAmount::Signed(amount)) => {
            Err(de::Error::custom(InvalidAmount(amount.to_string())))
        }
        Some(RawAmount::Fractional(amount)) => {
            Err(de::Error::custom(InvalidAmount(amount.to_string())))
        }
        Some(RawAmount::Text(raw)) => parse_financial_amount(&raw).map_err(de::Error::custom),
    }
}

/// Rejected free-text amount.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a valid non-negative dollar amount")]
pub struct InvalidAmount(pub String);

/// Geographic point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Parses `"lat, lon"` text. Returns `None` for anything else, including
    /// out-of-range pairs.
    pub fn parse_literal(text: &str) -> Option<Self> {
        let (lat, lon) = text.split_once(',')?;
        let coordinate = Self::new(lat.trim().parse().ok()?, lon.trim().parse().ok()?);
        coordinate.is_valid().then_some(coordinate)
    }
}

/// Kind of assistance a catalog entry provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceCategory {
    Shelter,
    Health,
    Food,
    Legal,
    Counseling,
}

impl ResourceCategory {
    pub const ALL: [ResourceCategory; 5] = [
        ResourceCategory::Shelter,
        ResourceCategory::Health,
        ResourceCategory::Food,
        ResourceCategory::Legal,
        ResourceCategory::Counseling,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            ResourceCategory::Shelter => "shelter",
            ResourceCategory::Health => "health",
            ResourceCategory::Food => "food",
            ResourceCategory::Legal => "legal",
            ResourceCategory::Counseling => "counseling",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ResourceCategory::Shelter => "Shelter",
            ResourceCategory::Health => "Health",
            ResourceCategory::Food => "Food",
            ResourceCategory::Legal => "Legal",
            ResourceCategory::Counseling => "Counseling",
        }
    }
}

impl fmt::Display for ResourceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ResourceCategory {
    type Err = UnknownCategory;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        ResourceCategory::ALL
            .into_iter()
            .find(|category| category.key() == normalized)
            .ok_or_else(|| UnknownCategory(value.trim().to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown resource category '{0}'")]
pub struct UnknownCategory(pub String);

/// Static catalog entry for an assistance provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceRecord {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub category: ResourceCategory,
    pub hours_text: String,
    pub website: String,
    pub coordinate: Coordinate,
}

/// Catalog entry paired with its distance from the requested origin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocatedResource {
    pub resource: ResourceRecord,
    pub distance_miles: f64,
}

/// Ranked entries for a single requested category, nearest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    pub category: ResourceCategory,
    pub entries: Vec<LocatedResource>,
}

/// Flattens grouped matches while keeping category-request order.
pub fn flatten(results: &[MatchResult]) -> Vec<&LocatedResource> {
    results
        .iter()
        .flat_map(|result| result.entries.iter())
        .collect()
}

/// Derives the resource categories to request for a profile.
///
/// Each flag contributes independently, so overlapping flags may repeat a
/// category. Legal aid is always requested.
pub fn requested_categories(profile: &NeedProfile) -> Vec<ResourceCategory> {
    let mut categories = Vec::new();
    if profile.needs_shelter {
        categories.push(ResourceCategory::Shelter);
    }
    if profile.mental_health_concern || profile.physical_health_concern {
        categories.push(ResourceCategory::Health);
    }
    if profile.needs_food {
        categories.push(ResourceCategory::Food);
    }
    if profile.mental_health_concern {
        categories.push(ResourceCategory::Counseling);
    }
    categories.push(ResourceCategory::Legal);
    categories
}

/// A completed form as handed over by the input collaborator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntakeSubmission {
    #[serde(default)]
    pub profile: NeedProfile,
    #[serde(default)]
    pub location: String,
}
