use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::domain::Coordinate;
use crate::config::GeocoderConfig;

/// Result of resolving free text to a point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GeocodeOutcome {
    Located { coordinate: Coordinate },
    NotFound,
}

/// Lookup failures that may succeed on a later attempt.
#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    #[error("geocoding request failed: {0}")]
    Transport(String),
    #[error("geocoding request timed out after {0:?}")]
    Timeout(Duration),
    #[error("unreadable geocoding response: {0}")]
    Decode(String),
}

/// Resolves a free-text location into coordinates.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, text: &str) -> Result<GeocodeOutcome, GeocodeError>;
}

/// Nominatim (OpenStreetMap) search client.
///
/// Text that is already a `"lat, lon"` pair is answered without a request.
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
}

impl NominatimGeocoder {
    pub fn new(config: &GeocoderConfig) -> Result<Self, GeocodeError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|err| GeocodeError::Transport(err.to_string()))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            timeout: config.timeout,
        })
    }

    fn search_url(&self, text: &str) -> String {
        format!(
            "{}?q={}&format=json&limit=1",
            self.endpoint,
            urlencoding::encode(text)
        )
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, text: &str) -> Result<GeocodeOutcome, GeocodeError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(GeocodeOutcome::NotFound);
        }
        if let Some(coordinate) = Coordinate::parse_literal(text) {
            return Ok(GeocodeOutcome::Located { coordinate });
        }

        let response = self
            .client
            .get(self.search_url(text))
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    GeocodeError::Timeout(self.timeout)
                } else {
                    GeocodeError::Transport(err.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "geocoding provider returned an error status");
            return Err(GeocodeError::Transport(format!(
                "provider responded with {status}"
            )));
        }

        let places: Vec<NominatimPlace> = response
            .json()
            .await
            .map_err(|err| GeocodeError::Decode(err.to_string()))?;

        let Some(place) = places.first() else {
            debug!("geocoding provider returned no matches");
            return Ok(GeocodeOutcome::NotFound);
        };

        parse_place(place)
    }
}

fn parse_place(place: &NominatimPlace) -> Result<GeocodeOutcome, GeocodeError> {
    let latitude = parse_degrees("latitude", &place.lat)?;
    let longitude = parse_degrees("longitude", &place.lon)?;

    let coordinate = Coordinate::new(latitude, longitude);
    if coordinate.is_valid() {
        Ok(GeocodeOutcome::Located { coordinate })
    } else {
        Ok(GeocodeOutcome::NotFound)
    }
}

fn parse_degrees(field: &str, raw: &str) -> Result<f64, GeocodeError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|err| GeocodeError::Decode(format!("invalid {field} '{raw}': {err}")))
}

/// Lookup table geocoder for offline runs. Keys match case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct FixedGeocoder {
    places: HashMap<String, Coordinate>,
}

impl FixedGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_place(mut self, name: &str, coordinate: Coordinate) -> Self {
        self.places.insert(normalize_place(name), coordinate);
        self
    }
}

#[async_trait]
impl Geocoder for FixedGeocoder {
    async fn geocode(&self, text: &str) -> Result<GeocodeOutcome, GeocodeError> {
        if let Some(coordinate) = Coordinate::parse_literal(text) {
            return Ok(GeocodeOutcome::Located { coordinate });
        }

        Ok(match self.places.get(&normalize_place(text)) {
            Some(coordinate) => GeocodeOutcome::Located {
                coordinate: *coordinate,
            },
            None => GeocodeOutcome::NotFound,
        })
    }
}

fn normalize_place(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(lat: &str, lon: &str) -> NominatimPlace {
        NominatimPlace {
            lat: lat.to_string(),
            lon: lon.to_string(),
        }
    }

    #[test]
    fn parses_provider_coordinates() {
        let outcome = parse_place(&place("40.7127281", "-74.0060152")).expect("parses");
        assert_eq!(
            outcome,
            GeocodeOutcome::Located {
                coordinate: Coordinate::new(40.7127281, -74.0060152)
            }
        );
    }

    #[test]
    fn out_of_range_provider_coordinates_are_not_found() {
        let outcome = parse_place(&place("200.0", "10.0")).expect("parses");
        assert_eq!(outcome, GeocodeOutcome::NotFound);
    }

    #[test]
    fn malformed_provider_coordinates_are_decode_errors() {
        match parse_place(&place("north", "10.0")) {
            Err(GeocodeError::Decode(message)) => assert!(message.contains("north")),
            other => panic!("expected decode error, got {other:?}"),
        }
    }

    #[test]
    fn search_url_encodes_query() {
        let geocoder = NominatimGeocoder::new(&GeocoderConfig {
            endpoint: "https://geo.example/search".to_string(),
            ..GeocoderConfig::default()
        })
        .expect("client builds");

        assert_eq!(
            geocoder.search_url("Brooklyn, NY"),
            "https://geo.example/search?q=Brooklyn%2C%20NY&format=json&limit=1"
        );
    }

    #[tokio::test]
    async fn nominatim_answers_literal_coordinates_locally() {
        let geocoder = NominatimGeocoder::new(&GeocoderConfig {
            endpoint: "http://127.0.0.1:9/unreachable".to_string(),
            ..GeocoderConfig::default()
        })
        .expect("client builds");

        let outcome = geocoder
            .geocode("40.7128, -74.0060")
            .await
            .expect("literal resolves");
        assert_eq!(
            outcome,
            GeocodeOutcome::Located {
                coordinate: Coordinate::new(40.7128, -74.0060)
            }
        );

        let blank = geocoder.geocode("   ").await.expect("blank handled");
        assert_eq!(blank, GeocodeOutcome::NotFound);
    }

    #[tokio::test]
    async fn fixed_geocoder_matches_case_insensitively() {
        let geocoder =
            FixedGeocoder::new().with_place("Lower Manhattan", Coordinate::new(40.7128, -74.0060));

        let outcome = geocoder
            .geocode("  lower   MANHATTAN ")
            .await
            .expect("lookup succeeds");
        assert_eq!(
            outcome,
            GeocodeOutcome::Located {
                coordinate: Coordinate::new(40.7128, -74.0060)
            }
        );

        let missing = geocoder.geocode("Atlantis").await.expect("lookup succeeds");
        assert_eq!(missing, GeocodeOutcome::NotFound);
    }
}
