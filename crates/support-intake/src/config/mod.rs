use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use crate::intake::MatchingConfig;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub matching: MatchingConfig,
    pub geocoder: GeocoderConfig,
    pub catalog: CatalogConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let defaults = MatchingConfig::default();
        let max_radius_miles = match env::var("INTAKE_MAX_RADIUS_MILES") {
            Ok(raw) => raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|radius| radius.is_finite() && *radius >= 0.0)
                .ok_or(ConfigError::InvalidRadius)?,
            Err(_) => defaults.max_radius_miles,
        };
        let per_category_limit = match env::var("INTAKE_RESULTS_PER_CATEGORY") {
            Ok(raw) => raw
                .trim()
                .parse::<usize>()
                .map_err(|_| ConfigError::InvalidResultLimit)?,
            Err(_) => defaults.per_category_limit,
        };

        let geocoder = GeocoderConfig::from_env()?;

        let catalog_path = env::var("INTAKE_CATALOG_PATH")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            matching: MatchingConfig {
                max_radius_miles,
                per_category_limit,
            },
            geocoder,
            catalog: CatalogConfig { path: catalog_path },
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Location lookup settings. The timeout bounds each individual attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocoderConfig {
    pub endpoint: String,
    pub timeout: Duration,
    pub max_retries: u8,
    pub user_agent: String,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://nominatim.openstreetmap.org/search".to_string(),
            timeout: Duration::from_secs(10),
            max_retries: 1,
            user_agent: "SupportIntake/0.1 (needs intake service)".to_string(),
        }
    }
}

impl GeocoderConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let endpoint = env::var("GEOCODER_URL").unwrap_or(defaults.endpoint);
        let timeout = match env::var("GEOCODER_TIMEOUT_SECS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .ok_or(ConfigError::InvalidGeocoderTimeout)?,
            Err(_) => defaults.timeout,
        };
        let max_retries = match env::var("GEOCODER_MAX_RETRIES") {
            Ok(raw) => raw
                .trim()
                .parse::<u8>()
                .map_err(|_| ConfigError::InvalidGeocoderRetries)?,
            Err(_) => defaults.max_retries,
        };
        let user_agent = env::var("GEOCODER_USER_AGENT").unwrap_or(defaults.user_agent);

        Ok(Self {
            endpoint,
            timeout,
            max_retries,
            user_agent,
        })
    }
}

/// Where the resource catalog is loaded from; `None` selects the bundled sample.
#[derive(Debug, Clone, Default)]
pub struct CatalogConfig {
    pub path: Option<PathBuf>,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidRadius,
    InvalidResultLimit,
    InvalidGeocoderTimeout,
    InvalidGeocoderRetries,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidRadius => write!(
                f,
                "INTAKE_MAX_RADIUS_MILES must be a non-negative number of miles"
            ),
            ConfigError::InvalidResultLimit => {
                write!(f, "INTAKE_RESULTS_PER_CATEGORY must be a whole number")
            }
            ConfigError::InvalidGeocoderTimeout => {
                write!(f, "GEOCODER_TIMEOUT_SECS must be a positive whole number")
            }
            ConfigError::InvalidGeocoderRetries => {
                write!(f, "GEOCODER_MAX_RETRIES must be between 0 and 255")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            _ => None,
        }
    }
}
