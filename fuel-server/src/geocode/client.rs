//! Nominatim geocoding client.
//!
//! Resolves free-text locations (postal codes, cities, addresses) to
//! coordinates via the public OpenStreetMap Nominatim service.

use reqwest::header::{HeaderMap, HeaderValue};
use serde::Deserialize;

use super::error::GeocodeError;

/// Default base URL for the public Nominatim instance.
const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";

/// Identifying User-Agent; Nominatim's usage policy requires one.
const DEFAULT_USER_AGENT: &str = "fuel-server/0.1 (gas price lookup)";

/// One place in a Nominatim search response. Coordinates arrive as
/// strings.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceDto {
    pub lat: String,
    pub lon: String,
}

/// Configuration for the Nominatim client.
#[derive(Debug, Clone)]
pub struct NominatimConfig {
    /// Base URL for the service (overridable for testing).
    pub base_url: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,

    /// User-Agent sent with every request.
    pub user_agent: String,
}

impl NominatimConfig {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 10,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Set a custom base URL (for testing or a self-hosted instance).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Client for the Nominatim search API.
#[derive(Debug, Clone)]
pub struct NominatimClient {
    http: reqwest::Client,
    base_url: String,
}

impl NominatimClient {
    /// Create a new client.
    pub fn new(config: NominatimConfig) -> Result<Self, GeocodeError> {
        let mut headers = HeaderMap::new();
        let user_agent =
            HeaderValue::from_str(&config.user_agent).map_err(|_| GeocodeError::Json {
                message: "invalid user agent".to_string(),
            })?;
        headers.insert(reqwest::header::USER_AGENT, user_agent);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
        })
    }

    /// Resolve a free-text location to coordinates.
    ///
    /// `Ok(None)` when the service has no match for the query.
    pub async fn resolve(
        &self,
        query: &str,
        country_hint: Option<&str>,
    ) -> Result<Option<(f64, f64)>, GeocodeError> {
        let url = format!("{}/search", self.base_url);

        let mut params = vec![
            ("q", query.trim().to_string()),
            ("format", "json".to_string()),
            ("limit", "1".to_string()),
            ("addressdetails", "1".to_string()),
        ];
        if let Some(country) = country_hint {
            params.push(("countrycodes", country.to_uppercase()));
        }

        let response = self.http.get(&url).query(&params).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeocodeError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        let places: Vec<PlaceDto> =
            serde_json::from_str(&body).map_err(|e| GeocodeError::Json {
                message: e.to_string(),
            })?;

        let Some(place) = places.first() else {
            return Ok(None);
        };

        let lat = place.lat.parse().map_err(|_| GeocodeError::Json {
            message: format!("bad latitude: {}", place.lat),
        })?;
        let lon = place.lon.parse().map_err(|_| GeocodeError::Json {
            message: format!("bad longitude: {}", place.lon),
        })?;

        Ok(Some((lat, lon)))
    }
}
