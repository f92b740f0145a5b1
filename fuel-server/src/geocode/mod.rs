//! Location-to-coordinates resolution.
//!
//! The price API accepts postal codes, cities, and free-text addresses;
//! everything that isn't already a coordinate pair goes through a
//! geocoder. Two backends exist: the public Nominatim service and a
//! fixed table for offline development.

mod cache;
mod client;
mod error;
mod mock;

pub use cache::{CachedGeocoder, GeocodeCacheConfig};
pub use client::{NominatimClient, NominatimConfig, PlaceDto};
pub use error::GeocodeError;
pub use mock::FixedGeocoder;

/// Geocoder backend, selected at startup.
#[derive(Debug, Clone)]
pub enum Geocoder {
    Nominatim(NominatimClient),
    Fixed(FixedGeocoder),
}

impl Geocoder {
    /// Resolve a free-text location to coordinates.
    ///
    /// `Ok(None)` when no backend has a match; the country hint narrows
    /// the search where the backend supports it.
    pub async fn resolve(
        &self,
        query: &str,
        country_hint: Option<&str>,
    ) -> Result<Option<(f64, f64)>, GeocodeError> {
        match self {
            Geocoder::Nominatim(client) => client.resolve(query, country_hint).await,
            Geocoder::Fixed(fixed) => Ok(fixed.resolve(query)),
        }
    }
}
