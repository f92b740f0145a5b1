//! Caching layer for geocoding results.
//!
//! The public Nominatim service asks clients to keep request volume low,
//! and the same postal codes arrive over and over. Resolved coordinates
//! (including misses) are cached; errors are not.

use std::time::Duration;

use moka::future::Cache as MokaCache;

use super::Geocoder;
use super::error::GeocodeError;

/// Cache key: (normalized query, uppercased country hint).
type PlaceKey = (String, Option<String>);

/// Configuration for the geocode cache.
#[derive(Debug, Clone)]
pub struct GeocodeCacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for GeocodeCacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(24 * 60 * 60),
            max_capacity: 10_000,
        }
    }
}

/// Geocoder with result caching.
pub struct CachedGeocoder {
    geocoder: Geocoder,
    cache: MokaCache<PlaceKey, Option<(f64, f64)>>,
}

impl CachedGeocoder {
    /// Create a new cached geocoder.
    pub fn new(geocoder: Geocoder, config: &GeocodeCacheConfig) -> Self {
        let cache = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { geocoder, cache }
    }

    /// Resolve a location, using the cache when possible.
    pub async fn resolve(
        &self,
        query: &str,
        country_hint: Option<&str>,
    ) -> Result<Option<(f64, f64)>, GeocodeError> {
        let key = (
            query.trim().to_lowercase(),
            country_hint.map(|c| c.to_uppercase()),
        );

        if let Some(hit) = self.cache.get(&key).await {
            return Ok(hit);
        }

        let resolved = self.geocoder.resolve(query, country_hint).await?;
        self.cache.insert(key, resolved).await;
        Ok(resolved)
    }

    /// Number of cached entries (for monitoring).
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geocode::FixedGeocoder;

    fn cached_fixed() -> CachedGeocoder {
        CachedGeocoder::new(
            Geocoder::Fixed(FixedGeocoder::new()),
            &GeocodeCacheConfig::default(),
        )
    }

    #[test]
    fn default_config() {
        let config = GeocodeCacheConfig::default();
        assert_eq!(config.ttl, Duration::from_secs(86_400));
        assert_eq!(config.max_capacity, 10_000);
    }

    #[tokio::test]
    async fn resolves_through_the_backend() {
        let geocoder = cached_fixed();
        let coords = geocoder.resolve("Toronto", None).await.unwrap();
        assert_eq!(coords, Some((43.6532, -79.3832)));
    }

    #[tokio::test]
    async fn key_normalization_shares_entries() {
        let geocoder = cached_fixed();
        geocoder.resolve("  Toronto ", Some("ca")).await.unwrap();
        geocoder.resolve("toronto", Some("CA")).await.unwrap();

        geocoder.cache.run_pending_tasks().await;
        assert_eq!(geocoder.entry_count(), 1);
    }

    #[tokio::test]
    async fn misses_are_cached_too() {
        let geocoder = cached_fixed();
        assert_eq!(geocoder.resolve("Atlantis", None).await.unwrap(), None);

        geocoder.cache.run_pending_tasks().await;
        assert_eq!(geocoder.entry_count(), 1);
    }
}
