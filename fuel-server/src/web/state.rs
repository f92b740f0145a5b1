//! Application state for the web layer.

use std::sync::Arc;

use crate::gasbuddy::GasBuddyClient;
use crate::geocode::CachedGeocoder;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// GasBuddy GraphQL client
    pub gasbuddy: Arc<GasBuddyClient>,

    /// Cached geocoder
    pub geocoder: Arc<CachedGeocoder>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(gasbuddy: GasBuddyClient, geocoder: CachedGeocoder) -> Self {
        Self {
            gasbuddy: Arc::new(gasbuddy),
            geocoder: Arc::new(geocoder),
        }
    }
}
