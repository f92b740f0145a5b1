use std::net::SocketAddr;

use tracing_subscriber::EnvFilter;

use fuel_server::gasbuddy::{GasBuddyClient, GasBuddyConfig};
use fuel_server::geocode::{
    CachedGeocoder, FixedGeocoder, GeocodeCacheConfig, Geocoder, NominatimClient, NominatimConfig,
};
use fuel_server::web::{AppState, create_router};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Build the GasBuddy client
    let mut gasbuddy_config = GasBuddyConfig::new();
    if let Ok(id) = std::env::var("GASBUDDY_STATION_ID") {
        gasbuddy_config = gasbuddy_config.with_station_id(id);
    }
    if let Ok(url) = std::env::var("GASBUDDY_SOLVER_URL") {
        gasbuddy_config = gasbuddy_config.with_solver_url(url);
    }
    let gasbuddy = GasBuddyClient::new(gasbuddy_config);

    // Build the geocoder. GEOCODER=fixed selects the offline table.
    let geocoder = match std::env::var("GEOCODER").as_deref() {
        Ok("fixed") => Geocoder::Fixed(FixedGeocoder::new()),
        _ => {
            let mut config = NominatimConfig::new();
            if let Ok(url) = std::env::var("NOMINATIM_URL") {
                config = config.with_base_url(url);
            }
            let client = NominatimClient::new(config).expect("Failed to create geocoding client");
            Geocoder::Nominatim(client)
        }
    };
    let geocoder = CachedGeocoder::new(geocoder, &GeocodeCacheConfig::default());

    // Build app state and router
    let state = AppState::new(gasbuddy, geocoder);
    let app = create_router(state);

    // Bind and serve
    let addr: SocketAddr = std::env::var("BIND_ADDR")
        .ok()
        .and_then(|a| a.parse().ok())
        .unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], 3000)));

    println!("Gas price server listening on http://{addr}");
    println!();
    println!("API Endpoints:");
    println!("  GET  /               - API documentation");
    println!("  GET  /api/health     - Health check");
    println!("  GET  /api/gas-prices - Prices near a location");
    println!("  GET  /api/station    - Prices at one station");

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
