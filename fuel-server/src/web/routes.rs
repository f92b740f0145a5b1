//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde_json::{Value, json};

use crate::gasbuddy::GasBuddyError;
use crate::geocode::GeocodeError;

use super::dto::*;
use super::state::AppState;

/// Largest station list a caller may request.
const MAX_RESULT_LIMIT: usize = 50;

/// Default station list size for the web endpoint.
const DEFAULT_WEB_LIMIT: usize = 10;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/health", get(health))
        .route("/api/gas-prices", get(gas_prices))
        .route("/api/station", get(station_prices))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "fuel-server",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// API documentation.
async fn index() -> Json<Value> {
    Json(json!({
        "name": "fuel-server",
        "description": "Gas prices by location",
        "endpoints": {
            "/api/gas-prices?location=New York, NY": "Prices by city/state",
            "/api/gas-prices?postal_code=L6Y4V3": "Prices by postal code",
            "/api/gas-prices?city=London&country=GB": "Prices by city and country",
            "/api/gas-prices?lat=40.7128&lon=-74.0060": "Prices by coordinates",
            "/api/station?id=12345": "Prices at one station",
            "/api/health": "Health check",
        },
        "note": "Price data availability varies by country and region",
    }))
}

/// Gas prices near a location.
async fn gas_prices(
    State(state): State<AppState>,
    Query(req): Query<GasPricesRequest>,
) -> Result<Json<GasPricesResponse>, AppError> {
    let coords = parse_coords(&req)?;

    let Some(location) = location_string(&req) else {
        return Err(AppError::BadRequest {
            message: "provide one of: location, postal_code, city, or lat/lon coordinates"
                .to_string(),
        });
    };

    let (lat, lon) = match coords {
        Some(pair) => pair,
        None => state
            .geocoder
            .resolve(&location, req.country.as_deref())
            .await?
            .ok_or_else(|| AppError::NotFound {
                message: format!("could not find coordinates for location: {location}"),
            })?,
    };

    let limit = req.limit.unwrap_or(DEFAULT_WEB_LIMIT).min(MAX_RESULT_LIMIT);
    let report = state
        .gasbuddy
        .price_lookup_service(Some(lat), Some(lon), None, limit)
        .await?;

    let stations: Vec<StationView> = report
        .results
        .iter()
        .map(StationView::from_record)
        .filter(StationView::has_prices)
        .collect();

    Ok(Json(GasPricesResponse {
        success: true,
        location,
        country: req.country.clone().unwrap_or_else(|| "Unknown".to_string()),
        coordinates: Coordinates { lat, lon },
        count: stations.len(),
        stations,
        trend: report.trend,
        source: "GasBuddy",
    }))
}

/// Prices at a single station, by id or the server's configured station.
async fn station_prices(
    State(state): State<AppState>,
    Query(req): Query<StationRequest>,
) -> Result<Json<StationResponse>, AppError> {
    let record = match req.id.as_deref() {
        Some(id) if !id.is_empty() => state.gasbuddy.station_prices(id).await?,
        _ => state.gasbuddy.price_lookup().await?,
    };

    Ok(Json(StationResponse {
        success: true,
        station: record,
        source: "GasBuddy",
    }))
}

/// Pick the location string to report, in parameter-precedence order.
fn location_string(req: &GasPricesRequest) -> Option<String> {
    if let Some(location) = req.location.as_deref().filter(|s| !s.is_empty()) {
        return Some(location.to_string());
    }
    if let Some(code) = req.postal_code.as_deref().filter(|s| !s.is_empty()) {
        return Some(code.to_string());
    }
    if let Some(city) = req.city.as_deref().filter(|s| !s.is_empty()) {
        return Some(city.to_string());
    }
    if let (Some(lat), Some(lon)) = (req.lat.as_deref(), req.lon.as_deref()) {
        return Some(format!("{lat},{lon}"));
    }
    None
}

/// Parse direct coordinates when both are supplied.
fn parse_coords(req: &GasPricesRequest) -> Result<Option<(f64, f64)>, AppError> {
    let (Some(lat), Some(lon)) = (req.lat.as_deref(), req.lon.as_deref()) else {
        return Ok(None);
    };

    let parsed = lat.parse::<f64>().ok().zip(lon.parse::<f64>().ok());
    match parsed {
        Some(pair) => Ok(Some(pair)),
        None => Err(AppError::BadRequest {
            message: "invalid latitude or longitude values".to_string(),
        }),
    }
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Upstream { message: String },
    Internal { message: String },
}

impl From<GasBuddyError> for AppError {
    fn from(e: GasBuddyError) -> Self {
        match e {
            GasBuddyError::MissingSearchData => AppError::BadRequest {
                message: e.to_string(),
            },
            _ => AppError::Upstream {
                message: e.to_string(),
            },
        }
    }
}

impl From<GeocodeError> for AppError {
    fn from(e: GeocodeError) -> Self {
        AppError::Upstream {
            message: format!("geocoding failed: {e}"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Upstream { message } => (StatusCode::BAD_GATEWAY, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        tracing::warn!(status = status.as_u16(), "{message}");

        let body = Json(ErrorResponse {
            success: false,
            error: message,
        });
        (status, body).into_response()
    }
}
