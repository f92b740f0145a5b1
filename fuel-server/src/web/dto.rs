//! Data transfer objects for web requests and responses.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::gasbuddy::{PriceTrend, StationPrices};

/// Request for gas prices by location.
///
/// Locations come in several shapes; `lat`/`lon` arrive as strings so a
/// malformed pair can be answered with the documented error envelope
/// instead of a bare rejection.
#[derive(Debug, Default, Deserialize)]
pub struct GasPricesRequest {
    /// Free-text location (postal code, city, address)
    pub location: Option<String>,

    /// Postal code
    pub postal_code: Option<String>,

    /// City name
    pub city: Option<String>,

    /// Two-letter country code hint for geocoding
    pub country: Option<String>,

    /// Direct latitude
    pub lat: Option<String>,

    /// Direct longitude
    pub lon: Option<String>,

    /// Maximum stations to return
    pub limit: Option<usize>,
}

/// Request for a single station's prices.
#[derive(Debug, Deserialize)]
pub struct StationRequest {
    /// Station id; falls back to the server's configured station
    pub id: Option<String>,
}

/// Coordinates echoed back in responses.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// One fuel kind's price, reshaped for the public payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceView {
    /// Price in currency units (converted from cents where the upstream
    /// reports cents).
    pub price: f64,

    /// Member who posted the price.
    pub user: String,

    pub last_updated: Option<String>,
}

/// One station in the gas-prices response.
#[derive(Debug, Clone, Serialize)]
pub struct StationView {
    pub station_id: String,
    pub name: String,
    pub currency: String,
    pub prices: BTreeMap<String, PriceView>,
}

impl StationView {
    /// Reshape a station record for the public payload. Fuel kinds with
    /// no posted price are dropped.
    pub fn from_record(record: &StationPrices) -> Self {
        let cents = record.unit_of_measure == "cents_per_liter";

        let prices = record
            .fuel_prices
            .iter()
            .filter_map(|(kind, fuel)| {
                let price = fuel.price?;
                let view = PriceView {
                    price: if cents { price / 100.0 } else { price },
                    user: fuel
                        .credit
                        .clone()
                        .unwrap_or_else(|| "Unknown".to_string()),
                    last_updated: fuel.last_updated.clone(),
                };
                Some((kind.clone(), view))
            })
            .collect();

        Self {
            station_id: record.station_id.clone(),
            name: record
                .name
                .clone()
                .unwrap_or_else(|| "Unknown Station".to_string()),
            currency: record.currency.clone(),
            prices,
        }
    }

    /// Whether any fuel kind survived with a posted price.
    pub fn has_prices(&self) -> bool {
        !self.prices.is_empty()
    }
}

/// Response for the gas-prices endpoint.
#[derive(Debug, Serialize)]
pub struct GasPricesResponse {
    pub success: bool,
    pub location: String,
    pub country: String,
    pub coordinates: Coordinates,
    pub stations: Vec<StationView>,
    pub count: usize,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub trend: Option<PriceTrend>,

    pub source: &'static str,
}

/// Response for the single-station endpoint.
#[derive(Debug, Serialize)]
pub struct StationResponse {
    pub success: bool,
    pub station: StationPrices,
    pub source: &'static str,
}

/// Error response envelope.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gasbuddy::FuelPrice;

    fn record(unit: &str, prices: Vec<(&str, Option<f64>)>) -> StationPrices {
        let fuel_prices = prices
            .into_iter()
            .map(|(kind, price)| {
                (
                    kind.to_string(),
                    FuelPrice {
                        credit: Some("buddy".to_string()),
                        price,
                        cash_price: None,
                        last_updated: Some("2025-08-27T19:25:21Z".to_string()),
                    },
                )
            })
            .collect();

        StationPrices {
            station_id: "12345".to_string(),
            unit_of_measure: unit.to_string(),
            currency: "USD".to_string(),
            latitude: 40.7128,
            longitude: -74.006,
            name: Some("Shell".to_string()),
            image_url: None,
            fuel_prices,
        }
    }

    #[test]
    fn cents_convert_to_currency_units() {
        let record = record("cents_per_liter", vec![("regular_gas", Some(155.9))]);
        let view = StationView::from_record(&record);
        assert_eq!(view.prices["regular_gas"].price, 1.559);
    }

    #[test]
    fn non_cent_units_pass_through() {
        let record = record("dollars_per_gallon", vec![("regular_gas", Some(3.49))]);
        let view = StationView::from_record(&record);
        assert_eq!(view.prices["regular_gas"].price, 3.49);
    }

    #[test]
    fn unpriced_fuel_kinds_are_dropped() {
        let record = record(
            "dollars_per_gallon",
            vec![("regular_gas", Some(3.49)), ("diesel", None)],
        );
        let view = StationView::from_record(&record);

        assert_eq!(view.prices.len(), 1);
        assert!(view.prices.contains_key("regular_gas"));
        assert!(view.has_prices());
    }

    #[test]
    fn station_with_no_prices_reports_empty() {
        let record = record("dollars_per_gallon", vec![("regular_gas", None)]);
        let view = StationView::from_record(&record);
        assert!(!view.has_prices());
    }

    #[test]
    fn missing_name_gets_a_placeholder() {
        let mut record = record("dollars_per_gallon", vec![]);
        record.name = None;
        let view = StationView::from_record(&record);
        assert_eq!(view.name, "Unknown Station");
    }

    #[test]
    fn trend_is_omitted_from_json_when_absent() {
        let response = GasPricesResponse {
            success: true,
            location: "90210".to_string(),
            country: "US".to_string(),
            coordinates: Coordinates {
                lat: 40.7128,
                lon: -74.006,
            },
            stations: vec![],
            count: 0,
            trend: None,
            source: "GasBuddy",
        };

        let value = serde_json::to_value(&response).unwrap();
        assert!(value.get("trend").is_none());
        assert_eq!(value["success"], true);
        assert_eq!(value["source"], "GasBuddy");
    }
}
