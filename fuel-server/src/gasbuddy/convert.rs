//! Conversion from GraphQL DTOs to flat price records.
//!
//! Both query shapes funnel through the same per-station logic; the area
//! search adds a result cap, a placeholder name, and the optional trend
//! block. All records are built fresh per query and never cached.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use super::error::GasBuddyError;
use super::response::{GraphQlResponse, error_message};
use super::types::{
    DirectoryQueryData, DirectoryStationDto, LocationQueryData, PriceDto, StationDto,
    StationQueryData,
};

/// Name used for area-search entries the service left unnamed.
const UNKNOWN_STATION_NAME: &str = "Unknown Station";

/// Price data for one fuel kind at one station.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FuelPrice {
    /// Nickname of the member who posted the credit price.
    pub credit: Option<String>,

    /// Credit price. `None` means "no posted price", never "free fuel":
    /// the service reports missing prices as 0.
    pub price: Option<f64>,

    /// Cash price, zero-normalized like `price`. The field is omitted
    /// entirely for fuel kinds the station sells without cash pricing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cash_price: Option<Option<f64>>,

    /// When the credit price was posted.
    pub last_updated: Option<String>,
}

/// A station with its current prices, flattened for JSON output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationPrices {
    pub station_id: String,

    /// Price unit, e.g. "dollars_per_gallon".
    pub unit_of_measure: String,

    /// ISO currency code.
    pub currency: String,

    pub latitude: f64,

    pub longitude: f64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Display image of the first brand entry, when any brand exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    /// Fuel kind -> price entry. Only kinds with parseable price data
    /// appear; absent kinds are omitted, not zero-filled.
    #[serde(flatten)]
    pub fuel_prices: BTreeMap<String, FuelPrice>,
}

/// Area-wide price trend attached to a search result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceTrend {
    pub average_price: Option<f64>,
    pub lowest_price: Option<f64>,
    pub area: Option<String>,
}

/// Result of an area price search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocalPrices {
    pub results: Vec<StationPrices>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub trend: Option<PriceTrend>,
}

/// A station directory hit (no price data).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationHit {
    pub station_id: String,
    pub name: Option<String>,
    pub distance: Option<f64>,
    pub locality: Option<String>,
}

/// Convert a single-station response into a price record.
pub fn convert_station(response: GraphQlResponse) -> Result<StationPrices, GasBuddyError> {
    let data = check(response)?;
    let parsed: StationQueryData = parse(data)?;
    Ok(station_prices(parsed.station))
}

/// Convert an area-search response into at most `limit` price records plus
/// the optional trend summary. The limit is a hard cap, not a cursor;
/// zero yields an empty list.
pub fn convert_search(
    response: GraphQlResponse,
    limit: usize,
) -> Result<LocalPrices, GasBuddyError> {
    let data = check(response)?;
    let parsed: LocationQueryData = parse(data)?;
    let location = parsed.location_by_search_term;

    let results = location
        .stations
        .results
        .into_iter()
        .take(limit)
        .map(|dto| {
            let mut record = station_prices(dto);
            if record.name.is_none() {
                record.name = Some(UNKNOWN_STATION_NAME.to_string());
            }
            record
        })
        .collect();

    let trend = location
        .trends
        .into_iter()
        .next()
        .flatten()
        .map(|t| PriceTrend {
            average_price: t.today,
            lowest_price: t.today_low,
            area: t.area_name,
        });

    Ok(LocalPrices { results, trend })
}

/// Convert a directory response into station hits.
pub fn convert_directory(response: GraphQlResponse) -> Result<Vec<StationHit>, GasBuddyError> {
    let data = check(response)?;
    let parsed: DirectoryQueryData = parse(data)?;

    Ok(parsed
        .location_by_search_term
        .stations
        .results
        .into_iter()
        .map(station_hit)
        .collect())
}

/// Map the classified response onto the error taxonomy, yielding the
/// `data` member on success.
fn check(response: GraphQlResponse) -> Result<Value, GasBuddyError> {
    match response {
        GraphQlResponse::Data(body) => body.get("data").cloned().ok_or(GasBuddyError::Library {
            message: "response carries no data member".to_string(),
        }),
        GraphQlResponse::Errors(errors) => Err(GasBuddyError::Api {
            message: error_message(&errors),
        }),
        GraphQlResponse::Failed(message) => Err(GasBuddyError::Library { message }),
    }
}

fn parse<T: serde::de::DeserializeOwned>(data: Value) -> Result<T, GasBuddyError> {
    serde_json::from_value(data).map_err(|e| GasBuddyError::Library {
        message: format!("unexpected payload shape: {e}"),
    })
}

fn station_prices(dto: StationDto) -> StationPrices {
    let image_url = dto.brands.first().and_then(|b| b.image_url.clone());
    let fuel_prices = dto.prices.iter().filter_map(fuel_price).collect();

    StationPrices {
        station_id: dto.id,
        unit_of_measure: dto.price_unit,
        currency: dto.currency,
        latitude: dto.latitude,
        longitude: dto.longitude,
        name: dto.name,
        image_url,
        fuel_prices,
    }
}

/// Build the fuel-kind entry for one price block. Entries without a credit
/// block carry no usable data and are skipped.
fn fuel_price(price: &PriceDto) -> Option<(String, FuelPrice)> {
    let credit = price.credit.as_ref()?;

    let entry = FuelPrice {
        credit: credit.nickname.clone(),
        price: normalize_price(credit.price),
        cash_price: price.cash.as_ref().map(|cash| normalize_price(cash.price)),
        last_updated: credit.posted_time.clone(),
    };

    Some((price.fuel_product.clone(), entry))
}

/// The service reports "no price on record" as 0.
fn normalize_price(price: Option<f64>) -> Option<f64> {
    price.filter(|p| *p != 0.0)
}

fn station_hit(dto: DirectoryStationDto) -> StationHit {
    let locality = dto.address.and_then(|a| a.locality);
    StationHit {
        station_id: dto.id,
        name: dto.name,
        distance: dto.distance,
        locality,
    }
}


#[cfg(test)]
mod properties {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn search_response(count: usize) -> GraphQlResponse {
        let results: Vec<serde_json::Value> = (0..count)
            .map(|i| {
                json!({
                    "id": format!("{i}"),
                    "priceUnit": "cents_per_liter",
                    "currency": "CAD",
                    "latitude": 43.65,
                    "longitude": -79.38,
                    "prices": []
                })
            })
            .collect();

        GraphQlResponse::Data(json!({
            "data": {
                "locationBySearchTerm": {
                    "stations": {"results": results},
                    "trends": [null]
                }
            }
        }))
    }

    proptest! {
        #[test]
        fn result_count_is_min_of_limit_and_available(count in 0usize..12, limit in 0usize..12) {
            let report = convert_search(search_response(count), limit).unwrap();
            prop_assert_eq!(report.results.len(), count.min(limit));
        }

        #[test]
        fn nonzero_prices_pass_through_unchanged(price in 0.01f64..10_000.0) {
            prop_assert_eq!(normalize_price(Some(price)), Some(price));
        }

        #[test]
        fn failed_responses_always_yield_library_errors(message in ".*") {
            let result = convert_search(GraphQlResponse::Failed(message), 5);
            prop_assert!(matches!(result, Err(GasBuddyError::Library { .. })), "expected Library error");
        }
    }
}
