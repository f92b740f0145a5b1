//! GasBuddy GraphQL response DTOs.
//!
//! These types map directly to the JSON the GraphQL endpoint returns.
//! They use `Option` liberally because the service omits fields rather
//! than sending null in many cases.

use serde::Deserialize;

/// `data` member of a `GetStation` response.
#[derive(Debug, Clone, Deserialize)]
pub struct StationQueryData {
    pub station: StationDto,
}

/// A station as returned by either price-carrying query shape.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationDto {
    /// Station id (numeric on the site, but always sent as a string).
    pub id: String,

    /// Station name. The single-station query carries it; area-search
    /// entries sometimes omit it.
    pub name: Option<String>,

    /// Price unit, e.g. "dollars_per_gallon" or "cents_per_liter".
    pub price_unit: String,

    /// ISO currency code.
    pub currency: String,

    pub latitude: f64,

    pub longitude: f64,

    /// Brand entries; the first one carries the display image.
    #[serde(default)]
    pub brands: Vec<BrandDto>,

    /// One entry per fuel product sold at this station.
    #[serde(default)]
    pub prices: Vec<PriceDto>,
}

/// A brand attached to a station.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandDto {
    pub image_url: Option<String>,
}

/// One fuel product's posted prices.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceDto {
    /// Fuel kind key, e.g. "regular_gas", "premium_gas", "diesel".
    pub fuel_product: String,

    /// Cash price block; absent for fuel kinds without cash pricing.
    pub cash: Option<PricePointDto>,

    /// Credit price block; the attribution and timestamp live here.
    pub credit: Option<PricePointDto>,
}

/// A posted price with its attribution.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricePointDto {
    /// Nickname of the member who posted the price.
    pub nickname: Option<String>,

    /// When the price was posted (ISO 8601 string, passed through as-is).
    pub posted_time: Option<String>,

    /// Posted price; the service sends 0 when no price is on record.
    pub price: Option<f64>,
}

/// `data` member of a `LocationBySearchTerm` price response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationQueryData {
    pub location_by_search_term: LocationDto,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LocationDto {
    pub stations: StationResultsDto,

    /// Area price trends. The service sends `[null]` when it has none.
    #[serde(default)]
    pub trends: Vec<Option<TrendDto>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StationResultsDto {
    pub results: Vec<StationDto>,
}

/// One entry of the `trends` array.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendDto {
    pub area_name: Option<String>,

    /// Today's average price for the area.
    pub today: Option<f64>,

    /// Today's lowest posted price for the area.
    pub today_low: Option<f64>,
}

/// `data` member of a `LocationBySearchTerm` directory response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryQueryData {
    pub location_by_search_term: DirectoryDto,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DirectoryDto {
    pub stations: DirectoryResultsDto,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DirectoryResultsDto {
    pub results: Vec<DirectoryStationDto>,
}

/// A station directory entry (no price data).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryStationDto {
    pub id: String,
    pub name: Option<String>,
    /// Distance from the search point, in the site's display unit.
    pub distance: Option<f64>,
    pub address: Option<AddressDto>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressDto {
    pub line1: Option<String>,
    pub locality: Option<String>,
    pub region: Option<String>,
    pub postal_code: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_station_payload() {
        let json = r#"{
            "station": {
                "id": "12345",
                "name": "Shell",
                "priceUnit": "dollars_per_gallon",
                "currency": "USD",
                "latitude": 40.7128,
                "longitude": -74.006,
                "brands": [{"imageUrl": "https://images.example/shell.png"}],
                "prices": [
                    {
                        "fuelProduct": "regular_gas",
                        "cash": {"nickname": "casher", "postedTime": "2025-08-27T19:25:21Z", "price": 3.39},
                        "credit": {"nickname": "buddy", "postedTime": "2025-08-27T19:25:21Z", "price": 3.49}
                    },
                    {
                        "fuelProduct": "premium_gas",
                        "cash": null,
                        "credit": {"nickname": "buddy", "postedTime": "2025-08-27T19:25:21Z", "price": 3.79}
                    }
                ]
            }
        }"#;

        let data: StationQueryData = serde_json::from_str(json).unwrap();
        let station = data.station;

        assert_eq!(station.id, "12345");
        assert_eq!(station.name.as_deref(), Some("Shell"));
        assert_eq!(station.price_unit, "dollars_per_gallon");
        assert_eq!(station.brands.len(), 1);
        assert_eq!(station.prices.len(), 2);
        assert!(station.prices[0].cash.is_some());
        assert!(station.prices[1].cash.is_none());
    }

    #[test]
    fn deserialize_location_payload_with_null_trend() {
        let json = r#"{
            "locationBySearchTerm": {
                "stations": {
                    "results": [
                        {
                            "id": "1",
                            "priceUnit": "cents_per_liter",
                            "currency": "CAD",
                            "latitude": 43.65,
                            "longitude": -79.38,
                            "prices": []
                        }
                    ]
                },
                "trends": [null]
            }
        }"#;

        let data: LocationQueryData = serde_json::from_str(json).unwrap();
        let location = data.location_by_search_term;

        assert_eq!(location.stations.results.len(), 1);
        // Station name and brands may be omitted entirely.
        assert!(location.stations.results[0].name.is_none());
        assert!(location.stations.results[0].brands.is_empty());
        assert_eq!(location.trends.len(), 1);
        assert!(location.trends[0].is_none());
    }

    #[test]
    fn deserialize_trend_entry() {
        let json = r#"{"areaName": "Toronto", "today": 155.9, "todayLow": 149.9}"#;
        let trend: TrendDto = serde_json::from_str(json).unwrap();

        assert_eq!(trend.area_name.as_deref(), Some("Toronto"));
        assert_eq!(trend.today, Some(155.9));
        assert_eq!(trend.today_low, Some(149.9));
    }

    #[test]
    fn deserialize_directory_payload() {
        let json = r#"{
            "locationBySearchTerm": {
                "stations": {
                    "results": [
                        {
                            "id": "9001",
                            "name": "BP",
                            "distance": 0.4,
                            "address": {"line1": "1 Main St", "locality": "Brampton", "region": "ON", "postalCode": "L6Y4V3"}
                        }
                    ]
                }
            }
        }"#;

        let data: DirectoryQueryData = serde_json::from_str(json).unwrap();
        let results = data.location_by_search_term.stations.results;

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "9001");
        assert_eq!(
            results[0].address.as_ref().unwrap().locality.as_deref(),
            Some("Brampton")
        );
    }
}
