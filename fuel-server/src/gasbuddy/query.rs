//! GraphQL documents and request body types.
//!
//! The site's GraphQL endpoint expects `{"operationName", "query",
//! "variables"}` POST bodies. Three documents cover everything: a
//! single-station lookup keyed by id, an area search carrying per-station
//! prices and a trend block, and a lighter station-directory search.

use serde::Serialize;

/// Single-station lookup, keyed by id.
pub const STATION_QUERY: &str = "\
query GetStation($id: ID!) {
  station(id: $id) {
    id
    name
    priceUnit
    currency
    latitude
    longitude
    brands {
      brandId
      imageUrl
      name
    }
    prices {
      fuelProduct
      cash {
        nickname
        postedTime
        price
      }
      credit {
        nickname
        postedTime
        price
      }
    }
  }
}";

/// Area search with per-station prices and the area trend block.
pub const LOCATION_PRICES_QUERY: &str = "\
query LocationBySearchTerm($lat: Float, $lng: Float, $search: String, $maxAge: Int) {
  locationBySearchTerm(lat: $lat, lng: $lng, search: $search) {
    stations(lat: $lat, lng: $lng, maxAge: $maxAge) {
      count
      results {
        id
        name
        priceUnit
        currency
        latitude
        longitude
        prices {
          fuelProduct
          cash {
            nickname
            postedTime
            price
          }
          credit {
            nickname
            postedTime
            price
          }
        }
      }
    }
    trends {
      areaName
      today
      todayLow
    }
  }
}";

/// Station directory search: which stations exist near a location.
pub const LOCATION_QUERY: &str = "\
query LocationBySearchTerm($lat: Float, $lng: Float, $search: String, $maxAge: Int) {
  locationBySearchTerm(lat: $lat, lng: $lng, search: $search) {
    stations(lat: $lat, lng: $lng, maxAge: $maxAge) {
      count
      results {
        id
        name
        distance
        address {
          line1
          locality
          region
          postalCode
        }
      }
    }
  }
}";

/// One GraphQL request body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Query {
    pub operation_name: &'static str,
    pub query: &'static str,
    pub variables: Variables,
}

/// Variables for either document; absent fields are left off the wire.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Variables {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,

    #[serde(rename = "maxAge", skip_serializing_if = "Option::is_none")]
    pub max_age: Option<u32>,
}

impl Variables {
    /// Search around a coordinate pair.
    pub fn coords(lat: f64, lng: f64) -> Self {
        Self {
            lat: Some(lat),
            lng: Some(lng),
            max_age: Some(0),
            ..Self::default()
        }
    }

    /// Search by free text (postal code).
    pub fn term(search: impl Into<String>) -> Self {
        Self {
            search: Some(search.into()),
            max_age: Some(0),
            ..Self::default()
        }
    }
}

impl Query {
    /// Lookup one station by id.
    pub fn station(id: impl Into<String>) -> Self {
        Self {
            operation_name: "GetStation",
            query: STATION_QUERY,
            variables: Variables {
                id: Some(id.into()),
                ..Variables::default()
            },
        }
    }

    /// Area price search.
    pub fn prices(variables: Variables) -> Self {
        Self {
            operation_name: "LocationBySearchTerm",
            query: LOCATION_PRICES_QUERY,
            variables,
        }
    }

    /// Station directory search.
    pub fn directory(variables: Variables) -> Self {
        Self {
            operation_name: "LocationBySearchTerm",
            query: LOCATION_QUERY,
            variables,
        }
    }
}
