//! GasBuddy GraphQL client.
//!
//! This module provides a client for the consumer gasbuddy.com GraphQL
//! endpoint, which backs the site's own web pages and is not designed for
//! programmatic access.
//!
//! Key characteristics of the upstream:
//! - Every call needs an anti-forgery token embedded in the home page
//!   markup (`window.gbcsrf = "..."`) sent back as a `gbcsrf` header
//! - 403 responses can still carry a valid GraphQL payload; error-ness is
//!   decided by payload content, not status
//! - Missing prices are reported as `0`, which normalizes to "no price"

mod client;
mod convert;
mod error;
mod query;
mod response;
mod retry;
mod token;
mod types;

pub use client::{DEFAULT_RESULT_LIMIT, GasBuddyClient, GasBuddyConfig};
pub use convert::{
    FuelPrice, LocalPrices, PriceTrend, StationHit, StationPrices, convert_directory,
    convert_search, convert_station,
};
pub use error::GasBuddyError;
pub use query::{Query, Variables};
pub use response::{GraphQlResponse, classify, error_message};
pub use retry::{Backoff, with_backoff};
pub use token::{FetchStrategy, TokenAcquirer, extract_token};
