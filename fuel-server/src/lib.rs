//! Gas-price lookup server.
//!
//! Answers "what does gas cost near this place?" over HTTP, backed by the
//! consumer gasbuddy.com GraphQL endpoint and the Nominatim geocoder.

pub mod gasbuddy;
pub mod geocode;
pub mod web;
