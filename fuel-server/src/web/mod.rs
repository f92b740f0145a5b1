//! Web layer for the gas-price server.
//!
//! Provides the JSON HTTP endpoints that turn query-string parameters
//! into client calls and client output into response envelopes.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
