//! Geocoding error types.

/// Errors that can occur when resolving a location to coordinates.
#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The geocoding service returned an error status
    #[error("geocoder returned {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to parse the geocoder response
    #[error("geocoder payload: {message}")]
    Json { message: String },
}
