//! GasBuddy client error types.

/// Errors that can occur when talking to the GasBuddy GraphQL API.
#[derive(Debug, thiserror::Error)]
pub enum GasBuddyError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A lookup was invoked without the data it needs
    #[error("missing search data: provide lat/lon, a postal code, or a station id")]
    MissingSearchData,

    /// The session-token pattern was not found in the bootstrap page
    #[error("session token not found in the gasbuddy.com home page")]
    TokenMissing,

    /// The GraphQL service returned a structured error envelope
    #[error("API error: {message}")]
    Api { message: String },

    /// Transport-level failure wrapped by the request executor
    #[error("upstream request failed: {message}")]
    Library { message: String },
}
