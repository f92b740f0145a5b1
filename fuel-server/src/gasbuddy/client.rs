//! GasBuddy GraphQL client.
//!
//! The consumer site is not designed for programmatic access: every call
//! needs browser-like headers plus a session token scraped from the home
//! page. The client acquires that token on first need, keeps it for its
//! own lifetime, and runs each GraphQL call through an isolated
//! connection session with retry on transient connection failures.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tokio::sync::RwLock;

use super::convert::{
    LocalPrices, StationHit, StationPrices, convert_directory, convert_search, convert_station,
};
use super::error::GasBuddyError;
use super::query::{Query, Variables};
use super::response::{GraphQlResponse, classify};
use super::retry::{Backoff, with_backoff};
use super::token::{FetchStrategy, TokenAcquirer};

/// GraphQL endpoint.
const DEFAULT_BASE_URL: &str = "https://www.gasbuddy.com/graphql";

/// Bootstrap page carrying the session token.
const DEFAULT_HOME_URL: &str = "https://www.gasbuddy.com/home";

/// Header name the session token travels under.
const TOKEN_HEADER: &str = "gbcsrf";

/// Browser-like User-Agent; the site rejects obvious non-browser clients.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/137.0.0.0 Safari/537.36";

/// Default number of stations returned by an area search.
pub const DEFAULT_RESULT_LIMIT: usize = 5;

/// Identifying headers the site expects on every call.
pub(crate) fn identifying_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        reqwest::header::USER_AGENT,
        HeaderValue::from_static(USER_AGENT),
    );
    headers.insert(
        HeaderName::from_static("apollo-require-preflight"),
        HeaderValue::from_static("true"),
    );
    headers.insert(
        reqwest::header::ORIGIN,
        HeaderValue::from_static("https://www.gasbuddy.com"),
    );
    headers.insert(
        reqwest::header::REFERER,
        HeaderValue::from_static(DEFAULT_HOME_URL),
    );
    headers
}

/// Configuration for the GasBuddy client.
#[derive(Debug, Clone)]
pub struct GasBuddyConfig {
    /// Station to query in single-station mode.
    pub station_id: Option<String>,

    /// Challenge-solving proxy endpoint, when one is deployed.
    pub solver_url: Option<String>,

    /// GraphQL endpoint (overridable for testing).
    pub base_url: String,

    /// Bootstrap page URL (overridable for testing).
    pub home_url: String,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl GasBuddyConfig {
    pub fn new() -> Self {
        Self {
            station_id: None,
            solver_url: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            home_url: DEFAULT_HOME_URL.to_string(),
            timeout_secs: 30,
        }
    }

    /// Set the station for single-station lookups.
    pub fn with_station_id(mut self, id: impl Into<String>) -> Self {
        self.station_id = Some(id.into());
        self
    }

    /// Route the token fetch through a challenge-solving proxy.
    pub fn with_solver_url(mut self, url: impl Into<String>) -> Self {
        self.solver_url = Some(url.into());
        self
    }

    /// Set a custom GraphQL endpoint (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set a custom bootstrap page URL (for testing).
    pub fn with_home_url(mut self, url: impl Into<String>) -> Self {
        self.home_url = url.into();
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for GasBuddyConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// GasBuddy GraphQL client.
///
/// The session token is explicit nullable state on the instance: read at
/// the start of each public operation, written once on first acquisition,
/// never proactively refreshed. Concurrent callers may each re-acquire;
/// the token is an opaque replaceable string, so the last writer wins.
pub struct GasBuddyClient {
    config: GasBuddyConfig,
    backoff: Backoff,
    acquirer: TokenAcquirer,
    token: RwLock<Option<String>>,
}

impl GasBuddyClient {
    /// Create a new client with the given configuration.
    pub fn new(config: GasBuddyConfig) -> Self {
        let strategy = match &config.solver_url {
            Some(url) => FetchStrategy::Solver { url: url.clone() },
            None => FetchStrategy::Direct,
        };
        let acquirer = TokenAcquirer::new(
            config.home_url.clone(),
            strategy,
            Duration::from_secs(config.timeout_secs),
        );

        Self {
            config,
            backoff: Backoff::default(),
            acquirer,
            token: RwLock::new(None),
        }
    }

    /// Current prices at the configured station.
    ///
    /// Fails with `MissingSearchData` when the client was built without a
    /// station id.
    pub async fn price_lookup(&self) -> Result<StationPrices, GasBuddyError> {
        let id = self
            .config
            .station_id
            .clone()
            .ok_or(GasBuddyError::MissingSearchData)?;
        self.station_prices(&id).await
    }

    /// Current prices at an arbitrary station.
    pub async fn station_prices(&self, id: &str) -> Result<StationPrices, GasBuddyError> {
        let response = self.execute(&Query::station(id)).await?;
        convert_station(response)
    }

    /// Prices at stations near a coordinate pair or postal code, capped at
    /// `limit` results, with the area trend when the service has one.
    pub async fn price_lookup_service(
        &self,
        lat: Option<f64>,
        lon: Option<f64>,
        postal_code: Option<&str>,
        limit: usize,
    ) -> Result<LocalPrices, GasBuddyError> {
        let variables = search_variables(lat, lon, postal_code)?;
        let response = self.execute(&Query::prices(variables)).await?;
        convert_search(response, limit)
    }

    /// Station directory entries near a coordinate pair or postal code.
    pub async fn location_search(
        &self,
        lat: Option<f64>,
        lon: Option<f64>,
        postal_code: Option<&str>,
    ) -> Result<Vec<StationHit>, GasBuddyError> {
        let variables = search_variables(lat, lon, postal_code)?;
        let response = self.execute(&Query::directory(variables)).await?;
        convert_directory(response)
    }

    /// Ensure a token is present, then run the query.
    async fn execute(&self, query: &Query) -> Result<GraphQlResponse, GasBuddyError> {
        self.ensure_token().await?;
        let token = self.token.read().await.clone().unwrap_or_default();
        Ok(self.post_query(query, &token).await)
    }

    /// Fetch the session token on first need. A best-effort miss (timeout
    /// or bad bootstrap status) leaves the slot empty and the call
    /// proceeds with an empty token value.
    async fn ensure_token(&self) -> Result<(), GasBuddyError> {
        if self.token.read().await.is_some() {
            return Ok(());
        }

        if let Some(tag) = self.acquirer.acquire().await? {
            *self.token.write().await = Some(tag);
        }
        Ok(())
    }

    /// POST one GraphQL query. Opens and closes its own connection
    /// session; nothing is pooled across calls.
    async fn post_query(&self, query: &Query, token: &str) -> GraphQlResponse {
        let mut headers = identifying_headers();
        match HeaderValue::from_str(token) {
            Ok(value) => {
                headers.insert(HeaderName::from_static(TOKEN_HEADER), value);
            }
            Err(_) => {
                return GraphQlResponse::Failed("session token is not a valid header value".into());
            }
        }

        let result = with_backoff(
            &self.backoff,
            |e: &reqwest::Error| e.is_connect(),
            || {
                let headers = headers.clone();
                let url = self.config.base_url.clone();
                let timeout = Duration::from_secs(self.config.timeout_secs);
                let query = query.clone();
                async move {
                    let session = reqwest::Client::builder()
                        .default_headers(headers)
                        .timeout(timeout)
                        .build()?;

                    let response = session.post(&url).json(&query).send().await?;
                    let status = response.status();
                    let body = response.text().await?;
                    Ok::<_, reqwest::Error>((status, body))
                }
            },
        )
        .await;

        match result {
            Ok((status, body)) => classify(status, &body),
            Err(e) if e.is_timeout() => GraphQlResponse::Failed("Timeout while updating".into()),
            Err(e) => GraphQlResponse::Failed(e.to_string()),
        }
    }
}

/// Build search variables from the caller's location data. Coordinates
/// take precedence when both are supplied.
fn search_variables(
    lat: Option<f64>,
    lon: Option<f64>,
    postal_code: Option<&str>,
) -> Result<Variables, GasBuddyError> {
    match (lat, lon, postal_code) {
        (Some(lat), Some(lng), _) => Ok(Variables::coords(lat, lng)),
        (_, _, Some(code)) => Ok(Variables::term(code)),
        _ => Err(GasBuddyError::MissingSearchData),
    }
}
