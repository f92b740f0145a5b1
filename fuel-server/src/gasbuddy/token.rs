//! Session-token acquisition from the gasbuddy.com home page.
//!
//! The GraphQL endpoint requires an anti-forgery token that only exists
//! embedded in the home page markup as `window.gbcsrf = "..."`. Sites
//! behind a bot challenge can route the page fetch through a
//! FlareSolverr-style proxy instead of fetching directly.

use std::time::Duration;

use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use super::client::identifying_headers;
use super::error::GasBuddyError;
use super::retry::{Backoff, with_backoff};

/// How the bootstrap page is fetched. Selected at construction.
#[derive(Debug, Clone)]
pub enum FetchStrategy {
    /// Plain GET against the home page.
    Direct,

    /// POST through a challenge-solving proxy which fetches the page on
    /// our behalf and wraps it in a JSON envelope.
    Solver { url: String },
}

/// Envelope returned by a challenge-solving proxy.
#[derive(Debug, Deserialize)]
struct SolverEnvelope {
    solution: SolverSolution,
}

#[derive(Debug, Deserialize)]
struct SolverSolution {
    response: String,
}

/// Fetches the bootstrap page and extracts the session token.
pub struct TokenAcquirer {
    home_url: String,
    strategy: FetchStrategy,
    timeout: Duration,
    backoff: Backoff,
}

impl TokenAcquirer {
    pub fn new(home_url: impl Into<String>, strategy: FetchStrategy, timeout: Duration) -> Self {
        Self {
            home_url: home_url.into(),
            strategy,
            timeout,
            backoff: Backoff::default(),
        }
    }

    /// Fetch the bootstrap page and extract the `gbcsrf` token.
    ///
    /// Best-effort by policy: a request timeout or a non-200 page status
    /// yields `Ok(None)` and the caller proceeds without a token (the
    /// server will answer 403 with an error payload in that case). A page
    /// that loads fine but carries no token pattern is a hard
    /// `TokenMissing` failure: it means the markup changed.
    pub async fn acquire(&self) -> Result<Option<String>, GasBuddyError> {
        let Some(page) = self.fetch_page().await? else {
            return Ok(None);
        };

        match extract_token(&page) {
            Some(tag) => {
                debug!("acquired session token");
                Ok(Some(tag.to_string()))
            }
            None => Err(GasBuddyError::TokenMissing),
        }
    }

    /// Fetch the page body, `Ok(None)` on the tolerated failure modes.
    async fn fetch_page(&self) -> Result<Option<String>, GasBuddyError> {
        let result = with_backoff(
            &self.backoff,
            |e: &reqwest::Error| e.is_connect(),
            || {
                let home_url = self.home_url.clone();
                let strategy = self.strategy.clone();
                let timeout = self.timeout;
                async move {
                    let session = reqwest::Client::builder()
                        .default_headers(identifying_headers())
                        .timeout(timeout)
                        .build()?;

                    let response = match &strategy {
                        FetchStrategy::Direct => session.get(&home_url).send().await?,
                        FetchStrategy::Solver { url } => {
                            session
                                .post(url)
                                .json(&json!({
                                    "cmd": "request.get",
                                    "url": home_url,
                                    "maxTimeout": timeout.as_millis() as u64,
                                }))
                                .send()
                                .await?
                        }
                    };

                    let status = response.status();
                    let body = response.text().await?;
                    Ok::<_, reqwest::Error>((status, body))
                }
            },
        )
        .await;

        let (status, body) = match result {
            Ok(pair) => pair,
            Err(e) if e.is_timeout() => {
                warn!("token fetch timed out, proceeding without a token");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        if !status.is_success() {
            warn!(
                status = status.as_u16(),
                "bootstrap page returned an error status, proceeding without a token"
            );
            return Ok(None);
        }

        if let FetchStrategy::Solver { .. } = &self.strategy {
            let envelope: SolverEnvelope =
                serde_json::from_str(&body).map_err(|e| GasBuddyError::Library {
                    message: format!("solver envelope: {e}"),
                })?;
            return Ok(Some(envelope.solution.response));
        }

        Ok(Some(body))
    }
}

/// Extract the value of `window.gbcsrf = "<token>"` from page markup.
/// Either quote style is accepted.
pub fn extract_token(page: &str) -> Option<&str> {
    let at = page.find("window.gbcsrf")?;
    let rest = page[at + "window.gbcsrf".len()..]
        .trim_start()
        .strip_prefix('=')?
        .trim_start();

    let quote = rest.chars().next()?;
    if quote != '"' && quote != '\'' {
        return None;
    }

    let token = &rest[1..];
    let end = token.find(quote)?;
    Some(&token[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_double_quoted_token() {
        let page = r#"<script>window.gbcsrf = "abc123";</script>"#;
        assert_eq!(extract_token(page), Some("abc123"));
    }

    #[test]
    fn extracts_single_quoted_token() {
        let page = "<script>window.gbcsrf = 'abc123';</script>";
        assert_eq!(extract_token(page), Some("abc123"));
    }

    #[test]
    fn tolerates_whitespace_around_assignment() {
        let page = "window.gbcsrf\t =\n  \"t-0k.en\";";
        assert_eq!(extract_token(page), Some("t-0k.en"));
    }

    #[test]
    fn missing_pattern_yields_none() {
        assert_eq!(extract_token("<html><body>hello</body></html>"), None);
        assert_eq!(extract_token(""), None);
    }

    #[test]
    fn unquoted_value_yields_none() {
        assert_eq!(extract_token("window.gbcsrf = abc123;"), None);
    }

    #[test]
    fn unterminated_quote_yields_none() {
        assert_eq!(extract_token("window.gbcsrf = \"abc123"), None);
    }

    #[test]
    fn first_occurrence_wins() {
        let page = "window.gbcsrf = \"first\"; window.gbcsrf = \"second\";";
        assert_eq!(extract_token(page), Some("first"));
    }

    #[test]
    fn solver_envelope_deserializes() {
        let body = r#"{"solution": {"response": "<html>window.gbcsrf = 'tag'</html>", "status": 200}}"#;
        let envelope: SolverEnvelope = serde_json::from_str(body).unwrap();
        assert_eq!(extract_token(&envelope.solution.response), Some("tag"));
    }
}
