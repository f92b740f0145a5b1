//! Classification of raw upstream responses.
//!
//! A GraphQL exchange is reduced to a closed set of outcomes so downstream
//! conversion can pattern-match instead of probing response dictionaries
//! for error keys.

use reqwest::StatusCode;
use serde_json::Value;

/// Outcome of one GraphQL exchange.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphQlResponse {
    /// Well-formed body with no `errors` member. Holds the whole body.
    Data(Value),

    /// The service answered with a GraphQL error envelope.
    /// Holds the raw `errors` member (object or list).
    Errors(Value),

    /// Transport-level failure: error status, undecodable body, timeout,
    /// or exhausted retries.
    Failed(String),
}

/// Classify a status + body pair.
///
/// 403 is treated like 200: the site answers some flows with 403 plus a
/// valid GraphQL payload, so error-ness is decided by payload content,
/// not status.
pub fn classify(status: StatusCode, body: &str) -> GraphQlResponse {
    if status != StatusCode::OK && status != StatusCode::FORBIDDEN {
        return GraphQlResponse::Failed(body.trim().to_string());
    }

    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return GraphQlResponse::Failed(body.trim().to_string());
    };

    match value.get("errors") {
        Some(errors) => GraphQlResponse::Errors(errors.clone()),
        None => GraphQlResponse::Data(value),
    }
}

/// Pull a human-readable message out of a raw `errors` member.
///
/// The service is inconsistent here: sometimes an object with a `message`
/// field, sometimes a list of such objects.
pub fn error_message(errors: &Value) -> String {
    if let Some(message) = errors.get("message").and_then(Value::as_str) {
        return message.to_string();
    }

    if let Some(message) = errors
        .get(0)
        .and_then(|e| e.get("message"))
        .and_then(Value::as_str)
    {
        return message.to_string();
    }

    "server side error occurred".to_string()
}
