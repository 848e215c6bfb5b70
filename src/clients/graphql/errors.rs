//! GraphQL-specific error types.
//!
//! Two kinds of failure exist when talking to the backend GraphQL endpoint:
//!
//! - [`GraphqlError`]: the call itself failed (network, non-2xx without a
//!   structured body, unparsable body)
//! - [`GraphqlErrorEntry`]: the backend answered and rejected the operation;
//!   these arrive in the `errors` array of a [`GraphqlResponse`](super::GraphqlResponse)
//!   and are data, not Rust errors, until an adapter decides otherwise.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::clients::HttpError;

/// Name attached to errors that do not carry their own `source.name`.
pub const DEFAULT_ERROR_SOURCE: &str = "GraphQL request";

/// Error type for GraphQL client operations.
#[derive(Debug, Error)]
pub enum GraphqlError {
    /// An HTTP-level error occurred.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// The response body is not a GraphQL response.
    #[error("Invalid GraphQL response (status {status}): {message}")]
    InvalidResponse {
        /// HTTP status of the response.
        status: u16,
        /// Parser message.
        message: String,
    },
}

/// The `source` member of a GraphQL error.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorSource {
    /// Name of the document that produced the error.
    pub name: String,
}

impl Default for ErrorSource {
    fn default() -> Self {
        Self {
            name: DEFAULT_ERROR_SOURCE.to_string(),
        }
    }
}

/// One entry of a GraphQL `errors` array.
///
/// Fields the backend adds beyond the standard ones are preserved in
/// `extensions` so that the entry can be forwarded verbatim.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphqlErrorEntry {
    /// Human-readable error message.
    pub message: String,
    /// Source tag of the error, if the backend supplied one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<ErrorSource>,
    /// Response path of the failing field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<serde_json::Value>>,
    /// Backend-specific error details (error codes, current versions, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<serde_json::Value>,
}

impl GraphqlErrorEntry {
    /// Creates an entry with just a message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
            path: None,
            extensions: None,
        }
    }

    /// Returns the source name, defaulting to [`DEFAULT_ERROR_SOURCE`].
    #[must_use]
    pub fn source_name(&self) -> &str {
        self.source
            .as_ref()
            .map_or(DEFAULT_ERROR_SOURCE, |source| source.name.as_str())
    }

    /// Returns the backend error code from `extensions.code`, if any.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        self.extensions
            .as_ref()
            .and_then(|ext| ext.get("code"))
            .and_then(serde_json::Value::as_str)
    }
}

// Verify error types are Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<GraphqlError>();
    assert_send_sync::<GraphqlErrorEntry>();
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::HttpResponseError;
    use serde_json::json;

    #[test]
    fn test_graphql_error_http_variant_wraps_http_error() {
        let http_error = HttpError::Response(HttpResponseError {
            code: 404,
            message: r#"{"error":"Not Found"}"#.to_string(),
            body: json!({"error": "Not Found"}),
            error_reference: None,
        });

        let graphql_error: GraphqlError = http_error.into();
        assert!(graphql_error.to_string().contains("Not Found"));
    }

    #[test]
    fn test_entry_defaults_source_name() {
        let entry = GraphqlErrorEntry::new("boom");
        assert_eq!(entry.source_name(), "GraphQL request");
    }

    #[test]
    fn test_entry_deserializes_backend_error() {
        let entry: GraphqlErrorEntry = serde_json::from_value(json!({
            "message": "Object 03bdd6d9 has a different version than expected. Expected: 16 - Actual: 22.",
            "path": ["updateCart"],
            "locations": [{"line": 2, "column": 3}],
            "extensions": {"code": "ConcurrentModification", "currentVersion": 22}
        }))
        .unwrap();

        assert!(entry.message.contains("Expected: 16 - Actual: 22."));
        assert_eq!(entry.code(), Some("ConcurrentModification"));
        assert_eq!(entry.path, Some(vec![json!("updateCart")]));
    }

    #[test]
    fn test_entry_keeps_backend_source_name() {
        let entry: GraphqlErrorEntry = serde_json::from_value(json!({
            "message": "boom",
            "source": {"name": "Cart mutation"}
        }))
        .unwrap();
        assert_eq!(entry.source_name(), "Cart mutation");
    }
}
