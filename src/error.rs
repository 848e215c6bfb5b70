//! Error types for the commerce bridge.
//!
//! - [`ConfigError`]: invalid or incomplete action parameters. All
//!   configuration constructors return `Result<T, ConfigError>` to enable
//!   fail-fast validation before any backend call is attempted.
//! - [`AdapterError`]: why one adapter invocation failed
//! - [`ActionError`]: an [`AdapterError`] tagged with the storefront operation
//!
//! # Example
//!
//! ```rust
//! use commerce_bridge::{ClientId, ConfigError};
//!
//! let result = ClientId::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyClientId)));
//! ```

use thiserror::Error;

use crate::auth::oauth::AuthError;
use crate::clients::graphql::{GraphqlError, GraphqlErrorEntry, DEFAULT_ERROR_SOURCE};
use crate::clients::HttpError;

/// Errors that can occur while building [`ActionParameters`](crate::ActionParameters).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// OAuth client id cannot be empty.
    #[error("Client id cannot be empty. Please provide the backend API client id.")]
    EmptyClientId,

    /// OAuth client secret cannot be empty.
    #[error("Client secret cannot be empty. Please provide the backend API client secret.")]
    EmptyClientSecret,

    /// A host name is invalid.
    #[error("Invalid host '{host}'. Expected a bare host name such as 'api.example.com'.")]
    InvalidHost {
        /// The invalid host that was provided.
        host: String,
    },

    /// The project key is invalid.
    #[error("Invalid project key '{key}'. Only letters, digits, '-' and '_' are allowed.")]
    InvalidProjectKey {
        /// The invalid key that was provided.
        key: String,
    },

    /// The protocol is neither `http` nor `https`.
    #[error("Invalid protocol '{protocol}'. Expected 'http' or 'https'.")]
    InvalidProtocol {
        /// The invalid protocol that was provided.
        protocol: String,
    },

    /// An OAuth path does not start with `/`.
    #[error("Invalid OAuth path '{path}'. The path must start with '/'.")]
    InvalidOAuthPath {
        /// The invalid path that was provided.
        path: String,
    },

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the action parameters.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },

    /// The settings object could not be parsed.
    #[error("Invalid settings: {reason}")]
    InvalidSettings {
        /// Why the settings were rejected.
        reason: String,
    },
}

/// Why one adapter invocation failed.
///
/// `AdapterError` is `Clone` so that every caller joined on one
/// deduplicated backend call observes the same outcome.
///
/// # Example
///
/// ```rust
/// use commerce_bridge::AdapterError;
///
/// let error = AdapterError::Transport {
///     status: Some(502),
///     message: "Bad Gateway".to_string(),
/// };
/// assert_eq!(error.to_string(), "Request failed with status code 502");
/// assert_eq!(error.source_name(), "GraphQL request");
/// ```
#[derive(Clone, Debug, Error, PartialEq)]
pub enum AdapterError {
    /// The backend rejected the operation; the first entry of its `errors`
    /// array is kept verbatim.
    #[error("{}", .0.message)]
    Upstream(GraphqlErrorEntry),

    /// The entity addressed by a read does not exist.
    #[error("{message}")]
    NotFound {
        /// Message naming the missing entity.
        message: String,
    },

    /// Network failure or non-2xx answer without structured errors.
    #[error("{}", status_message(.status, .message))]
    Transport {
        /// HTTP status, when a response was received.
        status: Option<u16>,
        /// Transport error message.
        message: String,
    },

    /// The credential exchange failed.
    #[error("{}", status_message(.status, .message))]
    Authentication {
        /// HTTP status of the token endpoint, when a response was received.
        status: Option<u16>,
        /// Error message.
        message: String,
    },

    /// The backend answered with data that does not fit the expected shape.
    #[error("Unexpected backend response for {operation}: {message}")]
    Transform {
        /// Operation whose response was rejected.
        operation: &'static str,
        /// What was wrong with it.
        message: String,
    },

    /// The storefront arguments cannot be turned into a backend call.
    #[error("{message}")]
    InvalidInput {
        /// What is wrong with the arguments.
        message: String,
    },

    /// A load key could not be serialized.
    #[error("Invalid load key: {0}")]
    InvalidKey(String),

    /// The action parameters are invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

fn status_message(status: &Option<u16>, message: &str) -> String {
    status.map_or_else(
        || message.to_string(),
        |code| format!("Request failed with status code {code}"),
    )
}

impl AdapterError {
    /// Returns the `source.name` to report for this error.
    ///
    /// Backend rejections keep their own tag; everything else reports
    /// `"GraphQL request"`.
    #[must_use]
    pub fn source_name(&self) -> &str {
        match self {
            Self::Upstream(entry) => entry.source_name(),
            _ => DEFAULT_ERROR_SOURCE,
        }
    }

    /// Returns `true` for credential failures.
    #[must_use]
    pub const fn is_authentication(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }
}

impl From<HttpError> for AdapterError {
    fn from(error: HttpError) -> Self {
        let status = error.status();
        let message = match error {
            HttpError::Response(e) => e.message,
            other => other.to_string(),
        };
        Self::Transport { status, message }
    }
}

impl From<GraphqlError> for AdapterError {
    fn from(error: GraphqlError) -> Self {
        match error {
            GraphqlError::Http(e) => e.into(),
            GraphqlError::InvalidResponse { status, message } => Self::Transport {
                status: Some(status),
                message,
            },
        }
    }
}

impl From<AuthError> for AdapterError {
    fn from(error: AuthError) -> Self {
        Self::Authentication {
            status: error.status(),
            message: error.to_string(),
        }
    }
}

/// An [`AdapterError`] tagged with the storefront operation that raised it.
#[derive(Clone, Debug, Error, PartialEq)]
#[error("{operation} failed: {error}")]
pub struct ActionError {
    /// Storefront field name of the failing operation.
    pub operation: &'static str,
    /// The underlying failure.
    #[source]
    pub error: AdapterError,
}

impl ActionError {
    /// Creates a new tagged error.
    #[must_use]
    pub const fn new(operation: &'static str, error: AdapterError) -> Self {
        Self { operation, error }
    }

    /// Returns the message to show to the storefront, the underlying
    /// error's message without the operation tag.
    #[must_use]
    pub fn message(&self) -> String {
        self.error.to_string()
    }
}

// Verify error types are Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ConfigError>();
    assert_send_sync::<AdapterError>();
    assert_send_sync::<ActionError>();
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_client_id_error_message() {
        let message = ConfigError::EmptyClientId.to_string();
        assert!(message.contains("Client id cannot be empty"));
    }

    #[test]
    fn test_invalid_host_error_message() {
        let error = ConfigError::InvalidHost {
            host: "https://bad host".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("https://bad host"));
        assert!(message.contains("bare host name"));
    }

    #[test]
    fn test_missing_required_field_error_message() {
        let error = ConfigError::MissingRequiredField { field: "api_host" };
        let message = error.to_string();
        assert!(message.contains("api_host"));
        assert!(message.contains("must be set"));
    }

    #[test]
    fn test_upstream_error_keeps_backend_message() {
        let entry = GraphqlErrorEntry::new(
            "Object 1 has a different version than expected. Expected: 16 - Actual: 22.",
        );
        let error = AdapterError::Upstream(entry);
        assert_eq!(
            error.to_string(),
            "Object 1 has a different version than expected. Expected: 16 - Actual: 22."
        );
        assert_eq!(error.source_name(), "GraphQL request");
    }

    #[test]
    fn test_transport_without_status_uses_message() {
        let error = AdapterError::Transport {
            status: None,
            message: "Network error: connection refused".to_string(),
        };
        assert_eq!(error.to_string(), "Network error: connection refused");
    }

    #[test]
    fn test_auth_error_converts_to_authentication() {
        let error: AdapterError = AuthError::ExchangeFailed {
            status: 401,
            message: "{}".to_string(),
        }
        .into();

        assert!(error.is_authentication());
        assert_eq!(error.to_string(), "Request failed with status code 401");
    }

    #[test]
    fn test_http_response_error_converts_to_transport() {
        let http_error = HttpError::Response(crate::clients::HttpResponseError {
            code: 503,
            message: r#"{"message":"unavailable"}"#.to_string(),
            body: serde_json::json!({"message": "unavailable"}),
            error_reference: None,
        });

        let error: AdapterError = GraphqlError::Http(http_error).into();
        assert_eq!(
            error,
            AdapterError::Transport {
                status: Some(503),
                message: r#"{"message":"unavailable"}"#.to_string(),
            }
        );
    }

    #[test]
    fn test_action_error_message_drops_operation_tag() {
        let error = ActionError::new(
            "placeOrder",
            AdapterError::NotFound {
                message: "The Cart with ID 'c1' was not found.".to_string(),
            },
        );
        assert_eq!(error.message(), "The Cart with ID 'c1' was not found.");
        assert!(error.to_string().starts_with("placeOrder failed"));
    }

    #[test]
    fn test_error_implements_std_error() {
        let error = ConfigError::EmptyClientSecret;
        let _: &dyn std::error::Error = &error;
    }
}
