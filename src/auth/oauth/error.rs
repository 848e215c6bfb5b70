//! Credential exchange error types.
//!
//! # Example
//!
//! ```rust
//! use commerce_bridge::auth::oauth::AuthError;
//!
//! let error = AuthError::ExchangeFailed {
//!     status: 401,
//!     message: r#"{"error":"invalid_client"}"#.to_string(),
//! };
//! assert_eq!(error.to_string(), "Request failed with status code 401");
//! assert_eq!(error.status(), Some(401));
//! ```

use thiserror::Error;

/// Errors returned by OAuth token exchanges.
///
/// These are never conflated with data errors of the backend: adapters see
/// them as [`AdapterError::Authentication`](crate::AdapterError::Authentication).
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    /// Client id or client secret are not configured.
    #[error("Client credentials are not configured")]
    MissingClientCredentials,

    /// No auth host is configured.
    #[error("Auth host is not configured")]
    MissingAuthHost,

    /// The token endpoint answered with a non-2xx status.
    #[error("Request failed with status code {status}")]
    ExchangeFailed {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        message: String,
    },

    /// The token endpoint could not be reached.
    #[error("{message}")]
    Network {
        /// Transport error message.
        message: String,
    },

    /// The token endpoint answered 2xx with an unreadable body.
    #[error("Invalid token response (status {status}): {message}")]
    InvalidResponse {
        /// HTTP status code.
        status: u16,
        /// Parser message.
        message: String,
    },
}

impl AuthError {
    /// Returns the HTTP status of the token endpoint, when one was received.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::ExchangeFailed { status, .. } | Self::InvalidResponse { status, .. } => {
                Some(*status)
            }
            Self::MissingClientCredentials | Self::MissingAuthHost | Self::Network { .. } => None,
        }
    }
}

// Verify AuthError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<AuthError>();
};
