//! Bearer credentials for the commerce backend.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

/// An OAuth access token used as `Authorization: Bearer <token>`.
///
/// The token value is masked in `Debug` output.
///
/// # Example
///
/// ```rust
/// use commerce_bridge::auth::BearerToken;
///
/// let token = BearerToken::new("secret-token");
/// assert_eq!(token.header_value(), "Bearer secret-token");
/// assert!(!token.expired());
/// assert!(!format!("{token:?}").contains("secret-token"));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken {
    token: String,
    expires: Option<DateTime<Utc>>,
}

impl BearerToken {
    /// Creates a token without an expiration time.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            expires: None,
        }
    }

    /// Creates a token that expires at `expires`.
    #[must_use]
    pub fn with_expiry(token: impl Into<String>, expires: DateTime<Utc>) -> Self {
        Self {
            token: token.into(),
            expires: Some(expires),
        }
    }

    /// Builds a token from an OAuth token endpoint response.
    ///
    /// `expires_in` is counted from now.
    #[must_use]
    pub fn from_token_response(response: &TokenResponse) -> Self {
        let expires = response
            .expires_in
            .and_then(|secs| i64::try_from(secs).ok())
            .map(|secs| Utc::now() + Duration::seconds(secs));
        Self {
            token: response.access_token.clone(),
            expires,
        }
    }

    /// Returns the raw token value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.token
    }

    /// Returns the expiration time, if known.
    #[must_use]
    pub const fn expires(&self) -> Option<DateTime<Utc>> {
        self.expires
    }

    /// Returns `true` if this token has expired.
    ///
    /// Tokens without an expiration time never expire.
    #[must_use]
    pub fn expired(&self) -> bool {
        self.expires.is_some_and(|expires| Utc::now() > expires)
    }

    /// Returns the value of the `Authorization` header.
    #[must_use]
    pub fn header_value(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BearerToken")
            .field("token", &"*****")
            .field("expires", &self.expires)
            .finish()
    }
}

/// Successful response body of the OAuth token endpoint.
#[derive(Clone, Debug, Deserialize)]
pub struct TokenResponse {
    /// The issued access token.
    pub access_token: String,
    /// Lifetime of the token in seconds.
    #[serde(default)]
    pub expires_in: Option<u64>,
    /// Granted scope.
    #[serde(default)]
    pub scope: Option<String>,
    /// Refresh token, issued by password grants.
    #[serde(default)]
    pub refresh_token: Option<String>,
}

// Verify token types are Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<BearerToken>();
    assert_send_sync::<TokenResponse>();
};
