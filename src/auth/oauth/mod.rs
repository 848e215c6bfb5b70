//! OAuth 2.0 token grants for the commerce backend.
//!
//! - [`exchange_client_credentials`]: server-to-server token for the project
//! - [`exchange_customer_password`]: customer-scoped token from email and password
//! - [`AuthError`]: failures of either grant
//!
//! Issued tokens are plain [`BearerToken`](crate::auth::BearerToken)s.
//! Caching lives in [`CredentialProvider`](crate::auth::CredentialProvider).

mod client_credentials;
mod error;

pub use client_credentials::{exchange_client_credentials, exchange_customer_password};
pub use error::AuthError;
