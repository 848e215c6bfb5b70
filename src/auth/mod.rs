//! Authentication against the commerce backend.
//!
//! # Overview
//!
//! - [`BearerToken`]: the credential sent as `Authorization: Bearer <token>`
//! - [`CredentialProvider`]: process-wide cache of client-credentials tokens
//! - [`oauth`]: the client-credentials and customer password grants
//!
//! A request either carries its own bearer (the `bearer` setting) or obtains
//! one through the provider:
//!
//! ```rust,ignore
//! use commerce_bridge::auth::CredentialProvider;
//!
//! let provider = CredentialProvider::new();
//! let bearer = provider.bearer(&params).await?;
//! assert!(!bearer.expired());
//! ```

pub mod oauth;
mod provider;
mod token;

pub use provider::CredentialProvider;
pub use token::{BearerToken, TokenResponse};
