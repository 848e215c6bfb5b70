//! # Commerce GraphQL Bridge
//!
//! Adapters that serve Magento-style storefront GraphQL operations from a
//! commercetools-style backend GraphQL API.
//!
//! ## Overview
//!
//! This crate provides:
//! - Type-safe connection settings via [`ActionParameters`] and [`ActionParametersBuilder`],
//!   parsed from the storefront `context.settings` object or built by hand
//! - Validated newtypes for credentials, hosts and project keys
//! - Client-credentials and customer password grants via [`auth::oauth`], with a
//!   process-wide token cache in [`auth::CredentialProvider`]
//! - An async GraphQL client for the backend project endpoint
//! - Request-scoped deduplication of backend loads via [`loader::BatchLoader`]
//! - Version-gated cart mutations: every write first loads the cart's current version
//! - One [`actions::Action`] per storefront field, split into `fetch` and `transform`
//! - A [`resolver::Resolver`] that turns a storefront request into `{ data, errors }`
//!
//! ## Quick Start
//!
//! ```rust
//! use commerce_bridge::{ActionParameters, ApiHost, ProjectKey};
//!
//! let params = ActionParameters::builder()
//!     .api_host(ApiHost::new("api.europe-west1.gcp.commercetools.com").unwrap())
//!     .project_key(ProjectKey::new("my-project").unwrap())
//!     .bearer("pre-issued-token")
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(params.scope(), "manage_project:my-project");
//! ```
//!
//! ## Resolving Storefront Requests
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use commerce_bridge::{CredentialProvider, Resolver};
//! use serde_json::json;
//!
//! // One credential cache per process
//! let resolver = Resolver::new(Arc::new(CredentialProvider::new()));
//!
//! let response = resolver
//!     .resolve_json(&json!({
//!         "operations": [{"field": "cart", "arguments": {"cart_id": "c1"}}],
//!         "context": {"settings": {
//!             "apiHost": "api.europe-west1.gcp.commercetools.com",
//!             "CT_PROJECT_KEY": "my-project",
//!             "CT_AUTH_HOST": "auth.europe-west1.gcp.commercetools.com",
//!             "CT_CLIENTID": "client-id",
//!             "CT_CLIENTSECRET": "client-secret"
//!         }}
//!     }))
//!     .await;
//!
//! println!("{}", response["data"]["cart"]["email"]);
//! ```
//!
//! ## Running a Single Action
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use commerce_bridge::actions::{Action, PlaceOrder};
//! use commerce_bridge::{CredentialProvider, RequestContext};
//!
//! let ctx = RequestContext::new(params, Arc::new(CredentialProvider::new()));
//!
//! // Loads the cart version, then creates the order with it
//! let order = PlaceOrder { cart_id: "c1".to_string() }.execute(&ctx).await?;
//! println!("Order: {}", order.order.order_id);
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: the credential cache is an explicit object owned by the process
//! - **Request-scoped loaders**: deduplication never outlives one request
//! - **Fresh versions**: a version is never reused across two writes
//! - **No retries**: every failure is reported as-is
//! - **Thread-safe**: All types are `Send + Sync`

pub mod actions;
pub mod auth;
pub mod clients;
pub mod config;
pub mod context;
pub mod error;
pub mod loader;
pub mod queries;
pub mod resolver;
pub mod transform;

// Re-export public types at crate root for convenience
pub use config::{
    ActionParameters, ActionParametersBuilder, ApiHost, ClientId, ClientSecret, ProjectKey,
    Protocol,
};
pub use error::{ActionError, AdapterError, ConfigError};

// Re-export HTTP client types
pub use clients::{
    GraphqlClient, GraphqlError, GraphqlErrorEntry, GraphqlResponse, HttpClient, HttpError,
    HttpRequest, HttpResponse, HttpResponseError,
};

// Re-export auth types for convenience
pub use auth::oauth::{exchange_client_credentials, exchange_customer_password, AuthError};
pub use auth::{BearerToken, CredentialProvider};

pub use context::RequestContext;
pub use resolver::{Resolver, ResolverRequest, ResolverResponse, StorefrontError, StorefrontOperation};
