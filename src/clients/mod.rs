//! HTTP client types for commerce backend communication.
//!
//! This module provides the foundational HTTP client layer for making
//! authenticated requests to the backend. It handles response parsing and
//! error body serialization.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`HttpClient`]: The async HTTP client for backend communication
//! - [`HttpRequest`]: A JSON `POST` to be sent to the backend
//! - [`HttpResponse`]: A parsed response from the backend
//! - [`graphql::GraphqlClient`]: Higher-level GraphQL client for the project endpoint
//! - [`graphql::GraphqlError`]: GraphQL-specific error types
//!
//! # Example
//!
//! ```rust,ignore
//! use commerce_bridge::auth::BearerToken;
//! use commerce_bridge::clients::{HttpClient, HttpRequest};
//!
//! let client = HttpClient::new("/my-project", &params, &BearerToken::new("token"));
//!
//! let request = HttpRequest::post("graphql", serde_json::json!({"query": "{ me { id } }"}));
//!
//! let response = client.request(request).await?;
//! ```
//!
//! # Retry Behavior
//!
//! Requests are attempted exactly once. Failures reach the caller unchanged.

mod errors;
pub mod graphql;
mod http_client;
mod http_request;
mod http_response;

pub use errors::{HttpError, HttpResponseError};
pub use http_client::{HttpClient, SDK_VERSION};
pub use http_request::HttpRequest;
pub use http_response::{HttpResponse, CORRELATION_ID_HEADER};

// Re-export GraphQL client types at the clients module level
pub use graphql::{GraphqlClient, GraphqlError, GraphqlErrorEntry, GraphqlResponse};
