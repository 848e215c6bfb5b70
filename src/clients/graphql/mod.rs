//! GraphQL client for the backend project endpoint.
//!
//! This module provides a higher-level GraphQL client built on top of the
//! [`HttpClient`](crate::clients::HttpClient). Every request is a POST of
//! `{query, variables}` to `{protocol}://{apiHost}/{projectKey}/graphql`.
//!
//! # Overview
//!
//! - [`GraphqlClient`]: executes documents with variables
//! - [`GraphqlResponse`]: the parsed `data`/`errors`/`extensions` envelope
//! - [`GraphqlErrorEntry`]: one entry of the `errors` array
//! - [`GraphqlError`]: failures of the call itself
//!
//! # Example
//!
//! ```rust,ignore
//! use commerce_bridge::clients::GraphqlClient;
//! use serde_json::json;
//!
//! let client = GraphqlClient::new(&params, &bearer);
//!
//! let response = client
//!     .query("query($uid: String!) { cart(id: $uid) { version } }", json!({"uid": "c1"}))
//!     .await?;
//!
//! if let Some(error) = response.first_error() {
//!     println!("backend rejected the query: {}", error.message);
//! }
//! ```
//!
//! # Response Structure
//!
//! The backend may answer with HTTP 200 and an `errors` array, or with a
//! non-2xx status and the same structured body. Both are returned as
//! `Ok(GraphqlResponse)` so that callers see the backend's own messages.

mod client;
mod errors;

pub use client::{GraphqlClient, GraphqlResponse};
pub use errors::{ErrorSource, GraphqlError, GraphqlErrorEntry, DEFAULT_ERROR_SOURCE};
