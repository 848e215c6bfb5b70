//! Optimistic-concurrency version lookup.
//!
//! Every mutating cart adapter loads the cart version right before its
//! mutation. The lookup is deduplicated like any other load but never
//! cached: a second write always sees a freshly fetched version.

use std::sync::Arc;

use futures::FutureExt;
use serde_json::{json, Value};

use crate::context::Backend;
use crate::error::AdapterError;
use crate::loader::BatchLoader;
use crate::queries::Operation;

/// Loads the current version of a cart.
#[derive(Clone, Debug)]
pub struct VersionLoader {
    loader: BatchLoader<u64>,
}

impl VersionLoader {
    /// Creates a version loader backed by `backend`.
    #[must_use]
    pub fn new(backend: Arc<Backend>) -> Self {
        let loader = BatchLoader::new(Operation::CartVersion.name(), move |key: Value| {
            let backend = Arc::clone(&backend);
            async move {
                let cart = backend
                    .execute(Operation::CartVersion, json!({ "uid": key }))
                    .await?;
                parse_version(&key, &cart)
            }
            .boxed()
        });
        Self { loader }
    }

    /// Fetches the version of the cart `cart_id`.
    ///
    /// # Errors
    ///
    /// - [`AdapterError::NotFound`] when the backend has no such cart
    /// - [`AdapterError::Transform`] when the cart carries no integer version
    /// - any transport, authentication or upstream error of the lookup
    pub async fn load(&self, cart_id: &str) -> Result<u64, AdapterError> {
        self.loader.load(cart_id).await
    }

    /// Returns the number of lookups currently in flight.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.loader.in_flight()
    }
}

fn parse_version(key: &Value, cart: &Value) -> Result<u64, AdapterError> {
    if cart.is_null() {
        let id = key.as_str().map_or_else(|| key.to_string(), str::to_string);
        return Err(AdapterError::NotFound {
            message: format!("The Cart with ID '{id}' was not found."),
        });
    }

    cart.get("version")
        .and_then(Value::as_u64)
        .ok_or_else(|| AdapterError::Transform {
            operation: Operation::CartVersion.name(),
            message: format!("cart has no integer version: {cart}"),
        })
}
