//! Per-request state.
//!
//! A [`RequestContext`] is created for every incoming storefront request and
//! dropped with it. It owns the request's [`ActionParameters`], resolves the
//! bearer credential at most once, and holds one [`BatchLoader`] per backend
//! operation so that equal loads issued while serving the request collapse
//! into one backend call.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use commerce_bridge::auth::CredentialProvider;
//! use commerce_bridge::context::RequestContext;
//! use commerce_bridge::queries::Operation;
//!
//! let credentials = Arc::new(CredentialProvider::new());
//! let ctx = RequestContext::new(params, credentials);
//!
//! let version = ctx.version("cart-1").await?;
//! let cart = ctx.load(Operation::Cart, serde_json::json!({"uid": "cart-1", "locale": "en"})).await?;
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use futures::FutureExt;
use serde_json::Value;
use tokio::sync::OnceCell;

use crate::auth::{BearerToken, CredentialProvider};
use crate::clients::GraphqlClient;
use crate::config::ActionParameters;
use crate::error::AdapterError;
use crate::loader::{BatchLoader, VersionLoader};
use crate::queries::Operation;

/// Executes backend documents for one request.
#[derive(Debug)]
pub struct Backend {
    params: ActionParameters,
    credentials: Arc<CredentialProvider>,
    client: OnceCell<GraphqlClient>,
}

// Verify Backend is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Backend>();
    assert_send_sync::<RequestContext>();
};

impl Backend {
    /// Creates a backend for `params`, authenticating through `credentials`.
    #[must_use]
    pub fn new(params: ActionParameters, credentials: Arc<CredentialProvider>) -> Self {
        Self {
            params,
            credentials,
            client: OnceCell::new(),
        }
    }

    /// Returns the request's parameters.
    #[must_use]
    pub const fn params(&self) -> &ActionParameters {
        &self.params
    }

    /// Returns the GraphQL client, resolving the bearer on first use.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::Authentication`] if no bearer can be obtained.
    /// A failed resolution is retried by the next call.
    pub async fn client(&self) -> Result<&GraphqlClient, AdapterError> {
        self.client
            .get_or_try_init(|| async {
                let bearer = self.credentials.bearer(&self.params).await.map_err(|e| {
                    tracing::warn!("Could not obtain backend credentials: {}", e);
                    AdapterError::from(e)
                })?;
                Ok(GraphqlClient::new(&self.params, &bearer))
            })
            .await
    }

    /// Runs `operation` with `variables` and returns its root field.
    ///
    /// The root field may be `null` (e.g. an unknown cart id); callers
    /// decide what that means.
    ///
    /// # Errors
    ///
    /// - [`AdapterError::Upstream`] with the first backend error
    /// - [`AdapterError::Transport`] / [`AdapterError::Authentication`]
    /// - [`AdapterError::Transform`] when the response has no `data` or
    ///   lacks the root field
    pub async fn execute(
        &self,
        operation: Operation,
        variables: Value,
    ) -> Result<Value, AdapterError> {
        let client = self.client().await?;
        run(client, operation, variables).await
    }

    /// Runs `operation` on behalf of `bearer` instead of the request's
    /// credential. Nothing is cached.
    ///
    /// # Errors
    ///
    /// See [`execute`](Self::execute).
    pub async fn execute_as(
        &self,
        bearer: &BearerToken,
        operation: Operation,
        variables: Value,
    ) -> Result<Value, AdapterError> {
        let client = GraphqlClient::new(&self.params, bearer);
        run(&client, operation, variables).await
    }
}

async fn run(
    client: &GraphqlClient,
    operation: Operation,
    variables: Value,
) -> Result<Value, AdapterError> {
    tracing::debug!("Executing {} against {}", operation, client.endpoint());
    let response = client.query(operation.document(), variables).await?;

    if let Some(error) = response.first_error() {
        tracing::warn!("Backend rejected {}: {}", operation, error.message);
        return Err(AdapterError::Upstream(error.clone()));
    }

    let data = response.data.ok_or_else(|| AdapterError::Transform {
        operation: operation.name(),
        message: "response carried neither data nor errors".to_string(),
    })?;
    match data {
        Value::Object(mut fields) => {
            fields
                .remove(operation.root_field())
                .ok_or_else(|| AdapterError::Transform {
                    operation: operation.name(),
                    message: format!("response has no `{}` field", operation.root_field()),
                })
        }
        other => Err(AdapterError::Transform {
            operation: operation.name(),
            message: format!("`data` is not an object: {other}"),
        }),
    }
}

/// State shared by every adapter serving one incoming request.
#[derive(Debug)]
pub struct RequestContext {
    backend: Arc<Backend>,
    loaders: Mutex<HashMap<Operation, BatchLoader<Value>>>,
    versions: VersionLoader,
}

impl RequestContext {
    /// Creates a fresh context with empty loaders.
    #[must_use]
    pub fn new(params: ActionParameters, credentials: Arc<CredentialProvider>) -> Self {
        let backend = Arc::new(Backend::new(params, credentials));
        Self {
            versions: VersionLoader::new(Arc::clone(&backend)),
            backend,
            loaders: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the request's parameters.
    #[must_use]
    pub fn params(&self) -> &ActionParameters {
        self.backend.params()
    }

    /// Returns the backend executor.
    #[must_use]
    pub const fn backend(&self) -> &Arc<Backend> {
        &self.backend
    }

    /// Returns the loader for `operation`, creating it on first use.
    #[must_use]
    pub fn loader(&self, operation: Operation) -> BatchLoader<Value> {
        let mut loaders = self.loaders.lock().unwrap_or_else(PoisonError::into_inner);
        loaders
            .entry(operation)
            .or_insert_with(|| {
                let backend = Arc::clone(&self.backend);
                BatchLoader::new(operation.name(), move |variables| {
                    let backend = Arc::clone(&backend);
                    async move { backend.execute(operation, variables).await }.boxed()
                })
            })
            .clone()
    }

    /// Loads `operation` with `variables` as its key.
    ///
    /// # Errors
    ///
    /// See [`Backend::execute`].
    pub async fn load(&self, operation: Operation, variables: Value) -> Result<Value, AdapterError> {
        self.loader(operation).load(&variables).await
    }

    /// Fetches the current version of the cart `cart_id`.
    ///
    /// # Errors
    ///
    /// See [`VersionLoader::load`].
    pub async fn version(&self, cart_id: &str) -> Result<u64, AdapterError> {
        self.versions.load(cart_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ApiHost, ProjectKey};

    fn create_test_context() -> RequestContext {
        let params = ActionParameters::builder()
            .api_host(ApiHost::new("api.example.com").unwrap())
            .project_key(ProjectKey::new("demo").unwrap())
            .bearer("token")
            .build()
            .unwrap();
        RequestContext::new(params, Arc::new(CredentialProvider::new()))
    }

    #[test]
    fn test_loader_is_created_once_per_operation() {
        let ctx = create_test_context();

        let first = ctx.loader(Operation::Cart);
        let second = ctx.loader(Operation::Cart);
        let other = ctx.loader(Operation::Products);

        assert_eq!(first.name(), "Cart");
        assert_eq!(second.name(), "Cart");
        assert_eq!(other.name(), "Products");
        assert_eq!(ctx.loaders.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_params_are_exposed() {
        let ctx = create_test_context();
        assert_eq!(ctx.params().project_key().as_ref(), "demo");
        assert_eq!(ctx.params().bearer(), Some("token"));
    }

    #[tokio::test]
    async fn test_client_uses_supplied_bearer() {
        let ctx = create_test_context();
        let client = ctx.backend().client().await.unwrap();
        assert_eq!(client.endpoint(), "https://api.example.com/demo/graphql");
    }
}
