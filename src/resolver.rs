//! Storefront request dispatch.
//!
//! The storefront execution engine hands over the root fields of one
//! request, already parsed into [`StorefrontOperation`]s, together with the
//! connection `settings`. The [`Resolver`] builds one [`RequestContext`] for
//! the whole request, runs every field through its action and assembles a
//! GraphQL-style `{ data, errors }` response.
//!
//! Query fields run concurrently. If any field is a mutation, all fields run
//! one after another in request order.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use commerce_bridge::auth::CredentialProvider;
//! use commerce_bridge::resolver::Resolver;
//! use serde_json::json;
//!
//! let resolver = Resolver::new(Arc::new(CredentialProvider::new()));
//!
//! let response = resolver
//!     .resolve_json(&json!({
//!         "operations": [
//!             {"field": "applyCouponToCart", "arguments": {"cart_id": "c1", "coupon_code": "SUMMER"}}
//!         ],
//!         "context": {"settings": {"apiHost": "api.commercetools.co", "CT_PROJECT_KEY": "demo", "bearer": "t"}}
//!     }))
//!     .await;
//! ```

use std::sync::Arc;

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::actions::{
    Action, ApplyCouponToCart, CartQuery, CreateEmptyCart, CustomerQuery, GenerateCustomerToken,
    PlaceOrder, Products, SetBillingAddressOnCart, SetPaymentMethodOnCart,
    SetShippingMethodsOnCart,
};
use crate::auth::CredentialProvider;
use crate::clients::graphql::{ErrorSource, DEFAULT_ERROR_SOURCE};
use crate::config::ActionParameters;
use crate::context::RequestContext;
use crate::error::{ActionError, AdapterError};

/// One storefront root field with its arguments.
///
/// Serialized as `{ "field": "<name>", "arguments": { ... } }`.
#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "field", content = "arguments")]
pub enum StorefrontOperation {
    #[serde(rename = "cart")]
    Cart(CartQuery),
    #[serde(rename = "createEmptyCart")]
    CreateEmptyCart(CreateEmptyCart),
    #[serde(rename = "applyCouponToCart")]
    ApplyCouponToCart(ApplyCouponToCart),
    #[serde(rename = "setShippingMethodsOnCart")]
    SetShippingMethodsOnCart(SetShippingMethodsOnCart),
    #[serde(rename = "setPaymentMethodOnCart")]
    SetPaymentMethodOnCart(SetPaymentMethodOnCart),
    #[serde(rename = "setBillingAddressOnCart")]
    SetBillingAddressOnCart(SetBillingAddressOnCart),
    #[serde(rename = "placeOrder")]
    PlaceOrder(PlaceOrder),
    #[serde(rename = "products")]
    Products(Products),
    #[serde(rename = "generateCustomerToken")]
    GenerateCustomerToken(GenerateCustomerToken),
    #[serde(rename = "customer")]
    Customer(CustomerQuery),
}

impl StorefrontOperation {
    /// Returns the storefront field name.
    #[must_use]
    pub const fn field_name(&self) -> &'static str {
        match self {
            Self::Cart(_) => CartQuery::NAME,
            Self::CreateEmptyCart(_) => CreateEmptyCart::NAME,
            Self::ApplyCouponToCart(_) => ApplyCouponToCart::NAME,
            Self::SetShippingMethodsOnCart(_) => SetShippingMethodsOnCart::NAME,
            Self::SetPaymentMethodOnCart(_) => SetPaymentMethodOnCart::NAME,
            Self::SetBillingAddressOnCart(_) => SetBillingAddressOnCart::NAME,
            Self::PlaceOrder(_) => PlaceOrder::NAME,
            Self::Products(_) => Products::NAME,
            Self::GenerateCustomerToken(_) => GenerateCustomerToken::NAME,
            Self::Customer(_) => CustomerQuery::NAME,
        }
    }

    /// Returns `true` for storefront mutations.
    #[must_use]
    pub const fn is_mutation(&self) -> bool {
        !matches!(self, Self::Cart(_) | Self::Products(_) | Self::Customer(_))
    }

    /// Runs the operation and serializes its storefront output.
    ///
    /// # Errors
    ///
    /// Returns the action's [`ActionError`].
    pub async fn execute(&self, ctx: &RequestContext) -> Result<Value, ActionError> {
        match self {
            Self::Cart(action) => run(action, ctx).await,
            Self::CreateEmptyCart(action) => run(action, ctx).await,
            Self::ApplyCouponToCart(action) => run(action, ctx).await,
            Self::SetShippingMethodsOnCart(action) => run(action, ctx).await,
            Self::SetPaymentMethodOnCart(action) => run(action, ctx).await,
            Self::SetBillingAddressOnCart(action) => run(action, ctx).await,
            Self::PlaceOrder(action) => run(action, ctx).await,
            Self::Products(action) => run(action, ctx).await,
            Self::GenerateCustomerToken(action) => run(action, ctx).await,
            Self::Customer(action) => run(action, ctx).await,
        }
    }
}

async fn run<A: Action>(action: &A, ctx: &RequestContext) -> Result<Value, ActionError> {
    let output = action.execute(ctx).await?;
    serde_json::to_value(output).map_err(|e| {
        ActionError::new(
            A::NAME,
            AdapterError::Transform {
                operation: A::NAME,
                message: e.to_string(),
            },
        )
    })
}

/// An incoming storefront request.
#[derive(Clone, Debug)]
pub struct ResolverRequest {
    /// Root fields, in request order.
    pub operations: Vec<StorefrontOperation>,
    /// The `context.settings` object.
    pub settings: Value,
}

impl ResolverRequest {
    /// Parses `{ operations: [...], context: { settings: {...} } }`.
    ///
    /// An operation without `arguments` is read as having `{}`.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error when an operation names an unknown
    /// field or carries malformed arguments.
    pub fn from_value(value: &Value) -> Result<Self, serde_json::Error> {
        let operations = value
            .get("operations")
            .and_then(Value::as_array)
            .map(|operations| {
                operations
                    .iter()
                    .map(|operation| {
                        let mut operation = operation.clone();
                        if let Some(fields) = operation.as_object_mut() {
                            fields
                                .entry("arguments")
                                .or_insert_with(|| Value::Object(Map::new()));
                        }
                        serde_json::from_value(operation)
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?
            .unwrap_or_default();

        let settings = value
            .pointer("/context/settings")
            .cloned()
            .unwrap_or_else(|| Value::Object(Map::new()));

        Ok(Self {
            operations,
            settings,
        })
    }
}

/// One entry of the response `errors` array.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StorefrontError {
    /// The failure message, forwarded unchanged.
    pub message: String,
    /// `{ name }` of the document that failed.
    pub source: ErrorSource,
    /// Path of the failing field.
    pub path: Vec<String>,
}

impl StorefrontError {
    fn new(message: impl Into<String>, source_name: &str, path: Vec<String>) -> Self {
        Self {
            message: message.into(),
            source: ErrorSource {
                name: source_name.to_string(),
            },
            path,
        }
    }

    fn from_action(field: &str, error: &ActionError) -> Self {
        Self::new(
            error.message(),
            error.error.source_name(),
            vec![field.to_string()],
        )
    }
}

/// `{ data, errors }` response of one storefront request.
///
/// `data` is absent when every field failed; `errors` is absent when none did.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ResolverResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<StorefrontError>>,
}

impl ResolverResponse {
    fn push_error(&mut self, error: StorefrontError) {
        self.errors.get_or_insert_with(Vec::new).push(error);
    }

    /// Returns the first error, if any.
    #[must_use]
    pub fn first_error(&self) -> Option<&StorefrontError> {
        self.errors.as_ref().and_then(|errors| errors.first())
    }
}

/// Routes storefront requests to their actions.
///
/// The resolver owns nothing but the process-wide credential cache; every
/// request gets fresh loaders.
#[derive(Clone, Debug, Default)]
pub struct Resolver {
    credentials: Arc<CredentialProvider>,
}

// Verify Resolver is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Resolver>();
    assert_send_sync::<ResolverResponse>();
};

impl Resolver {
    /// Creates a resolver sharing `credentials` across requests.
    #[must_use]
    pub const fn new(credentials: Arc<CredentialProvider>) -> Self {
        Self { credentials }
    }

    /// Returns the credential cache.
    #[must_use]
    pub const fn credentials(&self) -> &Arc<CredentialProvider> {
        &self.credentials
    }

    /// Resolves one storefront request.
    pub async fn resolve(&self, request: ResolverRequest) -> ResolverResponse {
        let params = match ActionParameters::from_settings(&request.settings) {
            Ok(params) => params,
            Err(e) => {
                tracing::warn!("Rejecting storefront request: {}", e);
                let error = AdapterError::from(e);
                let mut response = ResolverResponse::default();
                for operation in &request.operations {
                    response.push_error(StorefrontError::new(
                        error.to_string(),
                        DEFAULT_ERROR_SOURCE,
                        vec![operation.field_name().to_string()],
                    ));
                }
                return response;
            }
        };

        let ctx = RequestContext::new(params, Arc::clone(&self.credentials));

        let outcomes = if request.operations.iter().any(StorefrontOperation::is_mutation) {
            let mut outcomes = Vec::with_capacity(request.operations.len());
            for operation in &request.operations {
                outcomes.push(operation.execute(&ctx).await);
            }
            outcomes
        } else {
            join_all(request.operations.iter().map(|operation| operation.execute(&ctx))).await
        };

        let mut response = ResolverResponse::default();
        for (operation, outcome) in request.operations.iter().zip(outcomes) {
            let field = operation.field_name();
            match outcome {
                Ok(value) => {
                    response
                        .data
                        .get_or_insert_with(Map::new)
                        .insert(field.to_string(), value);
                }
                Err(error) => {
                    tracing::debug!("{}", error);
                    response.push_error(StorefrontError::from_action(field, &error));
                }
            }
        }
        response
    }

    /// Resolves a raw JSON request and returns the JSON response.
    ///
    /// A request that cannot be parsed yields a single error.
    pub async fn resolve_json(&self, request: &Value) -> Value {
        let response = match ResolverRequest::from_value(request) {
            Ok(request) => self.resolve(request).await,
            Err(e) => {
                let mut response = ResolverResponse::default();
                response.push_error(StorefrontError::new(
                    e.to_string(),
                    DEFAULT_ERROR_SOURCE,
                    Vec::new(),
                ));
                response
            }
        };
        serde_json::to_value(response).unwrap_or_else(|_| Value::Null)
    }
}
