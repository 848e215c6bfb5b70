//! Storefront operation adapters.
//!
//! Each storefront field is served by one type implementing [`Action`]. An
//! action runs in two explicit phases:
//!
//! 1. [`Action::fetch`] talks to the backend through the
//!    [`RequestContext`]: mutating cart actions first load the cart version,
//!    then run their document with that exact version.
//! 2. [`Action::transform`] shapes the raw backend value into the storefront
//!    type. It is a pure function of its input.
//!
//! [`Action::execute`] chains both and tags the first error with the
//! storefront field name.
//!
//! # Example
//!
//! ```rust,ignore
//! use commerce_bridge::actions::{Action, ApplyCouponToCart};
//!
//! let action = ApplyCouponToCart {
//!     cart_id: "cart-1".to_string(),
//!     coupon_code: "SUMMER".to_string(),
//! };
//! let output = action.execute(&ctx).await?;
//! ```

mod cart;
mod catalog;
mod customer;

pub use cart::{
    ApplyCouponToCart, BillingAddressInput, CartAddressInput, CartQuery, CreateEmptyCart,
    PaymentMethodInput, PlaceOrder, SetBillingAddressOnCart, SetPaymentMethodOnCart,
    SetShippingMethodsOnCart, ShippingMethodInput,
};
pub use catalog::{Products, ProductsRaw, DEFAULT_PAGE_SIZE};
pub use customer::{CustomerQuery, CustomerSession, GenerateCustomerToken};

use async_trait::async_trait;
use serde::Serialize;

use crate::context::RequestContext;
use crate::error::{ActionError, AdapterError};

/// One storefront operation.
#[async_trait]
pub trait Action: Send + Sync {
    /// Storefront field name, used to tag errors.
    const NAME: &'static str;

    /// What [`fetch`](Self::fetch) returns.
    type Raw: Send + Sync;

    /// The storefront shape.
    type Output: Serialize + Send;

    /// Performs the backend calls.
    ///
    /// # Errors
    ///
    /// Returns the first backend, transport or authentication error.
    async fn fetch(&self, ctx: &RequestContext) -> Result<Self::Raw, AdapterError>;

    /// Shapes the raw backend value.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::Transform`] when the value breaks the
    /// document's contract.
    fn transform(raw: &Self::Raw) -> Result<Self::Output, AdapterError>;

    /// Runs [`fetch`](Self::fetch) then [`transform`](Self::transform).
    ///
    /// # Errors
    ///
    /// Returns the first error, tagged with [`NAME`](Self::NAME).
    async fn execute(&self, ctx: &RequestContext) -> Result<Self::Output, ActionError> {
        let raw = self
            .fetch(ctx)
            .await
            .map_err(|e| ActionError::new(Self::NAME, e))?;
        Self::transform(&raw).map_err(|e| ActionError::new(Self::NAME, e))
    }
}
