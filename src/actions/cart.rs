//! Cart and checkout actions.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::actions::Action;
use crate::context::RequestContext;
use crate::error::AdapterError;
use crate::queries::Operation;
use crate::transform::cart::{
    self as shape, BillingAddressCart, Cart, CartOutput, CouponCart, PaymentMethodCart,
    PlaceOrderOutput, ShippingMethodsCart,
};

/// Loads the version of `cart_id`, then runs `operation` with it.
///
/// `variables` must not contain `uid` or `version`; both are added here.
async fn versioned(
    ctx: &RequestContext,
    operation: Operation,
    cart_id: &str,
    mut variables: serde_json::Map<String, Value>,
) -> Result<Value, AdapterError> {
    let version = ctx.version(cart_id).await?;
    variables.insert("uid".to_string(), json!(cart_id));
    variables.insert("version".to_string(), json!(version));
    ctx.load(operation, Value::Object(variables)).await
}

/// `cart(cart_id)`.
#[derive(Clone, Debug, Deserialize)]
pub struct CartQuery {
    pub cart_id: String,
}

#[async_trait]
impl Action for CartQuery {
    const NAME: &'static str = "cart";
    type Raw = Value;
    type Output = Cart;

    async fn fetch(&self, ctx: &RequestContext) -> Result<Value, AdapterError> {
        let cart = ctx
            .load(
                Operation::Cart,
                json!({ "uid": self.cart_id, "locale": ctx.params().locale() }),
            )
            .await?;
        if cart.is_null() {
            return Err(AdapterError::NotFound {
                message: format!("The Cart with ID '{}' was not found.", self.cart_id),
            });
        }
        Ok(cart)
    }

    fn transform(raw: &Value) -> Result<Cart, AdapterError> {
        shape::cart(raw)
    }
}

/// `createEmptyCart`.
///
/// The cart is created in the configured currency and bound to the
/// configured customer, if any.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct CreateEmptyCart {}

#[async_trait]
impl Action for CreateEmptyCart {
    const NAME: &'static str = "createEmptyCart";
    type Raw = Value;
    type Output = String;

    async fn fetch(&self, ctx: &RequestContext) -> Result<Value, AdapterError> {
        let params = ctx.params();
        ctx.load(
            Operation::CreateCart,
            json!({
                "currency": params.currency(),
                "customerId": params.customer_id(),
            }),
        )
        .await
    }

    fn transform(raw: &Value) -> Result<String, AdapterError> {
        shape::created_cart_id(raw)
    }
}

/// `applyCouponToCart(cart_id, coupon_code)`.
///
/// A cart at version 0 has never been written; no mutation is sent and the
/// result is `null`.
#[derive(Clone, Debug, Deserialize)]
pub struct ApplyCouponToCart {
    pub cart_id: String,
    pub coupon_code: String,
}

#[async_trait]
impl Action for ApplyCouponToCart {
    const NAME: &'static str = "applyCouponToCart";
    type Raw = Option<Value>;
    type Output = Option<CartOutput<CouponCart>>;

    async fn fetch(&self, ctx: &RequestContext) -> Result<Option<Value>, AdapterError> {
        let version = ctx.version(&self.cart_id).await?;
        if version == 0 {
            tracing::debug!(
                "Cart {} is at version 0, skipping coupon {}",
                self.cart_id,
                self.coupon_code
            );
            return Ok(None);
        }

        let cart = ctx
            .load(
                Operation::ApplyCoupon,
                json!({
                    "uid": self.cart_id,
                    "version": version,
                    "code": self.coupon_code,
                }),
            )
            .await?;
        Ok(Some(cart))
    }

    fn transform(raw: &Option<Value>) -> Result<Self::Output, AdapterError> {
        raw.as_ref().map(shape::applied_coupon).transpose()
    }
}

/// One entry of `shipping_methods`.
#[derive(Clone, Debug, Deserialize)]
pub struct ShippingMethodInput {
    pub carrier_code: String,
    /// Backend shipping method id.
    pub method_code: String,
}

/// `setShippingMethodsOnCart(cart_id, shipping_methods)`.
///
/// The backend carries a single shipping method; the first entry wins.
#[derive(Clone, Debug, Deserialize)]
pub struct SetShippingMethodsOnCart {
    pub cart_id: String,
    pub shipping_methods: Vec<ShippingMethodInput>,
}

#[async_trait]
impl Action for SetShippingMethodsOnCart {
    const NAME: &'static str = "setShippingMethodsOnCart";
    type Raw = Value;
    type Output = CartOutput<ShippingMethodsCart>;

    async fn fetch(&self, ctx: &RequestContext) -> Result<Value, AdapterError> {
        let method = self
            .shipping_methods
            .first()
            .ok_or_else(|| AdapterError::InvalidInput {
                message: "Required parameter \"shipping_methods\" is missing".to_string(),
            })?;

        let mut variables = serde_json::Map::new();
        variables.insert("shippingMethodId".to_string(), json!(method.method_code));
        variables.insert("locale".to_string(), json!(ctx.params().locale()));
        versioned(ctx, Operation::SetShippingMethod, &self.cart_id, variables).await
    }

    fn transform(raw: &Value) -> Result<Self::Output, AdapterError> {
        shape::shipping_methods(raw)
    }
}

/// `payment_method` argument.
#[derive(Clone, Debug, Deserialize)]
pub struct PaymentMethodInput {
    /// Backend payment id.
    pub code: String,
}

/// `setPaymentMethodOnCart(cart_id, payment_method)`.
#[derive(Clone, Debug, Deserialize)]
pub struct SetPaymentMethodOnCart {
    pub cart_id: String,
    pub payment_method: PaymentMethodInput,
}

#[async_trait]
impl Action for SetPaymentMethodOnCart {
    const NAME: &'static str = "setPaymentMethodOnCart";
    type Raw = Value;
    type Output = CartOutput<PaymentMethodCart>;

    async fn fetch(&self, ctx: &RequestContext) -> Result<Value, AdapterError> {
        let mut variables = serde_json::Map::new();
        variables.insert("paymentId".to_string(), json!(self.payment_method.code));
        variables.insert("locale".to_string(), json!(ctx.params().locale()));
        versioned(ctx, Operation::SetPaymentMethod, &self.cart_id, variables).await
    }

    fn transform(raw: &Value) -> Result<Self::Output, AdapterError> {
        shape::payment_method(raw)
    }
}

/// Storefront cart address input.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct CartAddressInput {
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub company: Option<String>,
    pub street: Vec<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub postcode: Option<String>,
    pub country_code: String,
    pub telephone: Option<String>,
}

/// `billing_address` argument.
#[derive(Clone, Debug, Deserialize)]
pub struct BillingAddressInput {
    pub address: CartAddressInput,
}

/// `setBillingAddressOnCart(cart_id, billing_address)`.
#[derive(Clone, Debug, Deserialize)]
pub struct SetBillingAddressOnCart {
    pub cart_id: String,
    pub billing_address: BillingAddressInput,
}

#[async_trait]
impl Action for SetBillingAddressOnCart {
    const NAME: &'static str = "setBillingAddressOnCart";
    type Raw = Value;
    type Output = CartOutput<BillingAddressCart>;

    async fn fetch(&self, ctx: &RequestContext) -> Result<Value, AdapterError> {
        let address = &self.billing_address.address;
        if address.country_code.is_empty() {
            return Err(AdapterError::InvalidInput {
                message: "Required parameter \"country_code\" is missing".to_string(),
            });
        }

        let mut variables = serde_json::Map::new();
        variables.insert("firstName".to_string(), json!(address.firstname));
        variables.insert("lastName".to_string(), json!(address.lastname));
        variables.insert("company".to_string(), json!(address.company));
        variables.insert("streetName".to_string(), json!(address.street.first()));
        variables.insert("city".to_string(), json!(address.city));
        variables.insert("region".to_string(), json!(address.region));
        variables.insert("postalCode".to_string(), json!(address.postcode));
        variables.insert("country".to_string(), json!(address.country_code));
        variables.insert("phone".to_string(), json!(address.telephone));
        versioned(ctx, Operation::SetBillingAddress, &self.cart_id, variables).await
    }

    fn transform(raw: &Value) -> Result<Self::Output, AdapterError> {
        shape::billing_address(raw)
    }
}

/// `placeOrder(cart_id)`.
#[derive(Clone, Debug, Deserialize)]
pub struct PlaceOrder {
    pub cart_id: String,
}

#[async_trait]
impl Action for PlaceOrder {
    const NAME: &'static str = "placeOrder";
    type Raw = Value;
    type Output = PlaceOrderOutput;

    async fn fetch(&self, ctx: &RequestContext) -> Result<Value, AdapterError> {
        versioned(ctx, Operation::PlaceOrder, &self.cart_id, serde_json::Map::new()).await
    }

    fn transform(raw: &Value) -> Result<PlaceOrderOutput, AdapterError> {
        shape::placed_order(raw)
    }
}
