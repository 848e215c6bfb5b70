//! Cart and order shaping.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AdapterError;
use crate::transform::{
    decode, money_or_zero, BackendAddress, BackendImage, BackendMoney, CodeLabel, Image, Money,
};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct BackendCart {
    id: String,
    customer_email: Option<String>,
    total_price: Option<BackendMoney>,
    taxed_price: Option<BackendTaxedPrice>,
    line_items: Vec<BackendLineItem>,
    shipping_address: Option<BackendAddress>,
    billing_address: Option<BackendAddress>,
    shipping_info: Option<BackendShippingInfo>,
    payment_info: Option<BackendPaymentInfo>,
    discount_codes: Vec<BackendDiscountCodeInfo>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct BackendTaxedPrice {
    total_net: Option<BackendMoney>,
    total_gross: Option<BackendMoney>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct BackendLineItem {
    id: String,
    quantity: u64,
    name: Option<String>,
    product_slug: Option<String>,
    variant: Option<BackendVariant>,
    price: Option<BackendPrice>,
    total_price: Option<BackendMoney>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BackendVariant {
    sku: Option<String>,
    images: Vec<BackendImage>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BackendPrice {
    value: Option<BackendMoney>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct BackendShippingInfo {
    shipping_method_name: Option<String>,
    shipping_method: Option<BackendShippingMethod>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct BackendShippingMethod {
    id: Option<String>,
    name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BackendPaymentInfo {
    payments: Vec<BackendPayment>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct BackendPayment {
    id: Option<String>,
    payment_method_info: Option<BackendPaymentMethodInfo>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct BackendPaymentMethodInfo {
    method: Option<String>,
    name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct BackendDiscountCodeInfo {
    discount_code: Option<BackendDiscountCode>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BackendDiscountCode {
    code: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct BackendOrder {
    id: String,
    order_number: Option<String>,
}

/// The storefront `Cart`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Cart {
    /// Cart id.
    pub id: String,
    /// Customer email, empty when not set.
    pub email: String,
    /// Billing address, `null` when not set.
    pub billing_address: Option<CartAddress>,
    /// Shipping addresses; the backend has at most one.
    pub shipping_addresses: Vec<ShippingCartAddress>,
    /// Line items.
    pub items: Vec<CartItem>,
    /// Payments attached to the cart.
    pub available_payment_methods: Vec<PaymentMethod>,
    /// The most recently attached payment.
    pub selected_payment_method: PaymentMethod,
    /// The most recently applied discount code.
    pub applied_coupon: Option<AppliedCoupon>,
    /// Cart totals.
    pub prices: CartPrices,
    /// Sum of line item quantities.
    pub total_quantity: u64,
}

/// A cart address.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CartAddress {
    pub firstname: String,
    pub lastname: String,
    pub company: String,
    pub street: Vec<String>,
    pub city: String,
    pub region: CodeLabel,
    pub postcode: String,
    pub telephone: String,
    pub country: CodeLabel,
}

impl From<&BackendAddress> for CartAddress {
    fn from(address: &BackendAddress) -> Self {
        Self {
            firstname: address.first_name.clone().unwrap_or_default(),
            lastname: address.last_name.clone().unwrap_or_default(),
            company: address.company.clone().unwrap_or_default(),
            street: address.street(),
            city: address.city.clone().unwrap_or_default(),
            region: CodeLabel::same(address.region_code()),
            postcode: address.postal_code.clone().unwrap_or_default(),
            telephone: address.phone.clone().unwrap_or_default(),
            country: CodeLabel::same(address.country.clone().unwrap_or_default()),
        }
    }
}

/// A cart shipping address with its shipping method.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ShippingCartAddress {
    #[serde(flatten)]
    pub address: CartAddress,
    pub selected_shipping_method: Option<SelectedShippingMethod>,
}

/// The shipping method chosen for an address.
///
/// The backend has no carriers: both codes are the shipping method id and
/// both titles its name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SelectedShippingMethod {
    pub carrier_code: String,
    pub carrier_title: String,
    pub error_message: String,
    pub method_code: String,
    pub method_title: String,
}

impl SelectedShippingMethod {
    fn from_backend(info: &BackendShippingInfo) -> Self {
        let method = info.shipping_method.as_ref();
        let id = method.and_then(|m| m.id.clone()).unwrap_or_default();
        let name = method
            .and_then(|m| m.name.clone())
            .or_else(|| info.shipping_method_name.clone())
            .unwrap_or_default();

        Self {
            carrier_code: id.clone(),
            carrier_title: name.clone(),
            error_message: String::new(),
            method_code: id,
            method_title: name,
        }
    }
}

/// A cart line.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CartItem {
    pub id: String,
    pub quantity: u64,
    pub product: CartItemProduct,
    pub prices: CartItemPrices,
}

/// Product summary of a cart line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CartItemProduct {
    pub sku: String,
    pub name: String,
    pub url_key: String,
    pub small_image: Image,
}

/// Prices of a cart line.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CartItemPrices {
    pub price: Money,
    pub row_total: Money,
}

/// `{ code, title }` of a payment method.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PaymentMethod {
    pub code: String,
    pub title: String,
}

impl From<&BackendPayment> for PaymentMethod {
    fn from(payment: &BackendPayment) -> Self {
        let info = payment.payment_method_info.as_ref();
        let code = info
            .and_then(|i| i.method.clone())
            .or_else(|| payment.id.clone())
            .unwrap_or_default();
        let title = info
            .and_then(|i| i.name.clone())
            .unwrap_or_else(|| code.clone());
        Self { code, title }
    }
}

/// `{ code }` of an applied coupon.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AppliedCoupon {
    pub code: String,
}

/// Cart totals.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CartPrices {
    pub grand_total: Money,
    pub subtotal_excluding_tax: Money,
    pub subtotal_including_tax: Money,
}

/// `{ cart: T }` wrapper used by the cart mutations.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CartOutput<T> {
    pub cart: T,
}

/// Cart view returned by `applyCouponToCart`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CouponCart {
    pub applied_coupon: AppliedCoupon,
}

/// Cart view returned by `setShippingMethodsOnCart`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ShippingMethodsCart {
    pub shipping_addresses: Vec<ShippingMethodAddress>,
}

/// Shipping address view returned by `setShippingMethodsOnCart`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ShippingMethodAddress {
    pub selected_shipping_method: SelectedShippingMethod,
}

/// Cart view returned by `setPaymentMethodOnCart`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PaymentMethodCart {
    pub selected_payment_method: PaymentMethod,
}

/// Cart view returned by `setBillingAddressOnCart`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BillingAddressCart {
    pub billing_address: CartAddress,
}

/// `{ order: { order_id } }` returned by `placeOrder`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PlaceOrderOutput {
    pub order: PlacedOrder,
}

/// The placed order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PlacedOrder {
    pub order_id: String,
}

fn first_coupon(cart: &BackendCart) -> Option<AppliedCoupon> {
    cart.discount_codes.first().map(|info| AppliedCoupon {
        code: info
            .discount_code
            .as_ref()
            .and_then(|discount| discount.code.clone())
            .unwrap_or_default(),
    })
}

fn last_payment(cart: &BackendCart) -> PaymentMethod {
    cart.payment_info
        .as_ref()
        .and_then(|info| info.payments.last())
        .map(PaymentMethod::from)
        .unwrap_or_default()
}

/// Shapes a backend cart into the storefront `Cart`.
///
/// # Errors
///
/// Returns [`AdapterError::Transform`] if `raw` is not a cart object.
pub fn cart(raw: &Value) -> Result<Cart, AdapterError> {
    let cart: BackendCart = decode("cart", raw)?;

    let currency = cart
        .total_price
        .as_ref()
        .map(|price| price.currency_code.clone())
        .unwrap_or_default();

    let items = cart
        .line_items
        .iter()
        .map(|item| {
            let variant = item.variant.as_ref();
            CartItem {
                id: item.id.clone(),
                quantity: item.quantity,
                product: CartItemProduct {
                    sku: variant.and_then(|v| v.sku.clone()).unwrap_or_default(),
                    name: item.name.clone().unwrap_or_default(),
                    url_key: item.product_slug.clone().unwrap_or_default(),
                    small_image: variant
                        .and_then(|v| v.images.first())
                        .map(Image::from)
                        .unwrap_or_default(),
                },
                prices: CartItemPrices {
                    price: money_or_zero(
                        item.price.as_ref().and_then(|p| p.value.as_ref()),
                        &currency,
                    ),
                    row_total: money_or_zero(item.total_price.as_ref(), &currency),
                },
            }
        })
        .collect();

    let shipping_addresses = cart
        .shipping_address
        .as_ref()
        .map(|address| ShippingCartAddress {
            address: CartAddress::from(address),
            selected_shipping_method: cart
                .shipping_info
                .as_ref()
                .map(SelectedShippingMethod::from_backend),
        })
        .into_iter()
        .collect();

    let grand_total = money_or_zero(cart.total_price.as_ref(), &currency);
    let taxed = cart.taxed_price.as_ref();
    let prices = CartPrices {
        subtotal_excluding_tax: taxed
            .and_then(|t| t.total_net.as_ref())
            .map_or_else(|| grand_total.clone(), Money::from),
        subtotal_including_tax: taxed
            .and_then(|t| t.total_gross.as_ref())
            .map_or_else(|| grand_total.clone(), Money::from),
        grand_total,
    };

    Ok(Cart {
        email: cart.customer_email.clone().unwrap_or_default(),
        billing_address: cart.billing_address.as_ref().map(CartAddress::from),
        shipping_addresses,
        items,
        available_payment_methods: cart
            .payment_info
            .as_ref()
            .map(|info| info.payments.iter().map(PaymentMethod::from).collect())
            .unwrap_or_default(),
        selected_payment_method: last_payment(&cart),
        applied_coupon: first_coupon(&cart),
        total_quantity: cart.line_items.iter().map(|item| item.quantity).sum(),
        prices,
        id: cart.id,
    })
}

/// Extracts the id of a newly created cart.
///
/// # Errors
///
/// Returns [`AdapterError::Transform`] if the cart has no string id.
pub fn created_cart_id(raw: &Value) -> Result<String, AdapterError> {
    raw.get("id")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .ok_or_else(|| AdapterError::Transform {
            operation: "createEmptyCart",
            message: format!("created cart has no id: {raw}"),
        })
}

/// Shapes the cart returned by the coupon mutation.
///
/// # Errors
///
/// Returns [`AdapterError::Transform`] if `raw` is not a cart object.
pub fn applied_coupon(raw: &Value) -> Result<CartOutput<CouponCart>, AdapterError> {
    let cart: BackendCart = decode("applyCouponToCart", raw)?;
    Ok(CartOutput {
        cart: CouponCart {
            applied_coupon: first_coupon(&cart).unwrap_or(AppliedCoupon {
                code: String::new(),
            }),
        },
    })
}

/// Shapes the cart returned by the shipping method mutation.
///
/// # Errors
///
/// Returns [`AdapterError::Transform`] if `raw` is not a cart object.
pub fn shipping_methods(raw: &Value) -> Result<CartOutput<ShippingMethodsCart>, AdapterError> {
    let cart: BackendCart = decode("setShippingMethodsOnCart", raw)?;
    let info = cart.shipping_info.unwrap_or_default();
    Ok(CartOutput {
        cart: ShippingMethodsCart {
            shipping_addresses: vec![ShippingMethodAddress {
                selected_shipping_method: SelectedShippingMethod::from_backend(&info),
            }],
        },
    })
}

/// Shapes the cart returned by the payment mutation.
///
/// # Errors
///
/// Returns [`AdapterError::Transform`] if `raw` is not a cart object.
pub fn payment_method(raw: &Value) -> Result<CartOutput<PaymentMethodCart>, AdapterError> {
    let cart: BackendCart = decode("setPaymentMethodOnCart", raw)?;
    Ok(CartOutput {
        cart: PaymentMethodCart {
            selected_payment_method: last_payment(&cart),
        },
    })
}

/// Shapes the cart returned by the billing address mutation.
///
/// # Errors
///
/// Returns [`AdapterError::Transform`] if `raw` is not a cart object.
pub fn billing_address(raw: &Value) -> Result<CartOutput<BillingAddressCart>, AdapterError> {
    let cart: BackendCart = decode("setBillingAddressOnCart", raw)?;
    Ok(CartOutput {
        cart: BillingAddressCart {
            billing_address: cart
                .billing_address
                .as_ref()
                .map(CartAddress::from)
                .unwrap_or_default(),
        },
    })
}

/// Shapes the order created from a cart.
///
/// `order_id` is the order number, or the order id when no number was assigned.
///
/// # Errors
///
/// Returns [`AdapterError::Transform`] if `raw` is not an order object.
pub fn placed_order(raw: &Value) -> Result<PlaceOrderOutput, AdapterError> {
    let order: BackendOrder = decode("placeOrder", raw)?;
    Ok(PlaceOrderOutput {
        order: PlacedOrder {
            order_id: order.order_number.unwrap_or(order.id),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn backend_cart() -> Value {
        json!({
            "id": "c1",
            "version": 7,
            "customerEmail": "jane@example.com",
            "totalPrice": {"centAmount": 4500, "currencyCode": "EUR", "fractionDigits": 2},
            "lineItems": [{
                "id": "li-1",
                "productId": "p-1",
                "quantity": 3,
                "name": "Mug",
                "productSlug": "mug",
                "variant": {"sku": "MUG-1", "images": [{"url": "https://img/mug.png", "label": "Mug"}]},
                "price": {"value": {"centAmount": 1500, "currencyCode": "EUR", "fractionDigits": 2}},
                "totalPrice": {"centAmount": 4500, "currencyCode": "EUR", "fractionDigits": 2}
            }],
            "shippingAddress": {"firstName": "Jane", "country": "DE", "streetName": "Main", "streetNumber": "1"},
            "billingAddress": null,
            "shippingInfo": {
                "shippingMethodName": "Standard",
                "shippingMethod": {"id": "sm-1", "key": "standard", "name": "Standard", "localizedDescription": "3-5 days"},
                "price": {"centAmount": 499, "currencyCode": "EUR", "fractionDigits": 2}
            },
            "paymentInfo": {"payments": [{"id": "pay-1", "paymentMethodInfo": {"method": "checkmo", "name": "Check / Money order"}}]},
            "discountCodes": [{"discountCode": {"code": "OLD"}}, {"discountCode": {"code": "SUMMER"}}]
        })
    }

    #[test]
    fn test_cart_field_mapping() {
        let cart = cart(&backend_cart()).unwrap();

        assert_eq!(cart.id, "c1");
        assert_eq!(cart.email, "jane@example.com");
        assert_eq!(cart.total_quantity, 3);
        assert_eq!(cart.items[0].product.sku, "MUG-1");
        assert_eq!(cart.items[0].product.small_image.url, "https://img/mug.png");
        assert!((cart.items[0].prices.price.value - 15.0).abs() < 1e-9);
        assert_eq!(cart.applied_coupon.as_ref().unwrap().code, "OLD");
        assert_eq!(cart.selected_payment_method.code, "checkmo");
        assert!(cart.billing_address.is_none());

        let shipping = &cart.shipping_addresses[0];
        assert_eq!(shipping.address.street, vec!["Main 1"]);
        let method = shipping.selected_shipping_method.as_ref().unwrap();
        assert_eq!(method.carrier_code, "sm-1");
        assert_eq!(method.method_code, "sm-1");
        assert_eq!(method.method_title, "Standard");
    }

    #[test]
    fn test_cart_serializes_storefront_names() {
        let value = serde_json::to_value(cart(&backend_cart()).unwrap()).unwrap();

        assert!(value.get("applied_coupon").is_some());
        assert!(value.get("shipping_addresses").is_some());
        assert_eq!(value["shipping_addresses"][0]["firstname"], json!("Jane"));
        assert_eq!(value["prices"]["grand_total"]["value"], json!(45.0));
        assert_eq!(value["billing_address"], Value::Null);
    }

    #[test]
    fn test_empty_cart_degrades_gracefully() {
        let cart = cart(&json!({"id": "c2"})).unwrap();

        assert_eq!(cart.email, "");
        assert!(cart.items.is_empty());
        assert!(cart.shipping_addresses.is_empty());
        assert!(cart.applied_coupon.is_none());
        assert_eq!(cart.selected_payment_method, PaymentMethod::default());
        assert!((cart.prices.grand_total.value).abs() < f64::EPSILON);
    }

    #[test]
    fn test_transform_is_idempotent() {
        let raw = backend_cart();
        assert_eq!(cart(&raw).unwrap(), cart(&raw).unwrap());
        assert_eq!(
            shipping_methods(&raw).unwrap(),
            shipping_methods(&raw).unwrap()
        );
    }

    #[test]
    fn test_applied_coupon_shape() {
        let output = applied_coupon(&backend_cart()).unwrap();
        assert_eq!(
            serde_json::to_value(output).unwrap(),
            json!({"cart": {"applied_coupon": {"code": "OLD"}}})
        );
    }

    #[test]
    fn test_applied_coupon_takes_first_code() {
        let raw = json!({"discountCodes": [
            {"discountCode": {"code": "FIRST"}},
            {"discountCode": {"code": "SECOND"}}
        ]});
        assert_eq!(applied_coupon(&raw).unwrap().cart.applied_coupon.code, "FIRST");

        let without_code = json!({"discountCodes": [
            {"discountCode": {"code": null}},
            {"discountCode": {"code": "SECOND"}}
        ]});
        assert_eq!(
            applied_coupon(&without_code).unwrap().cart.applied_coupon.code,
            ""
        );

        let empty = json!({"discountCodes": []});
        assert_eq!(applied_coupon(&empty).unwrap().cart.applied_coupon.code, "");
    }

    #[test]
    fn test_shipping_methods_shape() {
        let output = shipping_methods(&backend_cart()).unwrap();
        assert_eq!(
            serde_json::to_value(output).unwrap(),
            json!({"cart": {"shipping_addresses": [{"selected_shipping_method": {
                "carrier_code": "sm-1",
                "carrier_title": "Standard",
                "error_message": "",
                "method_code": "sm-1",
                "method_title": "Standard"
            }}]}})
        );
    }

    #[test]
    fn test_payment_method_shape() {
        let output = payment_method(&backend_cart()).unwrap();
        assert_eq!(
            serde_json::to_value(output).unwrap(),
            json!({"cart": {"selected_payment_method": {"code": "checkmo", "title": "Check / Money order"}}})
        );
    }

    #[test]
    fn test_billing_address_shape() {
        let raw = json!({
            "id": "c1",
            "billingAddress": {
                "firstName": "Jane",
                "lastName": "Doe",
                "company": "ACME",
                "streetName": "Main Street 1",
                "city": "Berlin",
                "region": "BE",
                "postalCode": "10115",
                "country": "DE",
                "phone": "+49 30 1234"
            }
        });
        let output = billing_address(&raw).unwrap();
        assert_eq!(
            serde_json::to_value(output).unwrap(),
            json!({"cart": {"billing_address": {
                "firstname": "Jane",
                "lastname": "Doe",
                "company": "ACME",
                "street": ["Main Street 1"],
                "city": "Berlin",
                "region": {"code": "BE", "label": "BE"},
                "postcode": "10115",
                "telephone": "+49 30 1234",
                "country": {"code": "DE", "label": "DE"}
            }}})
        );
    }

    #[test]
    fn test_placed_order_falls_back_to_id() {
        let output = placed_order(&json!({"id": "o-1", "orderNumber": null})).unwrap();
        assert_eq!(output.order.order_id, "o-1");
    }

    #[test]
    fn test_created_cart_id() {
        assert_eq!(created_cart_id(&json!({"id": "c9", "version": 1})).unwrap(), "c9");
        assert!(matches!(
            created_cart_id(&json!({"version": 1})),
            Err(AdapterError::Transform { .. })
        ));
    }

    #[test]
    fn test_non_object_cart_is_transform_error() {
        assert!(matches!(
            cart(&json!("not a cart")),
            Err(AdapterError::Transform { .. })
        ));
    }
}
