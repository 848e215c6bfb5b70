//! Cart and order documents.

/// Current optimistic-concurrency version of a cart.
pub const VERSION_CART_QUERY: &str = r#"
query CartVersion($uid: String!) {
  cart(id: $uid) {
    id
    version
  }
}
"#;

/// Full cart for the storefront `cart` query.
pub const GET_CART_QUERY: &str = r#"
query Cart($uid: String!, $locale: Locale!) {
  cart(id: $uid) {
    id
    version
    customerEmail
    totalPrice {
      centAmount
      currencyCode
      fractionDigits
    }
    taxedPrice {
      totalNet { centAmount currencyCode fractionDigits }
      totalGross { centAmount currencyCode fractionDigits }
    }
    lineItems {
      id
      productId
      quantity
      name(locale: $locale)
      productSlug(locale: $locale)
      variant {
        sku
        images { url label }
      }
      price {
        value { centAmount currencyCode fractionDigits }
      }
      totalPrice { centAmount currencyCode fractionDigits }
    }
    shippingAddress {
      ...AddressFields
    }
    billingAddress {
      ...AddressFields
    }
    shippingInfo {
      shippingMethodName
      shippingMethod {
        id
        key
        name
        localizedDescription(locale: $locale)
      }
      price { centAmount currencyCode fractionDigits }
    }
    paymentInfo {
      payments {
        id
        paymentMethodInfo {
          method
          paymentInterface
          name(locale: $locale)
        }
      }
    }
    discountCodes {
      discountCode {
        code
      }
    }
  }
}

fragment AddressFields on Address {
  firstName
  lastName
  company
  streetName
  streetNumber
  additionalStreetInfo
  city
  region
  state
  postalCode
  country
  phone
}
"#;

/// Creates an empty cart.
pub const CREATE_CART_MUTATION: &str = r#"
mutation CreateCart($currency: Currency!, $customerId: String) {
  createCart(draft: { currency: $currency, customerId: $customerId }) {
    id
    version
  }
}
"#;

/// Adds a discount code to a cart.
pub const APPLY_COUPON_MUTATION: &str = r#"
mutation ApplyCoupon($uid: String!, $version: Long!, $code: String!) {
  updateCart(
    id: $uid
    version: $version
    actions: [{ addDiscountCode: { code: $code } }]
  ) {
    id
    version
    discountCodes {
      discountCode {
        code
      }
    }
  }
}
"#;

/// Selects the shipping method of a cart.
pub const SET_SHIPPING_METHOD_MUTATION: &str = r#"
mutation SetShippingMethod($uid: String!, $version: Long!, $shippingMethodId: String!, $locale: Locale!) {
  updateCart(
    id: $uid
    version: $version
    actions: [
      { setShippingMethod: { shippingMethod: { typeId: "shipping-method", id: $shippingMethodId } } }
    ]
  ) {
    id
    version
    shippingInfo {
      shippingMethodName
      shippingMethod {
        id
        key
        name
        localizedDescription(locale: $locale)
      }
    }
  }
}
"#;

/// Attaches a payment to a cart.
pub const SET_PAYMENT_METHOD_MUTATION: &str = r#"
mutation SetPaymentMethod($uid: String!, $version: Long!, $paymentId: String!, $locale: Locale!) {
  updateCart(
    id: $uid
    version: $version
    actions: [{ addPayment: { payment: { typeId: "payment", id: $paymentId } } }]
  ) {
    id
    version
    paymentInfo {
      payments {
        id
        paymentMethodInfo {
          method
          name(locale: $locale)
        }
      }
    }
  }
}
"#;

/// Sets the billing address of a cart.
pub const SET_BILLING_ADDRESS_MUTATION: &str = r#"
mutation SetBillingAddress(
  $uid: String!
  $version: Long!
  $firstName: String
  $lastName: String
  $company: String
  $streetName: String
  $city: String
  $region: String
  $postalCode: String
  $country: Country!
  $phone: String
) {
  updateCart(
    id: $uid
    version: $version
    actions: [
      {
        setBillingAddress: {
          address: {
            firstName: $firstName
            lastName: $lastName
            company: $company
            streetName: $streetName
            city: $city
            region: $region
            postalCode: $postalCode
            country: $country
            phone: $phone
          }
        }
      }
    ]
  ) {
    id
    version
    billingAddress {
      firstName
      lastName
      company
      streetName
      streetNumber
      additionalStreetInfo
      city
      region
      state
      postalCode
      country
      phone
    }
  }
}
"#;

/// Turns a cart into an order.
pub const PLACE_ORDER_MUTATION: &str = r#"
mutation PlaceOrder($uid: String!, $version: Long!) {
  createOrderFromCart(draft: { id: $uid, version: $version }) {
    id
    orderNumber
    version
  }
}
"#;
