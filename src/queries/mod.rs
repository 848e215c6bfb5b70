//! Backend GraphQL documents.
//!
//! One fixed, parameterized document per backend operation. The
//! [`Operation`] enum names them and knows the root field each document
//! selects, so loaders can pull their value out of the response `data`.
//!
//! ```rust
//! use commerce_bridge::queries::Operation;
//!
//! assert_eq!(Operation::CartVersion.root_field(), "cart");
//! assert!(Operation::ApplyCoupon.document().contains("addDiscountCode"));
//! assert!(Operation::ApplyCoupon.is_mutation());
//! ```

pub mod cart;
pub mod catalog;
pub mod customer;

pub use cart::{
    APPLY_COUPON_MUTATION, CREATE_CART_MUTATION, GET_CART_QUERY, PLACE_ORDER_MUTATION,
    SET_BILLING_ADDRESS_MUTATION, SET_PAYMENT_METHOD_MUTATION, SET_SHIPPING_METHOD_MUTATION,
    VERSION_CART_QUERY,
};
pub use catalog::PRODUCTS_QUERY;
pub use customer::{CUSTOMER_ID_QUERY, CUSTOMER_QUERY};

use std::fmt;

/// A backend operation: one document plus the root field it selects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Cart version lookup.
    CartVersion,
    /// Full cart read.
    Cart,
    /// Empty cart creation.
    CreateCart,
    /// Discount code on a cart.
    ApplyCoupon,
    /// Shipping method on a cart.
    SetShippingMethod,
    /// Payment on a cart.
    SetPaymentMethod,
    /// Billing address on a cart.
    SetBillingAddress,
    /// Order from a cart.
    PlaceOrder,
    /// Product listing.
    Products,
    /// Customer profile.
    Customer,
    /// Customer behind a customer-scoped bearer.
    CustomerId,
}

impl Operation {
    /// Returns the document text.
    #[must_use]
    pub const fn document(self) -> &'static str {
        match self {
            Self::CartVersion => VERSION_CART_QUERY,
            Self::Cart => GET_CART_QUERY,
            Self::CreateCart => CREATE_CART_MUTATION,
            Self::ApplyCoupon => APPLY_COUPON_MUTATION,
            Self::SetShippingMethod => SET_SHIPPING_METHOD_MUTATION,
            Self::SetPaymentMethod => SET_PAYMENT_METHOD_MUTATION,
            Self::SetBillingAddress => SET_BILLING_ADDRESS_MUTATION,
            Self::PlaceOrder => PLACE_ORDER_MUTATION,
            Self::Products => PRODUCTS_QUERY,
            Self::Customer => CUSTOMER_QUERY,
            Self::CustomerId => CUSTOMER_ID_QUERY,
        }
    }

    /// Returns the root field of the response `data` the document selects.
    #[must_use]
    pub const fn root_field(self) -> &'static str {
        match self {
            Self::CartVersion | Self::Cart => "cart",
            Self::CreateCart => "createCart",
            Self::ApplyCoupon
            | Self::SetShippingMethod
            | Self::SetPaymentMethod
            | Self::SetBillingAddress => "updateCart",
            Self::PlaceOrder => "createOrderFromCart",
            Self::Products => "products",
            Self::Customer => "customer",
            Self::CustomerId => "me",
        }
    }

    /// Returns the operation name used in logs and error tags.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::CartVersion => "CartVersion",
            Self::Cart => "Cart",
            Self::CreateCart => "CreateCart",
            Self::ApplyCoupon => "ApplyCoupon",
            Self::SetShippingMethod => "SetShippingMethod",
            Self::SetPaymentMethod => "SetPaymentMethod",
            Self::SetBillingAddress => "SetBillingAddress",
            Self::PlaceOrder => "PlaceOrder",
            Self::Products => "Products",
            Self::Customer => "Customer",
            Self::CustomerId => "CustomerId",
        }
    }

    /// Returns `true` when the document is a mutation.
    #[must_use]
    pub const fn is_mutation(self) -> bool {
        matches!(
            self,
            Self::CreateCart
                | Self::ApplyCoupon
                | Self::SetShippingMethod
                | Self::SetPaymentMethod
                | Self::SetBillingAddress
                | Self::PlaceOrder
        )
    }

    /// Returns `true` when the document needs a freshly fetched `$version`.
    #[must_use]
    pub const fn is_version_gated(self) -> bool {
        self.is_mutation() && !matches!(self, Self::CreateCart)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Operation; 11] = [
        Operation::CartVersion,
        Operation::Cart,
        Operation::CreateCart,
        Operation::ApplyCoupon,
        Operation::SetShippingMethod,
        Operation::SetPaymentMethod,
        Operation::SetBillingAddress,
        Operation::PlaceOrder,
        Operation::Products,
        Operation::Customer,
        Operation::CustomerId,
    ];

    #[test]
    fn test_every_document_selects_its_root_field() {
        for op in ALL {
            let document = op.document();
            assert!(
                document.contains(&format!("{}(", op.root_field()))
                    || document.contains(&format!("{} {{", op.root_field())),
                "{op} does not select {}",
                op.root_field()
            );
        }
    }

    #[test]
    fn test_mutations_start_with_mutation_keyword() {
        for op in ALL {
            let starts_with_mutation = op.document().trim_start().starts_with("mutation");
            assert_eq!(starts_with_mutation, op.is_mutation(), "{op}");
        }
    }

    #[test]
    fn test_version_gated_documents_declare_version() {
        for op in ALL.into_iter().filter(|op| op.is_version_gated()) {
            assert!(op.document().contains("$version: Long!"), "{op}");
        }
        assert!(!Operation::CreateCart.is_version_gated());
        assert!(!Operation::Cart.is_version_gated());
    }

    #[test]
    fn test_version_query_only_selects_version() {
        assert!(VERSION_CART_QUERY.contains("version"));
        assert!(!VERSION_CART_QUERY.contains("lineItems"));
    }
}
