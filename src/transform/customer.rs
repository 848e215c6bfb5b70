//! Customer shaping.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AdapterError;
use crate::transform::{decode, BackendAddress};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct BackendCustomer {
    id: String,
    email: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    default_shipping_address_id: Option<String>,
    default_billing_address_id: Option<String>,
    addresses: Vec<BackendAddress>,
}

/// The storefront `Customer`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Customer {
    pub id: String,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    /// Storefront id of the default shipping address.
    pub default_shipping: Option<String>,
    /// Storefront id of the default billing address.
    pub default_billing: Option<String>,
    pub addresses: Vec<CustomerAddress>,
}

/// A customer address.
///
/// Storefront address ids are positions in the backend address list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CustomerAddress {
    pub id: usize,
    pub firstname: String,
    pub lastname: String,
    pub company: String,
    pub street: Vec<String>,
    pub city: String,
    pub region: CustomerAddressRegion,
    pub postcode: String,
    pub country_code: String,
    pub telephone: String,
    pub default_shipping: bool,
    pub default_billing: bool,
}

/// `{ region_code, region }`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CustomerAddressRegion {
    pub region_code: String,
    pub region: String,
}

/// `{ token, customer_id }` returned by `generateCustomerToken`.
///
/// `customer_id` is what later requests pass as the `customerId` setting.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CustomerToken {
    pub token: String,
    pub customer_id: String,
}

/// Shapes a backend customer.
///
/// # Errors
///
/// Returns [`AdapterError::Transform`] if `raw` is not a customer object.
pub fn customer(raw: &Value) -> Result<Customer, AdapterError> {
    let customer: BackendCustomer = decode("customer", raw)?;

    let is_default = |address: &BackendAddress, default: &Option<String>| {
        address.id.is_some() && address.id == *default
    };

    let addresses: Vec<CustomerAddress> = customer
        .addresses
        .iter()
        .enumerate()
        .map(|(index, address)| {
            let region = address.region_code();
            CustomerAddress {
                id: index,
                firstname: address.first_name.clone().unwrap_or_default(),
                lastname: address.last_name.clone().unwrap_or_default(),
                company: address.company.clone().unwrap_or_default(),
                street: address.street(),
                city: address.city.clone().unwrap_or_default(),
                region: CustomerAddressRegion {
                    region_code: region.clone(),
                    region,
                },
                postcode: address.postal_code.clone().unwrap_or_default(),
                country_code: address.country.clone().unwrap_or_default(),
                telephone: address.phone.clone().unwrap_or_default(),
                default_shipping: is_default(address, &customer.default_shipping_address_id),
                default_billing: is_default(address, &customer.default_billing_address_id),
            }
        })
        .collect();

    let default_shipping = addresses
        .iter()
        .find(|address| address.default_shipping)
        .map(|address| address.id.to_string());
    let default_billing = addresses
        .iter()
        .find(|address| address.default_billing)
        .map(|address| address.id.to_string());

    Ok(Customer {
        default_shipping,
        default_billing,
        id: customer.id,
        firstname: customer.first_name.unwrap_or_default(),
        lastname: customer.last_name.unwrap_or_default(),
        email: customer.email.unwrap_or_default(),
        addresses,
    })
}

/// Pairs an issued customer access token with the customer it belongs to.
///
/// `me` is the `me` root field of the customer id lookup.
///
/// # Errors
///
/// Returns [`AdapterError::Transform`] if `me` carries no customer id.
pub fn customer_token(token: &str, me: &Value) -> Result<CustomerToken, AdapterError> {
    let customer_id = me
        .pointer("/customer/id")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AdapterError::Transform {
            operation: "generateCustomerToken",
            message: format!("token owner has no customer id: {me}"),
        })?;
    Ok(CustomerToken {
        token: token.to_string(),
        customer_id: customer_id.to_string(),
    })
}
