//! Backend-to-storefront response shaping.
//!
//! Every function here is pure: it reads a backend value and builds the
//! storefront object graph, whose serialized field names are the storefront
//! schema names (`applied_coupon`, `shipping_addresses`, `order_id`, ...).
//! Optional backend substructures degrade to empty strings, empty lists or
//! zero amounts; only a value of the wrong JSON type is a
//! [`AdapterError::Transform`].
//!
//! ```rust
//! use commerce_bridge::transform::cart::placed_order;
//! use serde_json::json;
//!
//! let order = placed_order(&json!({"id": "o-1", "orderNumber": "100042"})).unwrap();
//! assert_eq!(
//!     serde_json::to_value(&order).unwrap(),
//!     json!({"order": {"order_id": "100042"}})
//! );
//! ```

pub mod cart;
pub mod catalog;
pub mod customer;

use serde::{Deserialize, Serialize};

use crate::error::AdapterError;

/// Decodes a backend value into its typed form.
pub(crate) fn decode<'a, T>(operation: &'static str, raw: &'a serde_json::Value) -> Result<T, AdapterError>
where
    T: Deserialize<'a>,
{
    T::deserialize(raw).map_err(|e| AdapterError::Transform {
        operation,
        message: e.to_string(),
    })
}

/// Backend money amount in minor units.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct BackendMoney {
    pub cent_amount: i64,
    pub currency_code: String,
    pub fraction_digits: Option<u32>,
}

/// Backend image.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct BackendImage {
    pub url: Option<String>,
    pub label: Option<String>,
}

/// Backend postal address.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct BackendAddress {
    pub id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company: Option<String>,
    pub street_name: Option<String>,
    pub street_number: Option<String>,
    pub additional_street_info: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub phone: Option<String>,
}

impl BackendAddress {
    /// Street lines: `"<name> <number>"` followed by the additional info.
    pub(crate) fn street(&self) -> Vec<String> {
        let first = [self.street_name.as_deref(), self.street_number.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        std::iter::once(first)
            .chain(self.additional_street_info.clone())
            .filter(|line| !line.is_empty())
            .collect()
    }

    /// Region code, preferring `region` over `state`.
    pub(crate) fn region_code(&self) -> String {
        self.region
            .clone()
            .or_else(|| self.state.clone())
            .unwrap_or_default()
    }
}

/// A storefront money amount.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Money {
    /// Amount in major units.
    pub value: f64,
    /// ISO 4217 currency code.
    pub currency: String,
}

impl Money {
    /// A zero amount in `currency`.
    #[must_use]
    pub fn zero(currency: impl Into<String>) -> Self {
        Self {
            value: 0.0,
            currency: currency.into(),
        }
    }
}

impl From<&BackendMoney> for Money {
    fn from(money: &BackendMoney) -> Self {
        let digits = money.fraction_digits.unwrap_or(2);
        #[allow(clippy::cast_precision_loss)]
        let value = money.cent_amount as f64 / 10_f64.powi(i32::try_from(digits).unwrap_or(2));
        Self {
            value,
            currency: money.currency_code.clone(),
        }
    }
}

/// Converts an optional backend amount, degrading to zero.
pub(crate) fn money_or_zero(money: Option<&BackendMoney>, currency: &str) -> Money {
    money.map_or_else(|| Money::zero(currency), Money::from)
}

/// A storefront image.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Image {
    /// Image URL.
    pub url: String,
    /// Alt text.
    pub label: String,
}

impl From<&BackendImage> for Image {
    fn from(image: &BackendImage) -> Self {
        Self {
            url: image.url.clone().unwrap_or_default(),
            label: image.label.clone().unwrap_or_default(),
        }
    }
}

/// `{ code, label }` pair used for regions and countries.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CodeLabel {
    /// Machine code.
    pub code: String,
    /// Display label.
    pub label: String,
}

impl CodeLabel {
    fn same(value: String) -> Self {
        Self {
            code: value.clone(),
            label: value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_money_uses_fraction_digits() {
        let money = BackendMoney {
            cent_amount: 12_345,
            currency_code: "EUR".to_string(),
            fraction_digits: Some(2),
        };
        assert_eq!(
            Money::from(&money),
            Money {
                value: 123.45,
                currency: "EUR".to_string()
            }
        );

        let yen = BackendMoney {
            cent_amount: 500,
            currency_code: "JPY".to_string(),
            fraction_digits: Some(0),
        };
        assert!((Money::from(&yen).value - 500.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_money_defaults_to_two_digits() {
        let money: BackendMoney =
            decode("test", &json!({"centAmount": 999, "currencyCode": "USD"})).unwrap();
        assert!((Money::from(&money).value - 9.99).abs() < 1e-9);
    }

    #[test]
    fn test_street_lines() {
        let address: BackendAddress = decode(
            "test",
            &json!({
                "streetName": "Main Street",
                "streetNumber": "12",
                "additionalStreetInfo": "Floor 3"
            }),
        )
        .unwrap();
        assert_eq!(address.street(), vec!["Main Street 12", "Floor 3"]);

        assert!(BackendAddress::default().street().is_empty());
    }

    #[test]
    fn test_decode_wrong_type_is_transform_error() {
        let error = decode::<BackendMoney>("Cart", &json!({"centAmount": "lots"})).unwrap_err();
        assert!(matches!(error, AdapterError::Transform { operation: "Cart", .. }));
    }
}
