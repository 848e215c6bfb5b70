//! Product listing shaping.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AdapterError;
use crate::transform::{decode, money_or_zero, BackendImage, BackendMoney, Image, Money};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BackendProducts {
    total: u64,
    results: Vec<BackendProduct>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct BackendProduct {
    id: String,
    master_data: Option<BackendMasterData>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BackendMasterData {
    current: Option<BackendProductData>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct BackendProductData {
    name: Option<String>,
    slug: Option<String>,
    master_variant: Option<BackendVariant>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BackendVariant {
    sku: Option<String>,
    images: Vec<BackendImage>,
    price: Option<BackendPrice>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BackendPrice {
    value: Option<BackendMoney>,
}

/// The storefront `Products` result.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Products {
    /// Number of matching products across all pages.
    pub total_count: u64,
    /// Products on this page.
    pub items: Vec<ProductItem>,
}

/// One product of a listing.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProductItem {
    pub id: String,
    pub sku: String,
    pub name: String,
    pub url_key: String,
    pub price: ProductPrices,
    pub small_image: Image,
}

/// `{ regularPrice: { amount } }`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProductPrices {
    #[serde(rename = "regularPrice")]
    pub regular_price: RegularPrice,
}

/// `{ amount: { value, currency } }`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RegularPrice {
    pub amount: Money,
}

/// Shapes a backend product page.
///
/// Products without a price get a zero amount in `currency`.
///
/// # Errors
///
/// Returns [`AdapterError::Transform`] if `raw` is not a product page.
pub fn products(raw: &Value, currency: &str) -> Result<Products, AdapterError> {
    let page: BackendProducts = decode("products", raw)?;

    let items = page
        .results
        .into_iter()
        .map(|product| {
            let data = product
                .master_data
                .and_then(|master| master.current)
                .unwrap_or_default();
            let variant = data.master_variant.unwrap_or_default();
            ProductItem {
                id: product.id,
                sku: variant.sku.unwrap_or_default(),
                name: data.name.unwrap_or_default(),
                url_key: data.slug.unwrap_or_default(),
                price: ProductPrices {
                    regular_price: RegularPrice {
                        amount: money_or_zero(
                            variant.price.as_ref().and_then(|p| p.value.as_ref()),
                            currency,
                        ),
                    },
                },
                small_image: variant.images.first().map(Image::from).unwrap_or_default(),
            }
        })
        .collect();

    Ok(Products {
        total_count: page.total,
        items,
    })
}
