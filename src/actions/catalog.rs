//! Catalog actions.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::actions::Action;
use crate::context::RequestContext;
use crate::error::AdapterError;
use crate::queries::Operation;
use crate::transform::catalog::{self as shape, Products as ProductsOutput};

/// Page size used when the storefront does not ask for one.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// `products(search | filter.sku, pageSize, currentPage)`.
///
/// An explicit SKU list takes precedence over the search term. With
/// neither, the first page of the whole catalog is listed.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Products {
    /// Product name to search for in the configured locale.
    pub search: Option<String>,
    /// SKUs to list.
    pub skus: Option<Vec<String>>,
    #[serde(rename = "pageSize")]
    pub page_size: Option<u32>,
    /// 1-based page number.
    #[serde(rename = "currentPage")]
    pub current_page: Option<u32>,
}

/// Product page plus the currency prices were selected in.
#[derive(Clone, Debug)]
pub struct ProductsRaw {
    pub page: Value,
    pub currency: String,
}

impl Products {
    fn variables(&self, locale: &str, currency: &str) -> Value {
        let limit = self.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
        let offset = self
            .current_page
            .unwrap_or(1)
            .saturating_sub(1)
            .saturating_mul(limit);

        let skus = self.skus.as_ref().filter(|skus| !skus.is_empty());
        let where_query = if skus.is_some() {
            None
        } else {
            self.search
                .as_deref()
                .map(str::trim)
                .filter(|term| !term.is_empty())
                .map(|term| name_predicate(locale, term))
        };

        json!({
            "skus": skus,
            "whereQuery": where_query,
            "limit": limit,
            "offset": offset,
            "locale": locale,
            "currency": currency,
        })
    }
}

/// Builds `masterData(current(name(<locale> = "<term>")))`.
fn name_predicate(locale: &str, term: &str) -> String {
    let escaped = term.replace('\\', "\\\\").replace('"', "\\\"");
    format!(r#"masterData(current(name({locale} = "{escaped}")))"#)
}

#[async_trait]
impl Action for Products {
    const NAME: &'static str = "products";
    type Raw = ProductsRaw;
    type Output = ProductsOutput;

    async fn fetch(&self, ctx: &RequestContext) -> Result<ProductsRaw, AdapterError> {
        let params = ctx.params();
        let page = ctx
            .load(
                Operation::Products,
                self.variables(params.locale(), params.currency()),
            )
            .await?;
        Ok(ProductsRaw {
            page,
            currency: params.currency().to_string(),
        })
    }

    fn transform(raw: &ProductsRaw) -> Result<ProductsOutput, AdapterError> {
        shape::products(&raw.page, &raw.currency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variables_for_skus() {
        let action = Products {
            skus: Some(vec!["MUG-1".to_string(), "CUP-2".to_string()]),
            search: Some("ignored".to_string()),
            ..Products::default()
        };

        let variables = action.variables("en", "EUR");

        assert_eq!(variables["skus"], json!(["MUG-1", "CUP-2"]));
        assert_eq!(variables["whereQuery"], Value::Null);
        assert_eq!(variables["limit"], json!(20));
        assert_eq!(variables["offset"], json!(0));
    }

    #[test]
    fn test_variables_for_search_and_paging() {
        let action = Products {
            search: Some(" Mug ".to_string()),
            page_size: Some(10),
            current_page: Some(3),
            ..Products::default()
        };

        let variables = action.variables("de", "EUR");

        assert_eq!(variables["skus"], Value::Null);
        assert_eq!(
            variables["whereQuery"],
            json!(r#"masterData(current(name(de = "Mug")))"#)
        );
        assert_eq!(variables["offset"], json!(20));
        assert_eq!(variables["locale"], json!("de"));
    }

    #[test]
    fn test_name_predicate_escapes_quotes() {
        assert_eq!(
            name_predicate("en", r#"12" pizza"#),
            r#"masterData(current(name(en = "12\" pizza")))"#
        );
    }

    #[test]
    fn test_current_page_zero_is_first_page() {
        let action = Products {
            current_page: Some(0),
            ..Products::default()
        };
        assert_eq!(action.variables("en", "EUR")["offset"], json!(0));
    }
}
