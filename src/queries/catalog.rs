//! Catalog documents.

/// Product listing by SKU list or `where` predicate.
pub const PRODUCTS_QUERY: &str = r#"
query Products(
  $whereQuery: String
  $skus: [String!]
  $limit: Int
  $offset: Int
  $locale: Locale!
  $currency: Currency!
) {
  products(where: $whereQuery, skus: $skus, limit: $limit, offset: $offset) {
    total
    results {
      id
      key
      masterData {
        current {
          name(locale: $locale)
          slug(locale: $locale)
          masterVariant {
            sku
            images {
              url
              label
            }
            price(currency: $currency) {
              value {
                centAmount
                currencyCode
                fractionDigits
              }
            }
          }
        }
      }
    }
  }
}
"#;
