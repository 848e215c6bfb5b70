//! Customer documents.

/// Customer profile with addresses.
pub const CUSTOMER_QUERY: &str = r#"
query Customer($id: String!) {
  customer(id: $id) {
    id
    version
    email
    firstName
    lastName
    defaultShippingAddressId
    defaultBillingAddressId
    addresses {
      id
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

/// Id of the customer the request's bearer was issued to.
pub const CUSTOMER_ID_QUERY: &str = r#"
query CustomerId {
  me {
    customer {
      id
    }
  }
}
"#;
