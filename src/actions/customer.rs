//! Customer actions.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::actions::Action;
use crate::auth::oauth::exchange_customer_password;
use crate::auth::BearerToken;
use crate::context::RequestContext;
use crate::error::AdapterError;
use crate::queries::Operation;
use crate::transform::customer::{self as shape, Customer, CustomerToken};

/// Message returned when no customer is attached to the request.
const UNAUTHORIZED_CUSTOMER: &str = "The current customer isn't authorized.";

/// `generateCustomerToken(email, password)`.
///
/// Runs the password grant on the customer OAuth path, then looks up the
/// customer the issued token belongs to. The token is returned to the
/// storefront and never cached.
#[derive(Clone, Deserialize)]
pub struct GenerateCustomerToken {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for GenerateCustomerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerateCustomerToken")
            .field("email", &self.email)
            .field("password", &"*****")
            .finish()
    }
}

/// Issued customer token and the `me` lookup made with it.
#[derive(Clone, Debug)]
pub struct CustomerSession {
    pub token: BearerToken,
    pub me: Value,
}

#[async_trait]
impl Action for GenerateCustomerToken {
    const NAME: &'static str = "generateCustomerToken";
    type Raw = CustomerSession;
    type Output = CustomerToken;

    async fn fetch(&self, ctx: &RequestContext) -> Result<CustomerSession, AdapterError> {
        let token = exchange_customer_password(ctx.params(), &self.email, &self.password)
            .await
            .map_err(|e| {
                tracing::warn!("Customer token request failed: {}", e);
                AdapterError::from(e)
            })?;

        let me = ctx
            .backend()
            .execute_as(&token, Operation::CustomerId, json!({}))
            .await?;
        Ok(CustomerSession { token, me })
    }

    fn transform(raw: &CustomerSession) -> Result<CustomerToken, AdapterError> {
        shape::customer_token(raw.token.as_str(), &raw.me)
    }
}

/// `customer`, for the customer id configured on the request.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct CustomerQuery {}

#[async_trait]
impl Action for CustomerQuery {
    const NAME: &'static str = "customer";
    type Raw = Value;
    type Output = Customer;

    async fn fetch(&self, ctx: &RequestContext) -> Result<Value, AdapterError> {
        let customer_id = ctx
            .params()
            .customer_id()
            .ok_or_else(|| AdapterError::Authentication {
                status: None,
                message: UNAUTHORIZED_CUSTOMER.to_string(),
            })?;

        let customer = ctx
            .load(Operation::Customer, json!({ "id": customer_id }))
            .await?;
        if customer.is_null() {
            return Err(AdapterError::NotFound {
                message: format!("The Customer with ID '{customer_id}' was not found."),
            });
        }
        Ok(customer)
    }

    fn transform(raw: &Value) -> Result<Customer, AdapterError> {
        shape::customer(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::CredentialProvider;
    use crate::config::{ActionParameters, ApiHost, ProjectKey};
    use std::sync::Arc;

    #[test]
    fn test_debug_masks_password() {
        let action = GenerateCustomerToken {
            email: "jane@example.com".to_string(),
            password: "hunter2".to_string(),
        };
        let debug = format!("{action:?}");
        assert!(debug.contains("jane@example.com"));
        assert!(!debug.contains("hunter2"));
    }

    #[tokio::test]
    async fn test_customer_without_customer_id_is_unauthorized() {
        let params = ActionParameters::builder()
            .api_host(ApiHost::new("api.example.com").unwrap())
            .project_key(ProjectKey::new("demo").unwrap())
            .bearer("token")
            .build()
            .unwrap();
        let ctx = RequestContext::new(params, Arc::new(CredentialProvider::new()));

        let error = CustomerQuery {}.execute(&ctx).await.unwrap_err();

        assert_eq!(error.operation, "customer");
        assert_eq!(error.message(), "The current customer isn't authorized.");
    }

    #[test]
    fn test_token_transform() {
        let session = CustomerSession {
            token: BearerToken::new("abc"),
            me: serde_json::json!({"customer": {"id": "cust-1"}}),
        };
        let output = GenerateCustomerToken::transform(&session).unwrap();
        assert_eq!(output.token, "abc");
        assert_eq!(output.customer_id, "cust-1");
    }
}
