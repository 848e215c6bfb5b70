//! OAuth 2.0 token grants against the backend auth host.
//!
//! Both grants post a form body to `{protocol}://{auth_host}{path}` and
//! authenticate the client with HTTP basic auth:
//!
//! - client credentials: `grant_type=client_credentials&scope=<scope>`
//! - customer password: `grant_type=password&username=..&password=..&scope=<scope>`
//!
//! The response is `{ access_token, expires_in?, scope? }`.
//!
//! # Example
//!
//! ```rust,ignore
//! use commerce_bridge::auth::oauth::exchange_client_credentials;
//!
//! let token = exchange_client_credentials(&params).await?;
//! println!("expires at {:?}", token.expires());
//! ```

use serde::Serialize;

use crate::auth::oauth::AuthError;
use crate::auth::{BearerToken, TokenResponse};
use crate::config::ActionParameters;

const CLIENT_CREDENTIALS_GRANT_TYPE: &str = "client_credentials";
const PASSWORD_GRANT_TYPE: &str = "password";

/// Form body of a token request.
#[derive(Debug, Serialize)]
struct TokenRequest<'a> {
    grant_type: &'a str,
    scope: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    username: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    password: Option<&'a str>,
}

/// Exchanges the configured client credentials for an access token.
///
/// The result is not cached here; see
/// [`CredentialProvider`](crate::auth::CredentialProvider).
///
/// # Errors
///
/// - [`AuthError::MissingAuthHost`] / [`AuthError::MissingClientCredentials`]
///   when the parameters are incomplete
/// - [`AuthError::ExchangeFailed`] on a non-2xx answer
/// - [`AuthError::Network`] when the auth host cannot be reached
/// - [`AuthError::InvalidResponse`] when the body has no `access_token`
pub async fn exchange_client_credentials(
    params: &ActionParameters,
) -> Result<BearerToken, AuthError> {
    let scope = params.scope();
    let form = TokenRequest {
        grant_type: CLIENT_CREDENTIALS_GRANT_TYPE,
        scope: &scope,
        username: None,
        password: None,
    };
    request_token(params, params.oauth_path(), &form).await
}

/// Exchanges customer credentials for a customer-scoped access token
/// (password grant on the customer OAuth path).
///
/// # Errors
///
/// Same as [`exchange_client_credentials`].
pub async fn exchange_customer_password(
    params: &ActionParameters,
    email: &str,
    password: &str,
) -> Result<BearerToken, AuthError> {
    let scope = params.scope();
    let form = TokenRequest {
        grant_type: PASSWORD_GRANT_TYPE,
        scope: &scope,
        username: Some(email),
        password: Some(password),
    };
    request_token(params, params.customer_oauth_path(), &form).await
}

async fn request_token(
    params: &ActionParameters,
    path: &str,
    form: &TokenRequest<'_>,
) -> Result<BearerToken, AuthError> {
    let token_url = params.auth_url(path).ok_or(AuthError::MissingAuthHost)?;
    let (Some(client_id), Some(client_secret)) = (params.client_id(), params.client_secret())
    else {
        return Err(AuthError::MissingClientCredentials);
    };

    tracing::debug!(
        "Requesting {} token from {}",
        form.grant_type,
        token_url
    );

    let mut builder = reqwest::Client::builder().use_rustls_tls();
    if let Some(timeout) = params.timeout() {
        builder = builder.timeout(timeout);
    }
    let client = builder.build().map_err(|e| AuthError::Network {
        message: e.to_string(),
    })?;

    let response = client
        .post(&token_url)
        .basic_auth(client_id.as_ref(), Some(client_secret.as_ref()))
        .form(form)
        .send()
        .await
        .map_err(|e| AuthError::Network {
            message: format!("Network error: {e}"),
        })?;

    let status = response.status().as_u16();

    if !response.status().is_success() {
        let message = response.text().await.unwrap_or_default();
        tracing::warn!("Token request to {} failed with status {}", token_url, status);
        return Err(AuthError::ExchangeFailed { status, message });
    }

    let token_response: TokenResponse =
        response
            .json()
            .await
            .map_err(|e| AuthError::InvalidResponse {
                status,
                message: format!("Failed to parse token response: {e}"),
            })?;

    Ok(BearerToken::from_token_response(&token_response))
}
