//! Configuration types for the commerce bridge.
//!
//! # Overview
//!
//! - [`ActionParameters`]: connection settings for one incoming storefront request
//! - [`ActionParametersBuilder`]: a builder for constructing [`ActionParameters`]
//! - [`ClientId`], [`ClientSecret`], [`ApiHost`], [`ProjectKey`], [`Protocol`]:
//!   validated newtypes
//!
//! Parameters are immutable once built. The storefront runtime usually hands
//! them over as a JSON `settings` object, see [`ActionParameters::from_settings`].
//!
//! # Example
//!
//! ```rust
//! use commerce_bridge::{ActionParameters, ApiHost, ProjectKey};
//!
//! let params = ActionParameters::builder()
//!     .api_host(ApiHost::new("api.commercetools.co").unwrap())
//!     .project_key(ProjectKey::new("my-project").unwrap())
//!     .bearer("pre-issued-token")
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(params.graphql_url(), "https://api.commercetools.co/my-project/graphql");
//! ```

mod newtypes;

pub use newtypes::{ApiHost, ClientId, ClientSecret, ProjectKey, Protocol};

use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

/// Default OAuth token path on the auth host.
pub const DEFAULT_OAUTH_PATH: &str = "/oauth/token";

/// Default locale for localized backend fields.
pub const DEFAULT_LOCALE: &str = "en";

/// Default currency for prices and new carts.
pub const DEFAULT_CURRENCY: &str = "EUR";

/// Connection settings for the commerce backend, scoped to one request.
///
/// # Thread Safety
///
/// `ActionParameters` is `Clone`, `Send`, and `Sync`.
#[derive(Clone, Debug)]
pub struct ActionParameters {
    protocol: Protocol,
    api_host: ApiHost,
    project_key: ProjectKey,
    auth_host: Option<ApiHost>,
    oauth_path: String,
    customer_oauth_path: Option<String>,
    client_id: Option<ClientId>,
    client_secret: Option<ClientSecret>,
    scope: Option<String>,
    bearer: Option<String>,
    customer_id: Option<String>,
    locale: String,
    currency: String,
    timeout: Option<Duration>,
    user_agent_prefix: Option<String>,
}

impl ActionParameters {
    /// Creates a new builder for constructing `ActionParameters`.
    #[must_use]
    pub fn builder() -> ActionParametersBuilder {
        ActionParametersBuilder::new()
    }

    /// Builds parameters from the storefront `context.settings` object.
    ///
    /// Recognized keys: `CT_PROTOCOL`, `apiHost`, `CT_PROJECT_KEY`,
    /// `CT_AUTH_HOST`, `CT_OAUTH_PATH`, `CT_CUSTOMER_OAUTH_PATH`,
    /// `CT_CLIENTID`, `CT_CLIENTSECRET`, `CT_SCOPE`, `CT_LOCALE`,
    /// `CT_CURRENCY`, `bearer`, `customerId`. Unknown keys are ignored and
    /// empty strings count as absent.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSettings`] when the value is not an
    /// object of strings, or any validation error of the builder.
    ///
    /// # Example
    ///
    /// ```rust
    /// use commerce_bridge::ActionParameters;
    /// use serde_json::json;
    ///
    /// let params = ActionParameters::from_settings(&json!({
    ///     "CT_PROTOCOL": "https",
    ///     "apiHost": "api.commercetools.co",
    ///     "CT_PROJECT_KEY": "my-project",
    ///     "CT_AUTH_HOST": "auth.commercetools.co",
    ///     "CT_CLIENTID": "client",
    ///     "CT_CLIENTSECRET": "secret",
    ///     "bearer": "",
    /// }))
    /// .unwrap();
    ///
    /// assert!(params.bearer().is_none());
    /// ```
    pub fn from_settings(settings: &serde_json::Value) -> Result<Self, ConfigError> {
        let raw = RawSettings::deserialize(settings).map_err(|e| ConfigError::InvalidSettings {
            reason: e.to_string(),
        })?;
        raw.into_builder()?.build()
    }

    /// Returns the URL scheme for backend and auth calls.
    #[must_use]
    pub const fn protocol(&self) -> Protocol {
        self.protocol
    }

    /// Returns the backend API host.
    #[must_use]
    pub const fn api_host(&self) -> &ApiHost {
        &self.api_host
    }

    /// Returns the backend project key.
    #[must_use]
    pub const fn project_key(&self) -> &ProjectKey {
        &self.project_key
    }

    /// Returns the auth host, if configured.
    #[must_use]
    pub const fn auth_host(&self) -> Option<&ApiHost> {
        self.auth_host.as_ref()
    }

    /// Returns the OAuth client-credentials path.
    #[must_use]
    pub fn oauth_path(&self) -> &str {
        &self.oauth_path
    }

    /// Returns the OAuth path for customer password grants.
    ///
    /// Falls back to [`oauth_path`](Self::oauth_path) when not configured.
    #[must_use]
    pub fn customer_oauth_path(&self) -> &str {
        self.customer_oauth_path
            .as_deref()
            .unwrap_or(&self.oauth_path)
    }

    /// Returns the OAuth client id, if configured.
    #[must_use]
    pub const fn client_id(&self) -> Option<&ClientId> {
        self.client_id.as_ref()
    }

    /// Returns the OAuth client secret, if configured.
    #[must_use]
    pub const fn client_secret(&self) -> Option<&ClientSecret> {
        self.client_secret.as_ref()
    }

    /// Returns the OAuth scope, `manage_project:{project_key}` unless overridden.
    #[must_use]
    pub fn scope(&self) -> String {
        self.scope.clone().unwrap_or_else(|| {
            format!("manage_project:{}", self.project_key.as_ref())
        })
    }

    /// Returns the caller-supplied bearer token, if any.
    #[must_use]
    pub fn bearer(&self) -> Option<&str> {
        self.bearer.as_deref()
    }

    /// Returns the customer id, if any.
    #[must_use]
    pub fn customer_id(&self) -> Option<&str> {
        self.customer_id.as_deref()
    }

    /// Returns the locale used for localized backend fields.
    #[must_use]
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Returns the currency used for prices and new carts.
    #[must_use]
    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Returns the HTTP timeout, if configured.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }

    /// Returns the base URI of the backend, e.g. `https://api.commercetools.co`.
    #[must_use]
    pub fn api_base_uri(&self) -> String {
        format!("{}://{}", self.protocol, self.api_host.as_ref())
    }

    /// Returns the full backend GraphQL endpoint URL.
    #[must_use]
    pub fn graphql_url(&self) -> String {
        format!("{}/{}/graphql", self.api_base_uri(), self.project_key.as_ref())
    }

    /// Returns the full token endpoint URL for `path`, if an auth host is configured.
    #[must_use]
    pub fn auth_url(&self, path: &str) -> Option<String> {
        self.auth_host
            .as_ref()
            .map(|host| format!("{}://{}{path}", self.protocol, host.as_ref()))
    }
}

// Verify ActionParameters is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ActionParameters>();
};

/// Builder for constructing [`ActionParameters`] instances.
///
/// Required fields are `api_host` and `project_key`.
///
/// # Defaults
///
/// - `protocol`: `https`
/// - `oauth_path`: `/oauth/token`
/// - `locale`: `en`
/// - `currency`: `EUR`
/// - everything else: `None`
#[derive(Debug, Default)]
pub struct ActionParametersBuilder {
    protocol: Option<Protocol>,
    api_host: Option<ApiHost>,
    project_key: Option<ProjectKey>,
    auth_host: Option<ApiHost>,
    oauth_path: Option<String>,
    customer_oauth_path: Option<String>,
    client_id: Option<ClientId>,
    client_secret: Option<ClientSecret>,
    scope: Option<String>,
    bearer: Option<String>,
    customer_id: Option<String>,
    locale: Option<String>,
    currency: Option<String>,
    timeout: Option<Duration>,
    user_agent_prefix: Option<String>,
}

impl ActionParametersBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the URL scheme.
    #[must_use]
    pub const fn protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = Some(protocol);
        self
    }

    /// Sets the backend API host (required).
    #[must_use]
    pub fn api_host(mut self, host: ApiHost) -> Self {
        self.api_host = Some(host);
        self
    }

    /// Sets the backend project key (required).
    #[must_use]
    pub fn project_key(mut self, key: ProjectKey) -> Self {
        self.project_key = Some(key);
        self
    }

    /// Sets the OAuth host.
    #[must_use]
    pub fn auth_host(mut self, host: ApiHost) -> Self {
        self.auth_host = Some(host);
        self
    }

    /// Sets the OAuth client-credentials path.
    #[must_use]
    pub fn oauth_path(mut self, path: impl Into<String>) -> Self {
        self.oauth_path = Some(path.into());
        self
    }

    /// Sets the OAuth path used for customer password grants.
    #[must_use]
    pub fn customer_oauth_path(mut self, path: impl Into<String>) -> Self {
        self.customer_oauth_path = Some(path.into());
        self
    }

    /// Sets the OAuth client id.
    #[must_use]
    pub fn client_id(mut self, id: ClientId) -> Self {
        self.client_id = Some(id);
        self
    }

    /// Sets the OAuth client secret.
    #[must_use]
    pub fn client_secret(mut self, secret: ClientSecret) -> Self {
        self.client_secret = Some(secret);
        self
    }

    /// Overrides the OAuth scope.
    #[must_use]
    pub fn scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Sets a pre-issued bearer token. Empty strings are ignored.
    #[must_use]
    pub fn bearer(mut self, bearer: impl Into<String>) -> Self {
        self.bearer = Some(bearer.into()).filter(|b| !b.is_empty());
        self
    }

    /// Sets the customer id. Empty strings are ignored.
    #[must_use]
    pub fn customer_id(mut self, id: impl Into<String>) -> Self {
        self.customer_id = Some(id.into()).filter(|c| !c.is_empty());
        self
    }

    /// Sets the locale for localized backend fields.
    #[must_use]
    pub fn locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    /// Sets the currency for prices and new carts.
    #[must_use]
    pub fn currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    /// Sets the HTTP timeout applied by the transport.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Builds the [`ActionParameters`], validating that required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `api_host` or
    /// `project_key` are not set, and [`ConfigError::InvalidOAuthPath`] if an
    /// OAuth path does not start with `/`.
    pub fn build(self) -> Result<ActionParameters, ConfigError> {
        let api_host = self
            .api_host
            .ok_or(ConfigError::MissingRequiredField { field: "api_host" })?;
        let project_key = self.project_key.ok_or(ConfigError::MissingRequiredField {
            field: "project_key",
        })?;

        let oauth_path = self
            .oauth_path
            .unwrap_or_else(|| DEFAULT_OAUTH_PATH.to_string());
        for path in std::iter::once(&oauth_path).chain(self.customer_oauth_path.as_ref()) {
            if !path.starts_with('/') {
                return Err(ConfigError::InvalidOAuthPath { path: path.clone() });
            }
        }

        Ok(ActionParameters {
            protocol: self.protocol.unwrap_or_default(),
            api_host,
            project_key,
            auth_host: self.auth_host,
            oauth_path,
            customer_oauth_path: self.customer_oauth_path,
            client_id: self.client_id,
            client_secret: self.client_secret,
            scope: self.scope,
            bearer: self.bearer,
            customer_id: self.customer_id,
            locale: self.locale.unwrap_or_else(|| DEFAULT_LOCALE.to_string()),
            currency: self.currency.unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            timeout: self.timeout,
            user_agent_prefix: self.user_agent_prefix,
        })
    }
}

/// Storefront settings as they arrive in `context.settings`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawSettings {
    #[serde(rename = "CT_PROTOCOL")]
    protocol: Option<String>,
    #[serde(rename = "apiHost")]
    api_host: Option<String>,
    #[serde(rename = "CT_PROJECT_KEY")]
    project_key: Option<String>,
    #[serde(rename = "CT_AUTH_HOST")]
    auth_host: Option<String>,
    #[serde(rename = "CT_OAUTH_PATH")]
    oauth_path: Option<String>,
    #[serde(rename = "CT_CUSTOMER_OAUTH_PATH")]
    customer_oauth_path: Option<String>,
    #[serde(rename = "CT_CLIENTID")]
    client_id: Option<String>,
    #[serde(rename = "CT_CLIENTSECRET")]
    client_secret: Option<String>,
    #[serde(rename = "CT_SCOPE")]
    scope: Option<String>,
    #[serde(rename = "CT_LOCALE")]
    locale: Option<String>,
    #[serde(rename = "CT_CURRENCY")]
    currency: Option<String>,
    bearer: Option<String>,
    #[serde(rename = "customerId")]
    customer_id: Option<String>,
}

impl RawSettings {
    fn into_builder(self) -> Result<ActionParametersBuilder, ConfigError> {
        fn present(value: Option<String>) -> Option<String> {
            value.filter(|v| !v.trim().is_empty())
        }

        let mut builder = ActionParametersBuilder::new();
        if let Some(protocol) = present(self.protocol) {
            builder = builder.protocol(protocol.parse()?);
        }
        if let Some(host) = present(self.api_host) {
            builder = builder.api_host(ApiHost::new(host)?);
        }
        if let Some(key) = present(self.project_key) {
            builder = builder.project_key(ProjectKey::new(key)?);
        }
        if let Some(host) = present(self.auth_host) {
            builder = builder.auth_host(ApiHost::new(host)?);
        }
        if let Some(path) = present(self.oauth_path) {
            builder = builder.oauth_path(path);
        }
        if let Some(path) = present(self.customer_oauth_path) {
            builder = builder.customer_oauth_path(path);
        }
        if let Some(id) = present(self.client_id) {
            builder = builder.client_id(ClientId::new(id)?);
        }
        if let Some(secret) = present(self.client_secret) {
            builder = builder.client_secret(ClientSecret::new(secret)?);
        }
        if let Some(scope) = present(self.scope) {
            builder = builder.scope(scope);
        }
        if let Some(locale) = present(self.locale) {
            builder = builder.locale(locale);
        }
        if let Some(currency) = present(self.currency) {
            builder = builder.currency(currency);
        }
        if let Some(bearer) = present(self.bearer) {
            builder = builder.bearer(bearer);
        }
        if let Some(customer_id) = present(self.customer_id) {
            builder = builder.customer_id(customer_id);
        }
        Ok(builder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn minimal_builder() -> ActionParametersBuilder {
        ActionParameters::builder()
            .api_host(ApiHost::new("api.example.com").unwrap())
            .project_key(ProjectKey::new("project").unwrap())
    }

    #[test]
    fn test_builder_requires_api_host() {
        let result = ActionParametersBuilder::new()
            .project_key(ProjectKey::new("project").unwrap())
            .build();

        assert!(matches!(
            result,
            Err(ConfigError::MissingRequiredField { field: "api_host" })
        ));
    }

    #[test]
    fn test_builder_requires_project_key() {
        let result = ActionParametersBuilder::new()
            .api_host(ApiHost::new("api.example.com").unwrap())
            .build();

        assert!(matches!(
            result,
            Err(ConfigError::MissingRequiredField {
                field: "project_key"
            })
        ));
    }

    #[test]
    fn test_builder_provides_sensible_defaults() {
        let params = minimal_builder().build().unwrap();

        assert_eq!(params.protocol(), Protocol::Https);
        assert_eq!(params.oauth_path(), DEFAULT_OAUTH_PATH);
        assert_eq!(params.customer_oauth_path(), DEFAULT_OAUTH_PATH);
        assert_eq!(params.scope(), "manage_project:project");
        assert_eq!(params.locale(), "en");
        assert_eq!(params.currency(), "EUR");
        assert!(params.bearer().is_none());
        assert!(params.customer_id().is_none());
        assert!(params.auth_host().is_none());
        assert!(params.timeout().is_none());
    }

    #[test]
    fn test_urls_are_built_from_protocol_host_and_project() {
        let params = minimal_builder()
            .protocol(Protocol::Http)
            .auth_host(ApiHost::new("auth.example.com").unwrap())
            .build()
            .unwrap();

        assert_eq!(params.graphql_url(), "http://api.example.com/project/graphql");
        assert_eq!(
            params.auth_url(params.oauth_path()).as_deref(),
            Some("http://auth.example.com/oauth/token")
        );
    }

    #[test]
    fn test_empty_bearer_and_customer_id_count_as_absent() {
        let params = minimal_builder().bearer("").customer_id("").build().unwrap();
        assert!(params.bearer().is_none());
        assert!(params.customer_id().is_none());
    }

    #[test]
    fn test_oauth_path_must_start_with_slash() {
        let result = minimal_builder().oauth_path("oauth/token").build();
        assert!(matches!(result, Err(ConfigError::InvalidOAuthPath { .. })));

        let result = minimal_builder().customer_oauth_path("customers").build();
        assert!(matches!(result, Err(ConfigError::InvalidOAuthPath { .. })));
    }

    #[test]
    fn test_from_settings_reads_storefront_keys() {
        let params = ActionParameters::from_settings(&json!({
            "CT_PROTOCOL": "http",
            "apiHost": "api.example.com",
            "CT_PROJECT_KEY": "adobeio-ct-connector",
            "CT_AUTH_HOST": "auth.example.com",
            "CT_OAUTH_PATH": "/oauth/adobeio-ct-connector/customers/token",
            "CT_CLIENTID": "zCzF-LD2Y3Ga5BNSoi8mDtT9",
            "CT_CLIENTSECRET": "secret",
            "bearer": "",
            "customerId": "customer-1",
            "someOtherSetting": "ignored"
        }))
        .unwrap();

        assert_eq!(params.protocol(), Protocol::Http);
        assert_eq!(params.project_key().as_ref(), "adobeio-ct-connector");
        assert_eq!(params.client_id().unwrap().as_ref(), "zCzF-LD2Y3Ga5BNSoi8mDtT9");
        assert_eq!(params.customer_id(), Some("customer-1"));
        assert!(params.bearer().is_none());
    }

    #[test]
    fn test_from_settings_rejects_non_object() {
        let result = ActionParameters::from_settings(&json!("nope"));
        assert!(matches!(result, Err(ConfigError::InvalidSettings { .. })));
    }

    #[test]
    fn test_from_settings_propagates_validation_errors() {
        let result = ActionParameters::from_settings(&json!({
            "apiHost": "https://api.example.com",
            "CT_PROJECT_KEY": "project"
        }));
        assert!(matches!(result, Err(ConfigError::InvalidHost { .. })));
    }

    #[test]
    fn test_parameters_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ActionParameters>();
    }
}
