//! Validated newtype wrappers for configuration values.
//!
//! This module provides type-safe wrappers around string values that validate
//! their contents on construction. Invalid values are rejected with clear error messages.

use crate::error::ConfigError;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A validated OAuth client id for the commerce backend.
///
/// # Example
///
/// ```rust
/// use commerce_bridge::ClientId;
///
/// let id = ClientId::new("zCzF-LD2Y3Ga5BNSoi8mDtT9").unwrap();
/// assert_eq!(id.as_ref(), "zCzF-LD2Y3Ga5BNSoi8mDtT9");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientId(String);

impl ClientId {
    /// Creates a new validated client id.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyClientId`] if the id is empty.
    pub fn new(id: impl Into<String>) -> Result<Self, ConfigError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ConfigError::EmptyClientId);
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for ClientId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A validated OAuth client secret.
///
/// The `Debug` implementation masks the secret value, displaying only
/// `ClientSecret(*****)`.
///
/// # Example
///
/// ```rust
/// use commerce_bridge::ClientSecret;
///
/// let secret = ClientSecret::new("my-secret").unwrap();
/// assert_eq!(format!("{:?}", secret), "ClientSecret(*****)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct ClientSecret(String);

impl ClientSecret {
    /// Creates a new validated client secret.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyClientSecret`] if the secret is empty.
    pub fn new(secret: impl Into<String>) -> Result<Self, ConfigError> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(ConfigError::EmptyClientSecret);
        }
        Ok(Self(secret))
    }
}

impl AsRef<str> for ClientSecret {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ClientSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ClientSecret(*****)")
    }
}

/// A bare host name, optionally with a port (`api.example.com`, `127.0.0.1:8080`).
///
/// Schemes and paths are rejected; the scheme comes from [`Protocol`].
///
/// # Example
///
/// ```rust
/// use commerce_bridge::ApiHost;
///
/// let host = ApiHost::new("api.europe-west1.gcp.commercetools.com").unwrap();
/// assert_eq!(host.as_ref(), "api.europe-west1.gcp.commercetools.com");
/// assert!(ApiHost::new("https://api.example.com").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiHost(String);

impl ApiHost {
    /// Creates a new validated host.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidHost`] if the host is empty, contains a
    /// scheme, a path or whitespace.
    pub fn new(host: impl Into<String>) -> Result<Self, ConfigError> {
        let host = host.into().trim().to_string();

        let valid = !host.is_empty()
            && !host.starts_with(':')
            && host
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | ':'));
        if !valid {
            return Err(ConfigError::InvalidHost { host });
        }

        Ok(Self(host))
    }
}

impl AsRef<str> for ApiHost {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A validated backend project key.
///
/// The project key is the first path segment of the backend GraphQL endpoint
/// (`/{project_key}/graphql`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProjectKey(String);

impl ProjectKey {
    /// Creates a new validated project key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidProjectKey`] if the key is empty or
    /// contains characters other than ASCII letters, digits, `-` and `_`.
    pub fn new(key: impl Into<String>) -> Result<Self, ConfigError> {
        let key = key.into();
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(ConfigError::InvalidProjectKey { key });
        }
        Ok(Self(key))
    }
}

impl AsRef<str> for ProjectKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for ProjectKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ProjectKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(de::Error::custom)
    }
}

/// URL scheme used for both the API host and the auth host.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Protocol {
    /// Plain HTTP, mostly useful against local mock servers.
    Http,
    /// HTTPS.
    #[default]
    Https,
}

impl Protocol {
    /// Returns the scheme string without the `://` separator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Protocol {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "http" => Ok(Self::Http),
            "https" => Ok(Self::Https),
            _ => Err(ConfigError::InvalidProtocol {
                protocol: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_id_rejects_empty_string() {
        assert!(matches!(ClientId::new(""), Err(ConfigError::EmptyClientId)));
    }

    #[test]
    fn test_client_secret_masks_value_in_debug() {
        let secret = ClientSecret::new("super-secret").unwrap();
        let debug_output = format!("{secret:?}");
        assert_eq!(debug_output, "ClientSecret(*****)");
        assert!(!debug_output.contains("super-secret"));
    }

    #[test]
    fn test_api_host_accepts_host_and_port() {
        assert!(ApiHost::new("api.commercetools.co").is_ok());
        assert!(ApiHost::new("127.0.0.1:38211").is_ok());
        assert_eq!(ApiHost::new("  auth.example.com ").unwrap().as_ref(), "auth.example.com");
    }

    #[test]
    fn test_api_host_rejects_scheme_path_and_whitespace() {
        assert!(ApiHost::new("").is_err());
        assert!(ApiHost::new("https://api.example.com").is_err());
        assert!(ApiHost::new("api.example.com/graphql").is_err());
        assert!(ApiHost::new("api example.com").is_err());
        assert!(ApiHost::new(":8080").is_err());
    }

    #[test]
    fn test_project_key_validation() {
        assert!(ProjectKey::new("adobeio-ct-connector").is_ok());
        assert!(ProjectKey::new("CT_INSTANCE_PROJECT").is_ok());
        assert!(ProjectKey::new("").is_err());
        assert!(ProjectKey::new("a/b").is_err());
    }

    #[test]
    fn test_project_key_deserialize_validates() {
        let key: ProjectKey = serde_json::from_str(r#""my-project""#).unwrap();
        assert_eq!(key.as_ref(), "my-project");
        assert!(serde_json::from_str::<ProjectKey>(r#""bad key""#).is_err());
    }

    #[test]
    fn test_protocol_parses_case_insensitively() {
        assert_eq!("HTTPS".parse::<Protocol>().unwrap(), Protocol::Https);
        assert_eq!("http".parse::<Protocol>().unwrap(), Protocol::Http);
        assert!(matches!(
            "ftp".parse::<Protocol>(),
            Err(ConfigError::InvalidProtocol { .. })
        ));
        assert_eq!(Protocol::default().to_string(), "https");
    }
}
