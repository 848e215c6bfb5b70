//! Process-wide credential cache.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex, PoisonError};

use sha2::{Digest, Sha256};
use tokio::sync::Mutex;

use crate::auth::oauth::{exchange_client_credentials, AuthError};
use crate::auth::BearerToken;
use crate::config::ActionParameters;

/// Identifies one cached client-credentials token.
///
/// The secret is kept as a SHA-256 digest so that a request with a known
/// client id and a wrong secret never reaches a token issued for the right one.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct CacheKey {
    token_url: String,
    client_id: String,
    secret_digest: [u8; 32],
    scope: String,
}

impl CacheKey {
    fn from_params(params: &ActionParameters) -> Option<Self> {
        Some(Self {
            token_url: params.auth_url(params.oauth_path())?,
            client_id: params.client_id()?.as_ref().to_string(),
            secret_digest: Sha256::digest(params.client_secret()?.as_ref().as_bytes()).into(),
            scope: params.scope(),
        })
    }
}

/// Token slot for one key; locked across that key's exchange only.
type Slot = Arc<Mutex<Option<BearerToken>>>;

/// Resolves the bearer credential for backend calls.
///
/// The embedding process owns one provider and shares it (behind an `Arc`)
/// between requests. Resolution order:
///
/// 1. a caller-supplied `bearer` in the parameters is used as-is and never cached
/// 2. a cached, unexpired client-credentials token for the same auth URL,
///    client credentials and scope
/// 3. a fresh client-credentials exchange, cached on success only
///
/// Concurrent exchanges for the same key are serialized, so waiters behind
/// an in-progress exchange reuse its token. Different keys never wait on
/// each other.
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use commerce_bridge::auth::CredentialProvider;
///
/// let provider = Arc::new(CredentialProvider::new());
/// let bearer = provider.bearer(&params).await?;
/// ```
#[derive(Debug, Default)]
pub struct CredentialProvider {
    slots: StdMutex<HashMap<CacheKey, Slot>>,
}

// Verify CredentialProvider is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<CredentialProvider>();
};

impl CredentialProvider {
    /// Creates an empty provider.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the bearer token to use for `params`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError`] when no bearer was supplied and the
    /// client-credentials exchange fails. Failures are not cached.
    pub async fn bearer(&self, params: &ActionParameters) -> Result<BearerToken, AuthError> {
        if let Some(bearer) = params.bearer() {
            return Ok(BearerToken::new(bearer));
        }

        let key = CacheKey::from_params(params).ok_or_else(|| {
            if params.auth_host().is_none() {
                AuthError::MissingAuthHost
            } else {
                AuthError::MissingClientCredentials
            }
        })?;

        let slot = self.slot(&key);
        let mut cached = slot.lock().await;
        if let Some(token) = cached.as_ref() {
            if !token.expired() {
                return Ok(token.clone());
            }
            tracing::debug!("Cached token for client {} expired", key.client_id);
        }

        let token = exchange_client_credentials(params).await?;
        *cached = Some(token.clone());
        Ok(token)
    }

    /// Returns the number of cached tokens.
    pub async fn cached_tokens(&self) -> usize {
        let slots: Vec<Slot> = self.lock().values().cloned().collect();
        let mut count = 0;
        for slot in slots {
            if slot.lock().await.is_some() {
                count += 1;
            }
        }
        count
    }

    /// Drops every cached token.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn slot(&self, key: &CacheKey) -> Slot {
        Arc::clone(self.lock().entry(key.clone()).or_default())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<CacheKey, Slot>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
