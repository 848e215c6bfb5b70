//! Request-scoped deduplication of backend loads.
//!
//! A [`BatchLoader`] wraps one backend operation. Loads whose keys serialize
//! to the same canonical JSON while a call for that key is still in flight
//! join that call instead of starting another one; every joined caller
//! observes the same value or the same error. Once the call completes its
//! key is released, so the next load for that key hits the backend again.
//! There is no result cache.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use commerce_bridge::loader::BatchLoader;
//! use futures::FutureExt;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let calls = Arc::new(AtomicUsize::new(0));
//! let counter = Arc::clone(&calls);
//! let loader = BatchLoader::new("echo", move |key: serde_json::Value| {
//!     counter.fetch_add(1, Ordering::SeqCst);
//!     async move { Ok(key) }.boxed()
//! });
//!
//! let (a, b) = futures::join!(loader.load("cart-1"), loader.load("cart-1"));
//! assert_eq!(a.unwrap(), b.unwrap());
//! assert_eq!(calls.load(Ordering::SeqCst), 1);
//! # });
//! ```

pub mod version;

pub use version::VersionLoader;

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::future::{join_all, BoxFuture, Shared};
use futures::FutureExt;
use serde::Serialize;

use crate::error::AdapterError;

type LoadResult<V> = Result<V, AdapterError>;
type LoadFn<V> = Arc<dyn Fn(serde_json::Value) -> BoxFuture<'static, LoadResult<V>> + Send + Sync>;

struct InFlight<V> {
    generation: u64,
    future: Shared<BoxFuture<'static, LoadResult<V>>>,
}

type WaitMap<V> = Arc<Mutex<HashMap<String, InFlight<V>>>>;

/// Deduplicating loader for one backend operation.
///
/// Cloning a loader is cheap; clones share the in-flight map.
pub struct BatchLoader<V> {
    name: &'static str,
    load_fn: LoadFn<V>,
    wait_map: WaitMap<V>,
    generation: Arc<AtomicU64>,
}

impl<V> Clone for BatchLoader<V> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            load_fn: Arc::clone(&self.load_fn),
            wait_map: Arc::clone(&self.wait_map),
            generation: Arc::clone(&self.generation),
        }
    }
}

impl<V> fmt::Debug for BatchLoader<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchLoader")
            .field("name", &self.name)
            .field("in_flight", &self.in_flight())
            .finish_non_exhaustive()
    }
}

impl<V> BatchLoader<V> {
    /// Returns the loader name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the number of keys currently in flight.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.lock().len()
    }

    /// Forgets every in-flight registration.
    ///
    /// Callers already waiting keep waiting on their call; new loads start
    /// fresh calls.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, InFlight<V>>> {
        self.wait_map.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<V> BatchLoader<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Creates a loader named `name` that performs backend calls with `load_fn`.
    ///
    /// `load_fn` receives the key as a JSON value.
    pub fn new<F>(name: &'static str, load_fn: F) -> Self
    where
        F: Fn(serde_json::Value) -> BoxFuture<'static, LoadResult<V>> + Send + Sync + 'static,
    {
        Self {
            name,
            load_fn: Arc::new(load_fn),
            wait_map: Arc::new(Mutex::new(HashMap::new())),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Loads the value for `key`, joining an in-flight call for an equal key.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::InvalidKey`] if the key cannot be serialized,
    /// otherwise whatever the backend call produced.
    pub async fn load<K>(&self, key: &K) -> LoadResult<V>
    where
        K: Serialize + ?Sized,
    {
        let key = serde_json::to_value(key).map_err(|e| AdapterError::InvalidKey(e.to_string()))?;
        let canonical = key.to_string();

        let (generation, future) = {
            let mut wait_map = self.lock();
            if let Some(in_flight) = wait_map.get(&canonical) {
                tracing::debug!("{} joined in-flight load for key {}", self.name, canonical);
                (in_flight.generation, in_flight.future.clone())
            } else {
                tracing::debug!("{} loading key {}", self.name, canonical);
                let generation = self.generation.fetch_add(1, Ordering::Relaxed);
                let future = (self.load_fn)(key).shared();
                wait_map.insert(
                    canonical.clone(),
                    InFlight {
                        generation,
                        future: future.clone(),
                    },
                );
                (generation, future)
            }
        };

        let result = future.await;

        let mut wait_map = self.lock();
        if wait_map
            .get(&canonical)
            .is_some_and(|in_flight| in_flight.generation == generation)
        {
            wait_map.remove(&canonical);
        }

        result
    }

    /// Loads every key concurrently, returning one result per key in input order.
    ///
    /// A failing key never fails the others.
    pub async fn load_many<K>(&self, keys: &[K]) -> Vec<LoadResult<V>>
    where
        K: Serialize,
    {
        join_all(keys.iter().map(|key| self.load(key))).await
    }
}

// Verify BatchLoader is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<BatchLoader<serde_json::Value>>();
};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::Notify;

    fn counting_loader(calls: &Arc<AtomicUsize>) -> BatchLoader<serde_json::Value> {
        let calls = Arc::clone(calls);
        BatchLoader::new("test", move |key| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move {
                tokio::task::yield_now().await;
                if key == json!("broken") {
                    Err(AdapterError::NotFound {
                        message: "broken was not found.".to_string(),
                    })
                } else {
                    Ok(json!({ "key": key }))
                }
            }
            .boxed()
        })
    }

    #[tokio::test]
    async fn test_identical_keys_share_one_call() {
        let calls = Arc::new(AtomicUsize::new(0));
        let loader = counting_loader(&calls);

        let (a, b) = futures::join!(loader.load("cart-1"), loader.load("cart-1"));

        assert_eq!(a.unwrap(), json!({"key": "cart-1"}));
        assert_eq!(b.unwrap(), json!({"key": "cart-1"}));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_structurally_equal_keys_are_deduplicated() {
        #[derive(Serialize)]
        struct Key<'a> {
            version: u64,
            uid: &'a str,
        }

        let calls = Arc::new(AtomicUsize::new(0));
        let loader = counting_loader(&calls);

        let json_key = json!({"uid": "c1", "version": 3});
        let (a, b) = futures::join!(
            loader.load(&json_key),
            loader.load(&Key {
                version: 3,
                uid: "c1"
            })
        );

        assert_eq!(a.unwrap(), b.unwrap());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_sequential_loads_call_backend_again() {
        let calls = Arc::new(AtomicUsize::new(0));
        let loader = counting_loader(&calls);

        loader.load("cart-1").await.unwrap();
        loader.load("cart-1").await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(loader.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_joined_callers_share_the_error() {
        let calls = Arc::new(AtomicUsize::new(0));
        let loader = counting_loader(&calls);

        let (a, b) = futures::join!(loader.load("broken"), loader.load("broken"));

        assert_eq!(a.unwrap_err(), b.unwrap_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_load_many_keeps_order_and_isolates_failures() {
        let calls = Arc::new(AtomicUsize::new(0));
        let loader = counting_loader(&calls);

        let results = loader.load_many(&["a", "broken", "b", "a"]).await;

        assert_eq!(results.len(), 4);
        assert_eq!(results[0].as_ref().unwrap(), &json!({"key": "a"}));
        assert!(matches!(results[1], Err(AdapterError::NotFound { .. })));
        assert_eq!(results[2].as_ref().unwrap(), &json!({"key": "b"}));
        assert_eq!(results[3].as_ref().unwrap(), &json!({"key": "a"}));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_in_flight_and_clear() {
        let release = Arc::new(Notify::new());
        let gate = Arc::clone(&release);
        let loader: BatchLoader<u64> = BatchLoader::new("gated", move |_key| {
            let gate = Arc::clone(&gate);
            async move {
                gate.notified().await;
                Ok(7)
            }
            .boxed()
        });

        let observer = async {
            tokio::task::yield_now().await;
            let in_flight = loader.in_flight();
            loader.clear();
            let cleared = loader.in_flight();
            release.notify_one();
            (in_flight, cleared)
        };

        let (value, (in_flight, cleared)) = futures::join!(loader.load("k"), observer);

        assert_eq!(value.unwrap(), 7);
        assert_eq!(in_flight, 1);
        assert_eq!(cleared, 0);
    }

    #[tokio::test]
    async fn test_unserializable_key_is_invalid() {
        let calls = Arc::new(AtomicUsize::new(0));
        let loader = counting_loader(&calls);

        let mut key = HashMap::new();
        key.insert((1, 2), "tuple keys are not JSON object keys");

        let error = loader.load(&key).await.unwrap_err();
        assert!(matches!(error, AdapterError::InvalidKey(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
