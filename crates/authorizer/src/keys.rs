//! Signing key resolution by key identifier

use async_trait::async_trait;
use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::DecodingKey;
use std::path::Path;

use crate::error::{AuthError, AuthResult};

#[cfg(feature = "http")]
pub use remote::JwksClient;

/// Resolves the public key a token's `kid` header refers to
#[async_trait]
pub trait KeyResolver: Send + Sync {
    async fn resolve(&self, kid: &str) -> AuthResult<DecodingKey>;
}

fn decoding_key(keys: &JwkSet, kid: &str) -> AuthResult<DecodingKey> {
    let jwk = keys
        .find(kid)
        .ok_or_else(|| AuthError::KeyNotFound(kid.to_string()))?;
    DecodingKey::from_jwk(jwk).map_err(|e| AuthError::KeyFetch(format!("unusable key {kid}: {e}")))
}

/// A fixed key set, for offline verification and tests
#[derive(Debug, Clone)]
pub struct StaticKeySet {
    keys: JwkSet,
}

impl StaticKeySet {
    pub fn new(keys: JwkSet) -> Self {
        Self { keys }
    }

    /// Parse a JWKS document
    pub fn from_json(content: &str) -> AuthResult<Self> {
        let keys = serde_json::from_str(content)
            .map_err(|e| AuthError::KeyFetch(format!("invalid key set: {e}")))?;
        Ok(Self::new(keys))
    }

    /// Read a JWKS document from disk
    pub async fn open(path: &Path) -> AuthResult<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| AuthError::KeyFetch(format!("{}: {e}", path.display())))?;
        Self::from_json(&content)
    }

    pub fn len(&self) -> usize {
        self.keys.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.keys.is_empty()
    }
}

#[async_trait]
impl KeyResolver for StaticKeySet {
    async fn resolve(&self, kid: &str) -> AuthResult<DecodingKey> {
        decoding_key(&self.keys, kid)
    }
}

#[cfg(feature = "http")]
mod remote {
    use super::*;
    use std::sync::Arc;
    use std::time::{Duration, Instant};
    use tokio::sync::{Mutex, RwLock};
    use tracing::{debug, info, warn};

    /// Unknown `kid`s never trigger fetches more often than this
    const MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

    const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(5);

    struct CachedKeys {
        keys: JwkSet,
        fetched_at: Instant,
    }

    /// Fetches the identity provider's key set over HTTP and caches it
    ///
    /// The cache is refreshed when its TTL lapses, or when a token names a
    /// `kid` the cache does not hold and the last fetch is older than
    /// [`MIN_REFRESH_INTERVAL`]. Only one fetch runs at a time, and lookups
    /// that the cache can answer never wait for it.
    pub struct JwksClient {
        client: reqwest::Client,
        uri: String,
        ttl: Duration,
        fetch_timeout: Duration,
        min_refresh: Duration,
        cache: RwLock<Option<Arc<CachedKeys>>>,
        renewal: Mutex<()>,
    }

    impl JwksClient {
        pub fn new(uri: impl Into<String>, ttl: Duration) -> Self {
            Self {
                client: reqwest::Client::new(),
                uri: uri.into(),
                ttl,
                fetch_timeout: DEFAULT_FETCH_TIMEOUT,
                min_refresh: MIN_REFRESH_INTERVAL,
                cache: RwLock::new(None),
                renewal: Mutex::new(()),
            }
        }

        /// Bound a single fetch, connection included
        pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
            self.fetch_timeout = timeout;
            self
        }

        async fn cached(&self) -> Option<Arc<CachedKeys>> {
            self.cache.read().await.clone()
        }

        async fn fetch(&self) -> AuthResult<JwkSet> {
            info!("Fetching signing keys from {}", self.uri);
            match tokio::time::timeout(self.fetch_timeout, self.request()).await {
                Ok(result) => result,
                Err(_) => {
                    warn!("Key set fetch from {} timed out", self.uri);
                    Err(AuthError::KeyFetch(format!(
                        "{} did not respond within {:?}",
                        self.uri, self.fetch_timeout
                    )))
                }
            }
        }

        async fn request(&self) -> AuthResult<JwkSet> {
            let response = self
                .client
                .get(&self.uri)
                .send()
                .await
                .and_then(|r| r.error_for_status())
                .map_err(|e| AuthError::KeyFetch(e.to_string()))?;

            response
                .json::<JwkSet>()
                .await
                .map_err(|e| AuthError::KeyFetch(e.to_string()))
        }

        fn is_fresh(&self, cached: &CachedKeys) -> bool {
            cached.fetched_at.elapsed() < self.ttl
        }
    }

    #[async_trait]
    impl KeyResolver for JwksClient {
        async fn resolve(&self, kid: &str) -> AuthResult<DecodingKey> {
            if let Some(cached) = self.cached().await {
                if self.is_fresh(&cached) && cached.keys.find(kid).is_some() {
                    return decoding_key(&cached.keys, kid);
                }
            }

            let _renewal = self.renewal.lock().await;

            // Another task may have refreshed while we waited our turn.
            if let Some(cached) = self.cached().await {
                if self.is_fresh(&cached) {
                    if cached.keys.find(kid).is_some() {
                        return decoding_key(&cached.keys, kid);
                    }
                    if cached.fetched_at.elapsed() < self.min_refresh {
                        debug!("Key {} unknown, refresh rate limited", kid);
                        return Err(AuthError::KeyNotFound(kid.to_string()));
                    }
                }
            }

            let keys = self.fetch().await?;
            debug!("Cached {} signing keys", keys.keys.len());
            let resolved = decoding_key(&keys, kid);
            *self.cache.write().await = Some(Arc::new(CachedKeys {
                keys,
                fetched_at: Instant::now(),
            }));
            resolved
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    pub(super) const JWKS: &str = r#"{"keys":[{"kty":"RSA","kid":"key-1","alg":"RS256","use":"sig","n":"wPUtAmQeQAfKNlBo2IX9_FqIC5ngYRVBnrbBYvN_DQn0e79Y8dwB7qugTxmyq0gzZvV9tOrc_XL8NXQv96tQjOLvGpy-74U9JuzDLabIy4c8kMXXu33oe4VYdGngQjxUX5mHlvI8A5BzkbQ_l2Mn-ZqLS_GiVUvmsFzwYHYnGsP61CQ9Gh_I0bwPyP5AbLKFDLE55-A7vqXHQBHMYDsA3DoYkyzJCNH0-WxZHWXPWagrx9fmixU7bRQJfIPEkjGKH9Wn7CU4VZnUH-5yBqEVKgygHAxtSjZaXhtaXw69gFL3E4mDJhRopWiE90_w8iTbINy-DKeahUEgKcjrMyOVkQ","e":"AQAB"}]}"#;

    #[tokio::test]
    async fn test_static_key_set_resolves_known_kid() {
        let keys = StaticKeySet::from_json(JWKS).unwrap();
        assert_eq!(keys.len(), 1);
        assert!(keys.resolve("key-1").await.is_ok());
    }

    #[tokio::test]
    async fn test_static_key_set_unknown_kid() {
        let keys = StaticKeySet::from_json(JWKS).unwrap();
        assert!(matches!(
            keys.resolve("key-2").await,
            Err(AuthError::KeyNotFound(kid)) if kid == "key-2"
        ));
    }

    #[test]
    fn test_invalid_key_set() {
        assert!(matches!(
            StaticKeySet::from_json("{\"keys\": 1}"),
            Err(AuthError::KeyFetch(_))
        ));
    }

    #[tokio::test]
    async fn test_open_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jwks.json");
        std::fs::write(&path, JWKS).unwrap();

        let keys = StaticKeySet::open(&path).await.unwrap();
        assert!(!keys.is_empty());
    }
}
