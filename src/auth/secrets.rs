//! Secret providers used by the signature validator.
//!
//! The resolver only ever calls [`SecretProvider::get_secret`]; caching and
//! concurrency are the provider's business. [`CachedSecretProvider`] adds an
//! LRU cache in front of any provider.

use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use lru::LruCache;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::SecretError;

/// Source of serialized secrets, keyed by identifier.
#[async_trait]
pub trait SecretProvider: Send + Sync {
    /// Return the serialized secret stored under `identifier`.
    async fn get_secret(&self, identifier: &str) -> Result<String, SecretError>;
}

#[async_trait]
impl<T: SecretProvider + ?Sized> SecretProvider for Arc<T> {
    async fn get_secret(&self, identifier: &str) -> Result<String, SecretError> {
        (**self).get_secret(identifier).await
    }
}

// =============================================================================
// Static Provider
// =============================================================================

/// In-memory secret provider.
#[derive(Debug, Clone, Default)]
pub struct StaticSecretProvider {
    secrets: HashMap<String, String>,
}

impl StaticSecretProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `secret` under `identifier`.
    pub fn with_secret(mut self, identifier: impl Into<String>, secret: impl Into<String>) -> Self {
        self.secrets.insert(identifier.into(), secret.into());
        self
    }
}

#[async_trait]
impl SecretProvider for StaticSecretProvider {
    async fn get_secret(&self, identifier: &str) -> Result<String, SecretError> {
        self.secrets
            .get(identifier)
            .cloned()
            .ok_or_else(|| SecretError::NotFound(identifier.to_string()))
    }
}

// =============================================================================
// File Provider
// =============================================================================

/// Reads secrets from files in a directory, one file per identifier.
///
/// Matches the layout of Docker and Kubernetes mounted secrets
/// (`/run/secrets/<identifier>`).
#[derive(Debug, Clone)]
pub struct FileSecretProvider {
    dir: PathBuf,
}

impl FileSecretProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory secrets are read from.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl SecretProvider for FileSecretProvider {
    async fn get_secret(&self, identifier: &str) -> Result<String, SecretError> {
        if identifier.is_empty()
            || identifier.contains('/')
            || identifier.contains('\\')
            || identifier.contains("..")
        {
            return Err(SecretError::Provider(format!(
                "invalid secret identifier '{}'",
                identifier
            )));
        }

        let path = self.dir.join(identifier);
        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => Ok(contents.trim_end().to_string()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(SecretError::NotFound(identifier.to_string()))
            }
            Err(e) => Err(SecretError::Provider(format!(
                "failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }
}

// =============================================================================
// Cached Provider
// =============================================================================

/// LRU cache in front of another secret provider.
///
/// Failed lookups are not cached.
pub struct CachedSecretProvider<P> {
    inner: P,
    cache: Mutex<LruCache<String, String>>,
}

impl<P: SecretProvider> CachedSecretProvider<P> {
    /// Wrap `inner`, keeping at most `capacity` secrets (minimum 1).
    pub fn new(inner: P, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner,
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Number of cached secrets.
    pub async fn len(&self) -> usize {
        self.cache.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.cache.lock().await.is_empty()
    }
}

#[async_trait]
impl<P: SecretProvider> SecretProvider for CachedSecretProvider<P> {
    async fn get_secret(&self, identifier: &str) -> Result<String, SecretError> {
        if let Some(secret) = self.cache.lock().await.get(identifier) {
            return Ok(secret.clone());
        }

        debug!(secret_id = identifier, "Secret cache miss");
        let secret = self.inner.get_secret(identifier).await?;
        self.cache
            .lock()
            .await
            .put(identifier.to_string(), secret.clone());
        Ok(secret)
    }
}
