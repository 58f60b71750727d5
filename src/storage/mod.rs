//! Object storage access.
//!
//! The resolver fetches the original image exactly once per request through
//! the [`ObjectStore`] trait. Retries, timeouts and connection pooling belong
//! to the store implementation.

mod s3;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::StorageError;

pub use s3::{create_s3_client, S3ObjectStore};

/// An object fetched from storage, with the metadata the resolver needs.
#[derive(Debug, Clone, Default)]
pub struct StoredObject {
    /// Object body
    pub body: Bytes,

    /// Content type reported by storage
    pub content_type: Option<String>,

    /// Cache-Control reported by storage
    pub cache_control: Option<String>,

    /// Expires reported by storage
    pub expires: Option<String>,

    /// Last-Modified reported by storage, as an HTTP date
    pub last_modified: Option<String>,
}

impl StoredObject {
    /// Create an object with the given body and no metadata.
    pub fn new(body: impl Into<Bytes>) -> Self {
        Self {
            body: body.into(),
            ..Self::default()
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn with_cache_control(mut self, cache_control: impl Into<String>) -> Self {
        self.cache_control = Some(cache_control.into());
        self
    }

    pub fn with_expires(mut self, expires: impl Into<String>) -> Self {
        self.expires = Some(expires.into());
        self
    }

    pub fn with_last_modified(mut self, last_modified: impl Into<String>) -> Self {
        self.last_modified = Some(last_modified.into());
        self
    }
}

/// Read access to an object store.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch the object at `bucket`/`key`.
    ///
    /// Returns [`StorageError::NotFound`] when the key does not exist.
    async fn fetch(&self, bucket: &str, key: &str) -> Result<StoredObject, StorageError>;
}
