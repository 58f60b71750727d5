use async_trait::async_trait;
use aws_sdk_s3::primitives::DateTimeFormat;
use aws_sdk_s3::Client;

use super::{ObjectStore, StoredObject};
use crate::error::StorageError;

/// S3-backed implementation of [`ObjectStore`].
///
/// Works against AWS S3 and S3-compatible services (MinIO, etc.).
#[derive(Clone)]
pub struct S3ObjectStore {
    client: Client,
}

impl S3ObjectStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Get the underlying client.
    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn fetch(&self, bucket: &str, key: &str) -> Result<StoredObject, StorageError> {
        let resp = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                let is_not_found = e
                    .as_service_error()
                    .map(|se| se.is_no_such_key())
                    .unwrap_or(false);

                let status_is_404 = e
                    .raw_response()
                    .map(|r| r.status().as_u16() == 404)
                    .unwrap_or(false);

                let err_str = e.to_string();
                if is_not_found || status_is_404 || looks_like_not_found(&err_str) {
                    return StorageError::NotFound {
                        bucket: bucket.to_string(),
                        key: key.to_string(),
                    };
                }

                StorageError::S3(err_str)
            })?;

        let content_type = resp.content_type().map(str::to_string);
        let cache_control = resp.cache_control().map(str::to_string);
        let expires = resp.expires_string().map(str::to_string);
        let last_modified = resp
            .last_modified()
            .and_then(|dt| dt.fmt(DateTimeFormat::HttpDate).ok());

        let body = resp
            .body
            .collect()
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?
            .into_bytes();

        Ok(StoredObject {
            body,
            content_type,
            cache_control,
            expires,
            last_modified,
        })
    }
}

/// Fallback classification for errors that carry no structured status.
fn looks_like_not_found(message: &str) -> bool {
    message.contains("NoSuchKey") || message.contains("NotFound")
}

/// Create an S3 client with optional custom endpoint and region.
///
/// Use a custom endpoint for S3-compatible services like MinIO:
/// ```ignore
/// let client = create_s3_client(Some("http://localhost:9000"), "us-east-1").await;
/// ```
pub async fn create_s3_client(endpoint_url: Option<&str>, region: &str) -> Client {
    let region = aws_config::Region::new(region.to_string());
    let mut config_loader =
        aws_config::defaults(aws_config::BehaviorVersion::latest()).region(region);

    if let Some(endpoint) = endpoint_url {
        config_loader = config_loader.endpoint_url(endpoint);
    }

    let sdk_config = config_loader.load().await;

    // S3-compatible services generally need path-style addressing
    let s3_config = if endpoint_url.is_some() {
        aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(true)
            .build()
    } else {
        aws_sdk_s3::config::Builder::from(&sdk_config).build()
    };

    Client::from_conf(s3_config)
}
