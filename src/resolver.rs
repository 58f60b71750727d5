//! Image request resolution.
//!
//! The [`ImageRequestResolver`] is the single entry point. It runs the stages
//! top to bottom and stops at the first failure:
//!
//! 1. Validate the signature (when enabled)
//! 2. Decode the path into bucket, key and profile edits
//! 3. Fetch the original image
//! 4. Sniff the content type (only for generic storage types)
//! 5. Negotiate the output format
//! 6. Reconcile the quality edit key with the output format
//!
//! The only await points are the secret lookup and the object fetch.

use std::collections::BTreeMap;

use bytes::Bytes;
use serde::Serialize;
use tracing::{debug, error, warn};

use crate::auth::{SecretProvider, SignatureValidator, StaticSecretProvider};
use crate::config::ResolverConfig;
use crate::error::ResolveError;
use crate::event::ImageRequestEvent;
use crate::request::{
    decode_path, negotiate, reconcile_quality_key, reduction_effort, resolve_content_type,
    EditSet, NegotiationInput, OutputFormat, RequestOverrides,
};
use crate::storage::ObjectStore;

/// Cache-Control served when storage reports none.
pub const DEFAULT_CACHE_CONTROL: &str = "max-age=31536000,public";

// =============================================================================
// Resolved Request
// =============================================================================

/// Kind of request being resolved.
///
/// Every request is decoded as a size-profile request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum RequestType {
    #[default]
    Default,
}

impl RequestType {
    /// Whether per-format quality edits are renamed to follow the output format.
    pub const fn supports_quality_reconciliation(&self) -> bool {
        match self {
            RequestType::Default => true,
        }
    }
}

/// Fully resolved description of what to fetch, how to transform it and how
/// to serve it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedImageRequest {
    pub request_type: RequestType,

    pub bucket: String,

    pub key: String,

    pub edits: EditSet,

    /// Original image bytes (not serialized)
    #[serde(skip)]
    pub original_image: Bytes,

    pub content_type: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_format: Option<OutputFormat>,

    pub cache_control: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,

    /// Response headers passed through from the request
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,

    /// WebP reduction effort (only when the negotiated format is WebP)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reduction_effort: Option<u8>,
}

// =============================================================================
// Resolver
// =============================================================================

/// Resolves inbound image request events.
///
/// # Example
///
/// ```ignore
/// use image_request_resolver::{ImageRequestEvent, ImageRequestResolver, ResolverConfig};
///
/// let config = ResolverConfig::new("my-images").with_auto_webp(true);
/// let resolver = ImageRequestResolver::unsigned(config, store);
///
/// let event = ImageRequestEvent::new("/image/abc/large").with_header("Accept", "image/webp");
/// let request = resolver.resolve(&event).await?;
/// assert_eq!(request.content_type, "image/webp");
/// ```
pub struct ImageRequestResolver<S, P> {
    config: ResolverConfig,
    store: S,
    signature: Option<SignatureValidator<P>>,
}

impl<S: ObjectStore> ImageRequestResolver<S, StaticSecretProvider> {
    /// Create a resolver with no secret source.
    ///
    /// If the configuration enables signing, every signed request fails
    /// validation because no secret can be found.
    pub fn unsigned(config: ResolverConfig, store: S) -> Self {
        Self::new(config, store, StaticSecretProvider::new())
    }
}

impl<S: ObjectStore, P: SecretProvider> ImageRequestResolver<S, P> {
    /// Create a resolver.
    ///
    /// `secrets` is only consulted when signature validation is enabled.
    pub fn new(config: ResolverConfig, store: S, secrets: P) -> Self {
        let signature = SignatureValidator::from_config(secrets, &config);
        Self {
            config,
            store,
            signature,
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// List the allowed source buckets.
    pub fn allowed_source_buckets(&self) -> Result<Vec<String>, ResolveError> {
        self.config.allowed_source_buckets()
    }

    /// Resolve an event into a [`ResolvedImageRequest`].
    ///
    /// Failures are logged and returned unchanged.
    pub async fn resolve(
        &self,
        event: &ImageRequestEvent,
    ) -> Result<ResolvedImageRequest, ResolveError> {
        match self.resolve_inner(event).await {
            Ok(request) => Ok(request),
            Err(err) => {
                log_failure(&event.path, &err);
                Err(err)
            }
        }
    }

    async fn resolve_inner(
        &self,
        event: &ImageRequestEvent,
    ) -> Result<ResolvedImageRequest, ResolveError> {
        if let Some(validator) = &self.signature {
            validator.validate(event).await?;
        }

        let overrides = RequestOverrides::from_event(event)?;
        let decoded = decode_path(&event.path, &self.config.default_bucket);
        debug!(
            bucket = %decoded.bucket,
            key = %decoded.key,
            profile = %decoded.profile_name,
            "Decoded request path"
        );

        let object = self.store.fetch(&decoded.bucket, &decoded.key).await?;
        let content_type = resolve_content_type(object.content_type.as_deref(), &object.body)?;

        let accept = event.accept();
        let negotiation = negotiate(NegotiationInput {
            content_type: &content_type,
            edits: &decoded.edits,
            requested: overrides.output_format,
            accept: accept.as_deref(),
            auto_webp: self.config.auto_webp,
        });

        let reduction_effort = match negotiation.negotiated {
            Some(OutputFormat::Webp) => overrides.effort.as_deref().map(reduction_effort),
            _ => None,
        };

        let mut request = ResolvedImageRequest {
            request_type: RequestType::Default,
            bucket: decoded.bucket,
            key: decoded.key,
            edits: decoded.edits,
            original_image: object.body,
            content_type,
            output_format: None,
            cache_control: object
                .cache_control
                .unwrap_or_else(|| DEFAULT_CACHE_CONTROL.to_string()),
            expires: object.expires,
            last_modified: object.last_modified,
            headers: overrides.headers,
            reduction_effort,
        };

        if let Some(format) = negotiation.output_format {
            request.output_format = Some(format);
            request.content_type = format.content_type();
            if request.request_type.supports_quality_reconciliation() {
                reconcile_quality_key(&mut request.edits, format);
            }
        }

        debug!(
            content_type = %request.content_type,
            output_format = ?request.output_format,
            "Resolved image request"
        );
        Ok(request)
    }
}

/// Log a resolution failure at a level matching its severity.
fn log_failure(path: &str, err: &ResolveError) {
    let status = err.status();
    if status.is_server_error() {
        error!(
            error_type = err.code(),
            status = status.as_u16(),
            path = path,
            "Request resolution failed: {}",
            err
        );
    } else if status == http::StatusCode::NOT_FOUND {
        debug!(
            error_type = err.code(),
            status = status.as_u16(),
            path = path,
            "Request resolution failed: {}",
            err
        );
    } else {
        warn!(
            error_type = err.code(),
            status = status.as_u16(),
            path = path,
            "Request resolution failed: {}",
            err
        );
    }
}
