//! Request signature validation.
//!
//! # Signing Scheme
//!
//! A request is signed by computing an HMAC-SHA256 over the raw request path
//! (without the query string) and appending the hex digest as the
//! `signature` query parameter:
//!
//! ```text
//! signature = hex(HMAC-SHA256(signing_key, path))
//! /image/abc/large?signature=5f0c...
//! ```
//!
//! The signing key is not configured directly. It is stored as a field of a
//! JSON secret fetched from a [`SecretProvider`]:
//!
//! ```text
//! secret "image-handler" = {"signing-key": "<signing key>"}
//! ```
//!
//! # Example
//!
//! ```rust
//! use image_request_resolver::auth::sign_path;
//!
//! let signature = sign_path("my-signing-key", "/image/abc/large").unwrap();
//! assert_eq!(signature.len(), 64);
//! ```

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use tracing::{debug, warn};
use url::form_urlencoded;

use crate::config::ResolverConfig;
use crate::error::ResolveError;
use crate::event::ImageRequestEvent;

use super::secrets::SecretProvider;

/// HMAC-SHA256 type alias
type HmacSha256 = Hmac<Sha256>;

/// Name of the query parameter carrying the signature.
pub const SIGNATURE_PARAM: &str = "signature";

// =============================================================================
// Signing
// =============================================================================

/// Compute the hex-encoded HMAC-SHA256 of `path` keyed with `signing_key`.
pub fn sign_path(signing_key: impl AsRef<[u8]>, path: &str) -> Result<String, ResolveError> {
    let mut mac = HmacSha256::new_from_slice(signing_key.as_ref()).map_err(|e| {
        ResolveError::SignatureValidation {
            reason: format!("HMAC initialisation failed: {}", e),
        }
    })?;
    mac.update(path.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Build a complete signed URL for `path`.
pub fn signed_url(
    base_url: &str,
    signing_key: impl AsRef<[u8]>,
    path: &str,
) -> Result<String, ResolveError> {
    let signature = sign_path(signing_key, path)?;
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair(SIGNATURE_PARAM, &signature)
        .finish();
    Ok(format!("{}{}?{}", base_url.trim_end_matches('/'), path, query))
}

/// Extract the string stored under `field` in a JSON-object secret.
pub fn extract_secret_field(secret: &str, field: &str) -> Result<String, ResolveError> {
    let parsed: serde_json::Value =
        serde_json::from_str(secret).map_err(|e| ResolveError::SignatureValidation {
            reason: format!("secret is not valid JSON: {}", e),
        })?;

    match parsed.get(field) {
        Some(serde_json::Value::String(value)) => Ok(value.clone()),
        Some(_) => Err(ResolveError::SignatureValidation {
            reason: format!("secret field '{}' is not a string", field),
        }),
        None => Err(ResolveError::SignatureValidation {
            reason: format!("secret has no field '{}'", field),
        }),
    }
}

// =============================================================================
// Validator
// =============================================================================

/// Verifies the `signature` query parameter of inbound requests.
pub struct SignatureValidator<P> {
    provider: P,
    secret_id: String,
    secret_field: String,
}

impl<P: SecretProvider> SignatureValidator<P> {
    /// Create a validator reading `secret_field` from secret `secret_id`.
    pub fn new(provider: P, secret_id: impl Into<String>, secret_field: impl Into<String>) -> Self {
        Self {
            provider,
            secret_id: secret_id.into(),
            secret_field: secret_field.into(),
        }
    }

    /// Create a validator from the resolver configuration.
    ///
    /// Returns `None` when signature validation is disabled. Missing secret
    /// settings are not rejected here; they surface as validation failures.
    pub fn from_config(provider: P, config: &ResolverConfig) -> Option<Self> {
        if !config.enable_signature {
            return None;
        }
        Some(Self::new(
            provider,
            config.secret_id.clone().unwrap_or_default(),
            config.secret_key.clone().unwrap_or_default(),
        ))
    }

    /// Validate the request signature.
    ///
    /// The secret provider is not consulted when the signature parameter is
    /// missing. Only a well-formed comparison that fails yields
    /// [`ResolveError::SignatureMismatch`]; every other failure is a
    /// [`ResolveError::SignatureValidation`].
    pub async fn validate(&self, event: &ImageRequestEvent) -> Result<(), ResolveError> {
        let provided = event
            .query_param(SIGNATURE_PARAM)
            .ok_or(ResolveError::MissingSignature)?;

        let signing_key = self.signing_key().await?;
        let expected = sign_path(signing_key.as_bytes(), &event.path)?;

        if expected.as_bytes().ct_eq(provided.as_bytes()).into() {
            debug!(path = %event.path, "Signature verified");
            Ok(())
        } else {
            warn!(path = %event.path, "Signature does not match");
            Err(ResolveError::SignatureMismatch)
        }
    }

    async fn signing_key(&self) -> Result<String, ResolveError> {
        let secret = self
            .provider
            .get_secret(&self.secret_id)
            .await
            .map_err(|e| ResolveError::SignatureValidation {
                reason: e.to_string(),
            })?;
        extract_secret_field(&secret, &self.secret_field)
    }
}

// =============================================================================
// Tests
// =============================================================================
