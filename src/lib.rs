//! # Image Request Resolver
//!
//! Turns an inbound image request (URL path, headers, query string) into a
//! fully resolved description of which object to fetch, which edits to
//! apply and which format and headers to serve it with.
//!
//! The resolver sits between an edge router and an image-processing backend.
//! It never decodes or encodes pixels; it only decides the parameters.
//!
//! ## Features
//!
//! - **Size profiles**: `/image/<id>/<profile>` maps to fixed resize and quality edits
//! - **Format negotiation**: auto-WebP via `Accept`, explicit formats, SVG rasterisation
//! - **Content sniffing**: magic-byte detection for generically typed objects
//! - **Signed requests**: optional HMAC-SHA256 signatures with keys from a secret provider
//!
//! ## Architecture
//!
//! - [`config`] - CLI and resolver configuration
//! - [`error`] - Tagged error taxonomy
//! - [`event`] - Inbound request events
//! - [`auth`] - Signature validation and secret providers
//! - [`storage`] - Object store trait and S3 implementation
//! - [`request`] - Path decoding, edits, sniffing and format negotiation
//! - [`resolver`] - The orchestrating [`ImageRequestResolver`]
//!
//! ## Example
//!
//! ```rust
//! use image_request_resolver::{infer_content_type, ResolverConfig};
//!
//! let config = ResolverConfig::new("my-images").with_source_buckets("my-images, archive");
//! assert_eq!(config.allowed_source_buckets().unwrap(), vec!["my-images", "archive"]);
//!
//! assert_eq!(infer_content_type(&[0x89, 0x50, 0x4E, 0x47]).unwrap(), "image/png");
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod event;
pub mod request;
pub mod resolver;
pub mod storage;

// Re-export commonly used types
pub use auth::{
    sign_path, signed_url, CachedSecretProvider, FileSecretProvider, SecretProvider,
    SignatureValidator, StaticSecretProvider,
};
pub use config::{Cli, Command, ResolveArgs, ResolverConfig, SignArgs, SniffArgs};
pub use error::{ErrorResponse, ResolveError, SecretError, StorageError};
pub use event::ImageRequestEvent;
pub use request::{
    decode_path, infer_content_type, reconcile_quality_key, Edit, EditSet, Fit, OutputFormat,
    SizeProfile,
};
pub use resolver::{ImageRequestResolver, RequestType, ResolvedImageRequest};
pub use storage::{create_s3_client, ObjectStore, S3ObjectStore, StoredObject};
