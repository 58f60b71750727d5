//! Configuration management for the image request resolver.
//!
//! Configuration is read once at process start, via clap from command-line
//! arguments or environment variables, and then handed to the resolver by
//! reference. Resolution itself never reads the environment.
//!
//! # Environment Variables
//!
//! - `DEFAULT_BUCKET` - Bucket that size-profile requests are served from (required)
//! - `SOURCE_BUCKETS` - Comma-separated list of allowed source buckets
//! - `ENABLE_SIGNATURE` - `Yes` to require signed request paths (default: No)
//! - `SECRETS_MANAGER` - Identifier of the secret holding the signing key
//! - `SECRET_KEY` - Field inside the secret whose value is the signing key
//! - `AUTO_WEBP` - `Yes` to serve WebP to clients that accept it (default: No)
//! - `S3_ENDPOINT` - Custom S3 endpoint for S3-compatible services
//! - `SECRETS_DIR` - Directory of mounted secrets (default: /run/secrets)
//! - `AWS_REGION` - AWS region (default: us-east-1)

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::error::ResolveError;

// =============================================================================
// Default Values
// =============================================================================

/// Default AWS region.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Default number of secrets kept by the cached secret provider.
pub const DEFAULT_SECRET_CACHE_CAPACITY: usize = 16;

/// Default directory mounted secrets are read from.
pub const DEFAULT_SECRETS_DIR: &str = "/run/secrets";

// =============================================================================
// Resolver Configuration
// =============================================================================

/// Process-level settings consumed by [`crate::ImageRequestResolver`].
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Bucket that size-profile requests are read from.
    #[arg(long, env = "DEFAULT_BUCKET")]
    pub default_bucket: String,

    /// Allowed source buckets (comma-separated, whitespace is trimmed).
    #[arg(long, env = "SOURCE_BUCKETS")]
    pub source_buckets: Option<String>,

    /// Require a valid `signature` query parameter on every request.
    #[arg(
        long,
        env = "ENABLE_SIGNATURE",
        default_value = "No",
        value_parser = parse_flag,
        action = ArgAction::Set
    )]
    pub enable_signature: bool,

    /// Identifier of the secret that holds the signing key.
    #[arg(long, env = "SECRETS_MANAGER")]
    pub secret_id: Option<String>,

    /// Field of the secret whose value is the signing key.
    #[arg(long, env = "SECRET_KEY")]
    pub secret_key: Option<String>,

    /// Serve WebP to clients whose Accept header includes `image/webp`.
    #[arg(
        long,
        env = "AUTO_WEBP",
        default_value = "No",
        value_parser = parse_flag,
        action = ArgAction::Set
    )]
    pub auto_webp: bool,
}

impl ResolverConfig {
    /// Create a configuration serving from `default_bucket`, with signing
    /// and auto-WebP disabled.
    pub fn new(default_bucket: impl Into<String>) -> Self {
        Self {
            default_bucket: default_bucket.into(),
            source_buckets: None,
            enable_signature: false,
            secret_id: None,
            secret_key: None,
            auto_webp: false,
        }
    }

    /// Enable signature validation using `secret_key` inside secret `secret_id`.
    pub fn with_signature(
        mut self,
        secret_id: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        self.enable_signature = true;
        self.secret_id = Some(secret_id.into());
        self.secret_key = Some(secret_key.into());
        self
    }

    /// Toggle automatic WebP negotiation.
    pub fn with_auto_webp(mut self, enabled: bool) -> Self {
        self.auto_webp = enabled;
        self
    }

    /// Set the raw comma-separated allowed source bucket list.
    pub fn with_source_buckets(mut self, buckets: impl Into<String>) -> Self {
        self.source_buckets = Some(buckets.into());
        self
    }

    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.default_bucket.trim().is_empty() {
            return Err(
                "Default bucket is required. Set --default-bucket or DEFAULT_BUCKET".to_string(),
            );
        }

        if self.enable_signature {
            if self.secret_id.as_deref().map_or(true, str::is_empty) {
                return Err("Signature validation is enabled but no secret identifier provided. \
                     Set --secret-id or SECRETS_MANAGER"
                    .to_string());
            }
            if self.secret_key.as_deref().map_or(true, str::is_empty) {
                return Err("Signature validation is enabled but no secret key provided. \
                     Set --secret-key or SECRET_KEY"
                    .to_string());
            }
        }

        Ok(())
    }

    /// List the allowed source buckets, in configured order.
    ///
    /// Fails with [`ResolveError::NoSourceBuckets`] when the list is missing
    /// or contains no bucket names.
    pub fn allowed_source_buckets(&self) -> Result<Vec<String>, ResolveError> {
        let raw = self
            .source_buckets
            .as_deref()
            .ok_or(ResolveError::NoSourceBuckets)?;

        let buckets: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|bucket| !bucket.is_empty())
            .map(str::to_string)
            .collect();

        if buckets.is_empty() {
            return Err(ResolveError::NoSourceBuckets);
        }
        Ok(buckets)
    }
}

/// Parse a `Yes`/`No` style flag. `true`/`false` are accepted as well.
pub fn parse_flag(value: &str) -> Result<bool, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "yes" | "true" | "1" => Ok(true),
        "no" | "false" | "0" | "" => Ok(false),
        other => Err(format!("expected Yes or No, got '{}'", other)),
    }
}

/// Parse a `name=value` or `name: value` header argument.
fn parse_header(value: &str) -> Result<(String, String), String> {
    let (name, value) = value
        .split_once(['=', ':'])
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", value))?;

    let name = name.trim();
    if name.is_empty() {
        return Err("header name must not be empty".to_string());
    }
    Ok((name.to_string(), value.trim().to_string()))
}

// =============================================================================
// CLI Arguments
// =============================================================================

/// Image request resolver - decides what to fetch, how to transform it and
/// how to serve it.
#[derive(Parser, Debug, Clone)]
#[command(name = "image-request-resolver")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging (debug level).
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Resolve a request URI against S3 and print the result as JSON.
    Resolve(ResolveArgs),

    /// Sign a request path with a shared secret.
    Sign(SignArgs),

    /// Print the content type inferred from a local file's leading bytes.
    Sniff(SniffArgs),
}

/// Arguments for `resolve`.
#[derive(Args, Debug, Clone)]
pub struct ResolveArgs {
    /// Request URI, e.g. `/image/abc/large?signature=...`
    pub uri: String,

    /// Accept header sent with the request.
    #[arg(long)]
    pub accept: Option<String>,

    /// Additional request headers as NAME=VALUE (repeatable).
    #[arg(long = "header", value_parser = parse_header)]
    pub headers: Vec<(String, String)>,

    /// Custom S3 endpoint URL for S3-compatible services (MinIO, etc.).
    #[arg(long, env = "S3_ENDPOINT")]
    pub s3_endpoint: Option<String>,

    /// AWS region for S3.
    #[arg(long, default_value = DEFAULT_REGION, env = "AWS_REGION")]
    pub s3_region: String,

    /// Directory holding mounted secrets, one file per secret identifier.
    #[arg(long, default_value = DEFAULT_SECRETS_DIR, env = "SECRETS_DIR")]
    pub secrets_dir: PathBuf,

    #[command(flatten)]
    pub resolver: ResolverConfig,
}

/// Arguments for `sign`.
#[derive(Args, Debug, Clone)]
pub struct SignArgs {
    /// Request path to sign, e.g. `/image/abc/large`
    pub path: String,

    /// Signing key (the value stored under SECRET_KEY in the secret).
    #[arg(long, env = "SIGNING_SECRET")]
    pub secret: String,

    /// Base URL to prefix the signed path with.
    #[arg(long)]
    pub base_url: Option<String>,
}

impl SignArgs {
    /// Validate the arguments and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.secret.is_empty() {
            return Err("Secret must not be empty".to_string());
        }
        if !self.path.starts_with('/') {
            return Err("Path must start with '/'".to_string());
        }
        Ok(())
    }
}

/// Arguments for `sniff`.
#[derive(Args, Debug, Clone)]
pub struct SniffArgs {
    /// Image file to inspect.
    pub file: PathBuf,
}

// =============================================================================
// Tests
// =============================================================================
