use http::StatusCode;
use serde::Serialize;
use thiserror::Error;

/// Errors returned by an object store.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    /// Object does not exist in the bucket
    #[error("Object not found: s3://{bucket}/{key}")]
    NotFound { bucket: String, key: String },

    /// Error from S3 or S3-compatible storage
    #[error("S3 error: {0}")]
    S3(String),

    /// Network or connection error while streaming the body
    #[error("Connection error: {0}")]
    Connection(String),
}

/// Errors returned by a secret provider.
#[derive(Debug, Clone, Error)]
pub enum SecretError {
    /// No secret is stored under the identifier
    #[error("Secret not found: {0}")]
    NotFound(String),

    /// Provider failed to produce the secret
    #[error("Secret provider error: {0}")]
    Provider(String),
}

/// Message returned when the leading bytes of an image match no known signature.
pub const UNSUPPORTED_IMAGE_MESSAGE: &str = "The file does not have an extension and the file type could not be inferred. \
     Please ensure that your original image is of a supported file type (jpg, png, tiff, webp, svg).";

/// Terminal failure of request resolution.
///
/// Every variant carries a fixed HTTP status, a short machine-readable code
/// and a human-readable message. See [`ResolveError::status`] and
/// [`ResolveError::code`].
#[derive(Debug, Clone, Error)]
pub enum ResolveError {
    /// Signing is enabled but the query string has no `signature`
    #[error("Query-string requires the signature parameter.")]
    MissingSignature,

    /// Signature was supplied but does not match the request path
    #[error("Signature does not match.")]
    SignatureMismatch,

    /// Secret retrieval, parsing or HMAC computation failed
    #[error("Signature validation failed: {reason}")]
    SignatureValidation { reason: String },

    /// Leading bytes of the original image are not a supported type
    #[error("{}", UNSUPPORTED_IMAGE_MESSAGE)]
    UnsupportedImageType,

    /// Allowed source buckets are not configured
    #[error(
        "The SOURCE_BUCKETS setting could not be read. Please check that it is not empty \
         and contains at least one source bucket, or multiple buckets separated by commas."
    )]
    NoSourceBuckets,

    /// A query-string override could not be decoded
    #[error("Invalid value for '{param}': {reason}")]
    InvalidOverride { param: String, reason: String },

    /// Requested object key is absent in storage
    #[error("The image {key} does not exist or the request may not be base64 encoded properly.")]
    ObjectNotFound { bucket: String, key: String },

    /// Any unclassified storage failure
    #[error("Failed to fetch the original image: {message}")]
    Storage { message: String },
}

impl ResolveError {
    /// HTTP status this error maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            ResolveError::MissingSignature
            | ResolveError::NoSourceBuckets
            | ResolveError::InvalidOverride { .. } => StatusCode::BAD_REQUEST,
            ResolveError::SignatureMismatch => StatusCode::FORBIDDEN,
            ResolveError::ObjectNotFound { .. } => StatusCode::NOT_FOUND,
            ResolveError::SignatureValidation { .. }
            | ResolveError::UnsupportedImageType
            | ResolveError::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            ResolveError::MissingSignature => "AuthorizationQueryParametersError",
            ResolveError::SignatureMismatch => "SignatureDoesNotMatch",
            ResolveError::SignatureValidation { .. } => "SignatureValidationFailure",
            ResolveError::UnsupportedImageType => "RequestTypeError",
            ResolveError::NoSourceBuckets => "GetAllowedSourceBuckets::NoSourceBuckets",
            ResolveError::InvalidOverride { .. } => "DecodeRequest::InvalidOverride",
            ResolveError::ObjectNotFound { .. } => "NoSuchKey",
            ResolveError::Storage { .. } => "ImageFetchError",
        }
    }

    /// Build the serializable error body for this error.
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            status: self.status().as_u16(),
            code: self.code().to_string(),
            message: self.to_string(),
        }
    }
}

impl From<StorageError> for ResolveError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound { bucket, key } => ResolveError::ObjectNotFound { bucket, key },
            other => ResolveError::Storage {
                message: other.to_string(),
            },
        }
    }
}

/// JSON error body handed back to the calling handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    /// HTTP status code
    pub status: u16,

    /// Error code (e.g. "SignatureDoesNotMatch")
    pub code: String,

    /// Human-readable error message
    pub message: String,
}
