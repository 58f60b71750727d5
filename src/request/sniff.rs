//! Content-type sniffing from magic bytes.
//!
//! Storage often reports a generic `binary/octet-stream` type for images
//! uploaded without metadata. In that case the first four bytes are rendered
//! as uppercase hex and looked up exactly:
//!
//! | hex prefix                               | content type |
//! |------------------------------------------|--------------|
//! | `89504E47`                               | `image/png`  |
//! | `FFD8FFDB` `FFD8FFE0` `FFD8FFEE` `FFD8FFE1` | `image/jpeg` |
//! | `52494646`                               | `image/webp` |
//! | `49492A00` `4D4D002A`                     | `image/tiff` |

use tracing::debug;

use crate::error::ResolveError;

/// Generic content type S3 assigns to objects uploaded without one.
pub const GENERIC_CONTENT_TYPE: &str = "binary/octet-stream";

/// Content type used when storage reports none at all.
pub const FALLBACK_CONTENT_TYPE: &str = "image";

/// Content type of SVG sources.
pub const SVG_CONTENT_TYPE: &str = "image/svg+xml";

/// Number of leading bytes inspected.
const SIGNATURE_LEN: usize = 4;

/// Infer an image's MIME type from its leading bytes.
///
/// Fails with [`ResolveError::UnsupportedImageType`] when the bytes match no
/// known signature, including buffers shorter than four bytes.
pub fn infer_content_type(bytes: &[u8]) -> Result<&'static str, ResolveError> {
    let prefix = hex::encode_upper(&bytes[..bytes.len().min(SIGNATURE_LEN)]);

    match prefix.as_str() {
        "89504E47" => Ok("image/png"),
        "FFD8FFDB" | "FFD8FFE0" | "FFD8FFEE" | "FFD8FFE1" => Ok("image/jpeg"),
        "52494646" => Ok("image/webp"),
        "49492A00" | "4D4D002A" => Ok("image/tiff"),
        _ => {
            debug!(prefix = %prefix, "Unrecognised image signature");
            Err(ResolveError::UnsupportedImageType)
        }
    }
}

/// Decide the source content type from storage metadata and body.
///
/// The reported type is trusted verbatim unless it is the generic
/// octet-stream type, in which case the body is sniffed.
pub fn resolve_content_type(reported: Option<&str>, body: &[u8]) -> Result<String, ResolveError> {
    match reported {
        Some(GENERIC_CONTENT_TYPE) => infer_content_type(body).map(str::to_string),
        Some(content_type) => Ok(content_type.to_string()),
        None => Ok(FALLBACK_CONTENT_TYPE.to_string()),
    }
}
