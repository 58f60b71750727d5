//! Path decoding for size-profile requests.
//!
//! Request paths have the form `/<prefix>/<identifier>/<profile>`:
//!
//! ```text
//! /image/abc/large  ->  bucket = <default bucket>
//!                       key    = content/abc
//!                       edits  = webp.quality, jpeg.quality, resize (fit inside)
//! ```
//!
//! The bucket is never read from the path.

use tracing::debug;

use super::edits::{Edit, EditSet, Fit, Quality, Resize, BLUR_KEY, RESIZE_KEY};
use super::format::OutputFormat;
use super::profile::SizeProfile;

/// Prefix prepended to the identifier to form the object key.
pub const CONTENT_KEY_PREFIX: &str = "content/";

/// The result of decoding a request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedPath {
    /// Image identifier (second path segment)
    pub identifier: String,

    /// Requested profile name (third path segment), as given
    pub profile_name: String,

    /// The matching profile, `None` if the name is unknown
    pub profile: Option<SizeProfile>,

    /// Bucket to fetch from
    pub bucket: String,

    /// Object key to fetch
    pub key: String,

    /// Edits derived from the profile
    pub edits: EditSet,
}

/// Decode `path` into identifier, profile and default edits.
///
/// Missing segments decode as empty strings. An unknown profile name is not
/// an error: its quality and resize parameters are left undefined.
pub fn decode_path(path: &str, default_bucket: &str) -> DecodedPath {
    let mut segments = path.trim_start_matches('/').split('/').skip(1);
    let identifier = segments.next().unwrap_or_default().to_string();
    let profile_name = segments.next().unwrap_or_default().to_string();

    let profile = SizeProfile::from_name(&profile_name);
    if profile.is_none() {
        debug!(profile = %profile_name, "Unknown size profile, leaving size and quality undefined");
    }

    DecodedPath {
        key: format!("{}{}", CONTENT_KEY_PREFIX, identifier),
        bucket: default_bucket.to_string(),
        edits: profile_edits(&profile_name, profile),
        identifier,
        profile_name,
        profile,
    }
}

/// Build the initial edit set for a profile.
fn profile_edits(profile_name: &str, profile: Option<SizeProfile>) -> EditSet {
    let quality = profile.map(|p| p.quality());
    let dimension = profile.map(|p| p.dimension());

    let mut edits = EditSet::new();
    edits.insert(
        OutputFormat::Webp.as_str(),
        Edit::Quality(Quality { quality }),
    );
    edits.insert(
        OutputFormat::Jpeg.as_str(),
        Edit::Quality(Quality { quality }),
    );
    edits.insert(
        RESIZE_KEY,
        Edit::Resize(Resize {
            width: dimension,
            height: dimension,
            fit: Fit::Inside,
        }),
    );

    if profile_name == SizeProfile::Placeholder.name() {
        if let Some(blur) = profile.and_then(|p| p.blur()) {
            edits.insert(BLUR_KEY, Edit::Blur(blur));
        }
    }

    edits
}
