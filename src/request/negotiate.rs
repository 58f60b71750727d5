//! Output format negotiation and quality-key reconciliation.
//!
//! Negotiation runs in two passes:
//!
//! 1. **SVG pre-pass**: an SVG source that carries edits but no `toFormat`
//!    is rasterised, so its output format is forced to PNG.
//! 2. **General pass**: runs for non-SVG sources, and for SVG sources that
//!    have an explicit `toFormat` or were forced by the pre-pass. The first
//!    matching rule wins:
//!    - auto-WebP is enabled and `Accept` contains `image/webp` → WebP
//!    - the request asked for a format → that format
//!    - otherwise the format is left as it was
//!
//!    A `toFormat` edit overrides the result unconditionally.

use super::edits::EditSet;
use super::format::OutputFormat;
use super::sniff::SVG_CONTENT_TYPE;

/// Media type that signals WebP support in an `Accept` header.
const WEBP_MEDIA_TYPE: &str = "image/webp";

/// Inputs to format negotiation.
#[derive(Debug, Clone, Copy)]
pub struct NegotiationInput<'a> {
    /// Source content type
    pub content_type: &'a str,

    /// Edits derived for the request
    pub edits: &'a EditSet,

    /// Format explicitly requested by the client
    pub requested: Option<OutputFormat>,

    /// `Accept` header, if any
    pub accept: Option<&'a str>,

    /// Whether auto-WebP is enabled
    pub auto_webp: bool,
}

/// Outcome of format negotiation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Negotiation {
    /// Format chosen by the general pass before any `toFormat` override
    pub negotiated: Option<OutputFormat>,

    /// Final output format, `None` to keep the source format
    pub output_format: Option<OutputFormat>,
}

/// Whether an `Accept` header advertises WebP support.
pub fn accepts_webp(accept: Option<&str>) -> bool {
    accept.is_some_and(|accept| accept.contains(WEBP_MEDIA_TYPE))
}

/// SVG pre-pass: force PNG for SVG sources with edits but no target format.
pub fn svg_prepass(content_type: &str, edits: &EditSet) -> Option<OutputFormat> {
    if content_type == SVG_CONTENT_TYPE && !edits.is_empty() && edits.to_format().is_none() {
        Some(OutputFormat::Png)
    } else {
        None
    }
}

/// General pass precedence: auto-WebP, then the requested format.
pub fn negotiate_format(
    auto_webp: bool,
    accept: Option<&str>,
    requested: Option<OutputFormat>,
) -> Option<OutputFormat> {
    if auto_webp && accepts_webp(accept) {
        Some(OutputFormat::Webp)
    } else {
        requested
    }
}

/// Run both negotiation passes.
pub fn negotiate(input: NegotiationInput<'_>) -> Negotiation {
    let mut output_format = svg_prepass(input.content_type, input.edits);
    let to_format = input.edits.to_format();

    let is_svg = input.content_type == SVG_CONTENT_TYPE;
    if is_svg && to_format.is_none() && output_format.is_none() {
        return Negotiation {
            negotiated: None,
            output_format,
        };
    }

    let negotiated = negotiate_format(input.auto_webp, input.accept, input.requested);
    if to_format.is_some() {
        output_format = to_format;
    } else if negotiated.is_some() {
        output_format = negotiated;
    }

    Negotiation {
        negotiated,
        output_format,
    }
}

/// Move the quality edit to the key of the chosen output format.
///
/// Looks for edit keys naming an output format other than `output_format`.
/// If there is exactly one, its parameters move under `output_format` and
/// the old key is deleted. With zero or several candidates the edit set is
/// left unchanged. Returns whether a key was moved.
///
/// Applying this twice gives the same result as applying it once.
pub fn reconcile_quality_key(edits: &mut EditSet, output_format: OutputFormat) -> bool {
    let candidates: Vec<String> = edits
        .keys()
        .filter(|key| {
            OutputFormat::from_edit_key(key).is_some_and(|format| format != output_format)
        })
        .map(str::to_string)
        .collect();

    match candidates.as_slice() {
        [only] => edits.rename(only, output_format.as_str()),
        _ => false,
    }
}
