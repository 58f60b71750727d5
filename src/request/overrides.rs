//! Request-level overrides carried in the query string.
//!
//! - `format`: explicit output format (`jpeg`, `png`, `webp`, `tiff`, `heif`)
//! - `effort`: WebP reduction effort, 0-6
//! - `headers`: JSON object of response headers to pass through

use std::collections::BTreeMap;

use crate::error::ResolveError;
use crate::event::ImageRequestEvent;

use super::format::OutputFormat;

/// Reduction effort used when the requested value is unusable.
pub const DEFAULT_REDUCTION_EFFORT: u8 = 4;

/// Lowest accepted reduction effort.
pub const MIN_REDUCTION_EFFORT: u8 = 0;

/// Highest accepted reduction effort.
pub const MAX_REDUCTION_EFFORT: u8 = 6;

/// Overrides decoded from the request alongside the path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOverrides {
    /// Explicitly requested output format
    pub output_format: Option<OutputFormat>,

    /// Raw reduction effort, interpreted by [`reduction_effort`]
    pub effort: Option<String>,

    /// Response headers to pass through
    pub headers: Option<BTreeMap<String, String>>,
}

impl RequestOverrides {
    /// Decode overrides from the event's query string.
    pub fn from_event(event: &ImageRequestEvent) -> Result<Self, ResolveError> {
        let output_format = event
            .query_param("format")
            .map(|raw| {
                raw.parse::<OutputFormat>()
                    .map_err(|reason| ResolveError::InvalidOverride {
                        param: "format".to_string(),
                        reason,
                    })
            })
            .transpose()?;

        let headers = event
            .query_param("headers")
            .map(|raw| {
                serde_json::from_str::<BTreeMap<String, String>>(raw).map_err(|e| {
                    ResolveError::InvalidOverride {
                        param: "headers".to_string(),
                        reason: e.to_string(),
                    }
                })
            })
            .transpose()?;

        Ok(Self {
            output_format,
            effort: event.query_param("effort").map(str::to_string),
            headers,
        })
    }
}

/// Interpret a requested reduction effort.
///
/// Fractional values are truncated. Values outside 0-6 and non-numeric
/// input fall back to [`DEFAULT_REDUCTION_EFFORT`].
pub fn reduction_effort(raw: &str) -> u8 {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => {
            let truncated = value.trunc();
            if truncated >= f64::from(MIN_REDUCTION_EFFORT)
                && truncated <= f64::from(MAX_REDUCTION_EFFORT)
            {
                truncated as u8
            } else {
                DEFAULT_REDUCTION_EFFORT
            }
        }
        _ => DEFAULT_REDUCTION_EFFORT,
    }
}
