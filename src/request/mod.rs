//! Request decoding and output decisions.
//!
//! # Pipeline
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐   ┌──────────────────┐
//! │ Path decoder │──▶│   Sniffer    │──▶│  Negotiator  │──▶│ Quality-key      │
//! │ (profile →   │   │ (magic bytes │   │ (SVG pre-pass│   │ reconciler       │
//! │  edits)      │   │  → MIME)     │   │  + general)  │   │ (rename quality) │
//! └──────────────┘   └──────────────┘   └──────────────┘   └──────────────────┘
//! ```
//!
//! Every stage here is a pure function of its inputs. The fetch of the
//! original bytes between decoding and sniffing happens in
//! [`crate::resolver`].

mod edits;
mod format;
mod negotiate;
mod overrides;
mod path;
mod profile;
mod sniff;

pub use edits::{Edit, EditSet, Fit, Quality, Resize, BLUR_KEY, RESIZE_KEY, TO_FORMAT_KEY};
pub use format::OutputFormat;
pub use negotiate::{
    accepts_webp, negotiate, negotiate_format, reconcile_quality_key, svg_prepass, Negotiation,
    NegotiationInput,
};
pub use overrides::{
    reduction_effort, RequestOverrides, DEFAULT_REDUCTION_EFFORT, MAX_REDUCTION_EFFORT,
    MIN_REDUCTION_EFFORT,
};
pub use path::{decode_path, DecodedPath, CONTENT_KEY_PREFIX};
pub use profile::{SizeProfile, PLACEHOLDER_BLUR};
pub use sniff::{
    infer_content_type, resolve_content_type, FALLBACK_CONTENT_TYPE, GENERIC_CONTENT_TYPE,
    SVG_CONTENT_TYPE,
};
