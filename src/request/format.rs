use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Output encodings the image backend can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Jpeg,
    Png,
    Webp,
    Tiff,
    Heif,
}

impl OutputFormat {
    /// Every format that may also appear as a quality edit key.
    pub const ALL: [OutputFormat; 5] = [
        OutputFormat::Jpeg,
        OutputFormat::Png,
        OutputFormat::Webp,
        OutputFormat::Tiff,
        OutputFormat::Heif,
    ];

    /// Canonical lowercase name, also used as the edit key.
    pub const fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpeg",
            OutputFormat::Png => "png",
            OutputFormat::Webp => "webp",
            OutputFormat::Tiff => "tiff",
            OutputFormat::Heif => "heif",
        }
    }

    /// MIME type served for this format (`image/<format>`).
    pub fn content_type(&self) -> String {
        format!("image/{}", self.as_str())
    }

    /// Map an edit key to the format it names.
    ///
    /// Only canonical names match; `jpg` is not an edit key.
    pub fn from_edit_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|format| format.as_str() == key)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(OutputFormat::Jpeg),
            "png" => Ok(OutputFormat::Png),
            "webp" => Ok(OutputFormat::Webp),
            "tiff" | "tif" => Ok(OutputFormat::Tiff),
            "heif" => Ok(OutputFormat::Heif),
            other => Err(format!("unknown output format: {}", other)),
        }
    }
}
