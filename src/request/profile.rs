//! Static size profiles.
//!
//! | profile       | dimension | quality | blur |
//! |---------------|-----------|---------|------|
//! | `small`       | 300       | 80      |      |
//! | `medium`      | 600       | 90      |      |
//! | `large`       | 1000      | 95      |      |
//! | `placeholder` | 40        | 50      | 10   |

use std::fmt;

/// Blur magnitude applied to the `placeholder` profile.
pub const PLACEHOLDER_BLUR: u32 = 10;

/// A named bundle of target dimension and encode quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SizeProfile {
    Small,
    Medium,
    Large,
    Placeholder,
}

impl SizeProfile {
    pub const ALL: [SizeProfile; 4] = [
        SizeProfile::Small,
        SizeProfile::Medium,
        SizeProfile::Large,
        SizeProfile::Placeholder,
    ];

    /// Look up a profile by exact (case-sensitive) name.
    ///
    /// `None` means "no such profile": the caller applies no size or quality
    /// edit rather than a zero value.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|profile| profile.name() == name)
    }

    pub const fn name(&self) -> &'static str {
        match self {
            SizeProfile::Small => "small",
            SizeProfile::Medium => "medium",
            SizeProfile::Large => "large",
            SizeProfile::Placeholder => "placeholder",
        }
    }

    /// Target width and height in pixels.
    pub const fn dimension(&self) -> u32 {
        match self {
            SizeProfile::Small => 300,
            SizeProfile::Medium => 600,
            SizeProfile::Large => 1000,
            SizeProfile::Placeholder => 40,
        }
    }

    /// JPEG and WebP encode quality.
    pub const fn quality(&self) -> u8 {
        match self {
            SizeProfile::Small => 80,
            SizeProfile::Medium => 90,
            SizeProfile::Large => 95,
            SizeProfile::Placeholder => 50,
        }
    }

    /// Blur magnitude, only defined for `placeholder`.
    pub const fn blur(&self) -> Option<u32> {
        match self {
            SizeProfile::Placeholder => Some(PLACEHOLDER_BLUR),
            _ => None,
        }
    }
}

impl fmt::Display for SizeProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
