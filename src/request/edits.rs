//! Ordered edit sets.
//!
//! An [`EditSet`] maps edit names (`resize`, `webp`, `jpeg`, `blur`,
//! `toFormat`, ...) to their parameters. Keys are unique and keep insertion
//! order, which is also the order they serialize in.

use serde::ser::{Serialize, SerializeMap, Serializer};

use super::format::OutputFormat;

/// Edit key for resizing.
pub const RESIZE_KEY: &str = "resize";

/// Edit key for blurring.
pub const BLUR_KEY: &str = "blur";

/// Edit key for an explicit target format.
pub const TO_FORMAT_KEY: &str = "toFormat";

/// How a resize fits the image into the target box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Fit {
    /// Crop to fill the box
    Cover,
    /// Letterbox inside the box
    Contain,
    /// Stretch to the box
    Fill,
    /// Shrink to fit within the box, preserving aspect ratio
    #[default]
    Inside,
    /// Grow to cover the box, preserving aspect ratio
    Outside,
}

/// Parameters of a `resize` edit. Undefined dimensions are omitted.
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Serialize)]
pub struct Resize {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,

    pub fit: Fit,
}

/// Parameters of a per-format quality edit (`jpeg`, `webp`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
pub struct Quality {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<u8>,
}

/// A single edit operation's parameters.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(untagged)]
pub enum Edit {
    Resize(Resize),
    Quality(Quality),
    Blur(u32),
    ToFormat(OutputFormat),
}

/// Ordered mapping of edit name to parameters.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EditSet {
    entries: Vec<(String, Edit)>,
}

impl EditSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an edit. An existing key keeps its position and has its
    /// parameters replaced.
    pub fn insert(&mut self, key: impl Into<String>, edit: Edit) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = edit,
            None => self.entries.push((key, edit)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Edit> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, edit)| edit)
    }

    pub fn remove(&mut self, key: &str) -> Option<Edit> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Move the parameters of `from` under `to`, deleting `from`.
    ///
    /// Returns `false` and leaves the set untouched if `from` is absent.
    pub fn rename(&mut self, from: &str, to: &str) -> bool {
        if from == to {
            return self.contains_key(from);
        }
        match self.remove(from) {
            Some(edit) => {
                self.insert(to, edit);
                true
            }
            None => false,
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Edit)> {
        self.entries.iter().map(|(k, edit)| (k.as_str(), edit))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The `resize` edit, if present.
    pub fn resize(&self) -> Option<&Resize> {
        match self.get(RESIZE_KEY) {
            Some(Edit::Resize(resize)) => Some(resize),
            _ => None,
        }
    }

    /// The quality configured under the edit key for `format`.
    pub fn quality(&self, format: OutputFormat) -> Option<u8> {
        match self.get(format.as_str()) {
            Some(Edit::Quality(quality)) => quality.quality,
            _ => None,
        }
    }

    /// The explicit `toFormat` target, if present.
    pub fn to_format(&self) -> Option<OutputFormat> {
        match self.get(TO_FORMAT_KEY) {
            Some(Edit::ToFormat(format)) => Some(*format),
            _ => None,
        }
    }
}

impl Serialize for EditSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, edit) in &self.entries {
            map.serialize_entry(key, edit)?;
        }
        map.end()
    }
}
