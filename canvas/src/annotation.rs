//! External metadata records and how they color and label placed objects.
//!
//! A record is a `(label, description, rating)` triple fetched once at startup.
//! Attaching one to an object recolors it from a fixed six-entry rating table:
//! built-in objects have their fill replaced, images get a multiplicative tint.
//! Detaching restores the template fill or clears the tint.

#[cfg(test)]
#[path = "annotation_test.rs"]
mod annotation_test;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::doc::{Body, PlacedObject};

/// Closed set of rating tags carried by metadata records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RatingTag {
    #[serde(rename = "5S")]
    FiveS,
    #[serde(rename = "4S")]
    FourS,
    #[serde(rename = "3S")]
    ThreeS,
    #[serde(rename = "2S")]
    TwoS,
    #[serde(rename = "1S")]
    OneS,
    #[serde(rename = "0N")]
    ZeroN,
}

impl RatingTag {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FiveS => "5S",
            Self::FourS => "4S",
            Self::ThreeS => "3S",
            Self::TwoS => "2S",
            Self::OneS => "1S",
            Self::ZeroN => "0N",
        }
    }

    /// Fill / tint color (RGB) for this rating.
    #[must_use]
    pub fn color(self) -> u32 {
        match self {
            Self::FiveS => 0x0000_FF00,
            Self::FourS => 0x0099_FF66,
            Self::ThreeS => 0x00FF_FF00,
            Self::TwoS => 0x00FF_9900,
            Self::OneS => 0x00FF_0000,
            Self::ZeroN => 0x0000_0000,
        }
    }
}

impl fmt::Display for RatingTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One external record. On the wire it is a 3-element array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(String, String, RatingTag)", into = "(String, String, RatingTag)")]
pub struct MetadataRecord {
    pub label: String,
    pub description: String,
    pub rating: RatingTag,
}

impl From<(String, String, RatingTag)> for MetadataRecord {
    fn from((label, description, rating): (String, String, RatingTag)) -> Self {
        Self { label, description, rating }
    }
}

impl From<MetadataRecord> for (String, String, RatingTag) {
    fn from(r: MetadataRecord) -> Self {
        (r.label, r.description, r.rating)
    }
}

impl MetadataRecord {
    #[must_use]
    pub fn new(label: impl Into<String>, description: impl Into<String>, rating: RatingTag) -> Self {
        Self { label: label.into(), description: description.into(), rating }
    }

    /// One-line summary used in choice lists.
    #[must_use]
    pub fn summary(&self) -> String {
        format!("{} - {} - {}", self.label, self.description, self.rating)
    }
}

/// Attach `record` to `obj`, recoloring it and refreshing its tooltip.
/// Replaces any record already attached.
pub fn attach(obj: &mut PlacedObject, record: MetadataRecord) {
    let color = record.rating.color();
    match &mut obj.body {
        Body::Shape { fill, .. } => *fill = color,
        Body::Image { tint, .. } => *tint = Some(color),
    }
    tracing::debug!(id = %obj.id, rating = %record.rating, "annotation attached");
    obj.annotation = Some(record);
    obj.tooltip = tooltip_text(obj);
}

/// Remove the attached record, if any, restoring the object's base look.
pub fn detach(obj: &mut PlacedObject) {
    if obj.annotation.take().is_none() {
        return;
    }
    match &mut obj.body {
        Body::Shape { kind, fill, .. } => *fill = kind.template().fill,
        Body::Image { tint, .. } => *tint = None,
    }
    tracing::debug!(id = %obj.id, "annotation detached");
    obj.tooltip = tooltip_text(obj);
}

/// Hover text for an object.
#[must_use]
pub fn tooltip_text(obj: &PlacedObject) -> String {
    if let Some(record) = &obj.annotation {
        return format!("{}\n{}\n{}", record.label, record.description, record.rating);
    }
    match &obj.body {
        Body::Image { image, .. } => format!("{}\nRight-click: Change image/Data\nMiddle-click: Drag", image.name),
        Body::Shape { kind, .. } => format!("{}\nRight-click to assign data\nMiddle-click to drag", kind.as_str()),
    }
}
