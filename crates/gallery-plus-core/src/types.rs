//! Core data types returned across the host boundary.
//!
//! Field names serialize in camelCase so the records can be handed to a
//! JavaScript host unchanged.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of media asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
}

impl MediaType {
    /// Classify a MIME type string (`image/*` or `video/*`).
    pub fn from_mime(mime: &str) -> Option<Self> {
        if mime.starts_with("image/") {
            Some(Self::Image)
        } else if mime.starts_with("video/") {
            Some(Self::Video)
        } else {
            None
        }
    }
}

/// Special photographic characteristics of an asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaSubtype {
    /// A Live Photo or Motion Photo
    MotionPhoto,
    Panorama,
    Hdr,
    Screenshot,
    /// A photo with depth effect
    Portrait,
    SlowMotion,
    Timelapse,
}

impl MediaSubtype {
    /// Classification order; the first flag present wins.
    pub const PRIORITY: [MediaSubtype; 7] = [
        MediaSubtype::MotionPhoto,
        MediaSubtype::Panorama,
        MediaSubtype::Hdr,
        MediaSubtype::Screenshot,
        MediaSubtype::Portrait,
        MediaSubtype::SlowMotion,
        MediaSubtype::Timelapse,
    ];

    /// Bit used for this subtype in [`SubtypeFlags`].
    pub const fn flag(self) -> SubtypeFlags {
        SubtypeFlags(1 << self as u16)
    }
}

/// Set of subtype bits attached to an asset by its source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SubtypeFlags(u16);

impl SubtypeFlags {
    pub const NONE: SubtypeFlags = SubtypeFlags(0);

    pub fn insert(&mut self, subtype: MediaSubtype) {
        self.0 |= subtype.flag().0;
    }

    pub fn with(mut self, subtype: MediaSubtype) -> Self {
        self.insert(subtype);
        self
    }

    pub fn contains(self, subtype: MediaSubtype) -> bool {
        self.0 & subtype.flag().0 != 0
    }

    /// True when any bit of `mask` is set.
    pub fn intersects(self, mask: SubtypeFlags) -> bool {
        self.0 & mask.0 != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl FromIterator<MediaSubtype> for SubtypeFlags {
    fn from_iter<I: IntoIterator<Item = MediaSubtype>>(iter: I) -> Self {
        iter.into_iter()
            .fold(SubtypeFlags::NONE, |flags, subtype| flags.with(subtype))
    }
}

/// Media library access status as reported to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PermissionStatus {
    Granted,
    Denied,
    /// Access to part of the library only
    Limited,
    NotDetermined,
    /// No library exists on this host
    Unavailable,
    Unknown,
}

impl PermissionStatus {
    /// Whether a listing may proceed under this status.
    pub fn allows_listing(self) -> bool {
        matches!(self, Self::Granted | Self::Limited)
    }
}

impl fmt::Display for PermissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Granted => "granted",
            Self::Denied => "denied",
            Self::Limited => "limited",
            Self::NotDetermined => "notDetermined",
            Self::Unavailable => "unavailable",
            Self::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// Response of a permission check: `{"status": ...}`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PermissionResponse {
    pub status: PermissionStatus,
}

/// One media record handed to the host.
///
/// Only `id`, `type` and `createdAt` are always present. Every other field is
/// filled when requested and when extraction succeeds; an absent field does
/// not tell the caller which of the two happened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    /// Identifier, stable for the current session only
    pub id: String,

    #[serde(rename = "type")]
    pub media_type: MediaType,

    /// Creation time, milliseconds since the Unix epoch
    pub created_at: i64,

    /// Inline base64 JPEG (library) or blob URL (picker). Images only; videos
    /// are listed without a thumbnail.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,

    /// Average color as `#RRGGBB`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_color: Option<String>,

    /// Original file name (picker only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,

    /// EXIF orientation (1-8)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orientation: Option<u32>,

    /// Color model of the encoded image ("RGB", "Gray")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_model: Option<String>,

    /// Size of the primary resource in bytes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,

    /// Accessible URI of the original
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_favorite: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_hidden: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtype: Option<MediaSubtype>,
}

impl MediaItem {
    /// Create a record with only the mandatory fields set.
    pub fn new(id: impl Into<String>, media_type: MediaType, created_at: i64) -> Self {
        Self {
            id: id.into(),
            media_type,
            created_at,
            thumbnail: None,
            base_color: None,
            name: None,
            width: None,
            height: None,
            orientation: None,
            color_model: None,
            file_size: None,
            path: None,
            mime_type: None,
            is_favorite: None,
            is_hidden: None,
            subtype: None,
        }
    }
}

/// Result of a listing call: `{"media": [...]}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MediaList {
    pub media: Vec<MediaItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_item_serializes_camel_case_and_skips_absent() {
        let mut item = MediaItem::new("a/b.jpg", MediaType::Image, 1_700_000_000_000);
        item.base_color = Some("#A0B1C2".into());
        item.subtype = Some(MediaSubtype::MotionPhoto);

        let json = serde_json::to_string(&item).unwrap();
        assert!(json.contains("\"type\":\"image\""));
        assert!(json.contains("\"createdAt\":1700000000000"));
        assert!(json.contains("\"baseColor\":\"#A0B1C2\""));
        assert!(json.contains("\"subtype\":\"motion_photo\""));
        assert!(!json.contains("thumbnail"));
        assert!(!json.contains("width"));
    }

    #[test]
    fn test_permission_status_wire_names() {
        let json = serde_json::to_string(&PermissionResponse {
            status: PermissionStatus::NotDetermined,
        })
        .unwrap();
        assert_eq!(json, r#"{"status":"notDetermined"}"#);
        assert_eq!(PermissionStatus::Limited.to_string(), "limited");
    }

    #[test]
    fn test_only_granted_and_limited_allow_listing() {
        assert!(PermissionStatus::Granted.allows_listing());
        assert!(PermissionStatus::Limited.allows_listing());
        assert!(!PermissionStatus::Denied.allows_listing());
        assert!(!PermissionStatus::NotDetermined.allows_listing());
        assert!(!PermissionStatus::Unavailable.allows_listing());
    }

    #[test]
    fn test_subtype_flags() {
        let flags: SubtypeFlags = [MediaSubtype::Hdr, MediaSubtype::Portrait]
            .into_iter()
            .collect();
        assert!(flags.contains(MediaSubtype::Hdr));
        assert!(!flags.contains(MediaSubtype::Panorama));
        assert!(flags.intersects(MediaSubtype::Portrait.flag()));
        assert!(SubtypeFlags::NONE.is_empty());
    }

    #[test]
    fn test_media_type_from_mime() {
        assert_eq!(MediaType::from_mime("image/heic"), Some(MediaType::Image));
        assert_eq!(MediaType::from_mime("video/quicktime"), Some(MediaType::Video));
        assert_eq!(MediaType::from_mime("application/pdf"), None);
    }
}
