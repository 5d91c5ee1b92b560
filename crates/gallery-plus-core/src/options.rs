//! Per-call options for listing and single-item resolution.
//!
//! Every recognized option has an explicit field and default. The structs
//! deserialize from camelCase option bags with all fields optional, so a host
//! can forward `{"type":"image","limit":20}` as-is.

use serde::{Deserialize, Serialize};

use crate::config::ListingConfig;
use crate::error::{GalleryError, Result};
use crate::types::{MediaSubtype, MediaType, SubtypeFlags};

/// Media-type clause of a listing query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaTypeFilter {
    Image,
    Video,
    #[default]
    All,
}

impl MediaTypeFilter {
    pub fn matches(self, media_type: MediaType) -> bool {
        match self {
            Self::All => true,
            Self::Image => media_type == MediaType::Image,
            Self::Video => media_type == MediaType::Video,
        }
    }
}

/// Subtype clause of a listing query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubtypeFilter {
    #[default]
    All,
    Panorama,
    Hdr,
    Screenshot,
}

impl SubtypeFilter {
    /// Bits an asset must intersect, or `None` for no restriction.
    pub fn mask(self) -> Option<SubtypeFlags> {
        match self {
            Self::All => None,
            Self::Panorama => Some(MediaSubtype::Panorama.flag()),
            Self::Hdr => Some(MediaSubtype::Hdr.flag()),
            Self::Screenshot => Some(MediaSubtype::Screenshot.flag()),
        }
    }
}

/// Creation-time ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
}

/// Options for `get_media_list`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MediaListOptions {
    #[serde(rename = "type")]
    pub media_type: MediaTypeFilter,
    /// Maximum number of items in the page
    pub limit: usize,
    /// Zero-based offset into the sorted enumeration
    pub start_at: usize,
    /// Longest thumbnail edge in pixels
    pub thumbnail_size: u32,
    pub sort: SortOrder,
    /// Add width/height (and orientation/color model for images)
    pub include_details: bool,
    /// Add the averaged `baseColor`
    pub include_base_color: bool,
    pub filter: SubtypeFilter,
}

impl Default for MediaListOptions {
    fn default() -> Self {
        Self {
            media_type: MediaTypeFilter::All,
            limit: 50,
            start_at: 0,
            thumbnail_size: 200,
            sort: SortOrder::Newest,
            include_details: false,
            include_base_color: false,
            filter: SubtypeFilter::All,
        }
    }
}

impl MediaListOptions {
    /// Defaults taken from the `[listing]` config section.
    pub fn from_config(config: &ListingConfig) -> Self {
        Self {
            limit: config.default_limit,
            thumbnail_size: config.thumbnail_size,
            ..Self::default()
        }
    }

    /// Check the options against the largest thumbnail edge allowed.
    pub fn validate(&self, max_thumbnail_size: u32) -> Result<()> {
        if self.thumbnail_size == 0 {
            return Err(GalleryError::InvalidOptions(
                "thumbnailSize must be > 0".into(),
            ));
        }
        if self.thumbnail_size > max_thumbnail_size {
            return Err(GalleryError::InvalidOptions(format!(
                "thumbnailSize must be <= {}",
                max_thumbnail_size
            )));
        }
        Ok(())
    }
}

/// Options for `get_media`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MediaOptions {
    pub id: String,
    pub include_details: bool,
    pub include_base_color: bool,
    /// Materialize an accessible path (may copy the original to temp storage)
    pub generate_path: bool,
}

impl MediaOptions {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(GalleryError::InvalidOptions("id must not be empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_options_defaults() {
        let options = MediaListOptions::default();
        assert_eq!(options.media_type, MediaTypeFilter::All);
        assert_eq!(options.limit, 50);
        assert_eq!(options.start_at, 0);
        assert_eq!(options.thumbnail_size, 200);
        assert_eq!(options.sort, SortOrder::Newest);
        assert!(!options.include_details);
        assert!(!options.include_base_color);
        assert_eq!(options.filter, SubtypeFilter::All);
    }

    #[test]
    fn test_list_options_from_option_bag() {
        let options: MediaListOptions = serde_json::from_str(
            r#"{"type":"image","limit":2,"startAt":4,"sort":"oldest","filter":"hdr","includeBaseColor":true}"#,
        )
        .unwrap();
        assert_eq!(options.media_type, MediaTypeFilter::Image);
        assert_eq!(options.limit, 2);
        assert_eq!(options.start_at, 4);
        assert_eq!(options.sort, SortOrder::Oldest);
        assert_eq!(options.filter, SubtypeFilter::Hdr);
        assert!(options.include_base_color);
        assert_eq!(options.thumbnail_size, 200);
    }

    #[test]
    fn test_list_options_from_config() {
        let config = ListingConfig {
            default_limit: 7,
            thumbnail_size: 96,
            parallel_workers: 2,
        };
        let options = MediaListOptions::from_config(&config);
        assert_eq!(options.limit, 7);
        assert_eq!(options.thumbnail_size, 96);
    }

    #[test]
    fn test_zero_thumbnail_size_rejected() {
        let options = MediaListOptions {
            thumbnail_size: 0,
            ..MediaListOptions::default()
        };
        assert!(matches!(
            options.validate(2048),
            Err(GalleryError::InvalidOptions(_))
        ));
    }

    #[test]
    fn test_oversized_thumbnail_rejected() {
        let options = MediaListOptions {
            thumbnail_size: 100_000,
            ..MediaListOptions::default()
        };
        let err = options.validate(2048).unwrap_err();
        assert!(err.to_string().contains("<= 2048"));

        let at_limit = MediaListOptions {
            thumbnail_size: 2048,
            ..MediaListOptions::default()
        };
        assert!(at_limit.validate(2048).is_ok());
    }

    #[test]
    fn test_media_options_requires_id() {
        assert!(MediaOptions::default().validate().is_err());
        let options: MediaOptions =
            serde_json::from_str(r#"{"id":"x.jpg","generatePath":true}"#).unwrap();
        assert!(options.validate().is_ok());
        assert!(options.generate_path);
        assert!(!options.include_details);
    }

    #[test]
    fn test_subtype_filter_masks() {
        assert!(SubtypeFilter::All.mask().is_none());
        let mask = SubtypeFilter::Screenshot.mask().unwrap();
        assert!(mask.contains(MediaSubtype::Screenshot));
        assert!(!mask.contains(MediaSubtype::Hdr));
    }
}
