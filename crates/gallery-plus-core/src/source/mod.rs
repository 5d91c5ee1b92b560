//! Asset sources: where media comes from.
//!
//! - **library**: a rooted media directory acting as the device photo library
//! - **picker**: an interactive pick of files or a directory, the way a
//!   browser hands over a folder

pub mod library;
pub mod picker;

pub use library::LibrarySource;
pub use picker::{FilePicker, FixedPicker, PickerSource};

use async_trait::async_trait;
use std::cmp::Ordering;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::Result;
use crate::options::{MediaListOptions, MediaTypeFilter, SortOrder, SubtypeFilter};
use crate::types::{MediaType, PermissionStatus, SubtypeFlags};

/// How a source's records represent thumbnails and paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Base64 JPEG thumbnails inline; image paths are copied to temp storage
    Native,
    /// WebP thumbnail blobs referenced by URL; paths point at the picked file
    Browser,
}

/// One file backing an asset.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetResource {
    pub path: PathBuf,
    pub original_filename: String,
    pub file_size: Option<u64>,
}

/// A raw asset handle as produced by a source.
#[derive(Debug, Clone, PartialEq)]
pub struct Asset {
    pub id: String,
    pub media_type: MediaType,
    /// Milliseconds since the Unix epoch
    pub created_at: i64,
    pub subtypes: SubtypeFlags,
    pub is_favorite: bool,
    pub is_hidden: bool,
    /// Primary file first; a motion photo carries its video second
    pub resources: Vec<AssetResource>,
    /// Original file name, reported by sources that expose it
    pub name: Option<String>,
}

impl Asset {
    /// The primary resource, if any.
    pub fn primary(&self) -> Option<&AssetResource> {
        self.resources.first()
    }
}

/// Filter and ordering applied by a source while enumerating.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssetQuery {
    pub media_type: MediaTypeFilter,
    pub filter: SubtypeFilter,
    pub sort: SortOrder,
}

impl AssetQuery {
    /// Media-type clause AND subtype clause.
    ///
    /// The subtype clause passes when the asset has any bit of the filter mask.
    pub fn matches(&self, asset: &Asset) -> bool {
        if !self.media_type.matches(asset.media_type) {
            return false;
        }
        match self.filter.mask() {
            Some(mask) => asset.subtypes.intersects(mask),
            None => true,
        }
    }

    /// Sort by creation time in the requested direction, ties by id.
    pub fn sort(&self, assets: &mut [Asset]) {
        assets.sort_by(|a, b| {
            let by_time = match self.sort {
                SortOrder::Oldest => a.created_at.cmp(&b.created_at),
                SortOrder::Newest => b.created_at.cmp(&a.created_at),
            };
            match by_time {
                Ordering::Equal => a.id.cmp(&b.id),
                other => other,
            }
        });
    }
}

impl From<&MediaListOptions> for AssetQuery {
    fn from(options: &MediaListOptions) -> Self {
        Self {
            media_type: options.media_type,
            filter: options.filter,
            sort: options.sort,
        }
    }
}

/// Milliseconds since the Unix epoch; times before it clamp to 0.
pub(crate) fn system_time_ms(time: SystemTime) -> i64 {
    time.duration_since(UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

/// A platform media enumerator.
///
/// Uses `async_trait` because the gallery holds sources as
/// `Box<dyn AssetSource>`.
#[async_trait]
pub trait AssetSource: Send + Sync {
    /// Source name for logging.
    fn name(&self) -> &str;

    /// How records from this source carry thumbnails and paths.
    fn delivery(&self) -> Delivery;

    async fn check_permissions(&self) -> PermissionStatus;

    /// Ask for access. Prompting belongs to the host; sources report the
    /// resulting status.
    async fn request_permissions(&self) -> PermissionStatus;

    /// Enumerate assets matching `query`, sorted per `query.sort`.
    ///
    /// Denied access yields an empty list rather than an error.
    async fn enumerate(&self, query: &AssetQuery) -> Result<Vec<Asset>>;

    /// Look up one asset without enumerating.
    ///
    /// Sources that cannot re-open an asset by id return `None`; resolution
    /// then falls back to the session.
    async fn find(&self, id: &str) -> Option<Asset>;
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::types::MediaSubtype;

    pub(crate) fn asset(id: &str, media_type: MediaType, created_at: i64) -> Asset {
        Asset {
            id: id.to_string(),
            media_type,
            created_at,
            subtypes: SubtypeFlags::NONE,
            is_favorite: false,
            is_hidden: false,
            resources: vec![],
            name: None,
        }
    }

    #[test]
    fn test_query_media_type_and_subtype_are_anded() {
        let mut pano = asset("pano.jpg", MediaType::Image, 1);
        pano.subtypes.insert(MediaSubtype::Panorama);
        let plain = asset("plain.jpg", MediaType::Image, 2);
        let mut video = asset("clip.mp4", MediaType::Video, 3);
        video.subtypes.insert(MediaSubtype::Panorama);

        let query = AssetQuery {
            media_type: MediaTypeFilter::Image,
            filter: SubtypeFilter::Panorama,
            sort: SortOrder::Newest,
        };
        assert!(query.matches(&pano));
        assert!(!query.matches(&plain));
        assert!(!query.matches(&video));
    }

    #[test]
    fn test_query_subtype_matches_any_bit() {
        let mut both = asset("both.jpg", MediaType::Image, 1);
        both.subtypes.insert(MediaSubtype::Hdr);
        both.subtypes.insert(MediaSubtype::Screenshot);

        let query = AssetQuery {
            filter: SubtypeFilter::Screenshot,
            ..AssetQuery::default()
        };
        assert!(query.matches(&both));
    }

    #[test]
    fn test_sort_directions_with_tie_break() {
        let mut assets = vec![
            asset("b", MediaType::Image, 10),
            asset("a", MediaType::Image, 10),
            asset("c", MediaType::Image, 5),
            asset("d", MediaType::Image, 20),
        ];

        let newest = AssetQuery::default();
        newest.sort(&mut assets);
        let ids: Vec<_> = assets.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["d", "a", "b", "c"]);

        let oldest = AssetQuery {
            sort: SortOrder::Oldest,
            ..AssetQuery::default()
        };
        oldest.sort(&mut assets);
        let ids: Vec<_> = assets.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b", "d"]);
    }
}
