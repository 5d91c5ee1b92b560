//! Clap value enums for listing options.

use clap::ValueEnum;
use gallery_plus_core::{MediaTypeFilter, SortOrder, SubtypeFilter};

/// Media-type clause for `list --type`.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum MediaKind {
    Image,
    Video,
    #[default]
    All,
}

impl From<MediaKind> for MediaTypeFilter {
    fn from(kind: MediaKind) -> Self {
        match kind {
            MediaKind::Image => MediaTypeFilter::Image,
            MediaKind::Video => MediaTypeFilter::Video,
            MediaKind::All => MediaTypeFilter::All,
        }
    }
}

/// Creation-time ordering for `list --sort`.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum Sort {
    /// Most recent first
    #[default]
    Newest,
    /// Oldest first
    Oldest,
}

impl From<Sort> for SortOrder {
    fn from(sort: Sort) -> Self {
        match sort {
            Sort::Newest => SortOrder::Newest,
            Sort::Oldest => SortOrder::Oldest,
        }
    }
}

/// Subtype clause for `list --filter`.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum Filter {
    #[default]
    All,
    Panorama,
    Hdr,
    Screenshot,
}

impl From<Filter> for SubtypeFilter {
    fn from(filter: Filter) -> Self {
        match filter {
            Filter::All => SubtypeFilter::All,
            Filter::Panorama => SubtypeFilter::Panorama,
            Filter::Hdr => SubtypeFilter::Hdr,
            Filter::Screenshot => SubtypeFilter::Screenshot,
        }
    }
}
