//! Sub-configuration structs with their defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Library (native backend) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    /// Root directory of the media library
    pub root: PathBuf,

    /// Follow symlinks while walking the library
    pub follow_links: bool,

    /// List dot-prefixed files and directories (reported with `isHidden`)
    pub include_hidden: bool,

    /// Directory names whose contents are reported as favorites
    pub favorite_dirs: Vec<String>,

    /// Extensions treated as images
    pub image_extensions: Vec<String>,

    /// Extensions treated as videos
    pub video_extensions: Vec<String>,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("~/Pictures"),
            follow_links: true,
            include_hidden: false,
            favorite_dirs: strings(&["Favorites"]),
            image_extensions: strings(&[
                "jpg", "jpeg", "png", "gif", "webp", "heic", "heif", "bmp", "tif", "tiff",
            ]),
            video_extensions: strings(&["mp4", "mov", "m4v", "avi", "mkv", "webm"]),
        }
    }
}

/// Listing defaults and enrichment concurrency.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingConfig {
    /// Page size when the caller does not give one
    pub default_limit: usize,

    /// Thumbnail edge in pixels when the caller does not give one
    pub thumbnail_size: u32,

    /// Maximum enrichment sub-tasks running at once
    pub parallel_workers: usize,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            default_limit: 50,
            thumbnail_size: 200,
            parallel_workers: 4,
        }
    }
}

/// Thumbnail encoding settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThumbnailConfig {
    /// Compression quality in (0, 1]. Applies to JPEG output; the WebP
    /// encoder is lossless.
    pub quality: f32,

    /// Largest thumbnail edge a caller may request
    pub max_size: u32,
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self {
            quality: 0.8,
            max_size: 2048,
        }
    }
}

/// Dominant color sampling.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    /// Edge of the square the image is downsampled to before averaging
    pub sample_size: u32,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self { sample_size: 10 }
    }
}

/// Rules used by the library backend to set subtype flags.
///
/// Markers are matched case-insensitively against the file name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SubtypeConfig {
    /// Minimum long/short edge ratio for a panorama
    pub panorama_min_aspect: f32,

    pub motion_markers: Vec<String>,
    pub hdr_markers: Vec<String>,
    pub screenshot_markers: Vec<String>,
    pub portrait_markers: Vec<String>,
    pub slow_motion_markers: Vec<String>,
    pub timelapse_markers: Vec<String>,
}

impl Default for SubtypeConfig {
    fn default() -> Self {
        Self {
            panorama_min_aspect: 2.0,
            motion_markers: strings(&["MVIMG_", ".MP."]),
            hdr_markers: strings(&["_HDR", "HDR_"]),
            screenshot_markers: strings(&["Screenshot", "Screen Shot"]),
            portrait_markers: strings(&["PORTRAIT"]),
            slow_motion_markers: strings(&["SLOMO", "SLO-MO", "SLOW_MOTION"]),
            timelapse_markers: strings(&["TIMELAPSE", "TLAPSE"]),
        }
    }
}

/// Resource limits to protect against problematic inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum file size in megabytes that will be decoded
    pub max_file_size_mb: u64,

    /// Maximum image dimension (width or height)
    pub max_image_dimension: u32,

    /// Decode timeout in milliseconds
    pub decode_timeout_ms: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_file_size_mb: 200,
            max_image_dimension: 20000,
            decode_timeout_ms: 5000,
        }
    }
}

/// Temporary file locations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Where materialized originals are written (system temp when unset)
    pub temp_dir: Option<PathBuf>,
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format ("json" or "jsonl")
    pub format: String,

    /// Pretty-print JSON output
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "json".to_string(),
            pretty: false,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
