//! Thumbnail generation: inline JPEG for the library, WebP blobs for picks.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat};
use std::io::Cursor;
use std::path::Path;

use super::hash::Hasher;
use super::materialize::file_uri;
use crate::config::ThumbnailConfig;

/// Generates thumbnails from decoded images.
#[derive(Debug, Clone)]
pub struct ThumbnailGenerator {
    config: ThumbnailConfig,
}

impl ThumbnailGenerator {
    /// Create a new thumbnail generator with the given configuration.
    pub fn new(config: ThumbnailConfig) -> Self {
        Self { config }
    }

    /// Output size for a `width`×`height` source scaled to `size` on its
    /// longer edge. Square sources take the `width <= height` branch.
    pub fn target_dimensions(width: u32, height: u32, size: u32) -> (u32, u32) {
        if width == 0 || height == 0 {
            return (size.max(1), size.max(1));
        }
        let scaled = |num: u32, den: u32| {
            ((f64::from(num) / f64::from(den)) * f64::from(size))
                .round()
                .max(1.0) as u32
        };
        if width > height {
            (size, scaled(height, width))
        } else {
            (scaled(width, height), size)
        }
    }

    /// Largest edge a caller may request.
    pub fn max_size(&self) -> u32 {
        self.config.max_size
    }

    /// JPEG quality on the encoder's 1-100 scale.
    pub fn jpeg_quality(&self) -> u8 {
        (self.config.quality * 100.0).round().clamp(1.0, 100.0) as u8
    }

    fn resize(image: &DynamicImage, size: u32) -> DynamicImage {
        let (width, height) = image.dimensions();
        let (w, h) = Self::target_dimensions(width, height, size);
        image.resize_exact(w, h, FilterType::Triangle)
    }

    /// Encode a thumbnail as base64 JPEG.
    ///
    /// Returns `None` if encoding fails.
    pub fn inline_jpeg(&self, image: &DynamicImage, size: u32) -> Option<String> {
        let thumbnail = Self::resize(image, size).to_rgb8();

        let mut buffer = Vec::new();
        JpegEncoder::new_with_quality(&mut buffer, self.jpeg_quality())
            .encode_image(&thumbnail)
            .ok()?;

        if buffer.is_empty() {
            return None;
        }
        Some(BASE64.encode(buffer))
    }

    /// Encode a thumbnail as WebP bytes.
    pub fn encode_webp(&self, image: &DynamicImage, size: u32) -> Option<Vec<u8>> {
        let thumbnail = DynamicImage::ImageRgba8(Self::resize(image, size).to_rgba8());

        let mut buffer = Cursor::new(Vec::new());
        thumbnail.write_to(&mut buffer, ImageFormat::WebP).ok()?;

        let bytes = buffer.into_inner();
        (!bytes.is_empty()).then_some(bytes)
    }

    /// Write a WebP thumbnail into `dir` and return its `file://` URL.
    ///
    /// Blobs are named by content hash, so identical thumbnails share a file.
    pub fn write_webp_blob(&self, image: &DynamicImage, size: u32, dir: &Path) -> Option<String> {
        let bytes = self.encode_webp(image, size)?;
        let path = dir.join(format!("{}.webp", Hasher::content_hash_from_bytes(&bytes)));

        if let Err(e) = std::fs::write(&path, &bytes) {
            tracing::debug!("Failed to write thumbnail blob {:?}: {}", path, e);
            return None;
        }
        Some(file_uri(&path))
    }
}
