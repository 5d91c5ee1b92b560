//! Per-asset metadata: subtype, MIME type, dimensions, file size, capture time.
//!
//! Every extractor here is lenient: a missing or unreadable property comes
//! back as `None` and never fails the surrounding call.

use exif::{In, Reader, Tag, Value};
use image::ImageDecoder as _;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use super::{mime, video};
use crate::source::Asset;
use crate::types::{MediaSubtype, MediaType, SubtypeFlags};

/// Container-level image properties read without a full pixel decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageProperties {
    pub width: u32,
    pub height: u32,
    /// EXIF orientation (1-8), when tagged
    pub orientation: Option<u32>,
    /// "RGB" or "Gray"
    pub color_model: &'static str,
}

/// Width and height of an asset, plus image-only extras.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Details {
    pub width: u32,
    pub height: u32,
    pub orientation: Option<u32>,
    pub color_model: Option<&'static str>,
}

/// Extracts metadata from assets and their files.
pub struct MetadataExtractor;

impl MetadataExtractor {
    /// First subtype present in priority order.
    ///
    /// motion photo > panorama > hdr > screenshot > portrait > slow motion >
    /// timelapse. An asset carrying several flags reports only the first.
    pub fn classify_subtype(flags: SubtypeFlags) -> Option<MediaSubtype> {
        MediaSubtype::PRIORITY
            .into_iter()
            .find(|subtype| flags.contains(*subtype))
    }

    /// MIME type of the primary resource.
    pub fn mime_type(asset: &Asset) -> String {
        match asset.primary() {
            Some(resource) => mime::resolve(&resource.path),
            None => mime::OCTET_STREAM.to_string(),
        }
    }

    /// Size of the first resource; absent when the asset has none.
    pub fn file_size(asset: &Asset) -> Option<u64> {
        asset.primary().and_then(|resource| resource.file_size)
    }

    /// Dimensions of the asset's primary resource.
    ///
    /// Blocking: reads file headers. Run it off the async runtime.
    pub fn details(asset: &Asset) -> Option<Details> {
        let path = &asset.primary()?.path;
        match asset.media_type {
            MediaType::Image => Self::image_properties(path).map(|p| Details {
                width: p.width,
                height: p.height,
                orientation: p.orientation,
                color_model: Some(p.color_model),
            }),
            MediaType::Video => video::dimensions(path).map(|(width, height)| Details {
                width,
                height,
                orientation: None,
                color_model: None,
            }),
        }
    }

    /// Read pixel size and color model from the image header, and the
    /// orientation from EXIF.
    pub fn image_properties(path: &Path) -> Option<ImageProperties> {
        let decoder = image::ImageReader::open(path)
            .ok()?
            .with_guessed_format()
            .ok()?
            .into_decoder()
            .ok()?;
        let (width, height) = decoder.dimensions();
        let color_model = if decoder.color_type().has_color() {
            "RGB"
        } else {
            "Gray"
        };

        Some(ImageProperties {
            width,
            height,
            orientation: Self::orientation(path),
            color_model,
        })
    }

    /// Pixel size from the image header only.
    pub fn header_dimensions(path: &Path) -> Option<(u32, u32)> {
        image::ImageReader::open(path)
            .ok()?
            .with_guessed_format()
            .ok()?
            .into_dimensions()
            .ok()
    }

    /// EXIF capture time in epoch milliseconds.
    ///
    /// Prefers DateTimeOriginal over DateTime. EXIF carries no zone unless an
    /// offset tag is present, so the wall-clock time is read as UTC.
    pub fn capture_time_ms(path: &Path) -> Option<i64> {
        let exif = Self::read_exif(path)?;
        let field = exif
            .get_field(Tag::DateTimeOriginal, In::PRIMARY)
            .or_else(|| exif.get_field(Tag::DateTime, In::PRIMARY))?;
        let ascii = match &field.value {
            Value::Ascii(parts) => parts.first()?,
            _ => return None,
        };
        let dt = exif::DateTime::from_ascii(ascii).ok()?;

        let date = chrono::NaiveDate::from_ymd_opt(
            i32::from(dt.year),
            u32::from(dt.month),
            u32::from(dt.day),
        )?;
        let naive = date.and_hms_opt(
            u32::from(dt.hour),
            u32::from(dt.minute),
            u32::from(dt.second),
        )?;
        Some(naive.and_utc().timestamp_millis())
    }

    fn orientation(path: &Path) -> Option<u32> {
        let exif = Self::read_exif(path)?;
        exif.get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|f| f.value.get_uint(0))
            .filter(|o| (1..=8).contains(o))
    }

    fn read_exif(path: &Path) -> Option<exif::Exif> {
        let file = File::open(path).ok()?;
        let mut reader = BufReader::new(file);
        Reader::new().read_from_container(&mut reader).ok()
    }
}
