//! Dominant color as the mean of a small downsample.

use image::imageops::FilterType;
use image::DynamicImage;

/// Reported when the image cannot be decoded.
pub const FALLBACK: &str = "#000000";

/// Average RGB of `image` resized to `sample`×`sample`, as `#RRGGBB`.
///
/// Alpha is ignored. Channels are rounded to the nearest integer.
pub fn average_hex(image: &DynamicImage, sample: u32) -> String {
    let sample = sample.max(1);
    let small = image
        .resize_exact(sample, sample, FilterType::Triangle)
        .to_rgb8();

    let mut sums = [0u64; 3];
    for pixel in small.pixels() {
        for (sum, channel) in sums.iter_mut().zip(pixel.0) {
            *sum += u64::from(channel);
        }
    }

    let count = u64::from(sample) * u64::from(sample);
    let [r, g, b] = sums.map(|sum| ((sum as f64) / (count as f64)).round() as u8);
    to_hex(r, g, b)
}

/// Format a color as uppercase `#RRGGBB`.
pub fn to_hex(r: u8, g: u8, b: u8) -> String {
    format!("#{:02X}{:02X}{:02X}", r, g, b)
}
