//! MIME type resolution: container sniffing first, extension table second.

use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Returned when neither the container nor the extension is recognized.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Map a file extension to a MIME type.
pub fn from_extension(ext: &str) -> Option<&'static str> {
    let mime = match ext.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        "avif" => "image/avif",
        "heic" => "image/heic",
        "heif" => "image/heif",
        "mp4" => "video/mp4",
        "mov" => "video/quicktime",
        "m4v" => "video/x-m4v",
        "webm" => "video/webm",
        "avi" => "video/x-msvideo",
        "mkv" => "video/x-matroska",
        _ => return None,
    };
    Some(mime)
}

/// MIME type for a path's extension, if it has a known one.
pub fn from_path(path: &Path) -> Option<&'static str> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(from_extension)
}

/// Identify a container from its first bytes.
///
/// ISO-BMFF brands are checked before the image crate's signatures so HEIF
/// stills and QuickTime movies are told apart.
pub fn sniff(header: &[u8]) -> Option<&'static str> {
    if header.len() >= 12 && &header[4..8] == b"ftyp" {
        return match &header[8..12] {
            b"qt  " => Some("video/quicktime"),
            b"heic" | b"heix" | b"heim" | b"heis" => Some("image/heic"),
            b"mif1" | b"msf1" | b"heif" => Some("image/heif"),
            b"avif" | b"avis" => Some("image/avif"),
            b"3gp4" | b"3gp5" | b"3gp6" => Some("video/3gpp"),
            b"isom" | b"iso2" | b"iso4" | b"iso5" | b"iso6" | b"mp41" | b"mp42" | b"avc1"
            | b"dash" | b"M4V " | b"MSNV" => Some("video/mp4"),
            _ => None,
        };
    }

    // Matroska / WebM: EBML header
    if header.starts_with(&[0x1A, 0x45, 0xDF, 0xA3]) {
        return Some("video/x-matroska");
    }

    // AVI: RIFF....AVI
    if header.len() >= 12 && &header[0..4] == b"RIFF" && &header[8..12] == b"AVI " {
        return Some("video/x-msvideo");
    }

    image::guess_format(header)
        .ok()
        .map(|format| format.to_mime_type())
        .filter(|mime| *mime != OCTET_STREAM)
}

/// Resolve the MIME type of a file on disk.
///
/// Reads the first bytes for sniffing, then falls back to the extension
/// table, then to `application/octet-stream`.
pub fn resolve(path: &Path) -> String {
    let mut header = [0u8; 32];
    let read = File::open(path)
        .and_then(|mut file| file.read(&mut header))
        .unwrap_or(0);

    let by_extension = from_path(path);
    match sniff(&header[..read]) {
        // WebM shares the EBML header with Matroska
        Some("video/x-matroska") if has_extension(path, "webm") => "video/webm".to_string(),
        Some(mime) => mime.to_string(),
        None => by_extension.unwrap_or(OCTET_STREAM).to_string(),
    }
}

fn has_extension(path: &Path, wanted: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(wanted))
}
