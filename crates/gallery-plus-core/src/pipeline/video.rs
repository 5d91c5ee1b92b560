//! Video dimensions from ISO-BMFF (MP4/QuickTime) track headers.
//!
//! Walks `moov/trak/tkhd` and returns the first track with a non-zero
//! presentation size. Other containers report no dimensions.

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

/// Largest `moov` box that will be read into memory.
const MAX_MOOV_BYTES: u64 = 64 * 1024 * 1024;

/// Read the display width/height of the first visual track.
pub fn dimensions(path: &Path) -> Option<(u32, u32)> {
    let file = File::open(path).ok()?;
    let mut reader = BufReader::new(file);
    dimensions_from_reader(&mut reader)
}

/// Same as [`dimensions`] over any seekable reader.
pub fn dimensions_from_reader<R: Read + Seek>(reader: &mut R) -> Option<(u32, u32)> {
    let end = reader.seek(SeekFrom::End(0)).ok()?;
    reader.seek(SeekFrom::Start(0)).ok()?;

    let mut offset = 0u64;
    while offset + 8 <= end {
        reader.seek(SeekFrom::Start(offset)).ok()?;
        let (kind, header_len, box_len) = read_box_header(reader, end - offset)?;

        if &kind == b"moov" {
            let payload_len = box_len - header_len;
            if payload_len > MAX_MOOV_BYTES {
                tracing::debug!("moov box too large ({} bytes)", payload_len);
                return None;
            }
            let mut moov = vec![0u8; payload_len as usize];
            reader.read_exact(&mut moov).ok()?;
            return find_track_size(&moov);
        }

        offset = offset.checked_add(box_len)?;
    }
    None
}

/// Returns (type, header length, total box length).
fn read_box_header<R: Read>(reader: &mut R, remaining: u64) -> Option<([u8; 4], u64, u64)> {
    let mut header = [0u8; 8];
    reader.read_exact(&mut header).ok()?;
    let size = u32::from_be_bytes([header[0], header[1], header[2], header[3]]) as u64;
    let kind = [header[4], header[5], header[6], header[7]];

    let (header_len, box_len) = match size {
        0 => (8, remaining),
        1 => {
            let mut large = [0u8; 8];
            reader.read_exact(&mut large).ok()?;
            (16, u64::from_be_bytes(large))
        }
        n => (8, n),
    };

    if box_len < header_len || box_len > remaining {
        return None;
    }
    Some((kind, header_len, box_len))
}

/// Iterate child boxes of an in-memory container payload.
fn children(data: &[u8]) -> impl Iterator<Item = ([u8; 4], &[u8])> {
    let mut offset = 0usize;
    std::iter::from_fn(move || {
        if offset + 8 > data.len() {
            return None;
        }
        let size = u32::from_be_bytes(data[offset..offset + 4].try_into().ok()?) as usize;
        let kind: [u8; 4] = data[offset + 4..offset + 8].try_into().ok()?;
        let (header_len, box_len) = match size {
            0 => (8, data.len() - offset),
            1 => {
                let large = data.get(offset + 8..offset + 16)?;
                let len = u64::from_be_bytes(large.try_into().ok()?);
                (16, usize::try_from(len).ok()?)
            }
            n => (8, n),
        };
        let end = offset.checked_add(box_len)?;
        if box_len < header_len || end > data.len() {
            return None;
        }
        let payload = &data[offset + header_len..end];
        offset = end;
        Some((kind, payload))
    })
}

fn find_track_size(moov: &[u8]) -> Option<(u32, u32)> {
    children(moov)
        .filter(|(kind, _)| kind == b"trak")
        .flat_map(|(_, trak)| children(trak).filter(|(kind, _)| kind == b"tkhd"))
        .find_map(|(_, tkhd)| parse_tkhd(tkhd))
}

/// Width and height are 16.16 fixed point at the end of the track header.
fn parse_tkhd(tkhd: &[u8]) -> Option<(u32, u32)> {
    let version = *tkhd.first()?;
    let width_at = match version {
        0 => 76,
        1 => 88,
        _ => return None,
    };
    let width = u32::from_be_bytes(tkhd.get(width_at..width_at + 4)?.try_into().ok()?) >> 16;
    let height =
        u32::from_be_bytes(tkhd.get(width_at + 4..width_at + 8)?.try_into().ok()?) >> 16;

    if width == 0 || height == 0 {
        None
    } else {
        Some((width, height))
    }
}
