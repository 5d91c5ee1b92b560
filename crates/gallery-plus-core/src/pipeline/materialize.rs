//! Accessible paths for single-item resolution.

use std::path::{Path, PathBuf};

use super::hash::Hasher;
use crate::error::{PipelineError, PipelineResult};
use crate::source::{Asset, Delivery};
use crate::types::MediaType;

/// `file://` URI for a local path.
///
/// Bytes outside the unreserved set and `/` are percent-encoded as UTF-8.
/// Backslashes become `/`, and a drive-letter path gains the leading `/` of
/// an empty authority (`file:///C:/...`).
pub fn file_uri(path: &Path) -> String {
    let raw = path.to_string_lossy().replace('\\', "/");
    let mut uri = String::with_capacity(raw.len() + 8);
    uri.push_str("file://");
    if !raw.starts_with('/') {
        uri.push('/');
    }
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' | b'/' => {
                uri.push(char::from(byte))
            }
            // Drive separator
            b':' => uri.push(':'),
            _ => uri.push_str(&format!("%{:02X}", byte)),
        }
    }
    uri
}

/// Produce a `file://` URI the host can open for `asset`.
///
/// Library images are copied into `temp_dir` under their content hash so the
/// host gets a stable, readable file. Videos and picked files point at the
/// original.
pub async fn materialize_original(
    asset: &Asset,
    delivery: Delivery,
    temp_dir: &Path,
) -> PipelineResult<String> {
    let resource = asset.primary().ok_or_else(|| PipelineError::Io {
        path: PathBuf::from(&asset.id),
        source: std::io::Error::new(std::io::ErrorKind::NotFound, "asset has no resources"),
    })?;
    let original = absolute(&resource.path).await;

    if delivery == Delivery::Browser || asset.media_type == MediaType::Video {
        return Ok(file_uri(&original));
    }

    let hashed = original.clone();
    let hash = tokio::task::spawn_blocking(move || Hasher::content_hash(&hashed))
        .await
        .map_err(|e| PipelineError::Io {
            path: original.clone(),
            source: std::io::Error::other(e),
        })?
        .map_err(|source| PipelineError::Io {
            path: original.clone(),
            source,
        })?;
    let ext = original
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_else(|| "bin".to_string());
    let target = temp_dir.join(format!("{}.{}", hash, ext));

    let io_err = |source| PipelineError::Io {
        path: target.clone(),
        source,
    };
    tokio::fs::create_dir_all(temp_dir).await.map_err(io_err)?;
    if !tokio::fs::try_exists(&target).await.unwrap_or(false) {
        tokio::fs::copy(&original, &target).await.map_err(io_err)?;
    }

    tracing::debug!("Materialized {} at {:?}", asset.id, target);
    Ok(file_uri(&target))
}

async fn absolute(path: &Path) -> PathBuf {
    tokio::fs::canonicalize(path)
        .await
        .unwrap_or_else(|_| path.to_path_buf())
}
