//! Files handed over by a picker, the way a browser hands over a folder.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use walkdir::WalkDir;

use super::{system_time_ms, Asset, AssetQuery, AssetResource, AssetSource, Delivery};
use crate::error::{Result, SourceError};
use crate::pipeline::mime;
use crate::types::{MediaType, PermissionStatus, SubtypeFlags};

/// Something that lets the user choose files or a directory.
///
/// Blocking; the source calls it from a blocking task.
pub trait FilePicker: Send + Sync {
    /// Paths the user picked. An empty selection means the pick was
    /// cancelled.
    fn pick(&self) -> std::result::Result<Vec<PathBuf>, SourceError>;
}

/// Picker that returns the same paths every time.
#[derive(Debug, Clone)]
pub struct FixedPicker {
    paths: Vec<PathBuf>,
}

impl FixedPicker {
    pub fn new(paths: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }
}

impl FilePicker for FixedPicker {
    fn pick(&self) -> std::result::Result<Vec<PathBuf>, SourceError> {
        Ok(self.paths.clone())
    }
}

/// Asset source over whatever the picker returns.
///
/// Nothing can be reopened by id afterwards; single-item resolution goes
/// through the session filled by the last listing.
#[derive(Clone)]
pub struct PickerSource {
    picker: Arc<dyn FilePicker>,
}

impl PickerSource {
    pub fn new(picker: Arc<dyn FilePicker>) -> Self {
        Self { picker }
    }

    /// Picker source over fixed paths.
    pub fn fixed(paths: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        Self::new(Arc::new(FixedPicker::new(paths)))
    }

    fn collect(&self, query: &AssetQuery) -> std::result::Result<Vec<Asset>, SourceError> {
        let picked = self.picker.pick()?;
        if picked.is_empty() {
            return Err(SourceError::PickerCancelled);
        }

        let mut files = Vec::new();
        for path in picked {
            let meta = std::fs::metadata(&path).map_err(|e| SourceError::Unreadable {
                path: path.clone(),
                message: e.to_string(),
            })?;
            if meta.is_dir() {
                expand_dir(&path, &mut files);
            } else {
                files.push(path);
            }
        }

        let mut assets: Vec<Asset> = files
            .iter()
            .filter_map(|path| picked_asset(path))
            .filter(|asset| query.matches(asset))
            .collect();
        query.sort(&mut assets);
        tracing::debug!("Picker yielded {} media files", assets.len());
        Ok(assets)
    }
}

/// Files of `dir` first, then each subdirectory, depth first.
///
/// Symlinks are followed; a link back into an ancestor is reported by the
/// walk as a loop and skipped.
fn expand_dir(dir: &Path, files: &mut Vec<PathBuf>) {
    let entries = WalkDir::new(dir)
        .follow_links(true)
        .sort_by(|a, b| a.file_type().is_dir().cmp(&b.file_type().is_dir()));

    for entry in entries {
        match entry {
            Ok(entry) if entry.file_type().is_file() => files.push(entry.into_path()),
            Ok(_) => {}
            Err(e) => tracing::warn!("Skipping picked entry under {:?}: {}", dir, e),
        }
    }
}

/// Build an asset for a picked file, or `None` if it is not media.
fn picked_asset(path: &Path) -> Option<Asset> {
    let media_type = mime::from_path(path).and_then(MediaType::from_mime)?;
    let meta = std::fs::metadata(path).ok()?;
    let name = path.file_name()?.to_string_lossy().into_owned();
    let created_at = meta.modified().map(system_time_ms).unwrap_or(0);

    Some(Asset {
        id: name.clone(),
        media_type,
        created_at,
        subtypes: SubtypeFlags::NONE,
        is_favorite: false,
        is_hidden: false,
        resources: vec![AssetResource {
            path: path.to_path_buf(),
            original_filename: name.clone(),
            file_size: Some(meta.len()),
        }],
        name: Some(name),
    })
}

#[async_trait]
impl AssetSource for PickerSource {
    fn name(&self) -> &str {
        "picker"
    }

    fn delivery(&self) -> Delivery {
        Delivery::Browser
    }

    async fn check_permissions(&self) -> PermissionStatus {
        tracing::warn!("Picked files need no permission; reporting granted");
        PermissionStatus::Granted
    }

    async fn request_permissions(&self) -> PermissionStatus {
        self.check_permissions().await
    }

    async fn enumerate(&self, query: &AssetQuery) -> Result<Vec<Asset>> {
        let this = self.clone();
        let query = *query;
        let assets = tokio::task::spawn_blocking(move || this.collect(&query))
            .await
            .map_err(|e| SourceError::Picker(e.to_string()))??;
        Ok(assets)
    }

    async fn find(&self, _id: &str) -> Option<Asset> {
        None
    }
}
