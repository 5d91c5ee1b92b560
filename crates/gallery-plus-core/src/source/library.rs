//! Media library rooted at a directory.
//!
//! Stands in for a device photo library: every image or video under the root
//! is an asset, with favorite/hidden flags and subtypes derived from its
//! location, name and header.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

use super::{system_time_ms, Asset, AssetQuery, AssetResource, AssetSource, Delivery};
use crate::config::{Config, LibraryConfig, SubtypeConfig};
use crate::error::{GalleryError, Result};
use crate::pipeline::MetadataExtractor;
use crate::types::{MediaSubtype, MediaType, PermissionStatus, SubtypeFlags};

/// Directory name that marks everything below it as a screenshot.
const SCREENSHOTS_DIR: &str = "screenshots";

/// Files found by one walk of the library.
#[derive(Debug, Default)]
struct Walk {
    files: Vec<(PathBuf, MediaType)>,
    /// Directories that could not be read
    denied: usize,
}

/// Asset source over a local media directory.
#[derive(Debug, Clone)]
pub struct LibrarySource {
    root: PathBuf,
    library: LibraryConfig,
    subtypes: SubtypeConfig,
}

impl LibrarySource {
    pub fn new(root: impl Into<PathBuf>, library: LibraryConfig, subtypes: SubtypeConfig) -> Self {
        Self {
            root: root.into(),
            library,
            subtypes,
        }
    }

    /// Library at `library.root` with the configured rules.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.library_root(),
            config.library.clone(),
            config.subtypes.clone(),
        )
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Classify a path by its extension.
    fn media_type(&self, path: &Path) -> Option<MediaType> {
        let ext = path.extension()?.to_str()?;
        let listed = |exts: &[String]| exts.iter().any(|e| e.eq_ignore_ascii_case(ext));
        if listed(self.library.image_extensions.as_slice()) {
            Some(MediaType::Image)
        } else if listed(self.library.video_extensions.as_slice()) {
            Some(MediaType::Video)
        } else {
            None
        }
    }

    /// Status decided by the root alone, if the root is not usable.
    fn root_status(&self) -> Option<PermissionStatus> {
        match std::fs::metadata(&self.root) {
            Err(e) if e.kind() == ErrorKind::NotFound => return Some(PermissionStatus::Unavailable),
            Err(e) if e.kind() == ErrorKind::PermissionDenied => {
                return Some(PermissionStatus::Denied)
            }
            Err(_) => return Some(PermissionStatus::Unknown),
            Ok(meta) if !meta.is_dir() => return Some(PermissionStatus::Unavailable),
            Ok(_) => {}
        }
        match std::fs::read_dir(&self.root) {
            Ok(_) => None,
            Err(e) if e.kind() == ErrorKind::PermissionDenied => Some(PermissionStatus::Denied),
            Err(_) => Some(PermissionStatus::Unknown),
        }
    }

    fn status(&self) -> PermissionStatus {
        if let Some(status) = self.root_status() {
            return status;
        }
        if self.walk().denied > 0 {
            PermissionStatus::Limited
        } else {
            PermissionStatus::Granted
        }
    }

    fn walk(&self) -> Walk {
        let include_hidden = self.library.include_hidden;
        let mut walk = Walk::default();

        let entries = WalkDir::new(&self.root)
            .follow_links(self.library.follow_links)
            .into_iter()
            .filter_entry(|e| include_hidden || e.depth() == 0 || !is_dot_name(e.file_name()));

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let denied = e
                        .io_error()
                        .is_some_and(|io| io.kind() == ErrorKind::PermissionDenied);
                    if denied {
                        walk.denied += 1;
                    }
                    tracing::debug!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };
            if !entry.file_type().is_file() && !entry.path().is_file() {
                continue;
            }
            if let Some(media_type) = self.media_type(entry.path()) {
                walk.files.push((entry.into_path(), media_type));
            }
        }
        walk
    }

    /// Walk, pair motion photos, and build every asset.
    fn scan(&self, query: &AssetQuery) -> Vec<Asset> {
        if let Some(status) = self.root_status() {
            tracing::debug!("Library {:?} not listable: {}", self.root, status);
            return vec![];
        }

        let walk = self.walk();
        if walk.denied > 0 {
            tracing::warn!(
                "{} directories under {:?} are unreadable; listing is limited",
                walk.denied,
                self.root
            );
        }

        // Videos keyed by (directory, lowercase stem) for Live Photo pairing
        let videos: HashMap<(PathBuf, String), &PathBuf> = walk
            .files
            .iter()
            .filter(|(_, kind)| *kind == MediaType::Video)
            .filter_map(|(path, _)| Some((pair_key(path)?, path)))
            .collect();

        let mut paired: HashSet<&PathBuf> = HashSet::new();
        let mut pairs: Vec<(&PathBuf, MediaType, Option<&PathBuf>)> = Vec::new();
        for (path, kind) in &walk.files {
            let video = match kind {
                MediaType::Image => pair_key(path).and_then(|key| videos.get(&key).copied()),
                MediaType::Video => None,
            };
            if let Some(video) = video {
                paired.insert(video);
            }
            pairs.push((path, *kind, video));
        }

        let mut assets: Vec<Asset> = pairs
            .into_iter()
            .filter(|(path, kind, _)| *kind == MediaType::Image || !paired.contains(path))
            .filter_map(|(path, kind, video)| {
                self.build_asset(path, kind, video.map(|v| v.as_path()))
            })
            .filter(|asset| query.matches(asset))
            .collect();

        query.sort(&mut assets);
        tracing::debug!("Library enumerated {} assets", assets.len());
        assets
    }

    fn build_asset(
        &self,
        path: &Path,
        media_type: MediaType,
        paired: Option<&Path>,
    ) -> Option<Asset> {
        let relative = path.strip_prefix(&self.root).ok()?;
        let id = relative_id(relative)?;
        let meta = std::fs::metadata(path).ok()?;
        let file_name = path.file_name()?.to_string_lossy().into_owned();

        let mut subtypes = self.name_subtypes(relative, &file_name);
        if paired.is_some() {
            subtypes.insert(MediaSubtype::MotionPhoto);
        }

        let mut created_at = None;
        if media_type == MediaType::Image {
            if let Some((w, h)) = MetadataExtractor::header_dimensions(path) {
                let (long, short) = (w.max(h), w.min(h).max(1));
                if long as f32 / short as f32 >= self.subtypes.panorama_min_aspect {
                    subtypes.insert(MediaSubtype::Panorama);
                }
            }
            created_at = MetadataExtractor::capture_time_ms(path);
        }
        let created_at = created_at
            .or_else(|| meta.created().ok().map(system_time_ms))
            .or_else(|| meta.modified().ok().map(system_time_ms))
            .unwrap_or(0);

        let mut resources = vec![AssetResource {
            path: path.to_path_buf(),
            original_filename: file_name,
            file_size: Some(meta.len()),
        }];
        if let Some(video) = paired {
            resources.push(AssetResource {
                path: video.to_path_buf(),
                original_filename: video
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                file_size: std::fs::metadata(video).ok().map(|m| m.len()),
            });
        }

        Some(Asset {
            id,
            media_type,
            created_at,
            subtypes,
            is_favorite: self.is_favorite(relative),
            is_hidden: relative.components().any(|c| is_dot_name(c.as_os_str())),
            resources,
            name: None,
        })
    }

    /// Subtypes implied by name markers and the screenshots directory.
    fn name_subtypes(&self, relative: &Path, file_name: &str) -> SubtypeFlags {
        let upper = file_name.to_uppercase();
        let marked =
            |markers: &[String]| markers.iter().any(|m| upper.contains(&m.to_uppercase()));

        let rules = &self.subtypes;
        let mut flags = SubtypeFlags::NONE;
        for (subtype, markers) in [
            (MediaSubtype::MotionPhoto, &rules.motion_markers),
            (MediaSubtype::Hdr, &rules.hdr_markers),
            (MediaSubtype::Screenshot, &rules.screenshot_markers),
            (MediaSubtype::Portrait, &rules.portrait_markers),
            (MediaSubtype::SlowMotion, &rules.slow_motion_markers),
            (MediaSubtype::Timelapse, &rules.timelapse_markers),
        ] {
            if marked(markers.as_slice()) {
                flags.insert(subtype);
            }
        }

        let in_screenshots = ancestors(relative)
            .any(|dir| dir.eq_ignore_ascii_case(SCREENSHOTS_DIR));
        if in_screenshots {
            flags.insert(MediaSubtype::Screenshot);
        }
        flags
    }

    fn is_favorite(&self, relative: &Path) -> bool {
        ancestors(relative).any(|dir| {
            self.library
                .favorite_dirs
                .iter()
                .any(|fav| fav.eq_ignore_ascii_case(&dir))
        })
    }

    /// Direct lookup by relative id.
    fn lookup(&self, id: &str) -> Option<Asset> {
        let relative = Path::new(id);
        if id.is_empty()
            || !relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)))
        {
            return None;
        }
        if !self.library.include_hidden
            && relative.components().any(|c| is_dot_name(c.as_os_str()))
        {
            return None;
        }

        let path = self.root.join(relative);
        if !path.is_file() {
            return None;
        }
        match self.media_type(&path)? {
            MediaType::Image => {
                let video = self.sibling(&path, MediaType::Video);
                self.build_asset(&path, MediaType::Image, video.as_deref())
            }
            // The video half of a Live Photo is only reachable through its image
            MediaType::Video if self.sibling(&path, MediaType::Image).is_some() => None,
            MediaType::Video => self.build_asset(&path, MediaType::Video, None),
        }
    }

    /// A file of `kind` in the same directory sharing `path`'s stem.
    fn sibling(&self, path: &Path, kind: MediaType) -> Option<PathBuf> {
        let key = pair_key(path)?;
        std::fs::read_dir(path.parent()?)
            .ok()?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .find(|candidate| {
                candidate.is_file()
                    && self.media_type(candidate) == Some(kind)
                    && pair_key(candidate).as_ref() == Some(&key)
            })
    }
}

fn is_dot_name(name: &std::ffi::OsStr) -> bool {
    name.to_str().is_some_and(|n| n.starts_with('.'))
}

/// Directory names between the root and the file.
fn ancestors(relative: &Path) -> impl Iterator<Item = String> + '_ {
    relative
        .parent()
        .into_iter()
        .flat_map(|parent| parent.components())
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
}

/// Forward-slash id from a root-relative path.
fn relative_id(relative: &Path) -> Option<String> {
    let parts: Vec<&str> = relative
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect::<Option<_>>()?;
    (!parts.is_empty()).then(|| parts.join("/"))
}

fn pair_key(path: &Path) -> Option<(PathBuf, String)> {
    Some((
        path.parent()?.to_path_buf(),
        path.file_stem()?.to_str()?.to_lowercase(),
    ))
}

fn join_error(e: tokio::task::JoinError) -> GalleryError {
    GalleryError::Io(std::io::Error::other(e))
}

#[async_trait]
impl AssetSource for LibrarySource {
    fn name(&self) -> &str {
        "library"
    }

    fn delivery(&self) -> Delivery {
        Delivery::Native
    }

    async fn check_permissions(&self) -> PermissionStatus {
        let this = self.clone();
        tokio::task::spawn_blocking(move || this.status())
            .await
            .unwrap_or(PermissionStatus::Unknown)
    }

    async fn request_permissions(&self) -> PermissionStatus {
        // Access is granted by the host; re-check what it left us with
        self.check_permissions().await
    }

    async fn enumerate(&self, query: &AssetQuery) -> Result<Vec<Asset>> {
        let this = self.clone();
        let query = *query;
        tokio::task::spawn_blocking(move || this.scan(&query))
            .await
            .map_err(join_error)
    }

    async fn find(&self, id: &str) -> Option<Asset> {
        let this = self.clone();
        let id = id.to_string();
        tokio::task::spawn_blocking(move || this.lookup(&id))
            .await
            .ok()
            .flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{MediaTypeFilter, SortOrder, SubtypeFilter};
    use image::{DynamicImage, ImageFormat};

    fn library(root: &Path) -> LibrarySource {
        LibrarySource::new(root, LibraryConfig::default(), SubtypeConfig::default())
    }

    fn write_png(path: &Path, width: u32, height: u32) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        DynamicImage::new_rgb8(width, height)
            .save_with_format(path, ImageFormat::Png)
            .unwrap();
    }

    fn ids(assets: &[Asset]) -> Vec<&str> {
        let mut ids: Vec<_> = assets.iter().map(|a| a.id.as_str()).collect();
        ids.sort();
        ids
    }

    #[tokio::test]
    async fn test_missing_root_is_unavailable() {
        let source = library(Path::new("/nonexistent/library"));
        assert_eq!(source.check_permissions().await, PermissionStatus::Unavailable);
        assert_eq!(source.request_permissions().await, PermissionStatus::Unavailable);
        let assets = source.enumerate(&AssetQuery::default()).await.unwrap();
        assert!(assets.is_empty());
    }

    #[tokio::test]
    async fn test_enumerate_filters_extensions_and_hidden() {
        let dir = tempfile::tempdir().unwrap();
        write_png(&dir.path().join("a.png"), 4, 4);
        write_png(&dir.path().join("trip/b.jpg"), 4, 4);
        write_png(&dir.path().join(".cache/c.png"), 4, 4);
        write_png(&dir.path().join(".d.png"), 4, 4);
        std::fs::write(dir.path().join("notes.txt"), b"text").unwrap();
        std::fs::write(dir.path().join("clip.mp4"), b"video").unwrap();

        let source = library(dir.path());
        assert_eq!(source.check_permissions().await, PermissionStatus::Granted);

        let assets = source.enumerate(&AssetQuery::default()).await.unwrap();
        assert_eq!(ids(&assets), vec!["a.png", "clip.mp4", "trip/b.jpg"]);
        assert!(assets.iter().all(|a| !a.is_hidden));

        let images = AssetQuery {
            media_type: MediaTypeFilter::Image,
            ..AssetQuery::default()
        };
        let assets = source.enumerate(&images).await.unwrap();
        assert_eq!(ids(&assets), vec!["a.png", "trip/b.jpg"]);
    }

    #[tokio::test]
    async fn test_hidden_included_when_configured() {
        let dir = tempfile::tempdir().unwrap();
        write_png(&dir.path().join(".private/secret.png"), 4, 4);

        let config = LibraryConfig {
            include_hidden: true,
            ..LibraryConfig::default()
        };
        let source = LibrarySource::new(dir.path(), config, SubtypeConfig::default());
        let assets = source.enumerate(&AssetQuery::default()).await.unwrap();
        assert_eq!(assets.len(), 1);
        assert!(assets[0].is_hidden);
        assert_eq!(assets[0].id, ".private/secret.png");
    }

    #[tokio::test]
    async fn test_subtypes_and_favorites() {
        let dir = tempfile::tempdir().unwrap();
        write_png(&dir.path().join("pano.png"), 300, 100);
        write_png(&dir.path().join("IMG_HDR_1.png"), 4, 4);
        write_png(&dir.path().join("Screenshots/shot.png"), 4, 4);
        write_png(&dir.path().join("Favorites/fav.png"), 4, 4);
        write_png(&dir.path().join("live.png"), 4, 4);
        std::fs::write(dir.path().join("live.mov"), b"paired video").unwrap();

        let source = library(dir.path());
        let assets = source.enumerate(&AssetQuery::default()).await.unwrap();
        let by_id = |id: &str| assets.iter().find(|a| a.id == id).unwrap();

        assert!(by_id("pano.png").subtypes.contains(MediaSubtype::Panorama));
        assert!(by_id("IMG_HDR_1.png").subtypes.contains(MediaSubtype::Hdr));
        assert!(by_id("Screenshots/shot.png")
            .subtypes
            .contains(MediaSubtype::Screenshot));
        assert!(by_id("Favorites/fav.png").is_favorite);
        assert!(!by_id("pano.png").is_favorite);

        let live = by_id("live.png");
        assert!(live.subtypes.contains(MediaSubtype::MotionPhoto));
        assert_eq!(live.resources.len(), 2);
        // The paired video is not listed on its own
        assert!(assets.iter().all(|a| a.id != "live.mov"));

        let panoramas = AssetQuery {
            filter: SubtypeFilter::Panorama,
            ..AssetQuery::default()
        };
        let assets = source.enumerate(&panoramas).await.unwrap();
        assert_eq!(ids(&assets), vec!["pano.png"]);
    }

    #[tokio::test]
    async fn test_enumerate_sorted_by_creation() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["one.png", "two.png", "three.png"] {
            write_png(&dir.path().join(name), 4, 4);
        }
        let source = library(dir.path());

        let newest = source.enumerate(&AssetQuery::default()).await.unwrap();
        assert!(newest.windows(2).all(|w| w[0].created_at >= w[1].created_at));

        let oldest = AssetQuery {
            sort: SortOrder::Oldest,
            ..AssetQuery::default()
        };
        let oldest = source.enumerate(&oldest).await.unwrap();
        assert!(oldest.windows(2).all(|w| w[0].created_at <= w[1].created_at));
    }

    #[tokio::test]
    async fn test_exif_capture_time_drives_sort_order() {
        use crate::pipeline::metadata::tests::write_exif_jpeg;
        use std::time::{Duration, UNIX_EPOCH};

        let dir = tempfile::tempdir().unwrap();
        let early = dir.path().join("early.jpg");
        let late = dir.path().join("late.jpg");
        write_exif_jpeg(&early, "2020:01:01 00:00:00", 1);
        write_exif_jpeg(&late, "2022:06:15 12:00:00", 1);
        // File times disagree with the capture times
        for (path, secs) in [(&early, 2_000_000_000u64), (&late, 1_000_000_000)] {
            std::fs::File::options()
                .write(true)
                .open(path)
                .unwrap()
                .set_modified(UNIX_EPOCH + Duration::from_secs(secs))
                .unwrap();
        }

        let source = library(dir.path());
        let assets = source.enumerate(&AssetQuery::default()).await.unwrap();
        let order: Vec<_> = assets.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(order, vec!["late.jpg", "early.jpg"]);
        assert_eq!(assets[0].created_at, 1_655_294_400_000);
        assert_eq!(assets[1].created_at, 1_577_836_800_000);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_unreadable_subdirectory_is_limited() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        write_png(&dir.path().join("open.png"), 4, 4);
        let locked = dir.path().join("locked");
        write_png(&locked.join("inside.png"), 4, 4);
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o000)).unwrap();

        // Permission bits do not bind a privileged user
        if std::fs::read_dir(&locked).is_ok() {
            std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let source = library(dir.path());
        let status = source.check_permissions().await;
        let assets = source.enumerate(&AssetQuery::default()).await.unwrap();
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();

        assert_eq!(status, PermissionStatus::Limited);
        assert!(status.allows_listing());
        assert_eq!(ids(&assets), vec!["open.png"]);
    }

    #[tokio::test]
    async fn test_find_by_relative_id() {
        let dir = tempfile::tempdir().unwrap();
        write_png(&dir.path().join("trip/b.png"), 4, 4);
        write_png(&dir.path().join("live.png"), 4, 4);
        std::fs::write(dir.path().join("live.mov"), b"paired video").unwrap();
        write_png(&dir.path().join(".hidden.png"), 4, 4);

        let source = library(dir.path());
        let found = source.find("trip/b.png").await.unwrap();
        assert_eq!(found.media_type, MediaType::Image);
        let size = std::fs::metadata(dir.path().join("trip/b.png")).unwrap().len();
        assert_eq!(found.resources[0].file_size, Some(size));

        let live = source.find("live.png").await.unwrap();
        assert!(live.subtypes.contains(MediaSubtype::MotionPhoto));

        assert!(source.find("live.mov").await.is_none());
        assert!(source.find("missing.png").await.is_none());
        assert!(source.find("../escape.png").await.is_none());
        assert!(source.find("/etc/passwd").await.is_none());
        assert!(source.find(".hidden.png").await.is_none());
        assert!(source.find("").await.is_none());
    }

    #[test]
    fn test_relative_id_uses_forward_slashes() {
        let rel: PathBuf = ["a", "b", "c.jpg"].iter().collect();
        assert_eq!(relative_id(&rel).as_deref(), Some("a/b/c.jpg"));
    }
}
