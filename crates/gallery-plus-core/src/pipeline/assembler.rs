//! Listing: enumerate, window, enrich, and record the session.

use std::ops::Range;
use std::path::{Path, PathBuf};
use std::time::Instant;

use super::enrich::{EnrichRequest, Enricher};
use crate::error::{GalleryError, Result};
use crate::options::MediaListOptions;
use crate::session::Session;
use crate::source::{Asset, AssetQuery, AssetSource, Delivery};
use crate::types::{MediaItem, MediaList};

/// Builds pages of media records from an asset source.
#[derive(Clone)]
pub struct ListAssembler {
    enricher: Enricher,
    blob_root: PathBuf,
}

impl ListAssembler {
    pub fn new(enricher: Enricher, blob_root: impl Into<PathBuf>) -> Self {
        Self {
            enricher,
            blob_root: blob_root.into(),
        }
    }

    /// Indices of the page `[start_at, start_at + limit)` within `len` items.
    ///
    /// Out-of-range offsets give an empty range.
    pub fn window(len: usize, start_at: usize, limit: usize) -> Range<usize> {
        let start = start_at.min(len);
        let end = start.saturating_add(limit).min(len);
        start..end
    }

    /// List one page of media.
    ///
    /// The session is reset only once enumeration has succeeded, so a
    /// cancelled pick keeps the previous listing resolvable. Picker listings
    /// record every enumerated asset; library listings record the page.
    pub async fn assemble(
        &self,
        source: &dyn AssetSource,
        session: &mut Session,
        options: &MediaListOptions,
    ) -> Result<MediaList> {
        options.validate(self.enricher.max_thumbnail_size())?;
        let start = Instant::now();

        let assets = source.enumerate(&AssetQuery::from(options)).await?;
        tracing::debug!("{} enumerated {} assets", source.name(), assets.len());
        session.reset();

        let delivery = source.delivery();
        let page = Self::window(assets.len(), options.start_at, options.limit);

        // Browser sessions keep everything, since nothing can be reopened by id
        let recorded = match delivery {
            Delivery::Browser => 0..assets.len(),
            Delivery::Native => page.clone(),
        };
        let page = (page.start - recorded.start)..(page.end - recorded.start);
        let entries = base_records(assets[recorded].to_vec(), delivery).await?;

        let page_assets: Vec<Asset> = entries[page.clone()]
            .iter()
            .map(|(asset, _)| asset.clone())
            .collect();
        let mut items: Vec<MediaItem> = entries[page]
            .iter()
            .map(|(_, item)| item.clone())
            .collect();
        for (asset, item) in entries {
            session.insert(asset, item);
        }

        let blob_dir = match delivery {
            Delivery::Browser => blob_dir(session, &self.blob_root),
            Delivery::Native => None,
        };
        let request = EnrichRequest {
            thumbnail_size: Some(options.thumbnail_size),
            details: options.include_details,
            base_color: options.include_base_color,
            delivery,
            blob_dir,
        };
        self.enricher.enrich(&page_assets, &mut items, &request).await;

        for item in &items {
            session.update_item(item.clone());
        }

        tracing::debug!(
            "Listed {} of {} items in {:?}",
            items.len(),
            session.len(),
            start.elapsed()
        );
        Ok(MediaList { media: items })
    }
}

/// Base records built off the async runtime.
async fn base_records(
    assets: Vec<Asset>,
    delivery: Delivery,
) -> Result<Vec<(Asset, MediaItem)>> {
    tokio::task::spawn_blocking(move || {
        assets
            .into_iter()
            .map(|asset| {
                let item = Enricher::base_record(&asset, delivery);
                (asset, item)
            })
            .collect()
    })
    .await
    .map_err(|e| GalleryError::Io(std::io::Error::other(e)))
}

fn blob_dir(session: &mut Session, root: &Path) -> Option<PathBuf> {
    match session.blob_dir(root) {
        Ok(dir) => Some(dir.to_path_buf()),
        Err(e) => {
            tracing::warn!("No thumbnail blob directory under {:?}: {}", root, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::options::{SortOrder, SubtypeFilter};
    use crate::source::{LibrarySource, PickerSource};
    use image::{DynamicImage, ImageFormat};

    #[test]
    fn test_window_clamps() {
        assert_eq!(ListAssembler::window(10, 0, 3), 0..3);
        assert_eq!(ListAssembler::window(10, 8, 5), 8..10);
        assert_eq!(ListAssembler::window(10, 12, 5), 10..10);
        assert_eq!(ListAssembler::window(10, 2, 0), 2..2);
        assert_eq!(ListAssembler::window(3, 1, usize::MAX), 1..3);
    }

    fn assembler(blob_root: &Path) -> ListAssembler {
        ListAssembler::new(Enricher::new(&Config::default()), blob_root)
    }

    fn write_pngs(dir: &Path, names: &[&str]) {
        for name in names {
            DynamicImage::new_rgb8(8, 8)
                .save_with_format(dir.join(name), ImageFormat::Png)
                .unwrap();
        }
    }

    #[tokio::test]
    async fn test_library_page_and_session() {
        let library = tempfile::tempdir().unwrap();
        let temp = tempfile::tempdir().unwrap();
        write_pngs(library.path(), &["a.png", "b.png", "c.png", "d.png"]);

        let source = LibrarySource::new(library.path(), Default::default(), Default::default());
        let mut session = Session::new();
        let options = MediaListOptions {
            limit: 2,
            start_at: 1,
            sort: SortOrder::Oldest,
            ..MediaListOptions::default()
        };
        let list = assembler(temp.path())
            .assemble(&source, &mut session, &options)
            .await
            .unwrap();

        assert_eq!(list.media.len(), 2);
        assert_eq!(session.len(), 2);
        for item in &list.media {
            assert!(item.thumbnail.as_ref().is_some_and(|t| !t.starts_with("file://")));
            assert_eq!(item.mime_type.as_deref(), Some("image/png"));
            assert!(item.base_color.is_none());
            assert!(item.is_favorite.is_some());
        }
    }

    #[tokio::test]
    async fn test_picker_session_keeps_all_assets() {
        let picked = tempfile::tempdir().unwrap();
        let temp = tempfile::tempdir().unwrap();
        write_pngs(picked.path(), &["one.png", "two.png", "three.png"]);

        let source = PickerSource::fixed([picked.path()]);
        let mut session = Session::new();
        let options = MediaListOptions {
            limit: 1,
            ..MediaListOptions::default()
        };
        let list = assembler(temp.path())
            .assemble(&source, &mut session, &options)
            .await
            .unwrap();

        assert_eq!(list.media.len(), 1);
        assert_eq!(session.len(), 3);
        let item = &list.media[0];
        assert!(item.thumbnail.as_ref().is_some_and(|t| t.starts_with("file://")));
        assert!(item.name.is_some());
        assert_eq!(session.get(&item.id).unwrap().item.thumbnail, item.thumbnail);
    }

    #[tokio::test]
    async fn test_failed_pick_keeps_previous_session() {
        let picked = tempfile::tempdir().unwrap();
        let temp = tempfile::tempdir().unwrap();
        write_pngs(picked.path(), &["keep.png"]);

        let mut session = Session::new();
        let assembler = assembler(temp.path());
        assembler
            .assemble(
                &PickerSource::fixed([picked.path()]),
                &mut session,
                &MediaListOptions::default(),
            )
            .await
            .unwrap();
        assert_eq!(session.len(), 1);

        let missing = PickerSource::fixed(["/nonexistent/pick"]);
        let result = assembler
            .assemble(&missing, &mut session, &MediaListOptions::default())
            .await;
        assert!(result.is_err());
        assert!(session.get("keep.png").is_some());
    }

    #[tokio::test]
    async fn test_out_of_range_and_filtered_pages_are_empty() {
        let library = tempfile::tempdir().unwrap();
        let temp = tempfile::tempdir().unwrap();
        write_pngs(library.path(), &["a.png"]);
        let source = LibrarySource::new(library.path(), Default::default(), Default::default());
        let mut session = Session::new();

        let past_end = MediaListOptions {
            start_at: 5,
            ..MediaListOptions::default()
        };
        let list = assembler(temp.path())
            .assemble(&source, &mut session, &past_end)
            .await
            .unwrap();
        assert!(list.media.is_empty());

        let hdr = MediaListOptions {
            filter: SubtypeFilter::Hdr,
            ..MediaListOptions::default()
        };
        let list = assembler(temp.path())
            .assemble(&source, &mut session, &hdr)
            .await
            .unwrap();
        assert!(list.media.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_options_rejected_before_enumeration() {
        let temp = tempfile::tempdir().unwrap();
        let source = PickerSource::fixed(["/nonexistent/pick"]);
        let options = MediaListOptions {
            thumbnail_size: 0,
            ..MediaListOptions::default()
        };
        let err = assembler(temp.path())
            .assemble(&source, &mut Session::new(), &options)
            .await
            .unwrap_err();
        assert!(matches!(err, GalleryError::InvalidOptions(_)));

        let oversized = MediaListOptions {
            thumbnail_size: 100_000,
            ..MediaListOptions::default()
        };
        let err = assembler(temp.path())
            .assemble(&source, &mut Session::new(), &oversized)
            .await
            .unwrap_err();
        assert!(matches!(err, GalleryError::InvalidOptions(_)));
    }
}
