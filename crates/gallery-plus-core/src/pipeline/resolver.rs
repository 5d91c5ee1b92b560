//! Single-item resolution by id.

use std::path::PathBuf;

use super::enrich::{EnrichRequest, Enricher};
use super::materialize::materialize_original;
use crate::error::{GalleryError, Result};
use crate::options::MediaOptions;
use crate::session::Session;
use crate::source::AssetSource;
use crate::types::MediaItem;

/// Resolves one media record, optionally with a materialized path.
#[derive(Clone)]
pub struct Resolver {
    enricher: Enricher,
    temp_dir: PathBuf,
}

impl Resolver {
    pub fn new(enricher: Enricher, temp_dir: impl Into<PathBuf>) -> Self {
        Self {
            enricher,
            temp_dir: temp_dir.into(),
        }
    }

    /// Look the id up in the source, then in the session.
    ///
    /// A fresh lookup starts from a base record with no thumbnail; a session
    /// hit keeps the thumbnail it was listed with but nothing else the listing
    /// computed. Unknown ids are [`GalleryError::NotFound`].
    pub async fn resolve(
        &self,
        source: &dyn AssetSource,
        session: &Session,
        options: &MediaOptions,
    ) -> Result<MediaItem> {
        options.validate()?;
        let delivery = source.delivery();

        let (asset, mut item) = match source.find(&options.id).await {
            Some(asset) => {
                let found = asset.clone();
                let item =
                    tokio::task::spawn_blocking(move || Enricher::base_record(&found, delivery))
                        .await
                        .map_err(|e| GalleryError::Io(std::io::Error::other(e)))?;
                (asset, item)
            }
            None => match session.get(&options.id) {
                Some(entry) => (entry.asset.clone(), listed_base(&entry.item)),
                None => return Err(GalleryError::NotFound(options.id.clone())),
            },
        };

        let request = EnrichRequest {
            thumbnail_size: None,
            details: options.include_details,
            base_color: options.include_base_color,
            delivery,
            blob_dir: None,
        };
        let enrich = self.enricher.enrich_one(&asset, &mut item, &request);
        let materialize = async {
            if !options.generate_path {
                return None;
            }
            match materialize_original(&asset, delivery, &self.temp_dir).await {
                Ok(uri) => Some(uri),
                Err(e) => {
                    tracing::warn!("No path for {}: {}", asset.id, e);
                    None
                }
            }
        };
        let ((), path) = tokio::join!(enrich, materialize);

        item.path = path;
        tracing::debug!("Resolved {} via {}", item.id, source.name());
        Ok(item)
    }
}

/// A listed record reduced to its base fields plus the thumbnail.
fn listed_base(listed: &MediaItem) -> MediaItem {
    MediaItem {
        base_color: None,
        width: None,
        height: None,
        orientation: None,
        color_model: None,
        path: None,
        ..listed.clone()
    }
}
