//! Per-item enrichment: thumbnail, details and base color.
//!
//! Each requested field is an independent task on a [`JoinSet`]. Tasks of
//! one item share a lazily decoded image, so an image is decoded at most once
//! per call however many fields need pixels. A semaphore shared by every call
//! bounds how many tasks run at once. Results are applied by index after the
//! whole set has settled, so completion order never reorders the output.

use image::DynamicImage;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{OnceCell, Semaphore};
use tokio::task::JoinSet;

use super::color;
use super::decode::ImageDecoder;
use super::metadata::{Details, MetadataExtractor};
use super::thumbnail::ThumbnailGenerator;
use crate::config::Config;
use crate::error::PipelineError;
use crate::source::{Asset, Delivery};
use crate::types::{MediaItem, MediaType};

/// Which fields to compute for a batch of items.
#[derive(Debug, Clone)]
pub struct EnrichRequest {
    /// Longest thumbnail edge; `None` skips thumbnails
    pub thumbnail_size: Option<u32>,
    pub details: bool,
    pub base_color: bool,
    pub delivery: Delivery,
    /// Where browser-delivery thumbnails are written
    pub blob_dir: Option<PathBuf>,
}

/// Result of one enrichment task.
enum Outcome {
    Thumbnail(Option<String>),
    Details(Option<Details>),
    Color(String),
}

type SharedImage = Arc<OnceCell<Option<Arc<DynamicImage>>>>;

/// Computes optional fields for media records.
#[derive(Clone)]
pub struct Enricher {
    decoder: ImageDecoder,
    thumbnails: ThumbnailGenerator,
    color_sample: u32,
    workers: Arc<Semaphore>,
}

impl Enricher {
    pub fn new(config: &Config) -> Self {
        Self {
            decoder: ImageDecoder::new(config.limits.clone()),
            thumbnails: ThumbnailGenerator::new(config.thumbnail.clone()),
            color_sample: config.color.sample_size,
            workers: Arc::new(Semaphore::new(config.listing.parallel_workers.max(1))),
        }
    }

    /// Largest thumbnail edge a listing may request.
    pub fn max_thumbnail_size(&self) -> u32 {
        self.thumbnails.max_size()
    }

    /// The record every item starts from: identity, MIME type, size and the
    /// flags its delivery exposes.
    ///
    /// Blocking: sniffs the primary file's header.
    pub fn base_record(asset: &Asset, delivery: Delivery) -> MediaItem {
        let mut item = MediaItem::new(asset.id.clone(), asset.media_type, asset.created_at);
        item.mime_type = Some(MetadataExtractor::mime_type(asset));
        item.file_size = MetadataExtractor::file_size(asset);

        match delivery {
            Delivery::Native => {
                item.subtype = MetadataExtractor::classify_subtype(asset.subtypes);
                item.is_favorite = Some(asset.is_favorite);
                item.is_hidden = Some(asset.is_hidden);
            }
            Delivery::Browser => {
                item.name = asset.name.clone();
            }
        }
        item
    }

    /// Fill the requested fields of `items[i]` from `assets[i]`.
    ///
    /// Failures leave a field absent; the base color falls back to
    /// `#000000`. Returns once every task has finished.
    pub async fn enrich(
        &self,
        assets: &[Asset],
        items: &mut [MediaItem],
        request: &EnrichRequest,
    ) {
        let start = Instant::now();
        let this = Arc::new(self.clone());
        let mut set: JoinSet<(usize, Outcome)> = JoinSet::new();

        for (index, asset) in assets.iter().enumerate().take(items.len()) {
            let asset = Arc::new(asset.clone());
            let image: SharedImage = Arc::new(OnceCell::new());

            if let Some(size) = request.thumbnail_size {
                let (this, asset, image) = (this.clone(), asset.clone(), image.clone());
                let (delivery, blob_dir) = (request.delivery, request.blob_dir.clone());
                set.spawn(async move {
                    let _permit = this.workers.clone().acquire_owned().await.ok();
                    let thumbnail = this
                        .thumbnail(&asset, &image, size, delivery, blob_dir)
                        .await;
                    (index, Outcome::Thumbnail(thumbnail))
                });
            }

            if request.details {
                let (this, asset) = (this.clone(), asset.clone());
                set.spawn(async move {
                    let _permit = this.workers.clone().acquire_owned().await.ok();
                    let details =
                        tokio::task::spawn_blocking(move || MetadataExtractor::details(&asset))
                            .await
                            .ok()
                            .flatten();
                    (index, Outcome::Details(details))
                });
            }

            if request.base_color && asset.media_type == MediaType::Image {
                let (this, asset, image) = (this.clone(), asset.clone(), image.clone());
                set.spawn(async move {
                    let _permit = this.workers.clone().acquire_owned().await.ok();
                    let color = this.base_color(&asset, &image).await;
                    (index, Outcome::Color(color))
                });
            }
        }

        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((index, outcome)) => apply(&mut items[index], outcome),
                Err(e) => tracing::warn!("Enrichment task failed: {}", e),
            }
        }
        tracing::trace!("Enriched {} items in {:?}", items.len(), start.elapsed());
    }

    /// [`enrich`](Self::enrich) for a single record.
    pub async fn enrich_one(
        &self,
        asset: &Asset,
        item: &mut MediaItem,
        request: &EnrichRequest,
    ) {
        self.enrich(
            std::slice::from_ref(asset),
            std::slice::from_mut(item),
            request,
        )
        .await;
    }

    /// Decode the asset's primary image once; later callers share the result.
    async fn image(
        &self,
        asset: &Asset,
        cell: &OnceCell<Option<Arc<DynamicImage>>>,
    ) -> Option<Arc<DynamicImage>> {
        cell.get_or_init(|| async {
            let path = &asset.primary()?.path;
            let start = Instant::now();
            match self.decoder.decode(path).await {
                Ok(decoded) => {
                    tracing::trace!("  Decode {}: {:?}", asset.id, start.elapsed());
                    Some(Arc::new(decoded.image))
                }
                Err(e) => {
                    tracing::debug!("{}", e);
                    None
                }
            }
        })
        .await
        .clone()
    }

    async fn thumbnail(
        &self,
        asset: &Asset,
        cell: &OnceCell<Option<Arc<DynamicImage>>>,
        size: u32,
        delivery: Delivery,
        blob_dir: Option<PathBuf>,
    ) -> Option<String> {
        if asset.media_type != MediaType::Image {
            return None;
        }
        let image = self.image(asset, cell).await?;
        let generator = self.thumbnails.clone();

        let encoded = tokio::task::spawn_blocking(move || match delivery {
            Delivery::Native => generator.inline_jpeg(&image, size),
            Delivery::Browser => {
                blob_dir.and_then(|dir| generator.write_webp_blob(&image, size, &dir))
            }
        })
        .await
        .ok()
        .flatten();

        if encoded.is_none() {
            let err = PipelineError::Encode {
                path: asset.primary().map(|r| r.path.clone()).unwrap_or_default(),
                message: format!("no {:?} thumbnail produced", delivery),
            };
            tracing::debug!("{}", err);
        }
        encoded
    }

    async fn base_color(
        &self,
        asset: &Asset,
        cell: &OnceCell<Option<Arc<DynamicImage>>>,
    ) -> String {
        let Some(image) = self.image(asset, cell).await else {
            return color::FALLBACK.to_string();
        };
        let sample = self.color_sample;
        tokio::task::spawn_blocking(move || color::average_hex(&image, sample))
            .await
            .unwrap_or_else(|_| color::FALLBACK.to_string())
    }
}

fn apply(item: &mut MediaItem, outcome: Outcome) {
    match outcome {
        Outcome::Thumbnail(thumbnail) => {
            item.thumbnail = thumbnail.filter(|t| !t.is_empty());
        }
        Outcome::Details(Some(details)) => {
            item.width = Some(details.width);
            item.height = Some(details.height);
            item.orientation = details.orientation;
            item.color_model = details.color_model.map(str::to_string);
        }
        Outcome::Details(None) => {}
        Outcome::Color(color) => item.base_color = Some(color),
    }
}
