//! Caller-owned cache of the most recent listing.
//!
//! A picker cannot reopen a file by id, so every asset it enumerates is kept
//! here until the next listing. Listing takes the session mutably and
//! resolution takes it shared, so the two never overlap.

use std::collections::HashMap;
use std::path::Path;
use tempfile::TempDir;

use crate::source::Asset;
use crate::types::MediaItem;

/// An asset and the record produced for it when it was listed.
#[derive(Debug, Clone)]
pub struct SessionEntry {
    pub asset: Asset,
    pub item: MediaItem,
}

/// Listing state shared between `get_media_list` and `get_media`.
#[derive(Debug, Default)]
pub struct Session {
    entries: HashMap<String, SessionEntry>,
    blobs: Option<TempDir>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every entry and delete the thumbnail blobs of the last listing.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.blobs = None;
    }

    /// Record an asset. A later entry with the same id replaces the earlier.
    pub fn insert(&mut self, asset: Asset, item: MediaItem) {
        self.entries
            .insert(asset.id.clone(), SessionEntry { asset, item });
    }

    /// Replace the cached record of an already-recorded asset.
    pub fn update_item(&mut self, item: MediaItem) {
        if let Some(entry) = self.entries.get_mut(&item.id) {
            entry.item = item;
        }
    }

    pub fn get(&self, id: &str) -> Option<&SessionEntry> {
        self.entries.get(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Directory for thumbnail blobs, created under `base` on first use.
    ///
    /// Blob URLs stay valid until the next [`reset`](Self::reset) or drop.
    pub fn blob_dir(&mut self, base: &Path) -> std::io::Result<&Path> {
        if self.blobs.is_none() {
            std::fs::create_dir_all(base)?;
            let dir = tempfile::Builder::new()
                .prefix("gallery-plus-")
                .tempdir_in(base)?;
            tracing::debug!("Thumbnail blobs in {:?}", dir.path());
            self.blobs = Some(dir);
        }
        match &self.blobs {
            Some(dir) => Ok(dir.path()),
            None => Err(std::io::Error::other("blob directory unavailable")),
        }
    }
}
