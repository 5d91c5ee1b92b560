//! Gallery Plus Core - media gallery access for a host shell.
//!
//! Lists, paginates, thumbnails and describes the photos and videos of an
//! asset source, and resolves single items by id.
//!
//! # Architecture
//!
//! ```text
//! Source → Enumerate/Filter/Sort → Window → Enrich (thumbnail, details, color) → JSON
//! ```
//!
//! Two sources are provided: [`LibrarySource`], a rooted media directory
//! with native-style records, and [`PickerSource`], picked files with
//! browser-style records. State shared between a listing and later lookups
//! lives in a caller-owned [`Session`].
//!
//! # Usage
//!
//! ```rust,ignore
//! use gallery_plus_core::{Config, Gallery, MediaListOptions, MediaOptions, Session};
//!
//! #[tokio::main]
//! async fn main() -> gallery_plus_core::Result<()> {
//!     let gallery = Gallery::library(Config::load()?);
//!     let mut session = Session::new();
//!
//!     let list = gallery
//!         .get_media_list(&mut session, &MediaListOptions::default())
//!         .await?;
//!     let first = gallery
//!         .get_media(&session, &MediaOptions::new(&list.media[0].id))
//!         .await?;
//!     println!("{:?}", first.mime_type);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod options;
pub mod output;
pub mod pipeline;
pub mod session;
pub mod source;
pub mod types;

pub use config::Config;
pub use error::{ConfigError, GalleryError, PipelineError, PipelineResult, Result, SourceError};
pub use options::{MediaListOptions, MediaOptions, MediaTypeFilter, SortOrder, SubtypeFilter};
pub use output::{OutputFormat, OutputWriter};
pub use session::Session;
pub use source::{AssetSource, FilePicker, FixedPicker, LibrarySource, PickerSource};
pub use types::{MediaItem, MediaList, MediaSubtype, MediaType, PermissionResponse, PermissionStatus};

use pipeline::{Enricher, ListAssembler, Resolver};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Gallery over one asset source - the main entry point.
pub struct Gallery {
    config: Config,
    source: Box<dyn AssetSource>,
    assembler: ListAssembler,
    resolver: Resolver,
}

impl Gallery {
    /// Create a gallery over `source`.
    pub fn new(config: Config, source: Box<dyn AssetSource>) -> Self {
        tracing::debug!("Initializing Gallery Plus v{} ({})", VERSION, source.name());
        let enricher = Enricher::new(&config);
        let temp_dir = config.temp_dir();
        Self {
            assembler: ListAssembler::new(enricher.clone(), temp_dir.clone()),
            resolver: Resolver::new(enricher, temp_dir),
            source,
            config,
        }
    }

    /// Gallery over the configured media library.
    pub fn library(config: Config) -> Self {
        let source = LibrarySource::from_config(&config);
        Self::new(config, Box::new(source))
    }

    /// Get a reference to the current configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn source(&self) -> &dyn AssetSource {
        self.source.as_ref()
    }

    /// Current access status of the source.
    pub async fn check_permissions(&self) -> PermissionStatus {
        self.source.check_permissions().await
    }

    /// Ask the source for access and report the resulting status.
    pub async fn request_permissions(&self) -> PermissionStatus {
        self.source.request_permissions().await
    }

    /// List one page of media, resetting `session` to this listing.
    ///
    /// Without access the page is empty; check permissions to tell the two
    /// apart.
    pub async fn get_media_list(
        &self,
        session: &mut Session,
        options: &MediaListOptions,
    ) -> Result<MediaList> {
        self.assembler
            .assemble(self.source.as_ref(), session, options)
            .await
    }

    /// Resolve a single item by id.
    pub async fn get_media(&self, session: &Session, options: &MediaOptions) -> Result<MediaItem> {
        self.resolver
            .resolve(self.source.as_ref(), session, options)
            .await
    }
}
