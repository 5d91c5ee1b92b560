//! Media pipeline components.
//!
//! - **mime**, **video**, **metadata**: per-asset properties
//! - **decode**: bounded image decoding
//! - **color**: dominant color
//! - **thumbnail**: inline JPEG and WebP blob thumbnails
//! - **hash**: content hashes for temp file names
//! - **materialize**: host-accessible file paths
//! - **enrich**: concurrent per-item enrichment
//! - **assembler**: paginated listing
//! - **resolver**: single-item resolution

pub mod assembler;
pub mod color;
pub mod decode;
pub mod enrich;
pub mod hash;
pub mod materialize;
pub mod metadata;
pub mod mime;
pub mod resolver;
pub mod thumbnail;
pub mod video;

pub use assembler::ListAssembler;
pub use decode::{DecodedImage, ImageDecoder};
pub use enrich::{EnrichRequest, Enricher};
pub use hash::Hasher;
pub use materialize::file_uri;
pub use metadata::{Details, MetadataExtractor};
pub use resolver::Resolver;
pub use thumbnail::ThumbnailGenerator;
