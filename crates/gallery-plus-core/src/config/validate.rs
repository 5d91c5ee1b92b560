//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.listing.parallel_workers == 0 {
            return Err(ConfigError::ValidationError(
                "listing.parallel_workers must be > 0".into(),
            ));
        }
        if self.listing.thumbnail_size == 0 {
            return Err(ConfigError::ValidationError(
                "listing.thumbnail_size must be > 0".into(),
            ));
        }
        if self.listing.thumbnail_size > self.thumbnail.max_size {
            return Err(ConfigError::ValidationError(format!(
                "listing.thumbnail_size must be <= thumbnail.max_size ({})",
                self.thumbnail.max_size
            )));
        }
        if !(self.thumbnail.quality > 0.0 && self.thumbnail.quality <= 1.0) {
            return Err(ConfigError::ValidationError(
                "thumbnail.quality must be in (0.0, 1.0]".into(),
            ));
        }
        if self.color.sample_size == 0 {
            return Err(ConfigError::ValidationError(
                "color.sample_size must be > 0".into(),
            ));
        }
        if self.subtypes.panorama_min_aspect < 1.0 {
            return Err(ConfigError::ValidationError(
                "subtypes.panorama_min_aspect must be >= 1.0".into(),
            ));
        }
        if self.limits.max_file_size_mb == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_file_size_mb must be > 0".into(),
            ));
        }
        if self.limits.max_image_dimension == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_image_dimension must be > 0".into(),
            ));
        }
        if self.limits.decode_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "limits.decode_timeout_ms must be > 0".into(),
            ));
        }
        if self.library.image_extensions.is_empty() && self.library.video_extensions.is_empty() {
            return Err(ConfigError::ValidationError(
                "library needs at least one image or video extension".into(),
            ));
        }
        Ok(())
    }
}
