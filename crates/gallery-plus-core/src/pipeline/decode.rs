//! Image decoding with size limits and timeout support.

use image::{DynamicImage, GenericImageView};
use std::io::Cursor;
use std::path::Path;
use std::time::Duration;
use tokio::time::timeout;

use crate::config::LimitsConfig;
use crate::error::PipelineError;

/// Image decoder with configurable limits and timeout.
#[derive(Debug, Clone)]
pub struct ImageDecoder {
    limits: LimitsConfig,
}

/// Result of decoding an image.
pub struct DecodedImage {
    /// The decoded image data
    pub image: DynamicImage,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
}

impl ImageDecoder {
    /// Create a new decoder with the given limits.
    pub fn new(limits: LimitsConfig) -> Self {
        Self { limits }
    }

    /// Read and decode an image file.
    ///
    /// Files over the size limit are rejected before reading.
    pub async fn decode(&self, path: &Path) -> Result<DecodedImage, PipelineError> {
        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|source| PipelineError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        let max_bytes = self.limits.max_file_size_mb * 1024 * 1024;
        if metadata.len() > max_bytes {
            return Err(PipelineError::FileTooLarge {
                path: path.to_path_buf(),
                size_mb: metadata.len() / (1024 * 1024),
                max_mb: self.limits.max_file_size_mb,
            });
        }

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| PipelineError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        self.decode_from_bytes(bytes, path).await
    }

    /// Decode an image from an in-memory byte buffer with validation and timeout.
    pub async fn decode_from_bytes(
        &self,
        bytes: Vec<u8>,
        path: &Path,
    ) -> Result<DecodedImage, PipelineError> {
        let path_owned = path.to_path_buf();
        let timeout_duration = Duration::from_millis(self.limits.decode_timeout_ms);

        let decode_result = timeout(timeout_duration, async {
            tokio::task::spawn_blocking(move || Self::decode_bytes_sync(bytes, &path_owned)).await
        })
        .await;

        match decode_result {
            Ok(Ok(Ok(decoded))) => {
                if decoded.width > self.limits.max_image_dimension
                    || decoded.height > self.limits.max_image_dimension
                {
                    return Err(PipelineError::ImageTooLarge {
                        path: path.to_path_buf(),
                        width: decoded.width,
                        height: decoded.height,
                        max_dim: self.limits.max_image_dimension,
                    });
                }
                Ok(decoded)
            }
            Ok(Ok(Err(e))) => Err(e),
            Ok(Err(e)) => Err(PipelineError::Decode {
                path: path.to_path_buf(),
                message: format!("Task join error: {}", e),
            }),
            Err(_) => Err(PipelineError::Timeout {
                path: path.to_path_buf(),
                stage: "decode".to_string(),
                timeout_ms: self.limits.decode_timeout_ms,
            }),
        }
    }

    /// Synchronous decode from bytes (runs in spawn_blocking).
    fn decode_bytes_sync(bytes: Vec<u8>, path: &Path) -> Result<DecodedImage, PipelineError> {
        let reader = image::ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| PipelineError::Decode {
                path: path.to_path_buf(),
                message: format!("Cannot detect image format: {}", e),
            })?;
        let image = reader.decode().map_err(|e| PipelineError::Decode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let (width, height) = image.dimensions();
        Ok(DecodedImage {
            image,
            width,
            height,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::ImageFormat;

    #[tokio::test]
    async fn test_decode_detects_format_by_content() {
        // A PNG saved under a .jpg name still decodes
        let dir = tempfile::tempdir().unwrap();
        let misnamed = dir.path().join("test_misnamed.jpg");
        DynamicImage::new_rgb8(12, 8)
            .save_with_format(&misnamed, ImageFormat::Png)
            .unwrap();

        let decoder = ImageDecoder::new(LimitsConfig::default());
        let decoded = decoder.decode(&misnamed).await.unwrap();
        assert_eq!((decoded.width, decoded.height), (12, 8));
    }

    #[tokio::test]
    async fn test_decode_rejects_oversized_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wide.png");
        DynamicImage::new_rgb8(64, 4)
            .save_with_format(&path, ImageFormat::Png)
            .unwrap();

        let limits = LimitsConfig {
            max_image_dimension: 32,
            ..LimitsConfig::default()
        };
        let err = ImageDecoder::new(limits).decode(&path).await.err().unwrap();
        assert!(matches!(err, PipelineError::ImageTooLarge { width: 64, .. }));
    }

    #[tokio::test]
    async fn test_decode_garbage_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.png");
        std::fs::write(&path, b"garbage bytes").unwrap();

        let decoder = ImageDecoder::new(LimitsConfig::default());
        assert!(decoder.decode(&path).await.is_err());
    }

    #[tokio::test]
    async fn test_decode_missing_file_is_io_error() {
        let decoder = ImageDecoder::new(LimitsConfig::default());
        let err = decoder
            .decode(Path::new("/nonexistent/photo.jpg"))
            .await
            .err()
            .unwrap();
        assert!(matches!(err, PipelineError::Io { .. }));
    }
}
