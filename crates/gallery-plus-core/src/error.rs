//! Error types for the Gallery Plus media pipeline.
//!
//! Only a few failures ever reach the caller: configuration problems, picker
//! cancellation, invalid options and unknown ids. Everything that goes wrong
//! while enriching a single item is a [`PipelineError`], which the assembler
//! and resolver absorb into an absent field.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for Gallery Plus operations.
#[derive(Error, Debug)]
pub enum GalleryError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Asset source failures (picker cancelled, unreadable selection)
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// Single-item resolution found no asset with this id
    #[error("Media not found: {0}")]
    NotFound(String),

    /// Call options failed validation
    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Errors raised by an asset source while enumerating.
#[derive(Error, Debug)]
pub enum SourceError {
    /// The user dismissed the picker or selected nothing
    #[error("No files selected")]
    PickerCancelled,

    /// The picker itself failed (terminal gone, prompt error)
    #[error("Picker failed: {0}")]
    Picker(String),

    /// A picked path could not be read
    #[error("Cannot read {path}: {message}")]
    Unreadable { path: PathBuf, message: String },
}

/// Per-item enrichment errors, organized by stage.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Image decoding failed
    #[error("Decode error for {path}: {message}")]
    Decode { path: PathBuf, message: String },

    /// Operation timed out
    #[error("Timeout in {stage} stage for {path} after {timeout_ms}ms")]
    Timeout {
        path: PathBuf,
        stage: String,
        timeout_ms: u64,
    },

    /// File exceeds size limit
    #[error("File too large: {path} ({size_mb}MB > {max_mb}MB)")]
    FileTooLarge {
        path: PathBuf,
        size_mb: u64,
        max_mb: u64,
    },

    /// Image dimensions exceed limit
    #[error("Image too large: {path} ({width}x{height} > {max_dim})")]
    ImageTooLarge {
        path: PathBuf,
        width: u32,
        height: u32,
        max_dim: u32,
    },

    /// Thumbnail encoding failed
    #[error("Encode error for {path}: {message}")]
    Encode { path: PathBuf, message: String },

    /// Reading or writing a file failed
    #[error("IO error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience type alias for Gallery Plus results.
pub type Result<T> = std::result::Result<T, GalleryError>;

/// Convenience type alias for pipeline-specific results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
