//! Error types for the camera appliance.
//!
//! This module defines the centralized error type [`AdacamError`] and a type alias
//! [`Result`] used throughout the crate. Variants follow the failure classes the
//! controller distinguishes at the dispatch boundary: device loss, missing or
//! undecodable images, aborted writes, guarded arithmetic on an empty index, and
//! features that are deliberately not implemented yet.

use std::path::PathBuf;

use thiserror::Error;

use crate::app::actions::{Intent, Value};

/// The main error type for appliance operations.
///
/// Most variants carry a human-readable description. I/O errors convert
/// automatically via `#[from]`; the photo store maps `NotFound` I/O errors to
/// [`AdacamError::NotFound`] explicitly so callers can match on them.
///
/// # Examples
///
/// ```
/// use adacam::AdacamError;
///
/// let err = AdacamError::Unimplemented("change_iso");
/// assert!(err.is_fatal());
///
/// let err = AdacamError::EmptyIndex;
/// assert!(!err.is_fatal());
/// ```
#[derive(Debug, Error)]
pub enum AdacamError {
    /// An input or camera device could not be opened or was lost.
    ///
    /// Fatal for the affected source: the main loop stops when this surfaces.
    #[error("Device unavailable: {0}")]
    DeviceUnavailable(String),

    /// A stored image or its backing file does not exist.
    #[error("Not found: {}", .0.display())]
    NotFound(PathBuf),

    /// An image file exists but could not be decoded.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Writing a new picture failed before it was committed.
    ///
    /// The image index is never updated when this is returned.
    #[error("Write failure: {0}")]
    WriteFailure(String),

    /// An operation that divides by the index length ran on an empty index.
    #[error("Image index is empty")]
    EmptyIndex,

    /// A handler that is intentionally unimplemented was invoked.
    #[error("Unimplemented feature: {0}")]
    Unimplemented(&'static str),

    /// An intent arrived with a payload of the wrong shape.
    #[error("Invalid payload for {intent:?}: {value:?}")]
    InvalidPayload {
        /// The intent being dispatched.
        intent: Intent,
        /// The payload that could not be interpreted.
        value: Value,
    },

    /// Two handlers were registered for the same intent.
    #[error("Handler already registered for {0:?}")]
    DuplicateHandler(Intent),

    /// An intent has no registered handler.
    #[error("No handler registered for {0:?}")]
    MissingHandler(Intent),

    /// The camera collaborator reported a failure.
    #[error("Camera error: {0}")]
    Camera(String),

    /// Configuration is invalid or could not be parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AdacamError {
    /// Returns `true` for errors that must terminate the main loop.
    ///
    /// Unimplemented features and unrecoverable device loss stop the process;
    /// every other error is logged at the dispatch boundary and the loop keeps
    /// running.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Unimplemented(_) | Self::DeviceUnavailable(_))
    }

    /// Maps an `image` crate error for `path` onto the crate taxonomy.
    pub(crate) fn from_image(path: PathBuf, err: image::ImageError) -> Self {
        match err {
            image::ImageError::IoError(io) if io.kind() == std::io::ErrorKind::NotFound => {
                Self::NotFound(path)
            }
            other => Self::Decode(format!("{}: {other}", path.display())),
        }
    }
}

/// A specialized `Result` type for appliance operations.
pub type Result<T> = std::result::Result<T, AdacamError>;
