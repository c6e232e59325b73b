//! Photo store abstraction.
//!
//! This module defines the [`ImageStore`] trait that the controller uses for
//! everything touching stored pictures. The controller never builds paths
//! itself; it only deals in numeric ids and lets the store map them to files.
//!
//! # Design
//!
//! The trait mirrors what the controller actually does with pictures: list
//! them once at startup, write a new one, delete one, and load one for
//! display. Writes go through a [`PhotoWriter`] so a failed capture never
//! leaves a half-written picture under its final name.

use std::path::{Path, PathBuf};

use image::DynamicImage;

use crate::domain::error::Result;
use crate::domain::index::ImageIndex;
use crate::storage::photos::PhotoWriter;

/// Persistent set of pictures addressed by numeric id.
///
/// # Implementations
///
/// - [`crate::storage::PhotoDirectory`]: One `IMG_NNNN.JPG` file per picture
///
/// # Examples
///
/// ```no_run
/// use adacam::storage::{ImageStore, PhotoDirectory};
///
/// let mut store = PhotoDirectory::new("/opt/adacam/photos");
/// let index = store.scan()?;
/// if let Some(id) = index.last() {
///     let picture = store.load(id)?;
///     println!("{}x{}", picture.width(), picture.height());
/// }
/// # Ok::<(), adacam::AdacamError>(())
/// ```
pub trait ImageStore: Send {
    /// Directory holding the pictures.
    fn photo_dir(&self) -> &Path;

    /// Final path of picture `id`.
    fn path(&self, id: u32) -> PathBuf;

    /// Lists every stored picture id.
    ///
    /// Creates the directory when it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or read.
    fn scan(&mut self) -> Result<ImageIndex>;

    /// Opens a writer for picture `id`.
    ///
    /// Nothing is visible under the final name until
    /// [`PhotoWriter::commit`] succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`crate::AdacamError::WriteFailure`] if the temporary file
    /// cannot be created.
    fn write(&mut self, id: u32) -> Result<PhotoWriter>;

    /// Removes picture `id`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::AdacamError::NotFound`] if the picture does not exist,
    /// or an I/O error if removal fails.
    fn delete(&mut self, id: u32) -> Result<()>;

    /// Decodes picture `id`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::AdacamError::NotFound`] for a missing file and
    /// [`crate::AdacamError::Decode`] for an unreadable one.
    fn load(&self, id: u32) -> Result<DynamicImage>;
}
