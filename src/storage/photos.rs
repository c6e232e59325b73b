//! Directory-backed photo store.
//!
//! Every picture lives in its own `IMG_NNNN.JPG` file inside one directory,
//! where `NNNN` is the zero-padded id. Ids are allowed to have gaps; the
//! directory listing is the source of truth at startup.
//!
//! New pictures are written to `IMG_NNNN.JPG.tmp` and renamed into place by
//! [`PhotoWriter::commit`] after an fsync, with permissions set to `0644`.
//! A writer dropped without committing removes its temporary file, so a
//! failed capture leaves the directory exactly as it was.
//! Temporary files left behind by a crash are removed on the next scan.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use image::DynamicImage;

use crate::domain::error::{AdacamError, Result};
use crate::domain::index::ImageIndex;
use crate::storage::backend::ImageStore;

const PREFIX: &str = "IMG_";
const SUFFIX: &str = ".JPG";
const TMP_EXTENSION: &str = "tmp";
const PHOTO_MODE: u32 = 0o644;

/// File name of picture `id`.
#[must_use]
pub fn file_name(id: u32) -> String {
    format!("{PREFIX}{id:04}{SUFFIX}")
}

/// Id encoded in a picture file name.
///
/// Returns `None` for names that are not `IMG_*.JPG`, and
/// `Some(Err(name))` for `IMG_*.JPG` names that [`file_name`] would not
/// produce for any id (`IMG_12.JPG`, `IMG_+7.JPG`, `IMG_00012.JPG`).
fn parse_file_name(name: &str) -> Option<std::result::Result<u32, &str>> {
    let digits = name.strip_prefix(PREFIX)?.strip_suffix(SUFFIX)?;
    let id = digits
        .parse::<u32>()
        .ok()
        .filter(|id| file_name(*id) == name);
    Some(id.ok_or(name))
}

/// Whether `name` is the temporary file of an unfinished picture.
fn is_leftover_tmp(name: &str) -> bool {
    name.strip_suffix(TMP_EXTENSION)
        .and_then(|stem| stem.strip_suffix('.'))
        .and_then(parse_file_name)
        .is_some_and(|id| id.is_ok())
}

/// Pictures stored as files in a single directory.
#[derive(Debug, Clone)]
pub struct PhotoDirectory {
    photo_dir: PathBuf,
}

impl PhotoDirectory {
    /// Creates a store rooted at `photo_dir`. Nothing is touched on disk
    /// until [`ImageStore::scan`].
    pub fn new(photo_dir: impl Into<PathBuf>) -> Self {
        Self {
            photo_dir: photo_dir.into(),
        }
    }
}

impl ImageStore for PhotoDirectory {
    fn photo_dir(&self) -> &Path {
        &self.photo_dir
    }

    fn path(&self, id: u32) -> PathBuf {
        self.photo_dir.join(file_name(id))
    }

    fn scan(&mut self) -> Result<ImageIndex> {
        let _span = tracing::debug_span!("photo_scan", dir = %self.photo_dir.display()).entered();

        fs::create_dir_all(&self.photo_dir)?;

        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.photo_dir)? {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if is_leftover_tmp(name) {
                match fs::remove_file(entry.path()) {
                    Ok(()) => tracing::warn!(file = name, "removed unfinished photo"),
                    Err(e) => tracing::warn!(file = name, error = %e, "failed to remove unfinished photo"),
                }
                continue;
            }
            match parse_file_name(name) {
                Some(Ok(id)) => ids.push(id),
                Some(Err(name)) => {
                    tracing::warn!(file = name, "ignoring photo with non-canonical file name");
                }
                None => {}
            }
        }

        let index = ImageIndex::new(ids);
        tracing::info!(count = index.len(), last = ?index.last(), "photo directory scanned");
        Ok(index)
    }

    fn write(&mut self, id: u32) -> Result<PhotoWriter> {
        PhotoWriter::create(self.path(id))
    }

    fn delete(&mut self, id: u32) -> Result<()> {
        let path = self.path(id);
        let _span = tracing::debug_span!("photo_delete", image_id = id).entered();

        match fs::remove_file(&path) {
            Ok(()) => {
                tracing::info!(image_id = id, "photo deleted");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(AdacamError::NotFound(path)),
            Err(e) => Err(e.into()),
        }
    }

    fn load(&self, id: u32) -> Result<DynamicImage> {
        let path = self.path(id);
        let _span = tracing::debug_span!("photo_load", image_id = id).entered();
        image::open(&path).map_err(|e| AdacamError::from_image(path, e))
    }
}

/// Scoped writer for one picture.
///
/// Bytes go to a temporary sibling of the final path. [`commit`](Self::commit)
/// publishes the picture; dropping the writer instead discards it.
#[derive(Debug)]
pub struct PhotoWriter {
    file: Option<BufWriter<File>>,
    tmp_path: PathBuf,
    final_path: PathBuf,
}

impl PhotoWriter {
    fn create(final_path: PathBuf) -> Result<Self> {
        let mut tmp_path = final_path.clone().into_os_string();
        tmp_path.push(".");
        tmp_path.push(TMP_EXTENSION);
        let tmp_path = PathBuf::from(tmp_path);

        let file = File::create(&tmp_path).map_err(|e| {
            AdacamError::WriteFailure(format!("cannot create {}: {e}", tmp_path.display()))
        })?;

        tracing::trace!(tmp_path = ?tmp_path, "writing to temporary file");

        Ok(Self {
            file: Some(BufWriter::new(file)),
            tmp_path,
            final_path,
        })
    }

    /// Path the picture will have once committed.
    #[must_use]
    pub fn final_path(&self) -> &Path {
        &self.final_path
    }

    /// Flushes, syncs and renames the picture into place.
    ///
    /// # Errors
    ///
    /// Returns [`AdacamError::WriteFailure`] if any step fails. The temporary
    /// file is removed in that case.
    pub fn commit(mut self) -> Result<PathBuf> {
        let Some(writer) = self.file.take() else {
            return Err(AdacamError::WriteFailure("writer already closed".to_string()));
        };

        let finalize = || -> io::Result<()> {
            let file = writer.into_inner().map_err(io::IntoInnerError::into_error)?;
            file.sync_all()?;
            file.set_permissions(fs::Permissions::from_mode(PHOTO_MODE))?;
            drop(file);
            fs::rename(&self.tmp_path, &self.final_path)
        };

        if let Err(e) = finalize() {
            let _ = fs::remove_file(&self.tmp_path);
            return Err(AdacamError::WriteFailure(format!(
                "cannot finalize {}: {e}",
                self.final_path.display()
            )));
        }

        tracing::debug!(path = ?self.final_path, "photo committed");
        Ok(self.final_path.clone())
    }

    fn inner(&mut self) -> io::Result<&mut BufWriter<File>> {
        self.file
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::BrokenPipe, "photo writer closed"))
    }
}

impl Write for PhotoWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner()?.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner()?.flush()
    }
}

impl Drop for PhotoWriter {
    fn drop(&mut self) {
        if self.file.take().is_some() {
            if let Err(e) = fs::remove_file(&self.tmp_path) {
                tracing::warn!(tmp_path = ?self.tmp_path, error = %e, "failed to remove unfinished photo");
            } else {
                tracing::debug!(tmp_path = ?self.tmp_path, "unfinished photo discarded");
            }
        }
    }
}
