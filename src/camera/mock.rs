//! Camera replaying JPEG files from a directory.
//!
//! Each preview advances to the next file (wrapping), and a capture copies the
//! file currently on screen byte for byte. Useful for demos and for exercising
//! the full loop on a desktop.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use image::DynamicImage;

use crate::camera::Camera;
use crate::domain::error::{AdacamError, Result};
use crate::domain::settings::{Fx, IsoSetting, Settings};

#[derive(Debug, Clone)]
pub struct MockCamera {
    frames: Vec<PathBuf>,
    current: usize,
}

impl MockCamera {
    /// Collects every `*.jpg` file in `dir`, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns [`AdacamError::DeviceUnavailable`] if the directory cannot be read
    /// or holds no JPEG files.
    pub fn open(dir: &Path) -> Result<Self> {
        let entries = fs::read_dir(dir).map_err(|e| {
            AdacamError::DeviceUnavailable(format!("mock camera directory {}: {e}", dir.display()))
        })?;

        let mut frames: Vec<PathBuf> = entries
            .filter_map(std::result::Result::ok)
            .map(|entry| entry.path())
            .filter(|path| {
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("jpg"))
            })
            .collect();
        frames.sort();

        Self::from_frames(frames).ok_or_else(|| {
            AdacamError::DeviceUnavailable(format!("no *.jpg files in {}", dir.display()))
        })
    }

    /// Replays `frames` in the given order. Returns `None` if `frames` is empty.
    #[must_use]
    pub fn from_frames(frames: Vec<PathBuf>) -> Option<Self> {
        if frames.is_empty() {
            return None;
        }
        tracing::info!(frames = frames.len(), "initialized mock camera");
        Some(Self { frames, current: 0 })
    }

    fn current_path(&self) -> &Path {
        &self.frames[self.current % self.frames.len()]
    }
}

impl Camera for MockCamera {
    fn get_preview(&mut self) -> Result<DynamicImage> {
        self.current = (self.current + 1) % self.frames.len();
        let path = self.current_path().to_path_buf();
        image::open(&path).map_err(|e| AdacamError::from_image(path, e))
    }

    fn write_picture(&mut self, out: &mut dyn Write, _settings: &Settings) -> Result<()> {
        let path = self.current_path();
        let mut source = File::open(path).map_err(|e| {
            AdacamError::Camera(format!("cannot read {}: {e}", path.display()))
        })?;
        let bytes = io::copy(&mut source, out)
            .map_err(|e| AdacamError::WriteFailure(format!("capture copy failed: {e}")))?;
        tracing::debug!(source = ?path, bytes, "mock capture written");
        Ok(())
    }

    fn set_fx_mode(&mut self, _fx: Fx) -> Result<()> {
        Ok(())
    }

    fn set_iso_mode(&mut self, _iso: IsoSetting) -> Result<()> {
        Ok(())
    }

    fn cleanup(&mut self) {
        tracing::info!("mock camera closed cleanly");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_jpeg(path: &Path, shade: u8) {
        image::RgbImage::from_pixel(4, 4, image::Rgb([shade, shade, shade]))
            .save(path)
            .unwrap();
    }

    #[test]
    fn test_open_empty_directory_is_unavailable() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("notes.txt"), b"x").unwrap();

        assert!(matches!(
            MockCamera::open(dir.path()),
            Err(AdacamError::DeviceUnavailable(_))
        ));
    }

    #[test]
    fn test_preview_cycles_and_capture_copies_current_frame() {
        let dir = TempDir::new().unwrap();
        write_jpeg(&dir.path().join("a.jpg"), 10);
        write_jpeg(&dir.path().join("b.jpg"), 200);

        let mut camera = MockCamera::open(dir.path()).unwrap();
        let preview = camera.get_preview().unwrap();
        assert_eq!(preview.width(), 4);

        let mut captured = Vec::new();
        camera.write_picture(&mut captured, &Settings::default()).unwrap();
        assert_eq!(captured, fs::read(dir.path().join("b.jpg")).unwrap());

        camera.get_preview().unwrap();
        let mut captured = Vec::new();
        camera.write_picture(&mut captured, &Settings::default()).unwrap();
        assert_eq!(captured, fs::read(dir.path().join("a.jpg")).unwrap());
    }
}
