//! Synthetic camera producing moving gradient frames.
//!
//! Needs no files or hardware. Captures are real JPEGs at the configured
//! sensor resolution divided by the size mode, so the whole capture path
//! (encoding, store commit, reload) is exercised.

use std::io::Write;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ExtendedColorType, Rgb, RgbImage};

use crate::camera::Camera;
use crate::domain::error::{AdacamError, Result};
use crate::domain::settings::{Fx, IsoSetting, Settings};

#[derive(Debug, Clone)]
pub struct PatternCamera {
    preview_size: (u32, u32),
    resolution: (u32, u32),
    phase: u8,
    fx: Fx,
}

impl PatternCamera {
    #[must_use]
    pub fn new(preview_size: (u32, u32), resolution: (u32, u32)) -> Self {
        Self {
            preview_size,
            resolution,
            phase: 0,
            fx: Fx::None,
        }
    }

    fn frame(&self, (width, height): (u32, u32)) -> RgbImage {
        let w = width.max(1);
        let h = height.max(1);
        let mut frame = RgbImage::from_fn(w, h, |x, y| {
            let r = (x * 255 / w) as u8;
            let g = (y * 255 / h) as u8;
            Rgb([r, g, self.phase])
        });
        if self.fx == Fx::Negative {
            image::imageops::invert(&mut frame);
        }
        frame
    }
}

impl Camera for PatternCamera {
    fn get_preview(&mut self) -> Result<DynamicImage> {
        self.phase = self.phase.wrapping_add(4);
        Ok(DynamicImage::ImageRgb8(self.frame(self.preview_size)))
    }

    fn write_picture(&mut self, out: &mut dyn Write, settings: &Settings) -> Result<()> {
        let (width, height) = settings.size_mode.scale(self.resolution);
        let _span = tracing::debug_span!("pattern_capture", width, height).entered();

        let frame = self.frame((width, height));
        JpegEncoder::new_with_quality(out, settings.jpeg_quality_percent())
            .encode(frame.as_raw(), frame.width(), frame.height(), ExtendedColorType::Rgb8)
            .map_err(|e| AdacamError::WriteFailure(format!("jpeg encoding failed: {e}")))
    }

    fn set_fx_mode(&mut self, fx: Fx) -> Result<()> {
        tracing::debug!(fx = ?fx, "pattern camera effect");
        self.fx = fx;
        Ok(())
    }

    fn set_iso_mode(&mut self, iso: IsoSetting) -> Result<()> {
        tracing::debug!(iso = ?iso.iso, "pattern camera iso ignored");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::settings::SizeMode;

    #[test]
    fn test_preview_matches_screen_size() {
        let mut camera = PatternCamera::new((320, 240), (2592, 1944));
        let preview = camera.get_preview().unwrap();
        assert_eq!((preview.width(), preview.height()), (320, 240));
    }

    #[test]
    fn test_capture_is_scaled_jpeg() {
        let mut camera = PatternCamera::new((32, 24), (64, 48));
        let settings = Settings {
            size_mode: SizeMode::Med,
            ..Settings::default()
        };

        let mut jpeg = Vec::new();
        camera.write_picture(&mut jpeg, &settings).unwrap();

        let decoded = image::load_from_memory(&jpeg).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (32, 24));
    }

    #[test]
    fn test_negative_effect_inverts_frame() {
        let mut camera = PatternCamera::new((8, 8), (8, 8));
        let plain = camera.frame((8, 8));
        camera.set_fx_mode(Fx::Negative).unwrap();
        let inverted = camera.frame((8, 8));

        assert_eq!(plain.get_pixel(0, 0)[0], 255 - inverted.get_pixel(0, 0)[0]);
    }
}
