//! Camera collaborators.
//!
//! The controller talks to the sensor only through the [`Camera`] trait:
//! preview frames for the viewfinder, full-size JPEG captures, and effect and
//! ISO changes. Two software implementations ship with the crate so the
//! appliance can run without camera hardware.
//!
//! # Modules
//!
//! - [`mock`]: Replays a directory of JPEG files
//! - [`pattern`]: Generates synthetic gradient frames

pub mod mock;
pub mod pattern;

pub use mock::MockCamera;
pub use pattern::PatternCamera;

use std::io::Write;

use image::DynamicImage;
use serde::Deserialize;

use crate::domain::error::Result;
use crate::domain::settings::{Fx, IsoSetting, Settings};
use crate::Config;

/// Image sensor used by the controller.
pub trait Camera: Send {
    /// Applies every camera-side setting in `settings`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::AdacamError::Camera`] if the camera rejects a setting.
    fn setup(&mut self, settings: &Settings) -> Result<()> {
        self.set_fx_mode(settings.fx_mode)?;
        self.set_iso_mode(settings.iso_mode)
    }

    /// Captures the next viewfinder frame.
    ///
    /// # Errors
    ///
    /// Returns an error if no frame can be produced.
    fn get_preview(&mut self) -> Result<DynamicImage>;

    /// Writes a full capture as JPEG to `out`, sized per `settings.size_mode`.
    ///
    /// # Errors
    ///
    /// Returns an error if capturing or writing fails. Partial output may have
    /// been written to `out`.
    fn write_picture(&mut self, out: &mut dyn Write, settings: &Settings) -> Result<()>;

    /// # Errors
    ///
    /// Returns [`crate::AdacamError::Camera`] if the effect is rejected.
    fn set_fx_mode(&mut self, fx: Fx) -> Result<()>;

    /// # Errors
    ///
    /// Returns [`crate::AdacamError::Camera`] if the value is rejected.
    fn set_iso_mode(&mut self, iso: IsoSetting) -> Result<()>;

    /// Releases the device. Called once during shutdown.
    fn cleanup(&mut self) {}
}

/// Camera backend selected by configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraDriver {
    /// [`MockCamera`] over `Config::mock_photo_dir`.
    Mock,
    /// [`PatternCamera`].
    Pattern,
}

/// Builds the camera selected by `config.camera_driver` and applies `settings`.
///
/// # Errors
///
/// Returns [`crate::AdacamError::DeviceUnavailable`] if the camera cannot be
/// opened, or the error from [`Camera::setup`].
pub fn open(config: &Config, settings: &Settings) -> Result<Box<dyn Camera>> {
    let _span = tracing::debug_span!("camera_open", driver = ?config.camera_driver).entered();

    let mut camera: Box<dyn Camera> = match config.camera_driver {
        CameraDriver::Mock => Box::new(MockCamera::open(&config.mock_photo_dir)?),
        CameraDriver::Pattern => Box::new(PatternCamera::new(
            config.screen_size,
            config.camera_resolution,
        )),
    };
    camera.setup(settings)?;

    tracing::info!(driver = ?config.camera_driver, "camera ready");
    Ok(camera)
}
