//! Touch input pipeline.
//!
//! Raw device samples are reassembled into per-frame [`TouchEvent`]s on the
//! worker thread, carried across the [`channel`], and folded into
//! [`TapPosition`]s on the main loop:
//!
//! ```text
//! evdev → RawSample → TouchReconstructor → InputChannel → TapFolder → TapPosition
//!         (worker thread)                              (main loop)
//! ```
//!
//! # Modules
//!
//! - [`sample`]: Record types for each pipeline stage
//! - [`reconstruct`]: Frame reconstruction and tap folding state machines
//! - [`channel`]: Non-blocking hand-off queue between the two contexts

pub mod channel;
pub mod reconstruct;
pub mod sample;

pub use channel::{InputReceiver, InputSender};
pub use reconstruct::{TapFolder, TouchReconstructor};
pub use sample::{RawSample, TapPosition, TouchEvent};

use std::time::Duration;

use serde::Deserialize;

use crate::domain::error::Result;
use crate::worker::TouchscreenWorker;
use crate::Config;

/// Source of completed taps, polled once per frame by the main loop.
pub trait TapSource {
    /// Returns every tap completed since the last poll, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`crate::AdacamError::DeviceUnavailable`] when the underlying
    /// device has been lost.
    fn poll_taps(&mut self) -> Result<Vec<TapPosition>>;

    /// Releases the source. Called once when the main loop exits.
    fn shutdown(&mut self) {}
}

/// Input backend selected by configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputDriver {
    /// evdev touchscreen read on a background thread.
    Touchscreen,
    /// No input; the appliance only renders.
    None,
}

/// Taps from a touchscreen worker.
#[derive(Debug)]
pub struct TouchInput {
    receiver: InputReceiver,
    folder: TapFolder,
    worker: TouchscreenWorker,
    shutdown_timeout: Duration,
}

impl TouchInput {
    /// Opens the configured device and starts its reader thread.
    ///
    /// # Errors
    ///
    /// Returns [`crate::AdacamError::DeviceUnavailable`] if the device cannot be opened.
    pub fn start(config: &Config) -> Result<Self> {
        let (sender, receiver) = channel::channel();
        let worker = TouchscreenWorker::spawn(
            &config.input_device,
            config.grab_input,
            Duration::from_millis(config.input_poll_interval_ms),
            sender,
        )?;

        Ok(Self {
            receiver,
            folder: TapFolder::new(),
            worker,
            shutdown_timeout: Duration::from_secs_f64(config.input_shutdown_timeout_s.max(0.0)),
        })
    }
}

impl TapSource for TouchInput {
    fn poll_taps(&mut self) -> Result<Vec<TapPosition>> {
        let events = self.receiver.drain()?;
        Ok(self.folder.fold_all(&events))
    }

    fn shutdown(&mut self) {
        tracing::debug!(device = %self.worker.device_path().display(), "stopping touch input");
        self.worker.shutdown(self.shutdown_timeout);
    }
}

/// A source that never produces taps.
#[derive(Debug, Default)]
pub struct NullInput;

impl TapSource for NullInput {
    fn poll_taps(&mut self) -> Result<Vec<TapPosition>> {
        Ok(Vec::new())
    }
}

/// Builds the tap source selected by `config.input_driver`.
///
/// # Errors
///
/// Propagates device open failures for the touchscreen driver.
pub fn open(config: &Config) -> Result<Box<dyn TapSource>> {
    match config.input_driver {
        InputDriver::Touchscreen => Ok(Box::new(TouchInput::start(config)?)),
        InputDriver::None => {
            tracing::info!("input disabled by configuration");
            Ok(Box::new(NullInput))
        }
    }
}
