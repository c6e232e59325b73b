//! Adacam: a touchscreen point-and-shoot camera appliance.
//!
//! Adacam drives a small camera with a 320x240 resistive touchscreen:
//! - Touch samples from an evdev device are rebuilt into frames and taps
//! - Taps are hit-tested against per-screen button regions
//! - Intents from those buttons drive a screen mode state machine
//! - Pictures are stored as numbered JPEG files with atomic commits

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! The crate follows a layered architecture pattern:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Binary (main.rs)                                   │  ← CLI, lifecycle
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← State machine
//! │  - Intent dispatch                                  │
//! │  - Controller state                                 │
//! │  - Main loop                                        │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ Input Layer   │   │ Storage Layer │   │ UI Layer      │
//! │ (input/,      │   │ (storage/)    │   │ (ui/)         │
//! │  worker/)     │   │ - Photo dir   │   │ - Regions     │
//! │ - Reconstruct │   │ - Atomic      │   │ - Layout      │
//! │ - Tap folding │   │   commits     │   │ - Display     │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!         │                    │                    │
//! ┌─────────────────────────────────────────────────────┐
//! │  Camera (camera/), Domain (domain/),                │
//! │  Infrastructure (infrastructure/)                   │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │
//! │  - stderr logging, OTLP JSON trace file             │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Controller state machine, dispatcher and main loop
//! - [`camera`]: Camera trait and software cameras
//! - [`domain`]: Errors, settings and the image index
//! - [`infrastructure`]: Install locations and path expansion
//! - [`input`]: Touch reconstruction, tap folding and input drivers
//! - [`storage`]: Directory-backed photo store
//! - [`ui`]: Hit-test regions, default layout and display output
//! - [`worker`]: Background touchscreen reader
//! - [`observability`]: Tracing setup
//!
//! # Configuration
//!
//! Launch-time parameters come from a TOML file, `/opt/adacam/adacam.toml`
//! by default. Every key is optional:
//!
//! ```toml
//! screen_size = [320, 240]
//! camera_driver = "pattern"
//! input_device = "/dev/input/touchscreen"
//! photo_storage_dir = "~/adacam/photos"
//! trace_level = "info"
//!
//! [settings]
//! size_mode = "med"
//! snap_pause_time = 1.5
//! ```
//!
//! # Initialization Flow
//!
//! 1. **Startup** (`main.rs`): parse arguments, load config, install tracing
//! 2. **[`initialize`]**: scan the photo directory, open the camera, build state
//! 3. **Input**: open the touchscreen and start its reader thread
//! 4. **Main loop**: poll taps, dispatch intents, redraw, until quit or Ctrl-C
//! 5. **Cleanup**: release the camera, stop the reader with a bounded wait
//!
//! # Examples
//!
//! ```rust
//! use adacam::app::{Dispatcher, Intent, IntentEvent, Value};
//! use adacam::{initialize, CameraDriver, Config};
//!
//! let dir = tempfile::tempdir()?;
//! let config = Config {
//!     camera_driver: CameraDriver::Pattern,
//!     camera_resolution: (64, 48),
//!     photo_storage_dir: dir.path().join("photos"),
//!     ..Default::default()
//! };
//!
//! let mut state = initialize(&config)?;
//! let dispatcher = Dispatcher::standard()?;
//! dispatcher.dispatch(&mut state, IntentEvent::new(Intent::TakePicture, Value::None))?;
//! assert_eq!(state.selected_image_id(), Some(0));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod app;
pub mod camera;
pub mod domain;
pub mod infrastructure;
pub mod input;
pub mod storage;
pub mod ui;
pub mod worker;

pub mod observability;

pub use app::{ControllerState, Dispatcher, Intent, IntentEvent, ScreenMode, Value};
pub use camera::CameraDriver;
pub use domain::{AdacamError, Result, Settings};
pub use input::InputDriver;

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::storage::{ImageStore, PhotoDirectory};

/// Launch-time parameters, read once at startup.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Display size in pixels. Default: `(320, 240)`
    pub screen_size: (u32, u32),

    /// Full sensor resolution used for captures. Default: `(2592, 1944)`
    pub camera_resolution: (u32, u32),

    /// Frames averaged by the fps readout. Default: 10
    pub fps_window: usize,

    /// Image shown before the main loop starts, if the file exists.
    pub splash_img_path: Option<PathBuf>,

    /// Seconds the splash stays up. Default: 1.0
    pub splash_duration_s: f64,

    /// Default: `touchscreen`
    pub input_driver: InputDriver,

    /// evdev node of the touchscreen. Default: `/dev/input/touchscreen`
    pub input_device: PathBuf,

    /// Take exclusive access to the touchscreen so the console ignores it.
    pub grab_input: bool,

    /// Sleep between reads when the touchscreen has nothing pending. Default: 10
    pub input_poll_interval_ms: u64,

    /// Longest wait for the reader thread at shutdown. Default: 5.0
    pub input_shutdown_timeout_s: f64,

    /// Default: `pattern`
    pub camera_driver: CameraDriver,

    /// JPEG files replayed by the mock camera.
    pub mock_photo_dir: PathBuf,

    /// Where pictures are stored. Default: `/opt/adacam/photos`
    pub photo_storage_dir: PathBuf,

    /// Log level (`trace`, `debug`, `info`, `warn`, `error`). Default: `warn`
    pub trace_level: Option<String>,

    /// OTLP JSON trace output. Disabled when unset.
    pub trace_file: Option<PathBuf>,

    /// Session settings at startup.
    pub settings: Settings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            screen_size: (320, 240),
            camera_resolution: (2592, 1944),
            fps_window: 10,
            splash_img_path: Some(infrastructure::default_splash_path()),
            splash_duration_s: 1.0,
            input_driver: InputDriver::Touchscreen,
            input_device: PathBuf::from("/dev/input/touchscreen"),
            grab_input: false,
            input_poll_interval_ms: 10,
            input_shutdown_timeout_s: 5.0,
            camera_driver: CameraDriver::Pattern,
            mock_photo_dir: infrastructure::default_mock_photo_dir(),
            photo_storage_dir: infrastructure::default_photo_dir(),
            trace_level: None,
            trace_file: None,
            settings: Settings::default(),
        }
    }
}

impl Config {
    /// Parses a TOML document. Leading `~` in paths is expanded against `$HOME`.
    ///
    /// # Errors
    ///
    /// Returns [`AdacamError::Config`] for malformed TOML, unknown keys or
    /// values of the wrong type.
    ///
    /// # Example
    ///
    /// ```rust
    /// use adacam::Config;
    ///
    /// let config = Config::from_toml("fps_window = 5\nscreen_size = [480, 320]")?;
    /// assert_eq!(config.fps_window, 5);
    /// assert_eq!(config.screen_size, (480, 320));
    /// # Ok::<(), adacam::AdacamError>(())
    /// ```
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).map_err(|e| AdacamError::Config(e.to_string()))?;
        Ok(config.expand_paths(infrastructure::home_dir().as_deref()))
    }

    /// Reads the configuration file at `path`.
    ///
    /// A missing file is not an error: a warning is logged and defaults are
    /// used, so a fresh install boots without any configuration.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file exists but cannot be read, or the
    /// error from [`Config::from_toml`].
    pub fn load(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(text) => {
                let config = Self::from_toml(&text)?;
                tracing::info!(path = %path.display(), "configuration loaded");
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(path = %path.display(), "no config file found; using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn expand_paths(mut self, home: Option<&Path>) -> Self {
        let expand = |p: &Path| infrastructure::expand_tilde(p, home);
        self.splash_img_path = self.splash_img_path.as_deref().map(expand);
        self.input_device = expand(&self.input_device);
        self.mock_photo_dir = expand(&self.mock_photo_dir);
        self.photo_storage_dir = expand(&self.photo_storage_dir);
        self.trace_file = self.trace_file.as_deref().map(expand);
        self
    }
}

/// Builds the controller state for `config`.
///
/// Scans (and if needed creates) the photo directory, opens the configured
/// camera with the startup settings, and starts in the viewfinder with the
/// first stored picture selected.
///
/// # Errors
///
/// Returns an error if the photo directory cannot be created or read, or if
/// the camera cannot be opened.
pub fn initialize(config: &Config) -> Result<ControllerState> {
    let _span = tracing::debug_span!("initialize").entered();
    tracing::debug!(config = ?config, "initializing adacam");

    let mut store = PhotoDirectory::new(&config.photo_storage_dir);
    let image_ids = store.scan()?;
    let camera = camera::open(config, &config.settings)?;

    Ok(ControllerState::new(
        config.settings.clone(),
        camera,
        Box::new(store),
        image_ids,
        config.fps_window,
    ))
}
