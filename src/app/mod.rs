//! Application layer: the camera controller.
//!
//! This module sits between the binary (`main.rs`) and the input, UI, camera
//! and storage layers. It owns the screen mode state machine and turns user
//! intents into state changes and collaborator calls.
//!
//! # Architecture
//!
//! The application layer follows a unidirectional data flow pattern:
//!
//! ```text
//! Tap → Registry → IntentEvent → Dispatcher → handler → ControllerState
//!                                                           ↓
//!                       Display ← display image + regions ←─┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Intents and their payloads
//! - [`handler`]: Intent dispatcher and handlers
//! - [`modes`]: Screen mode state machine types
//! - [`state`]: The controller's mutable session state
//! - [`fps`]: Frame rate window
//! - [`runner`]: The main loop
//!
//! # Example
//!
//! ```rust,no_run
//! use adacam::app::{Dispatcher, IntentEvent, Intent, ScreenMode, Value};
//! use adacam::{initialize, Config};
//!
//! let mut state = initialize(&Config::default())?;
//! let dispatcher = Dispatcher::standard()?;
//! let event = IntentEvent::new(Intent::SwitchMode, Value::Mode(ScreenMode::SizeSettings));
//! dispatcher.dispatch(&mut state, event)?;
//! assert_eq!(state.screen_mode, ScreenMode::SizeSettings);
//! # Ok::<(), adacam::AdacamError>(())
//! ```

pub mod actions;
pub mod fps;
pub mod handler;
pub mod modes;
pub mod runner;
pub mod state;

pub use actions::{Intent, IntentEvent, Value};
pub use fps::FpsCounter;
pub use handler::{change_mode, Dispatcher, DispatcherBuilder, Handler};
pub use modes::{ScreenMode, SETTINGS_MODES};
pub use runner::{run_forever, run_frame, Frame};
pub use state::ControllerState;
