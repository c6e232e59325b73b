//! Domain layer for the camera appliance.
//!
//! Core types that the controller, the photo store and the camera collaborators
//! share, independent of any device or filesystem specifics.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`index`]: Sorted image id set
//! - [`settings`]: Capture settings and the fixed effect/ISO tables

pub mod error;
pub mod index;
pub mod settings;

pub use error::{AdacamError, Result};
pub use index::ImageIndex;
pub use settings::{Fx, Iso, IsoSetting, Settings, SizeMode};
