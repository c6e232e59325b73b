//! User intents decoded from taps.
//!
//! A tap on a bound region produces an [`IntentEvent`]: what the user wants
//! ([`Intent`]) plus a payload ([`Value`]) whose shape depends on the intent.
//! Intents are independent of screen pixels; the hit-test registry is the only
//! place that knows which rectangle maps to which intent.
//!
//! # Example
//!
//! ```rust
//! use adacam::app::actions::{Intent, IntentEvent, Value};
//! use adacam::app::ScreenMode;
//!
//! let event = IntentEvent::new(Intent::SwitchMode, Value::Mode(ScreenMode::ImageViewer));
//! assert_eq!(event.intent, Intent::SwitchMode);
//! ```

use crate::app::modes::ScreenMode;
use crate::domain::settings::SizeMode;

/// Closed set of user intentions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    /// Stop the appliance.
    Quit,
    /// Delete the selected picture.
    DeleteImage,
    /// Answer the delete confirmation (`Value::Bool`).
    ConfirmDelete,
    /// Capture a new picture.
    TakePicture,
    /// Change screen mode (`Value::Mode`).
    SwitchMode,
    /// Pick the capture size (`Value::Size`).
    SetImageSize,
    /// Move the viewer selection (`Value::Int`).
    IncImage,
    /// Move between settings screens (`Value::Int`).
    IncSetting,
    /// Move through image effects (`Value::Int`).
    IncEffect,
    /// Move through ISO values (`Value::Int`).
    IncIso,
}

impl Intent {
    /// Every intent; the dispatcher must have a handler for each.
    pub const ALL: [Self; 10] = [
        Self::Quit,
        Self::DeleteImage,
        Self::ConfirmDelete,
        Self::TakePicture,
        Self::SwitchMode,
        Self::SetImageSize,
        Self::IncImage,
        Self::IncSetting,
        Self::IncEffect,
        Self::IncIso,
    ];
}

/// Intent payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Value {
    #[default]
    None,
    Int(i32),
    Bool(bool),
    Mode(ScreenMode),
    Size(SizeMode),
}

/// An intent together with its payload, as produced by a tapped region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntentEvent {
    pub intent: Intent,
    pub value: Value,
}

impl IntentEvent {
    #[must_use]
    pub const fn new(intent: Intent, value: Value) -> Self {
        Self { intent, value }
    }
}
