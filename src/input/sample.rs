//! Touch input record types.
//!
//! Three shapes flow through the input pipeline:
//!
//! ```text
//! RawSample (one field update) → TouchEvent (one sync frame) → TapPosition (one gesture)
//! ```

use evdev::{AbsoluteAxisCode, EventSummary, InputEvent, SynchronizationCode};

/// One device-reported field update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawSample {
    /// Absolute X coordinate.
    AbsX(i32),
    /// Absolute Y coordinate.
    AbsY(i32),
    /// Multi-touch tracking id; `-1` means the contact was lifted.
    TrackingId(i32),
    /// Touch key state; non-zero means pressed.
    Touch(i32),
    /// End of a complete sample frame.
    SyncReport,
    /// The kernel buffer overflowed; the current frame is corrupt.
    SyncDropped,
}

impl RawSample {
    /// Maps an evdev event onto a sample, ignoring codes the reconstructor
    /// does not track.
    ///
    /// Any key event counts as a touch transition: resistive panels report
    /// `BTN_TOUCH`, some capacitive panels `BTN_LEFT`.
    #[must_use]
    pub fn from_input_event(event: &InputEvent) -> Option<Self> {
        match event.destructure() {
            EventSummary::AbsoluteAxis(_, AbsoluteAxisCode::ABS_X, value) => Some(Self::AbsX(value)),
            EventSummary::AbsoluteAxis(_, AbsoluteAxisCode::ABS_Y, value) => Some(Self::AbsY(value)),
            EventSummary::AbsoluteAxis(_, AbsoluteAxisCode::ABS_MT_TRACKING_ID, value) => {
                Some(Self::TrackingId(value))
            }
            EventSummary::Key(_, _, value) => Some(Self::Touch(value)),
            EventSummary::Synchronization(_, SynchronizationCode::SYN_REPORT, _) => {
                Some(Self::SyncReport)
            }
            EventSummary::Synchronization(_, SynchronizationCode::SYN_DROPPED, _) => {
                Some(Self::SyncDropped)
            }
            _ => None,
        }
    }
}

/// Reconstructed contact state at one sync boundary.
///
/// Every field is optional: a frame only reports what changed, and a lifted
/// finger clears the coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TouchEvent {
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub touch: Option<bool>,
    pub tracking_id: Option<i32>,
}

impl TouchEvent {
    /// Both coordinates, when the frame carries them.
    #[must_use]
    pub const fn position(&self) -> Option<TapPosition> {
        match (self.x, self.y) {
            (Some(x), Some(y)) => Some(TapPosition { x, y }),
            _ => None,
        }
    }
}

/// A completed tap, in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TapPosition {
    pub x: i32,
    pub y: i32,
}

impl TapPosition {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}
