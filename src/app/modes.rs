//! Screen mode state machine types.
//!
//! The appliance is always in exactly one [`ScreenMode`]. The mode decides which
//! hit-test regions are active and whether the display shows the live preview
//! or a stored picture. Transitions happen only through the `switch_mode`
//! handler (and, indirectly, the settings cycling handler).
//!
//! # State Machine
//!
//! ```text
//!            gear                     play
//! SizeSettings ◄──── Viewfinder ────► ImageViewer ◄──► ConfirmDelete
//!   ▲   │  ▲             ▲                 │
//!   │   ▼  │ done        │ done            │ (empty index)
//!  SetIso ◄─ Effects ────┘                 ▼
//!                                        NoImages
//! ```

use serde::Deserialize;

/// Discrete UI state of the appliance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreenMode {
    /// Live camera preview; tapping the frame takes a picture.
    Viewfinder,
    /// Browsing stored pictures.
    ImageViewer,
    /// Asking whether to delete the selected picture.
    ConfirmDelete,
    /// Shown instead of the viewer when nothing is stored.
    NoImages,
    /// Picture size selection.
    SizeSettings,
    /// Image effect selection.
    Effects,
    /// ISO selection.
    SetIso,
    /// Shutdown confirmation.
    Quit,
}

impl ScreenMode {
    /// Every mode, in declaration order.
    pub const ALL: [Self; 8] = [
        Self::Viewfinder,
        Self::ImageViewer,
        Self::ConfirmDelete,
        Self::NoImages,
        Self::SizeSettings,
        Self::Effects,
        Self::SetIso,
        Self::Quit,
    ];

    /// Modes that display the selected stored picture instead of the preview.
    #[must_use]
    pub const fn shows_stored_image(self) -> bool {
        matches!(self, Self::ImageViewer | Self::ConfirmDelete)
    }
}

/// Settings screens walked by the prev/next setting buttons, in order.
pub const SETTINGS_MODES: [ScreenMode; 3] =
    [ScreenMode::SizeSettings, ScreenMode::Effects, ScreenMode::SetIso];
