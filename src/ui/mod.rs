//! Screen layout and output.
//!
//! The UI layer knows where things are on the 320x240 screen and how taps map
//! to intents. It does not decide what happens on a tap; that is the
//! dispatcher's job.
//!
//! ```text
//! TapPosition → Registry::resolve(mode) → IntentEvent
//! ControllerState → display image + regions(mode) → Display::redraw
//! ```
//!
//! # Modules
//!
//! - [`regions`]: Rectangles, regions and the per-mode hit-test registry
//! - [`layout`]: The appliance's default region layout
//! - [`display`]: Output trait and the headless implementation

pub mod display;
pub mod layout;
pub mod regions;

pub use display::{Display, FrameRecord, HeadlessDisplay};
pub use layout::default_layout;
pub use regions::{Rect, Region, Registry};
