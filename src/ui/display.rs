//! Screen output.
//!
//! Drawing pixels (framebuffer, icons, the fps text) happens behind the
//! [`Display`] trait. The crate ships [`HeadlessDisplay`], which records what
//! would have been drawn and is what the appliance uses when no screen backend
//! is attached.

use image::DynamicImage;

use crate::domain::error::Result;
use crate::ui::regions::Region;

/// A screen the main loop can draw a frame on.
pub trait Display {
    /// Draws `image`, then `regions` in list order (last on top), then the
    /// fps readout.
    ///
    /// `regions` is `None` for bare frames such as the splash or a fresh
    /// capture.
    ///
    /// # Errors
    ///
    /// Returns an error if the frame cannot be presented.
    fn redraw(&mut self, image: &DynamicImage, regions: Option<&[Region]>, fps: Option<f64>) -> Result<()>;
}

/// Summary of the most recent frame drawn on a [`HeadlessDisplay`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameRecord {
    pub width: u32,
    pub height: u32,
    pub regions: Vec<&'static str>,
    pub fps: Option<f64>,
}

/// Display that only keeps track of what it was asked to draw.
#[derive(Debug, Default)]
pub struct HeadlessDisplay {
    frames: u64,
    last: Option<FrameRecord>,
}

impl HeadlessDisplay {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of frames drawn so far.
    #[must_use]
    pub const fn frames(&self) -> u64 {
        self.frames
    }

    #[must_use]
    pub const fn last_frame(&self) -> Option<&FrameRecord> {
        self.last.as_ref()
    }
}

impl Display for HeadlessDisplay {
    fn redraw(&mut self, image: &DynamicImage, regions: Option<&[Region]>, fps: Option<f64>) -> Result<()> {
        let record = FrameRecord {
            width: image.width(),
            height: image.height(),
            regions: regions.unwrap_or_default().iter().map(|r| r.name).collect(),
            fps,
        };
        tracing::trace!(frame = self.frames, record = ?record, "headless redraw");

        self.frames += 1;
        self.last = Some(record);
        Ok(())
    }
}
