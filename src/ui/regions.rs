//! Hit-test regions and the per-mode registry.
//!
//! Each screen mode owns an ordered list of [`Region`]s. A region is a screen
//! rectangle with optional icon names (drawn by the display) and an optional
//! bound intent. Resolution walks the list in order and the first rectangle
//! containing the tap wins, whether or not it is bound. A passive region
//! therefore shadows anything listed after it.

use std::collections::HashMap;

use crate::app::actions::{Intent, IntentEvent, Value};
use crate::app::modes::ScreenMode;
use crate::input::TapPosition;

/// Axis-aligned screen rectangle in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    #[must_use]
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Inclusive containment: `x..=x+w-1` by `y..=y+h-1`.
    #[must_use]
    pub const fn contains(&self, pos: TapPosition) -> bool {
        pos.x >= self.x && pos.x < self.x + self.w && pos.y >= self.y && pos.y < self.y + self.h
    }
}

/// A tappable or purely decorative area of a screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub name: &'static str,
    pub rect: Rect,
    /// Icon drawn first, if any.
    pub background: Option<&'static str>,
    /// Icon drawn over the background, if any.
    pub foreground: Option<&'static str>,
    /// Intent fired on tap; `None` makes the region passive.
    pub on_tap: Option<Intent>,
    pub value: Value,
}

impl Region {
    /// A region with no bound intent.
    #[must_use]
    pub const fn passive(name: &'static str, rect: Rect) -> Self {
        Self {
            name,
            rect,
            background: None,
            foreground: None,
            on_tap: None,
            value: Value::None,
        }
    }

    /// A region firing `intent` with `value` when tapped.
    #[must_use]
    pub const fn bound(name: &'static str, rect: Rect, intent: Intent, value: Value) -> Self {
        Self {
            name,
            rect,
            background: None,
            foreground: None,
            on_tap: Some(intent),
            value,
        }
    }

    #[must_use]
    pub fn with_background(mut self, icon: &'static str) -> Self {
        self.background = Some(icon);
        self
    }

    #[must_use]
    pub fn with_foreground(mut self, icon: &'static str) -> Self {
        self.foreground = Some(icon);
        self
    }

    /// The event this region fires, or `None` for passive regions.
    #[must_use]
    pub fn event(&self) -> Option<IntentEvent> {
        self.on_tap.map(|intent| IntentEvent::new(intent, self.value))
    }
}

/// Ordered regions for every screen mode.
///
/// Built once at startup; the region lists cannot change afterwards.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    modes: HashMap<ScreenMode, Vec<Region>>,
}

impl Registry {
    /// Builds a registry from one region list per mode. A mode listed twice
    /// keeps its last list.
    #[must_use]
    pub fn from_modes(modes: impl IntoIterator<Item = (ScreenMode, Vec<Region>)>) -> Self {
        Self {
            modes: modes.into_iter().collect(),
        }
    }

    /// Regions of `mode`, in hit-test order. Unknown modes have none.
    #[must_use]
    pub fn regions(&self, mode: ScreenMode) -> &[Region] {
        self.modes.get(&mode).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Maps a tap to the event of the first region containing it.
    ///
    /// Returns `None` when no region contains the tap or the first containing
    /// region is passive.
    #[must_use]
    pub fn resolve(&self, mode: ScreenMode, pos: TapPosition) -> Option<IntentEvent> {
        let region = self.regions(mode).iter().find(|r| r.rect.contains(pos))?;
        tracing::trace!(mode = ?mode, region = region.name, x = pos.x, y = pos.y, "tap hit");
        region.event()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_with(regions: Vec<Region>) -> Registry {
        Registry::from_modes([(ScreenMode::Viewfinder, regions)])
    }

    #[test]
    fn test_rect_contains_is_inclusive_of_last_pixel() {
        let rect = Rect::new(10, 20, 5, 5);
        assert!(rect.contains(TapPosition::new(10, 20)));
        assert!(rect.contains(TapPosition::new(14, 24)));
        assert!(!rect.contains(TapPosition::new(15, 24)));
        assert!(!rect.contains(TapPosition::new(14, 25)));
        assert!(!rect.contains(TapPosition::new(9, 20)));
    }

    #[test]
    fn test_first_matching_region_wins() {
        let registry = registry_with(vec![
            Region::bound("a", Rect::new(0, 0, 100, 100), Intent::TakePicture, Value::None),
            Region::bound("b", Rect::new(50, 50, 100, 100), Intent::Quit, Value::None),
        ]);

        let event = registry.resolve(ScreenMode::Viewfinder, TapPosition::new(60, 60));
        assert_eq!(event, Some(IntentEvent::new(Intent::TakePicture, Value::None)));

        let event = registry.resolve(ScreenMode::Viewfinder, TapPosition::new(120, 120));
        assert_eq!(event, Some(IntentEvent::new(Intent::Quit, Value::None)));
    }

    #[test]
    fn test_passive_region_shadows_later_regions() {
        let registry = registry_with(vec![
            Region::passive("banner", Rect::new(0, 0, 100, 100)),
            Region::bound("under", Rect::new(0, 0, 100, 100), Intent::Quit, Value::None),
        ]);

        assert_eq!(registry.resolve(ScreenMode::Viewfinder, TapPosition::new(5, 5)), None);
    }

    #[test]
    fn test_miss_and_unknown_mode_resolve_to_none() {
        let registry = registry_with(vec![Region::bound(
            "a",
            Rect::new(0, 0, 10, 10),
            Intent::Quit,
            Value::None,
        )]);

        assert_eq!(registry.resolve(ScreenMode::Viewfinder, TapPosition::new(50, 50)), None);
        assert_eq!(registry.resolve(ScreenMode::Quit, TapPosition::new(5, 5)), None);
        assert!(registry.regions(ScreenMode::Quit).is_empty());
    }

    #[test]
    fn test_from_modes_keeps_order_and_last_list() {
        let registry = Registry::from_modes([
            (ScreenMode::Quit, vec![Region::passive("old", Rect::new(0, 0, 1, 1))]),
            (
                ScreenMode::Quit,
                vec![
                    Region::passive("top", Rect::new(0, 0, 1, 1)),
                    Region::passive("bottom", Rect::new(0, 0, 1, 1)),
                ],
            ),
        ]);

        let names: Vec<_> = registry.regions(ScreenMode::Quit).iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["top", "bottom"]);
    }
}
