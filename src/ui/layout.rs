//! Default button layout for a 320x240 touchscreen.
//!
//! Region order matters: resolution is first-match, so full-screen regions
//! (such as the viewfinder frame) come after the buttons that overlay them.
//! Settings screens list their navigation first because the title banners
//! overlap the prev/next arrows.

use crate::app::actions::{Intent, Value};
use crate::app::modes::ScreenMode;
use crate::domain::settings::SizeMode;
use crate::ui::regions::{Rect, Region, Registry};

/// Builds the registry used by the appliance.
#[must_use]
pub fn default_layout() -> Registry {
    Registry::from_modes([
        (ScreenMode::Viewfinder, viewfinder()),
        (ScreenMode::ImageViewer, image_viewer()),
        (ScreenMode::ConfirmDelete, confirm_delete()),
        (ScreenMode::NoImages, no_images()),
        (ScreenMode::SizeSettings, size_settings()),
        (ScreenMode::Effects, effects()),
        (ScreenMode::SetIso, set_iso()),
        (ScreenMode::Quit, quit()),
    ])
}

fn switch_to(mode: ScreenMode) -> Value {
    Value::Mode(mode)
}

fn done_button() -> Region {
    Region::bound(
        "done",
        Rect::new(0, 188, 320, 52),
        Intent::SwitchMode,
        switch_to(ScreenMode::Viewfinder),
    )
    .with_background("done")
}

/// Prev/next setting arrows plus the done bar, shared by all settings screens.
fn settings_nav() -> [Region; 3] {
    [
        Region::bound("prev", Rect::new(0, 0, 80, 52), Intent::IncSetting, Value::Int(-1))
            .with_background("prev"),
        Region::bound("next", Rect::new(240, 0, 80, 52), Intent::IncSetting, Value::Int(1))
            .with_background("next"),
        done_button(),
    ]
}

fn viewfinder() -> Vec<Region> {
    vec![
        Region::bound(
            "gear",
            Rect::new(0, 188, 156, 52),
            Intent::SwitchMode,
            switch_to(ScreenMode::SizeSettings),
        )
        .with_background("gear"),
        Region::bound(
            "play",
            Rect::new(164, 188, 156, 52),
            Intent::SwitchMode,
            switch_to(ScreenMode::ImageViewer),
        )
        .with_background("play"),
        Region::bound(
            "viewfinder",
            Rect::new(0, 0, 320, 240),
            Intent::TakePicture,
            Value::None,
        ),
        Region::passive("working", Rect::new(88, 51, 157, 102)),
        Region::passive("spinner", Rect::new(148, 110, 22, 22)),
    ]
}

fn image_viewer() -> Vec<Region> {
    vec![
        done_button(),
        Region::bound("prev", Rect::new(0, 0, 80, 52), Intent::IncImage, Value::Int(-1))
            .with_background("prev"),
        Region::bound("next", Rect::new(240, 0, 80, 52), Intent::IncImage, Value::Int(1))
            .with_background("next"),
        Region::passive("working", Rect::new(88, 70, 157, 102)),
        Region::passive("spinner", Rect::new(148, 129, 22, 22)),
        Region::bound(
            "trash",
            Rect::new(121, 0, 78, 52),
            Intent::SwitchMode,
            switch_to(ScreenMode::ConfirmDelete),
        )
        .with_background("trash"),
    ]
}

fn confirm_delete() -> Vec<Region> {
    vec![
        Region::passive("delete", Rect::new(0, 35, 320, 33)).with_background("delete"),
        Region::bound("yes", Rect::new(32, 86, 120, 100), Intent::ConfirmDelete, Value::Bool(true))
            .with_background("yn")
            .with_foreground("yes"),
        Region::bound("no", Rect::new(168, 86, 120, 100), Intent::ConfirmDelete, Value::Bool(false))
            .with_background("yn")
            .with_foreground("no"),
    ]
}

fn no_images() -> Vec<Region> {
    vec![
        Region::bound(
            "screen",
            Rect::new(0, 0, 320, 240),
            Intent::SwitchMode,
            switch_to(ScreenMode::Viewfinder),
        ),
        done_button(),
        Region::passive("empty", Rect::new(0, 53, 320, 80)).with_background("empty"),
    ]
}

fn size_settings() -> Vec<Region> {
    let size = |name, x, radio, mode| {
        Region::bound(name, Rect::new(x, 60, 100, 120), Intent::SetImageSize, Value::Size(mode))
            .with_background(radio)
            .with_foreground(name)
    };

    let mut regions = settings_nav().to_vec();
    regions.extend([
        size("size-l", 2, "radio3-1", SizeMode::Lg),
        size("size-m", 110, "radio3-0", SizeMode::Med),
        size("size-s", 218, "radio3-0", SizeMode::Small),
        Region::passive("size", Rect::new(0, 10, 320, 29)).with_background("size"),
    ]);
    regions
}

fn effects() -> Vec<Region> {
    let mut regions = settings_nav().to_vec();
    regions.extend([
        Region::bound("fx-prev", Rect::new(0, 70, 80, 52), Intent::IncEffect, Value::Int(-1))
            .with_background("prev"),
        Region::bound("fx-next", Rect::new(240, 70, 80, 52), Intent::IncEffect, Value::Int(1))
            .with_background("next"),
        Region::passive("fx-none", Rect::new(0, 67, 320, 91)).with_background("fx-none"),
        Region::passive("fx", Rect::new(0, 11, 320, 29)).with_background("fx"),
    ]);
    regions
}

fn set_iso() -> Vec<Region> {
    let mut regions = settings_nav().to_vec();
    regions.extend([
        Region::bound("iso-next", Rect::new(240, 70, 80, 52), Intent::IncIso, Value::Int(1))
            .with_background("next"),
        Region::passive("iso-0", Rect::new(0, 79, 320, 33)).with_background("iso-0"),
        Region::passive("iso-bar", Rect::new(9, 134, 302, 26)).with_background("iso-bar"),
        Region::passive("iso-arrow", Rect::new(17, 157, 21, 19)).with_background("iso-arrow"),
        Region::passive("iso", Rect::new(0, 10, 320, 29)).with_background("iso"),
    ]);
    regions
}

fn quit() -> Vec<Region> {
    let mut regions = settings_nav().to_vec();
    regions.extend([
        Region::bound("quit-ok", Rect::new(110, 60, 100, 120), Intent::Quit, Value::None)
            .with_background("quit-ok"),
        Region::passive("quit", Rect::new(0, 10, 320, 35)).with_background("quit"),
    ]);
    regions
}
