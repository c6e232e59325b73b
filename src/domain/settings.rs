//! User-adjustable capture settings.
//!
//! [`Settings`] holds the values the settings screens mutate during a session:
//! picture size, image effect, ISO, and a couple of presentation knobs. The
//! initial values come from the `[settings]` table of the configuration file;
//! changes are not persisted between sessions.

use serde::{Deserialize, Serialize};

/// Inverse scale applied to the camera's full resolution when capturing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeMode {
    /// Quarter resolution.
    Small,
    /// Half resolution.
    Med,
    /// Full resolution.
    Lg,
}

impl SizeMode {
    /// Divisor applied to each dimension of the full camera resolution.
    #[must_use]
    pub const fn divisor(self) -> u32 {
        match self {
            Self::Small => 4,
            Self::Med => 2,
            Self::Lg => 1,
        }
    }

    /// Scales a full-resolution `(width, height)` down for this size mode.
    #[must_use]
    pub const fn scale(self, resolution: (u32, u32)) -> (u32, u32) {
        let d = self.divisor();
        (resolution.0 / d, resolution.1 / d)
    }
}

/// Image effects offered by the effects screen, in cycling order.
///
/// The list is fixed rather than queried from the camera: several effects a
/// camera advertises are either invalid on the video port or have no visible
/// result without extra parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fx {
    None,
    Sketch,
    Gpen,
    Pastel,
    Watercolor,
    Oilpaint,
    Hatch,
    Negative,
    Colorswap,
    Posterise,
    Denoise,
    Blur,
    Film,
    Washedout,
    Emboss,
    Cartoon,
    Solarize,
}

impl Fx {
    /// All effects in the order the prev/next buttons walk them.
    pub const ALL: [Self; 17] = [
        Self::None,
        Self::Sketch,
        Self::Gpen,
        Self::Pastel,
        Self::Watercolor,
        Self::Oilpaint,
        Self::Hatch,
        Self::Negative,
        Self::Colorswap,
        Self::Posterise,
        Self::Denoise,
        Self::Blur,
        Self::Film,
        Self::Washedout,
        Self::Emboss,
        Self::Cartoon,
        Self::Solarize,
    ];

    /// Returns the effect `delta` steps away from `self`, wrapping at both ends.
    #[must_use]
    pub fn step(self, delta: i32) -> Self {
        let len = Self::ALL.len() as i64;
        let pos = Self::ALL.iter().position(|fx| *fx == self).unwrap_or(0) as i64;
        let next = (pos + i64::from(delta)).rem_euclid(len);
        Self::ALL[next as usize]
    }
}

/// ISO sensitivity requested from the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Iso {
    Auto,
    Value(u32),
}

/// One entry of the ISO slider: the sensitivity and the x position of its marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IsoSetting {
    pub iso: Iso,
    pub x_pos: i32,
}

/// Slider positions for every selectable ISO value.
pub const ISO_TABLE: [IsoSetting; 9] = [
    IsoSetting { iso: Iso::Auto, x_pos: 137 },
    IsoSetting { iso: Iso::Value(0), x_pos: 27 },
    IsoSetting { iso: Iso::Value(100), x_pos: 64 },
    IsoSetting { iso: Iso::Value(200), x_pos: 97 },
    IsoSetting { iso: Iso::Value(320), x_pos: 137 },
    IsoSetting { iso: Iso::Value(400), x_pos: 164 },
    IsoSetting { iso: Iso::Value(500), x_pos: 197 },
    IsoSetting { iso: Iso::Value(640), x_pos: 244 },
    IsoSetting { iso: Iso::Value(800), x_pos: 297 },
];

/// Mutable capture and presentation settings for the current session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Overlay the measured frame rate on the display.
    pub draw_fps: bool,
    /// Capture size relative to the full camera resolution.
    pub size_mode: SizeMode,
    /// Active image effect.
    pub fx_mode: Fx,
    /// Active ISO entry.
    pub iso_mode: IsoSetting,
    /// Seconds the freshly captured picture stays on screen.
    pub snap_pause_time: f64,
    /// JPEG quality in `0.0..=1.0`.
    pub jpg_quality: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            draw_fps: true,
            size_mode: SizeMode::Lg,
            fx_mode: Fx::None,
            iso_mode: ISO_TABLE[0],
            snap_pause_time: 2.5,
            jpg_quality: 0.85,
        }
    }
}

impl Settings {
    /// JPEG quality mapped onto the encoder's `1..=100` scale.
    #[must_use]
    pub fn jpeg_quality_percent(&self) -> u8 {
        (self.jpg_quality.clamp(0.01, 1.0) * 100.0).round() as u8
    }
}
