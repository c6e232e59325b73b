//! Filesystem locations used by the appliance.
//!
//! Everything installed with the appliance lives under [`DEF_CAM_ROOT`].
//! Paths read from the configuration file may start with `~`, which is expanded
//! against `$HOME` so the same file works on a desktop.

use std::path::{Path, PathBuf};

/// Installation root of the appliance.
pub const DEF_CAM_ROOT: &str = "/opt/adacam";

/// Default configuration file, `/opt/adacam/adacam.toml`.
#[must_use]
pub fn default_config_path() -> PathBuf {
    Path::new(DEF_CAM_ROOT).join("adacam.toml")
}

/// Default photo directory, `/opt/adacam/photos`.
#[must_use]
pub fn default_photo_dir() -> PathBuf {
    Path::new(DEF_CAM_ROOT).join("photos")
}

/// Default splash image, `/opt/adacam/splash.jpg`.
#[must_use]
pub fn default_splash_path() -> PathBuf {
    Path::new(DEF_CAM_ROOT).join("splash.jpg")
}

/// Default source directory of the mock camera, `/opt/adacam/fakephotos`.
#[must_use]
pub fn default_mock_photo_dir() -> PathBuf {
    Path::new(DEF_CAM_ROOT).join("fakephotos")
}

/// Expands a leading `~` against `home`.
///
/// Paths without a leading `~`, and every path when `home` is `None`, are
/// returned unchanged.
///
/// # Examples
///
/// ```
/// use std::path::{Path, PathBuf};
/// use adacam::infrastructure::expand_tilde;
///
/// let home = Some(Path::new("/home/pi"));
/// assert_eq!(expand_tilde(Path::new("~/photos"), home), PathBuf::from("/home/pi/photos"));
/// assert_eq!(expand_tilde(Path::new("~"), home), PathBuf::from("/home/pi"));
/// assert_eq!(expand_tilde(Path::new("/opt/adacam"), home), PathBuf::from("/opt/adacam"));
/// ```
#[must_use]
pub fn expand_tilde(path: &Path, home: Option<&Path>) -> PathBuf {
    let Some(home) = home else {
        return path.to_path_buf();
    };
    match path.strip_prefix("~") {
        Ok(rest) => home.join(rest),
        Err(_) => path.to_path_buf(),
    }
}

/// `$HOME`, if set and non-empty.
#[must_use]
pub fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .filter(|home| !home.is_empty())
        .map(PathBuf::from)
}
