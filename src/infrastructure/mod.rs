//! Infrastructure layer for filesystem and environment interactions.
//!
//! Default install locations and path expansion for values read from the
//! configuration file.

pub mod paths;

pub use paths::{
    default_config_path, default_mock_photo_dir, default_photo_dir, default_splash_path,
    expand_tilde, home_dir, DEF_CAM_ROOT,
};
