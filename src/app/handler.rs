//! Intent dispatch and the handlers behind each intent.
//!
//! This module maps every [`Intent`] to exactly one handler function and runs
//! it against the [`ControllerState`]. The mapping is built once at startup and
//! checked there: registering an intent twice or leaving one out is an error
//! before the first frame is drawn, never a surprise at tap time.
//!
//! # Architecture
//!
//! ```text
//! IntentEvent → Dispatcher::dispatch → handler(&mut ControllerState, Value)
//!                                             │
//!                                             ├─ state mutation
//!                                             └─ camera / photo store calls
//! ```
//!
//! Handlers never render. Screen mode changes go through [`change_mode`]; the
//! settings cycler and the delete confirmation reach it indirectly.
//!
//! # Example
//!
//! ```rust
//! use adacam::app::handler::Dispatcher;
//!
//! let dispatcher = Dispatcher::standard()?;
//! # Ok::<(), adacam::AdacamError>(())
//! ```

use std::collections::HashMap;
use std::fmt;

use crate::app::actions::{Intent, IntentEvent, Value};
use crate::app::modes::{ScreenMode, SETTINGS_MODES};
use crate::app::state::ControllerState;
use crate::domain::error::{AdacamError, Result};

/// Signature shared by all intent handlers.
pub type Handler = fn(&mut ControllerState, Value) -> Result<()>;

/// Collects handlers before validation.
#[derive(Default)]
pub struct DispatcherBuilder {
    handlers: HashMap<Intent, Handler>,
}

impl DispatcherBuilder {
    /// Binds `handler` to `intent`.
    ///
    /// # Errors
    ///
    /// Returns [`AdacamError::DuplicateHandler`] if `intent` already has a handler.
    pub fn register(mut self, intent: Intent, handler: Handler) -> Result<Self> {
        if self.handlers.insert(intent, handler).is_some() {
            return Err(AdacamError::DuplicateHandler(intent));
        }
        Ok(self)
    }

    /// Finishes the mapping.
    ///
    /// # Errors
    ///
    /// Returns [`AdacamError::MissingHandler`] for the first intent without a
    /// handler.
    pub fn build(self) -> Result<Dispatcher> {
        if let Some(missing) = Intent::ALL.into_iter().find(|i| !self.handlers.contains_key(i)) {
            return Err(AdacamError::MissingHandler(missing));
        }
        Ok(Dispatcher {
            handlers: self.handlers,
        })
    }
}

/// Complete, validated intent-to-handler mapping.
pub struct Dispatcher {
    handlers: HashMap<Intent, Handler>,
}

impl fmt::Debug for DispatcherBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.handlers.keys()).finish()
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.handlers.keys()).finish()
    }
}

impl Dispatcher {
    #[must_use]
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::default()
    }

    /// The appliance's handler set.
    ///
    /// # Errors
    ///
    /// Only fails if the table below is inconsistent with [`Intent::ALL`].
    pub fn standard() -> Result<Self> {
        Self::builder()
            .register(Intent::Quit, quit)?
            .register(Intent::SwitchMode, switch_mode)?
            .register(Intent::TakePicture, take_picture)?
            .register(Intent::IncImage, increment_image)?
            .register(Intent::DeleteImage, delete_image)?
            .register(Intent::ConfirmDelete, confirm_delete)?
            .register(Intent::IncSetting, cycle_settings_view)?
            .register(Intent::SetImageSize, set_image_size)?
            .register(Intent::IncEffect, increment_effect)?
            .register(Intent::IncIso, change_iso)?
            .build()
    }

    /// Runs the handler bound to `event.intent`.
    ///
    /// # Errors
    ///
    /// Propagates the handler's error. Callers decide whether it is fatal via
    /// [`AdacamError::is_fatal`].
    pub fn dispatch(&self, state: &mut ControllerState, event: IntentEvent) -> Result<()> {
        let _span = tracing::debug_span!("dispatch", intent = ?event.intent, value = ?event.value).entered();

        let handler = self
            .handlers
            .get(&event.intent)
            .ok_or(AdacamError::MissingHandler(event.intent))?;
        handler(state, event.value)
    }
}

fn expect_int(intent: Intent, value: Value) -> Result<i32> {
    match value {
        Value::Int(delta) => Ok(delta),
        other => Err(AdacamError::InvalidPayload { intent, value: other }),
    }
}

/// Moves to `target`, the only place `screen_mode` is assigned.
///
/// The viewer screens need a selected picture; with an empty index they are
/// replaced by [`ScreenMode::NoImages`]. Switching to the current mode is a
/// logged no-op.
pub fn change_mode(state: &mut ControllerState, target: ScreenMode) {
    let target = if target.shows_stored_image() && state.image_ids.is_empty() {
        ScreenMode::NoImages
    } else {
        target
    };

    tracing::info!(from = ?state.screen_mode, to = ?target, "change mode");
    if target == state.screen_mode {
        tracing::warn!(mode = ?target, "changing from mode to itself");
        return;
    }

    state.last_screen_mode = Some(state.screen_mode);
    state.screen_mode = target;
}

fn quit(state: &mut ControllerState, _: Value) -> Result<()> {
    tracing::info!("quit requested");
    state.shutdown = true;
    Ok(())
}

fn switch_mode(state: &mut ControllerState, value: Value) -> Result<()> {
    let Value::Mode(target) = value else {
        return Err(AdacamError::InvalidPayload {
            intent: Intent::SwitchMode,
            value,
        });
    };
    change_mode(state, target);
    Ok(())
}

fn take_picture(state: &mut ControllerState, _: Value) -> Result<()> {
    let id = state
        .image_ids
        .next_id()
        .ok_or_else(|| AdacamError::WriteFailure("no picture ids left".to_string()))?;
    let path = state.capture(id)?;

    state.forget_cached_image(id);
    state.image_ids.insert(id);
    state.selected_image_index = state.image_ids.len().checked_sub(1);
    state.took_picture = true;

    tracing::info!(image_id = id, path = ?path, "new picture");
    Ok(())
}

fn increment_image(state: &mut ControllerState, value: Value) -> Result<()> {
    let delta = expect_int(Intent::IncImage, value)?;
    let len = state.image_ids.len();
    if len == 0 {
        return Err(AdacamError::EmptyIndex);
    }

    let current = state.selected_image_index.unwrap_or(0) as i64;
    let next = (current + i64::from(delta)).rem_euclid(len as i64) as usize;
    state.selected_image_index = Some(next);
    tracing::debug!(from = current, to = next, "image selection moved");

    state.load_selected_image()?;
    Ok(())
}

/// Deletes the selected picture and selects the one before it.
fn delete_image(state: &mut ControllerState, _: Value) -> Result<()> {
    let position = state.selected_image_index.ok_or(AdacamError::EmptyIndex)?;
    let id = state.image_ids.get(position).ok_or(AdacamError::EmptyIndex)?;

    match state.store_mut().delete(id) {
        Ok(()) => {}
        Err(AdacamError::NotFound(path)) => {
            tracing::warn!(image_id = id, path = ?path, "picture already gone, dropping from index");
        }
        Err(e) => return Err(e),
    }

    state.image_ids.remove(id);
    state.forget_cached_image(id);
    state.selected_image_index = if state.image_ids.is_empty() {
        None
    } else {
        Some(position.saturating_sub(1).min(state.image_ids.len() - 1))
    };

    tracing::info!(image_id = id, remaining = state.image_ids.len(), "picture deleted");
    Ok(())
}

fn confirm_delete(state: &mut ControllerState, value: Value) -> Result<()> {
    let Value::Bool(confirmed) = value else {
        return Err(AdacamError::InvalidPayload {
            intent: Intent::ConfirmDelete,
            value,
        });
    };

    if confirmed {
        delete_image(state, Value::None)?;
    }
    change_mode(state, ScreenMode::ImageViewer);
    Ok(())
}

fn cycle_settings_view(state: &mut ControllerState, value: Value) -> Result<()> {
    let delta = expect_int(Intent::IncSetting, value)?;
    let len = SETTINGS_MODES.len() as i64;
    state.setting_idx = (state.setting_idx as i64 + i64::from(delta)).rem_euclid(len) as usize;
    change_mode(state, SETTINGS_MODES[state.setting_idx]);
    Ok(())
}

fn set_image_size(state: &mut ControllerState, value: Value) -> Result<()> {
    let Value::Size(size_mode) = value else {
        return Err(AdacamError::InvalidPayload {
            intent: Intent::SetImageSize,
            value,
        });
    };
    tracing::info!(size = ?size_mode, "image size set");
    state.settings.size_mode = size_mode;
    Ok(())
}

fn increment_effect(state: &mut ControllerState, value: Value) -> Result<()> {
    let delta = expect_int(Intent::IncEffect, value)?;
    let fx = state.settings.fx_mode.step(delta);
    state.camera_mut().set_fx_mode(fx)?;
    state.settings.fx_mode = fx;
    tracing::info!(fx = ?fx, "effect set");
    Ok(())
}

fn change_iso(_: &mut ControllerState, _: Value) -> Result<()> {
    Err(AdacamError::Unimplemented("changing ISO"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::{Camera, PatternCamera};
    use crate::domain::index::ImageIndex;
    use crate::domain::settings::{Fx, IsoSetting, Settings, SizeMode};
    use crate::storage::photos::file_name;
    use crate::storage::{ImageStore, PhotoDirectory};
    use image::DynamicImage;
    use std::io::Write;
    use tempfile::TempDir;

    struct FailingCamera;

    impl Camera for FailingCamera {
        fn get_preview(&mut self) -> Result<DynamicImage> {
            Err(AdacamError::Camera("no sensor".to_string()))
        }

        fn write_picture(&mut self, out: &mut dyn Write, _: &Settings) -> Result<()> {
            out.write_all(b"half a picture")?;
            Err(AdacamError::Camera("sensor stalled".to_string()))
        }

        fn set_fx_mode(&mut self, _: Fx) -> Result<()> {
            Ok(())
        }

        fn set_iso_mode(&mut self, _: IsoSetting) -> Result<()> {
            Ok(())
        }
    }

    fn state_with(dir: &TempDir, ids: &[u32], camera: Box<dyn Camera>) -> ControllerState {
        let mut store = PhotoDirectory::new(dir.path());
        for id in ids {
            let mut writer = store.write(*id).unwrap();
            PatternCamera::new((8, 8), (8, 8))
                .write_picture(&mut writer, &Settings::default())
                .unwrap();
            writer.commit().unwrap();
        }
        let index = store.scan().unwrap();
        ControllerState::new(Settings::default(), camera, Box::new(store), index, 10)
    }

    fn pattern() -> Box<dyn Camera> {
        Box::new(PatternCamera::new((8, 8), (16, 16)))
    }

    fn dispatch(state: &mut ControllerState, intent: Intent, value: Value) -> Result<()> {
        Dispatcher::standard()
            .unwrap()
            .dispatch(state, IntentEvent::new(intent, value))
    }

    #[test]
    fn test_standard_dispatcher_is_complete() {
        assert!(Dispatcher::standard().is_ok());
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let result = Dispatcher::builder()
            .register(Intent::Quit, quit)
            .and_then(|b| b.register(Intent::Quit, quit));
        assert!(matches!(result, Err(AdacamError::DuplicateHandler(Intent::Quit))));
    }

    #[test]
    fn test_incomplete_registration_fails() {
        let result = Dispatcher::builder().register(Intent::Quit, quit).unwrap().build();
        assert!(matches!(result, Err(AdacamError::MissingHandler(_))));
    }

    #[test]
    fn test_take_picture_allocates_after_largest_id() {
        let dir = TempDir::new().unwrap();
        let mut state = state_with(&dir, &[0, 1, 3], pattern());

        dispatch(&mut state, Intent::TakePicture, Value::None).unwrap();

        assert_eq!(state.image_ids.iter().collect::<Vec<_>>(), vec![0, 1, 3, 4]);
        assert_eq!(state.selected_image_id(), Some(4));
        assert!(state.took_picture);
        assert!(dir.path().join("IMG_0004.JPG").is_file());
    }

    #[test]
    fn test_take_picture_on_empty_index_uses_zero() {
        let dir = TempDir::new().unwrap();
        let mut state = state_with(&dir, &[], pattern());

        dispatch(&mut state, Intent::TakePicture, Value::None).unwrap();

        assert_eq!(state.image_ids.iter().collect::<Vec<_>>(), vec![0]);
        assert_eq!(state.selected_image_index, Some(0));
    }

    #[test]
    fn test_failed_capture_leaves_index_and_directory_unchanged() {
        let dir = TempDir::new().unwrap();
        let mut state = state_with(&dir, &[2], Box::new(FailingCamera));

        let result = dispatch(&mut state, Intent::TakePicture, Value::None);

        assert!(matches!(result, Err(AdacamError::Camera(_))));
        assert_eq!(state.image_ids.iter().collect::<Vec<_>>(), vec![2]);
        assert!(!state.took_picture);
        assert!(!dir.path().join("IMG_0003.JPG").exists());
        assert!(!dir.path().join("IMG_0003.JPG.tmp").exists());
    }

    #[test]
    fn test_take_picture_never_reuses_last_id() {
        let dir = TempDir::new().unwrap();
        let mut state = state_with(&dir, &[u32::MAX], pattern());
        let before = std::fs::read(dir.path().join(file_name(u32::MAX))).unwrap();

        let result = dispatch(&mut state, Intent::TakePicture, Value::None);

        assert!(matches!(result, Err(AdacamError::WriteFailure(_))));
        assert_eq!(state.image_ids.iter().collect::<Vec<_>>(), vec![u32::MAX]);
        assert!(!state.took_picture);
        assert_eq!(std::fs::read(dir.path().join(file_name(u32::MAX))).unwrap(), before);
    }

    #[test]
    fn test_increment_image_wraps_backwards() {
        let dir = TempDir::new().unwrap();
        let mut state = state_with(&dir, &[0, 1, 2], pattern());
        state.selected_image_index = Some(0);

        dispatch(&mut state, Intent::IncImage, Value::Int(-1)).unwrap();

        assert_eq!(state.selected_image_index, Some(2));
    }

    #[test]
    fn test_increment_image_on_empty_index_is_rejected() {
        let dir = TempDir::new().unwrap();
        let mut state = state_with(&dir, &[], pattern());

        let result = dispatch(&mut state, Intent::IncImage, Value::Int(1));

        assert!(matches!(result, Err(AdacamError::EmptyIndex)));
        assert_eq!(state.selected_image_index, None);
    }

    #[test]
    fn test_delete_selects_previous_image() {
        let dir = TempDir::new().unwrap();
        let mut state = state_with(&dir, &[0, 1, 2], pattern());
        state.selected_image_index = Some(2);

        dispatch(&mut state, Intent::DeleteImage, Value::None).unwrap();

        assert_eq!(state.image_ids.iter().collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(state.selected_image_index, Some(1));
        assert!(!dir.path().join("IMG_0002.JPG").exists());
    }

    #[test]
    fn test_delete_last_remaining_clears_selection() {
        let dir = TempDir::new().unwrap();
        let mut state = state_with(&dir, &[5], pattern());
        state.screen_mode = ScreenMode::ConfirmDelete;

        dispatch(&mut state, Intent::ConfirmDelete, Value::Bool(true)).unwrap();

        assert!(state.image_ids.is_empty());
        assert_eq!(state.selected_image_index, None);
        assert_eq!(state.screen_mode, ScreenMode::NoImages);
    }

    #[test]
    fn test_delete_of_missing_file_still_updates_index() {
        let dir = TempDir::new().unwrap();
        let mut state = state_with(&dir, &[0, 1], pattern());
        std::fs::remove_file(dir.path().join("IMG_0000.JPG")).unwrap();
        state.selected_image_index = Some(0);

        dispatch(&mut state, Intent::DeleteImage, Value::None).unwrap();

        assert_eq!(state.image_ids.iter().collect::<Vec<_>>(), vec![1]);
        assert_eq!(state.selected_image_index, Some(0));
    }

    #[test]
    fn test_declined_delete_returns_to_viewer() {
        let dir = TempDir::new().unwrap();
        let mut state = state_with(&dir, &[0], pattern());
        state.screen_mode = ScreenMode::ConfirmDelete;

        dispatch(&mut state, Intent::ConfirmDelete, Value::Bool(false)).unwrap();

        assert_eq!(state.image_ids.len(), 1);
        assert_eq!(state.screen_mode, ScreenMode::ImageViewer);
        assert_eq!(state.last_screen_mode, Some(ScreenMode::ConfirmDelete));
    }

    #[test]
    fn test_switch_to_current_mode_is_noop() {
        let dir = TempDir::new().unwrap();
        let mut state = state_with(&dir, &[], pattern());

        dispatch(&mut state, Intent::SwitchMode, Value::Mode(ScreenMode::Viewfinder)).unwrap();

        assert_eq!(state.screen_mode, ScreenMode::Viewfinder);
        assert_eq!(state.last_screen_mode, None);
    }

    #[test]
    fn test_viewer_without_images_redirects() {
        let dir = TempDir::new().unwrap();
        let mut state = state_with(&dir, &[], pattern());

        dispatch(&mut state, Intent::SwitchMode, Value::Mode(ScreenMode::ImageViewer)).unwrap();

        assert_eq!(state.screen_mode, ScreenMode::NoImages);
        assert_eq!(state.last_screen_mode, Some(ScreenMode::Viewfinder));
    }

    #[test]
    fn test_settings_cycle_wraps() {
        let dir = TempDir::new().unwrap();
        let mut state = state_with(&dir, &[], pattern());

        dispatch(&mut state, Intent::IncSetting, Value::Int(-1)).unwrap();
        assert_eq!(state.setting_idx, 2);
        assert_eq!(state.screen_mode, ScreenMode::SetIso);

        dispatch(&mut state, Intent::IncSetting, Value::Int(1)).unwrap();
        assert_eq!(state.setting_idx, 0);
        assert_eq!(state.screen_mode, ScreenMode::SizeSettings);
    }

    #[test]
    fn test_settings_handlers() {
        let dir = TempDir::new().unwrap();
        let mut state = state_with(&dir, &[], pattern());

        dispatch(&mut state, Intent::SetImageSize, Value::Size(SizeMode::Small)).unwrap();
        assert_eq!(state.settings.size_mode, SizeMode::Small);

        dispatch(&mut state, Intent::IncEffect, Value::Int(-1)).unwrap();
        assert_eq!(state.settings.fx_mode, Fx::Solarize);
    }

    #[test]
    fn test_quit_sets_shutdown() {
        let dir = TempDir::new().unwrap();
        let mut state = state_with(&dir, &[], pattern());

        dispatch(&mut state, Intent::Quit, Value::None).unwrap();

        assert!(state.shutdown);
    }

    #[test]
    fn test_change_iso_is_fatal() {
        let dir = TempDir::new().unwrap();
        let mut state = state_with(&dir, &[], pattern());

        let err = dispatch(&mut state, Intent::IncIso, Value::Int(1)).unwrap_err();

        assert!(matches!(err, AdacamError::Unimplemented(_)));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_wrong_payload_is_rejected() {
        let dir = TempDir::new().unwrap();
        let mut state = state_with(&dir, &[], pattern());

        let err = dispatch(&mut state, Intent::SwitchMode, Value::Int(3)).unwrap_err();

        assert!(matches!(err, AdacamError::InvalidPayload { intent: Intent::SwitchMode, .. }));
        assert!(!err.is_fatal());
    }
}
