//! Controller state.
//!
//! This module defines [`ControllerState`], the single mutable session object
//! of the appliance. The main loop owns it; intent handlers receive it by
//! exclusive reference and may change any field. Nothing else holds a copy,
//! so no locking is involved.
//!
//! # State Components
//!
//! - **Screen mode**: Current and previous [`ScreenMode`], plus the settings cursor
//! - **Image index**: Sorted ids of stored pictures and the selected position
//! - **Lifecycle flags**: `took_picture` and `shutdown`
//! - **Frame window**: Timestamps of recent redraws for the fps readout
//! - **Collaborators**: The camera and the photo store
//!
//! # Invariants
//!
//! `selected_image_index` is `None` exactly when `image_ids` is empty, and
//! otherwise a valid position into it. Handlers that change the index restore
//! this before returning.
//!
//! # Display Image
//!
//! [`ControllerState::get_display_image`] decides what the screen shows. Stored
//! pictures go through a one-slot cache keyed by image id; live previews are
//! never cached.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use image::DynamicImage;

use crate::app::fps::FpsCounter;
use crate::app::modes::ScreenMode;
use crate::camera::Camera;
use crate::domain::error::{AdacamError, Result};
use crate::domain::index::ImageIndex;
use crate::domain::settings::Settings;
use crate::storage::ImageStore;

/// Mutable session state of the appliance.
pub struct ControllerState {
    /// Active screen.
    pub screen_mode: ScreenMode,
    /// Screen active before the last switch, if any.
    pub last_screen_mode: Option<ScreenMode>,
    /// Cursor into [`crate::app::modes::SETTINGS_MODES`].
    pub setting_idx: usize,
    /// Ids of every stored picture.
    pub image_ids: ImageIndex,
    /// Position of the selected picture in `image_ids`.
    pub selected_image_index: Option<usize>,
    /// Set by a capture; the main loop shows the new picture, then clears it.
    pub took_picture: bool,
    /// Set by the quit handler; ends the main loop.
    pub shutdown: bool,
    pub settings: Settings,

    fps: FpsCounter,
    camera: Box<dyn Camera>,
    store: Box<dyn ImageStore>,
    cached_image: Option<(u32, Arc<DynamicImage>)>,
}

impl fmt::Debug for ControllerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerState")
            .field("screen_mode", &self.screen_mode)
            .field("last_screen_mode", &self.last_screen_mode)
            .field("setting_idx", &self.setting_idx)
            .field("image_ids", &self.image_ids)
            .field("selected_image_index", &self.selected_image_index)
            .field("took_picture", &self.took_picture)
            .field("shutdown", &self.shutdown)
            .field("settings", &self.settings)
            .field("photo_dir", &self.store.photo_dir())
            .field("cached_image_id", &self.cached_image.as_ref().map(|(id, _)| *id))
            .finish_non_exhaustive()
    }
}

impl ControllerState {
    /// Creates the initial state: viewfinder mode, first picture selected.
    pub fn new(
        settings: Settings,
        camera: Box<dyn Camera>,
        store: Box<dyn ImageStore>,
        image_ids: ImageIndex,
        fps_window: usize,
    ) -> Self {
        let selected_image_index = if image_ids.is_empty() { None } else { Some(0) };

        Self {
            screen_mode: ScreenMode::Viewfinder,
            last_screen_mode: None,
            setting_idx: 0,
            image_ids,
            selected_image_index,
            took_picture: false,
            shutdown: false,
            settings,
            fps: FpsCounter::new(fps_window),
            camera,
            store,
            cached_image: None,
        }
    }

    pub fn camera_mut(&mut self) -> &mut dyn Camera {
        self.camera.as_mut()
    }

    pub fn store_mut(&mut self) -> &mut dyn ImageStore {
        self.store.as_mut()
    }

    #[must_use]
    pub fn store(&self) -> &dyn ImageStore {
        self.store.as_ref()
    }

    /// Records a redraw and returns the current frame rate.
    pub fn fps_tick(&mut self) -> f64 {
        self.fps.tick()
    }

    /// Id of the selected picture.
    #[must_use]
    pub fn selected_image_id(&self) -> Option<u32> {
        self.selected_image_index.and_then(|pos| self.image_ids.get(pos))
    }

    /// What the screen should show right now.
    ///
    /// The selected stored picture while a capture is being shown or in the
    /// viewer screens, otherwise a fresh camera preview.
    ///
    /// # Errors
    ///
    /// Returns the camera error for previews, or the error from
    /// [`load_selected_image`](Self::load_selected_image).
    pub fn get_display_image(&mut self) -> Result<Arc<DynamicImage>> {
        if self.took_picture || self.screen_mode.shows_stored_image() {
            return self.load_selected_image();
        }

        let preview = self.camera.get_preview()?;
        self.cached_image = None;
        Ok(Arc::new(preview))
    }

    /// Returns the selected picture, decoding it only when the selection
    /// changed since the last call.
    ///
    /// # Errors
    ///
    /// Returns [`AdacamError::EmptyIndex`] with nothing selected, or the
    /// store's `NotFound`/`Decode` error.
    pub fn load_selected_image(&mut self) -> Result<Arc<DynamicImage>> {
        let id = self.selected_image_id().ok_or(AdacamError::EmptyIndex)?;

        if let Some((cached_id, image)) = &self.cached_image {
            if *cached_id == id {
                return Ok(Arc::clone(image));
            }
        }

        let image = Arc::new(self.store.load(id)?);
        tracing::debug!(image_id = id, width = image.width(), height = image.height(), "image loaded");
        self.cached_image = Some((id, Arc::clone(&image)));
        Ok(image)
    }

    /// Writes a camera capture into the store as picture `id`.
    ///
    /// The picture becomes visible in the store only if both the capture and
    /// the commit succeed. The index is not touched.
    ///
    /// # Errors
    ///
    /// Returns the camera error or [`AdacamError::WriteFailure`].
    pub fn capture(&mut self, id: u32) -> Result<PathBuf> {
        let _span = tracing::debug_span!("capture", image_id = id).entered();
        let mut writer = self.store.write(id)?;
        self.camera.write_picture(&mut writer, &self.settings)?;
        writer.commit()
    }

    /// Drops the cached picture if it belongs to `id`.
    pub fn forget_cached_image(&mut self, id: u32) {
        if self.cached_image.as_ref().is_some_and(|(cached_id, _)| *cached_id == id) {
            self.cached_image = None;
        }
    }

    /// Releases the camera. Called once after the main loop ends.
    pub fn cleanup(&mut self) {
        let _span = tracing::debug_span!("controller_cleanup").entered();
        self.camera.cleanup();
    }
}
