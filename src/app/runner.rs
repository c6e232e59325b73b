//! The main loop.
//!
//! One iteration ("frame") does, in order:
//!
//! 1. record a frame time for the fps readout
//! 2. drain completed taps without blocking
//! 3. resolve the most recent tap against the current mode's regions
//! 4. dispatch the resulting intent
//! 5. fetch the display image and redraw
//!
//! After a capture the new picture is shown without overlays for
//! `snap_pause_time` seconds before the viewfinder resumes.
//!
//! Errors from steps 3 to 5 are logged and the loop continues, unless
//! [`AdacamError::is_fatal`] says otherwise. Losing the input device is fatal.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::app::handler::Dispatcher;
use crate::app::state::ControllerState;
use crate::domain::error::{AdacamError, Result};
use crate::input::TapSource;
use crate::ui::{Display, Registry};

/// Everything a frame needs besides the state itself.
pub struct Frame<'a> {
    pub registry: &'a Registry,
    pub dispatcher: &'a Dispatcher,
    pub display: &'a mut dyn Display,
    pub input: &'a mut dyn TapSource,
}

/// Runs frames until `state.shutdown` is set or `interrupt` is raised.
///
/// # Errors
///
/// Returns the first fatal error; the caller still owns cleanup.
pub fn run_forever(state: &mut ControllerState, frame: &mut Frame<'_>, interrupt: &AtomicBool) -> Result<()> {
    let _span = tracing::info_span!("main_loop").entered();
    tracing::info!("entering main loop");

    while !state.shutdown {
        if interrupt.load(Ordering::SeqCst) {
            tracing::warn!("caught interrupt, shutting down");
            return Ok(());
        }
        run_frame(state, frame)?;
    }

    tracing::info!("loop exited normally");
    Ok(())
}

/// Runs a single iteration of the main loop.
///
/// # Errors
///
/// Returns fatal errors only; everything else is logged.
pub fn run_frame(state: &mut ControllerState, frame: &mut Frame<'_>) -> Result<()> {
    let fps = state.fps_tick();

    let taps = frame.input.poll_taps()?;
    if let Some(tap) = taps.last() {
        if taps.len() > 1 {
            tracing::debug!(dropped = taps.len() - 1, "several taps in one frame, using the latest");
        }
        if let Some(event) = frame.registry.resolve(state.screen_mode, *tap) {
            tracing::debug!(event = ?event, "event");
            absorb(frame.dispatcher.dispatch(state, event))?;
        }
    }

    let image = match state.get_display_image() {
        Ok(image) => image,
        Err(e) => {
            if state.took_picture {
                tracing::warn!("captured picture cannot be shown, resuming viewfinder");
                state.took_picture = false;
            }
            return absorb(Err(e));
        }
    };

    if state.took_picture {
        absorb(frame.display.redraw(&image, None, None))?;
        std::thread::sleep(Duration::from_secs_f64(state.settings.snap_pause_time.max(0.0)));
        state.took_picture = false;
    } else {
        let regions = frame.registry.regions(state.screen_mode);
        let fps = state.settings.draw_fps.then_some(fps);
        absorb(frame.display.redraw(&image, Some(regions), fps))?;
    }

    Ok(())
}

/// Logs recoverable errors, passes fatal ones through.
fn absorb(result: Result<()>) -> Result<()> {
    match result {
        Err(e) if e.is_fatal() => {
            tracing::error!(error = %e, "fatal error");
            Err(e)
        }
        Err(e) => {
            log_recoverable(&e);
            Ok(())
        }
        Ok(()) => Ok(()),
    }
}

fn log_recoverable(err: &AdacamError) {
    match err {
        AdacamError::EmptyIndex | AdacamError::InvalidPayload { .. } => {
            tracing::warn!(error = %err, "ignored input");
        }
        _ => tracing::error!(error = %err, "operation failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    use crate::app::modes::ScreenMode;
    use crate::camera::PatternCamera;
    use crate::domain::settings::Settings;
    use crate::input::TapPosition;
    use crate::storage::photos::file_name;
    use crate::domain::index::ImageIndex;
    use crate::storage::{ImageStore, PhotoDirectory, PhotoWriter};
    use crate::ui::{default_layout, HeadlessDisplay};
    use image::DynamicImage;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    /// Writes real pictures but cannot decode any of them.
    struct UnreadableStore(PhotoDirectory);

    impl ImageStore for UnreadableStore {
        fn photo_dir(&self) -> &Path {
            self.0.photo_dir()
        }

        fn path(&self, id: u32) -> PathBuf {
            self.0.path(id)
        }

        fn scan(&mut self) -> Result<ImageIndex> {
            self.0.scan()
        }

        fn write(&mut self, id: u32) -> Result<PhotoWriter> {
            self.0.write(id)
        }

        fn delete(&mut self, id: u32) -> Result<()> {
            self.0.delete(id)
        }

        fn load(&self, id: u32) -> Result<DynamicImage> {
            Err(AdacamError::Decode(format!("picture {id} is corrupt")))
        }
    }

    /// Hands out one scripted batch of taps per poll.
    #[derive(Default)]
    struct ScriptedTaps {
        batches: VecDeque<Vec<TapPosition>>,
        lost: bool,
    }

    impl ScriptedTaps {
        fn new(taps: &[(i32, i32)]) -> Self {
            Self {
                batches: taps.iter().map(|&(x, y)| vec![TapPosition::new(x, y)]).collect(),
                lost: false,
            }
        }
    }

    impl TapSource for ScriptedTaps {
        fn poll_taps(&mut self) -> Result<Vec<TapPosition>> {
            if self.lost {
                return Err(AdacamError::DeviceUnavailable("touchscreen unplugged".to_string()));
            }
            Ok(self.batches.pop_front().unwrap_or_default())
        }
    }

    fn test_state(dir: &TempDir) -> ControllerState {
        let mut store = PhotoDirectory::new(dir.path());
        let index = store.scan().unwrap();
        let settings = Settings {
            snap_pause_time: 0.0,
            ..Settings::default()
        };
        ControllerState::new(
            settings,
            Box::new(PatternCamera::new((32, 24), (64, 48))),
            Box::new(store),
            index,
            10,
        )
    }

    fn run_frames(state: &mut ControllerState, taps: &mut ScriptedTaps, display: &mut HeadlessDisplay, n: usize) {
        let registry = default_layout();
        let dispatcher = Dispatcher::standard().unwrap();
        let mut frame = Frame {
            registry: &registry,
            dispatcher: &dispatcher,
            display,
            input: taps,
        };
        for _ in 0..n {
            run_frame(state, &mut frame).unwrap();
        }
    }

    #[test]
    fn test_viewfinder_tap_takes_picture() {
        let dir = TempDir::new().unwrap();
        let mut state = test_state(&dir);
        let mut taps = ScriptedTaps::new(&[(160, 100)]);
        let mut display = HeadlessDisplay::new();

        run_frames(&mut state, &mut taps, &mut display, 1);

        assert_eq!(state.image_ids.len(), 1);
        assert!(dir.path().join(file_name(0)).is_file());
        assert!(!state.took_picture);
        let shown = display.last_frame().unwrap();
        assert_eq!((shown.width, shown.height), (64, 48));
        assert!(shown.regions.is_empty());
        assert_eq!(shown.fps, None);

        run_frames(&mut state, &mut taps, &mut display, 1);

        let preview = display.last_frame().unwrap();
        assert_eq!((preview.width, preview.height), (32, 24));
        assert!(preview.regions.contains(&"viewfinder"));
        assert!(preview.fps.is_some());
        assert_eq!(display.frames(), 2);
    }

    #[test]
    fn test_view_then_delete_last_picture() {
        let dir = TempDir::new().unwrap();
        let mut state = test_state(&dir);
        let mut display = HeadlessDisplay::new();
        // snap, play, trash, yes
        let mut taps = ScriptedTaps::new(&[(160, 100), (200, 200), (150, 20), (80, 120)]);

        run_frames(&mut state, &mut taps, &mut display, 3);
        assert_eq!(state.screen_mode, ScreenMode::ConfirmDelete);
        assert_eq!(display.last_frame().unwrap().regions, vec!["delete", "yes", "no"]);

        run_frames(&mut state, &mut taps, &mut display, 1);

        assert!(state.image_ids.is_empty());
        assert_eq!(state.selected_image_index, None);
        assert_eq!(state.screen_mode, ScreenMode::NoImages);
        assert!(!dir.path().join(file_name(0)).exists());
    }

    #[test]
    fn test_play_with_no_pictures_shows_empty_screen() {
        let dir = TempDir::new().unwrap();
        let mut state = test_state(&dir);
        let mut display = HeadlessDisplay::new();
        let mut taps = ScriptedTaps::new(&[(200, 200)]);

        run_frames(&mut state, &mut taps, &mut display, 1);

        assert_eq!(state.screen_mode, ScreenMode::NoImages);
        assert!(display.last_frame().unwrap().regions.contains(&"empty"));
    }

    #[test]
    fn test_quit_ends_loop() {
        let dir = TempDir::new().unwrap();
        let mut state = test_state(&dir);
        state.screen_mode = ScreenMode::Quit;
        let mut display = HeadlessDisplay::new();
        let mut taps = ScriptedTaps::new(&[(160, 100)]);
        let registry = default_layout();
        let dispatcher = Dispatcher::standard().unwrap();
        let mut frame = Frame {
            registry: &registry,
            dispatcher: &dispatcher,
            display: &mut display,
            input: &mut taps,
        };

        run_forever(&mut state, &mut frame, &AtomicBool::new(false)).unwrap();

        assert!(state.shutdown);
        assert_eq!(display.frames(), 1);
    }

    #[test]
    fn test_interrupt_stops_before_first_frame() {
        let dir = TempDir::new().unwrap();
        let mut state = test_state(&dir);
        let mut display = HeadlessDisplay::new();
        let mut taps = ScriptedTaps::default();
        let registry = default_layout();
        let dispatcher = Dispatcher::standard().unwrap();
        let mut frame = Frame {
            registry: &registry,
            dispatcher: &dispatcher,
            display: &mut display,
            input: &mut taps,
        };

        run_forever(&mut state, &mut frame, &AtomicBool::new(true)).unwrap();

        assert_eq!(display.frames(), 0);
    }

    #[test]
    fn test_lost_input_is_fatal() {
        let dir = TempDir::new().unwrap();
        let mut state = test_state(&dir);
        let mut display = HeadlessDisplay::new();
        let mut taps = ScriptedTaps {
            lost: true,
            ..ScriptedTaps::default()
        };
        let registry = default_layout();
        let dispatcher = Dispatcher::standard().unwrap();
        let mut frame = Frame {
            registry: &registry,
            dispatcher: &dispatcher,
            display: &mut display,
            input: &mut taps,
        };

        let result = run_forever(&mut state, &mut frame, &AtomicBool::new(false));

        assert!(matches!(result, Err(AdacamError::DeviceUnavailable(_))));
    }

    #[test]
    fn test_unreadable_capture_returns_to_viewfinder() {
        let dir = TempDir::new().unwrap();
        let mut store = UnreadableStore(PhotoDirectory::new(dir.path()));
        let index = store.scan().unwrap();
        let settings = Settings {
            snap_pause_time: 0.0,
            ..Settings::default()
        };
        let mut state = ControllerState::new(
            settings,
            Box::new(PatternCamera::new((32, 24), (64, 48))),
            Box::new(store),
            index,
            10,
        );
        let mut taps = ScriptedTaps::new(&[(160, 100)]);
        let mut display = HeadlessDisplay::new();

        run_frames(&mut state, &mut taps, &mut display, 1);

        assert_eq!(state.image_ids.len(), 1);
        assert!(!state.took_picture);
        assert_eq!(display.frames(), 0);

        run_frames(&mut state, &mut taps, &mut display, 4);

        assert_eq!(state.screen_mode, ScreenMode::Viewfinder);
        assert_eq!(display.frames(), 4);
        let preview = display.last_frame().unwrap();
        assert_eq!((preview.width, preview.height), (32, 24));
    }

    #[test]
    fn test_recoverable_errors_are_absorbed() {
        assert!(absorb(Err(AdacamError::EmptyIndex)).is_ok());
        assert!(absorb(Err(AdacamError::Unimplemented("changing ISO"))).is_err());
    }
}
