//! Touch event reconstruction and tap folding.
//!
//! A touchscreen reports one field at a time and marks the end of a frame with
//! `SYN_REPORT` (see the kernel's multi-touch protocol documentation).
//! [`TouchReconstructor`] accumulates those field updates into a [`TouchEvent`]
//! per frame. [`TapFolder`] runs on the consumer side and reduces the frame
//! sequence to discrete taps.

use super::sample::{RawSample, TapPosition, TouchEvent};

/// Accumulates raw samples into one [`TouchEvent`] per sync boundary.
///
/// Coordinates and the tracking id carry over from one frame to the next
/// because the device only reports them when they change. The touch state does
/// not: the device must re-assert it.
#[derive(Debug, Default)]
pub struct TouchReconstructor {
    current: TouchEvent,
    dropping: bool,
}

impl TouchReconstructor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one sample; returns the completed frame at a non-dropped
    /// `SYN_REPORT`.
    pub fn feed(&mut self, sample: RawSample) -> Option<TouchEvent> {
        match sample {
            RawSample::AbsX(value) => self.current.x = Some(value),
            RawSample::AbsY(value) => self.current.y = Some(value),
            RawSample::TrackingId(value) => {
                self.current.tracking_id = Some(value);
                if value == -1 {
                    self.clear_contact();
                }
            }
            RawSample::Touch(value) => self.current.touch = Some(value != 0),
            RawSample::SyncDropped => {
                tracing::debug!("input frame dropped, resyncing");
                self.dropping = true;
            }
            RawSample::SyncReport => {
                if self.dropping {
                    self.clear_contact();
                    self.dropping = false;
                    return None;
                }

                let completed = self.current;
                self.current = TouchEvent {
                    x: completed.x,
                    y: completed.y,
                    touch: None,
                    tracking_id: completed.tracking_id,
                };
                return Some(completed);
            }
        }
        None
    }

    fn clear_contact(&mut self) {
        self.current.x = None;
        self.current.y = None;
        self.current.touch = None;
    }
}

/// Reduces a stream of frames to completed taps.
///
/// A tap starts at a frame with `touch = true` and both coordinates, follows
/// the finger while it stays down, and completes at the first `touch = false`
/// frame. The reported position is the last one seen before release, since the
/// release frame itself usually carries no coordinates.
#[derive(Debug, Default)]
pub struct TapFolder {
    is_touched: bool,
    last_pos: Option<TapPosition>,
}

impl TapFolder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one frame; returns a tap when this frame releases the finger.
    pub fn fold(&mut self, event: &TouchEvent) -> Option<TapPosition> {
        if self.is_touched {
            if event.touch == Some(false) {
                self.is_touched = false;
                let tap = self.last_pos.take();
                tracing::debug!(tap = ?tap, "touch complete");
                return tap;
            }
            if let Some(pos) = event.position() {
                self.last_pos = Some(pos);
            }
        } else if event.touch == Some(true) {
            if let Some(pos) = event.position() {
                tracing::trace!(x = pos.x, y = pos.y, "touch down");
                self.last_pos = Some(pos);
                self.is_touched = true;
            }
        }
        None
    }

    /// Folds a batch of frames, returning every tap they complete in order.
    pub fn fold_all<'a>(&mut self, events: impl IntoIterator<Item = &'a TouchEvent>) -> Vec<TapPosition> {
        events.into_iter().filter_map(|event| self.fold(event)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_all(reconstructor: &mut TouchReconstructor, samples: &[RawSample]) -> Vec<TouchEvent> {
        samples.iter().filter_map(|s| reconstructor.feed(*s)).collect()
    }

    fn frame(touch: Option<bool>, x: Option<i32>, y: Option<i32>) -> TouchEvent {
        TouchEvent { x, y, touch, tracking_id: None }
    }

    #[test]
    fn test_emits_one_event_per_sync_boundary() {
        let mut r = TouchReconstructor::new();
        let events = feed_all(
            &mut r,
            &[
                RawSample::TrackingId(7),
                RawSample::Touch(1),
                RawSample::AbsX(10),
                RawSample::AbsY(20),
                RawSample::SyncReport,
                RawSample::AbsX(11),
                RawSample::SyncReport,
            ],
        );

        assert_eq!(events.len(), 2);
        assert_eq!(
            events[0],
            TouchEvent { x: Some(10), y: Some(20), touch: Some(true), tracking_id: Some(7) }
        );
        // x, y and tracking id carry forward; touch does not
        assert_eq!(
            events[1],
            TouchEvent { x: Some(11), y: Some(20), touch: None, tracking_id: Some(7) }
        );
    }

    #[test]
    fn test_tracking_id_lift_clears_contact() {
        let mut r = TouchReconstructor::new();
        let events = feed_all(
            &mut r,
            &[
                RawSample::Touch(1),
                RawSample::AbsX(5),
                RawSample::AbsY(6),
                RawSample::SyncReport,
                RawSample::TrackingId(-1),
                RawSample::Touch(0),
                RawSample::SyncReport,
            ],
        );

        assert_eq!(events[1].x, None);
        assert_eq!(events[1].y, None);
        assert_eq!(events[1].touch, Some(false));
        assert_eq!(events[1].tracking_id, Some(-1));
    }

    #[test]
    fn test_sync_dropped_discards_frame() {
        let mut r = TouchReconstructor::new();
        let events = feed_all(
            &mut r,
            &[
                RawSample::Touch(1),
                RawSample::AbsX(5),
                RawSample::AbsY(6),
                RawSample::SyncDropped,
                RawSample::SyncReport,
                RawSample::SyncReport,
            ],
        );

        // the dropped boundary emits nothing; the next one is empty
        assert_eq!(events, vec![TouchEvent::default()]);
    }

    #[test]
    fn test_fold_reports_last_position_before_release() {
        let mut folder = TapFolder::new();
        let taps = folder.fold_all(&[
            frame(Some(true), Some(10), Some(20)),
            frame(Some(true), Some(12), Some(21)),
            frame(Some(false), None, None),
        ]);

        assert_eq!(taps, vec![TapPosition::new(12, 21)]);
    }

    #[test]
    fn test_fold_tracks_motion_frames_without_touch_field() {
        let mut folder = TapFolder::new();
        let taps = folder.fold_all(&[
            frame(Some(true), Some(10), Some(20)),
            frame(None, Some(30), Some(40)),
            frame(None, None, None),
            frame(Some(false), None, None),
        ]);

        assert_eq!(taps, vec![TapPosition::new(30, 40)]);
    }

    #[test]
    fn test_fold_ignores_touch_without_coordinates() {
        let mut folder = TapFolder::new();
        let taps = folder.fold_all(&[
            frame(Some(true), None, None),
            frame(Some(false), None, None),
        ]);

        assert!(taps.is_empty());
    }

    #[test]
    fn test_reconstruct_then_fold_end_to_end() {
        let mut r = TouchReconstructor::new();
        let mut folder = TapFolder::new();
        let events = feed_all(
            &mut r,
            &[
                RawSample::TrackingId(1),
                RawSample::Touch(1),
                RawSample::AbsX(100),
                RawSample::AbsY(50),
                RawSample::SyncReport,
                RawSample::AbsX(102),
                RawSample::SyncReport,
                RawSample::TrackingId(-1),
                RawSample::Touch(0),
                RawSample::SyncReport,
            ],
        );

        assert_eq!(folder.fold_all(&events), vec![TapPosition::new(102, 50)]);
    }

    const ORDERS: [[usize; 3]; 6] = [[0, 1, 2], [0, 2, 1], [1, 0, 2], [1, 2, 0], [2, 0, 1], [2, 1, 0]];

    /// A reconstructor that has already emitted a frame at (1, 2) with id 5.
    fn primed() -> TouchReconstructor {
        let mut r = TouchReconstructor::new();
        let first = feed_all(
            &mut r,
            &[
                RawSample::TrackingId(5),
                RawSample::AbsX(1),
                RawSample::AbsY(2),
                RawSample::Touch(1),
                RawSample::SyncReport,
            ],
        );
        assert_eq!(first.len(), 1);
        r
    }

    /// Every order of every subset of {X, Y, touch}, for both touch values.
    fn interleavings() -> Vec<(Vec<RawSample>, Option<i32>, Option<i32>, Option<bool>)> {
        let mut cases = Vec::new();
        for mask in 0..8u8 {
            for touch in [0, 1] {
                for order in ORDERS {
                    let fields = [RawSample::AbsX(30), RawSample::AbsY(40), RawSample::Touch(touch)];
                    let samples: Vec<_> =
                        order.iter().filter(|&&i| mask & (1 << i) != 0).map(|&i| fields[i]).collect();
                    cases.push((
                        samples,
                        (mask & 1 != 0).then_some(30),
                        (mask & 2 != 0).then_some(40),
                        (mask & 4 != 0).then_some(touch != 0),
                    ));
                }
            }
        }
        cases
    }

    #[test]
    fn test_every_interleaving_emits_once_with_carry_forward() {
        for (samples, x, y, touch) in interleavings() {
            let mut r = primed();
            let mut frame_samples = samples.clone();
            frame_samples.push(RawSample::SyncReport);

            let events = feed_all(&mut r, &frame_samples);

            assert_eq!(events.len(), 1, "{samples:?}");
            let event = events[0];
            assert_eq!(event.x, Some(x.unwrap_or(1)), "{samples:?}");
            assert_eq!(event.y, Some(y.unwrap_or(2)), "{samples:?}");
            assert_eq!(event.tracking_id, Some(5), "{samples:?}");
            assert_eq!(event.touch, touch, "{samples:?}");
        }
    }

    #[test]
    fn test_every_interleaving_with_drop_emits_nothing() {
        for (samples, ..) in interleavings() {
            for at in 0..=samples.len() {
                let mut r = primed();
                let mut frame_samples = samples.clone();
                frame_samples.insert(at, RawSample::SyncDropped);
                frame_samples.push(RawSample::SyncReport);

                assert!(feed_all(&mut r, &frame_samples).is_empty(), "{frame_samples:?}");

                let next = feed_all(&mut r, &[RawSample::SyncReport]);
                assert_eq!(next.len(), 1);
                assert_eq!((next[0].x, next[0].y, next[0].touch), (None, None, None), "{frame_samples:?}");
                assert_eq!(next[0].tracking_id, Some(5));
            }
        }
    }
}
