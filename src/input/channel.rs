//! Hand-off queue between the input worker and the main loop.
//!
//! The worker pushes completed [`TouchEvent`]s; the main loop drains whatever is
//! pending once per frame without blocking. Delivery order is push order.

use crossbeam_channel::{Receiver, Sender, TryRecvError};

use super::sample::TouchEvent;
use crate::domain::error::{AdacamError, Result};

/// Creates a connected sender/receiver pair.
#[must_use]
pub fn channel() -> (InputSender, InputReceiver) {
    let (tx, rx) = crossbeam_channel::unbounded();
    (InputSender { tx }, InputReceiver { rx })
}

/// Producer half, owned by the input worker thread.
#[derive(Debug, Clone)]
pub struct InputSender {
    tx: Sender<TouchEvent>,
}

impl InputSender {
    /// Queues one frame. Fails only when the receiver is gone.
    pub fn push(&self, event: TouchEvent) -> Result<()> {
        self.tx
            .send(event)
            .map_err(|_| AdacamError::DeviceUnavailable("input channel receiver closed".to_string()))
    }
}

/// Consumer half, owned by the main loop.
#[derive(Debug)]
pub struct InputReceiver {
    rx: Receiver<TouchEvent>,
}

impl InputReceiver {
    /// Returns every pending frame without blocking.
    ///
    /// Frames queued before the producer went away are still delivered; once
    /// the queue is empty and the producer is gone this reports
    /// [`AdacamError::DeviceUnavailable`].
    pub fn drain(&self) -> Result<Vec<TouchEvent>> {
        let mut events = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(event) => events.push(event),
                Err(TryRecvError::Empty) => return Ok(events),
                Err(TryRecvError::Disconnected) => {
                    if events.is_empty() {
                        return Err(AdacamError::DeviceUnavailable(
                            "input worker disconnected".to_string(),
                        ));
                    }
                    return Ok(events);
                }
            }
        }
    }
}
