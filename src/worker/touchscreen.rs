//! Background thread reading a touchscreen through evdev.
//!
//! The device is opened on the caller's thread so that a missing device is a
//! startup error rather than a silent dead thread. The read loop then runs on
//! its own thread, feeding samples through a [`TouchReconstructor`] and pushing
//! completed frames into the input channel.
//!
//! The device file is switched to non-blocking mode and polled at a fixed
//! interval, so the cooperative stop flag is observed even when nobody is
//! touching the screen.

use std::os::fd::AsRawFd;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::RecvTimeoutError;
use evdev::{Device, InputEvent};
use nix::fcntl::{FcntlArg, OFlag};

use crate::domain::error::{AdacamError, Result};
use crate::input::channel::InputSender;
use crate::input::reconstruct::TouchReconstructor;
use crate::input::sample::RawSample;

/// Handle to the running touchscreen reader thread.
#[derive(Debug)]
pub struct TouchscreenWorker {
    device_path: PathBuf,
    shutdown: Arc<AtomicBool>,
    done: crossbeam_channel::Receiver<()>,
    handle: Option<JoinHandle<()>>,
}

impl TouchscreenWorker {
    /// Opens `device_path` and starts the reader thread.
    ///
    /// # Errors
    ///
    /// Returns [`AdacamError::DeviceUnavailable`] if the device cannot be opened,
    /// grabbed, or switched to non-blocking mode, or if the thread cannot be
    /// spawned.
    pub fn spawn(
        device_path: &Path,
        grab: bool,
        poll_interval: Duration,
        sender: InputSender,
    ) -> Result<Self> {
        let _span = tracing::debug_span!("touchscreen_spawn", path = %device_path.display()).entered();

        let unavailable = |what: &str, err: &dyn std::fmt::Display| {
            AdacamError::DeviceUnavailable(format!(
                "unable to {what} {}: {err}",
                device_path.display()
            ))
        };

        let mut device = Device::open(device_path).map_err(|e| unavailable("open", &e))?;
        if grab {
            device.grab().map_err(|e| unavailable("grab", &e))?;
        }
        nix::fcntl::fcntl(device.as_raw_fd(), FcntlArg::F_SETFL(OFlag::O_NONBLOCK))
            .map_err(|e| unavailable("set non-blocking mode on", &e))?;

        tracing::info!(name = ?device.name(), grab, "touchscreen opened");

        let shutdown = Arc::new(AtomicBool::new(false));
        let (done_tx, done) = crossbeam_channel::bounded(1);
        let thread_shutdown = Arc::clone(&shutdown);

        let handle = std::thread::Builder::new()
            .name("touchscreen".to_string())
            .spawn(move || {
                read_loop(&mut device, &thread_shutdown, poll_interval, &sender);
                if grab {
                    if let Err(e) = device.ungrab() {
                        tracing::warn!(error = %e, "failed to release touchscreen grab");
                    }
                }
                let _ = done_tx.send(());
            })
            .map_err(|e| unavailable("spawn reader thread for", &e))?;

        Ok(Self {
            device_path: device_path.to_path_buf(),
            shutdown,
            done,
            handle: Some(handle),
        })
    }

    #[must_use]
    pub fn device_path(&self) -> &Path {
        &self.device_path
    }

    /// Signals the thread to stop and waits up to `timeout` for it.
    ///
    /// A thread that does not finish in time is logged and left detached; the
    /// caller proceeds with shutdown either way.
    pub fn shutdown(&mut self, timeout: Duration) {
        let Some(handle) = self.handle.take() else {
            return;
        };

        self.shutdown.store(true, Ordering::SeqCst);

        match self.done.recv_timeout(timeout) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                if handle.join().is_err() {
                    tracing::error!("touchscreen thread panicked");
                } else {
                    tracing::debug!("touchscreen thread stopped");
                }
            }
            Err(RecvTimeoutError::Timeout) => {
                tracing::error!(
                    timeout_s = timeout.as_secs_f64(),
                    "input thread failed to terminate; you may need to kill this process"
                );
            }
        }
    }
}

impl Drop for TouchscreenWorker {
    fn drop(&mut self) {
        self.shutdown(Duration::from_secs(1));
    }
}

fn read_loop(device: &mut Device, shutdown: &AtomicBool, poll_interval: Duration, sender: &InputSender) {
    let _span = tracing::debug_span!("touchscreen_read_loop").entered();
    let mut reconstructor = TouchReconstructor::new();

    while !shutdown.load(Ordering::SeqCst) {
        let events: Vec<InputEvent> = match device.fetch_events() {
            Ok(events) => events.collect(),
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                std::thread::sleep(poll_interval);
                continue;
            }
            Err(e) => {
                tracing::error!(error = %e, "touchscreen read failed, stopping input");
                return;
            }
        };

        for event in &events {
            let Some(sample) = RawSample::from_input_event(event) else {
                continue;
            };
            if let Some(frame) = reconstructor.feed(sample) {
                tracing::trace!(frame = ?frame, "touch frame");
                if sender.push(frame).is_err() {
                    tracing::debug!("input receiver gone, stopping input");
                    return;
                }
            }
        }
    }
}
