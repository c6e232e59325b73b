//! Background workers.
//!
//! The appliance runs exactly one background execution context: the
//! touchscreen reader. Everything else lives on the main loop.
//!
//! - `touchscreen`: evdev read loop feeding the input channel

pub mod touchscreen;

pub use touchscreen::TouchscreenWorker;
