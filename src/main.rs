//! Appliance entry point.
//!
//! Parses the command line, loads the configuration, installs tracing and then
//! hands control to the main loop until the user quits or the process is
//! interrupted.
//!
//! # Lifecycle
//!
//! 1. **Startup**: Parse arguments, load config, initialize tracing
//! 2. **Initialize**: Scan photos, open the camera, open the touchscreen
//! 3. **Splash**: Show the splash image, if present
//! 4. **Run**: Frames until the quit intent, Ctrl-C or a fatal error
//! 5. **Cleanup**: Always release the camera and stop the input thread
//!
//! # Usage
//!
//! ```text
//! adacam [CFG_PATH] [-l debug|info|warning|error]
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use adacam::app::{run_forever, Dispatcher, Frame};
use adacam::infrastructure::default_config_path;
use adacam::observability::init_tracing;
use adacam::ui::{default_layout, Display, HeadlessDisplay};
use adacam::{initialize, input, Config, Result};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl LogLevel {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// Touchscreen point-and-shoot camera.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(default_value_os_t = default_config_path())]
    cfg_path: PathBuf,

    /// Minimum level of log messages printed to stderr.
    #[arg(short, long, value_enum, default_value_t = LogLevel::Warning)]
    loglevel: LogLevel,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let config = match Config::load(&args.cfg_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("adacam: {e}");
            return ExitCode::FAILURE;
        }
    };

    let _guard = init_tracing(&config, Some(args.loglevel.as_str()));
    tracing::warn!(cfg_path = %args.cfg_path.display(), "startup");

    let code = match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "adacam stopped");
            ExitCode::FAILURE
        }
    };

    tracing::warn!("shutdown");
    code
}

fn run(config: &Config) -> Result<()> {
    let mut state = initialize(config)?;
    let registry = default_layout();
    let dispatcher = Dispatcher::standard()?;
    let mut display = HeadlessDisplay::new();

    let mut taps = match input::open(config) {
        Ok(taps) => taps,
        Err(e) => {
            state.cleanup();
            return Err(e);
        }
    };

    let interrupt = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&interrupt);
    if let Err(e) = ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst)) {
        tracing::warn!(error = %e, "unable to install interrupt handler");
    }

    if let Some(path) = &config.splash_img_path {
        show_splash(&mut display, path, config.splash_duration_s);
    }

    let result = {
        let mut frame = Frame {
            registry: &registry,
            dispatcher: &dispatcher,
            display: &mut display,
            input: taps.as_mut(),
        };
        run_forever(&mut state, &mut frame, &interrupt)
    };

    state.cleanup();
    taps.shutdown();
    result
}

/// Shows the splash image for `duration_s`; failures are only logged.
fn show_splash(display: &mut dyn Display, path: &Path, duration_s: f64) {
    if !path.is_file() {
        tracing::debug!(path = %path.display(), "no splash image");
        return;
    }

    let shown = image::open(path)
        .map_err(|e| e.to_string())
        .and_then(|splash| display.redraw(&splash, None, None).map_err(|e| e.to_string()));

    match shown {
        Ok(()) => std::thread::sleep(Duration::from_secs_f64(duration_s.max(0.0))),
        Err(e) => tracing::error!(path = %path.display(), error = %e, "failed to show splash"),
    }
}
