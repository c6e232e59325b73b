//! Tracing subscriber setup.
//!
//! Builds the subscriber stack: an [`EnvFilter`], a human-readable layer on
//! stderr, and (when a trace file is configured) an OpenTelemetry layer
//! exporting spans to that file.

use opentelemetry::trace::TracerProvider as _;
use opentelemetry::KeyValue;
use opentelemetry_sdk::resource::Resource;
use opentelemetry_sdk::trace::TracerProvider;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use super::file_writer::RotatingFile;
use super::tracer;
use crate::Config;

const SERVICE_NAME: &str = "adacam";
const DEFAULT_LEVEL: &str = "warn";

/// Keeps the span exporter alive; shuts it down when dropped.
#[must_use = "dropping the guard stops trace file export"]
#[derive(Debug, Default)]
pub struct TracingGuard {
    provider: Option<TracerProvider>,
}

impl Drop for TracingGuard {
    fn drop(&mut self) {
        if let Some(provider) = self.provider.take() {
            if let Err(e) = provider.shutdown() {
                eprintln!("adacam: trace export shutdown failed: {e}");
            }
        }
    }
}

/// Maps a command-line level name onto a filter directive.
///
/// `warning` is accepted as an alias for `warn`.
#[must_use]
pub fn level_directive(level: &str) -> &str {
    match level {
        "warning" => "warn",
        other => other,
    }
}

/// Installs the global subscriber.
///
/// The level comes from `cli_level`, else `config.trace_level`, else `warn`.
/// If `config.trace_file` is set, spans are also exported there as OTLP JSON;
/// a trace file whose directory cannot be created is skipped silently.
///
/// Safe to call more than once: only the first call installs anything.
///
/// # Example
///
/// ```rust
/// use adacam::observability::init_tracing;
/// use adacam::Config;
///
/// let _guard = init_tracing(&Config::default(), Some("debug"));
/// tracing::debug!("tracing is now active");
/// ```
pub fn init_tracing(config: &Config, cli_level: Option<&str>) -> TracingGuard {
    let level = cli_level
        .or(config.trace_level.as_deref())
        .map_or(DEFAULT_LEVEL, level_directive);
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL));

    let provider = config.trace_file.as_ref().and_then(|path| {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok()?;
        }
        let resource = Resource::new(vec![KeyValue::new("service.name", SERVICE_NAME)]);
        Some(tracer::create_tracer_provider(
            RotatingFile::new(path.clone()),
            resource,
            SERVICE_NAME,
        ))
    });
    let otel_layer = provider
        .as_ref()
        .map(|provider| OpenTelemetryLayer::new(provider.tracer(SERVICE_NAME)));

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(otel_layer)
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!(level, trace_file = ?config.trace_file, "tracing initialized");
        TracingGuard { provider }
    } else {
        TracingGuard::default()
    }
}
