//! Logging and trace export.
//!
//! All diagnostics go through `tracing`. Events are printed to stderr; spans
//! can additionally be exported through OpenTelemetry into a local file for
//! offline analysis, since the appliance has no network.
//!
//! # Architecture
//!
//! ```text
//! tracing macros ─┬─ EnvFilter ─ fmt layer ─────────────────────────────► stderr
//!                 └─ tracing-opentelemetry → SDK → FileSpanExporter ─────► OTLP JSON lines
//! ```
//!
//! # Features
//!
//! - **Level**: `--loglevel`, else `trace_level` from the config file, else `warn`
//! - **Trace file**: `trace_file` in the config file; rotated at 10 MiB, 3 backups kept
//! - **OTLP format**: One `resourceSpans` document per line
//!
//! # Modules
//!
//! - `init`: Subscriber setup
//! - `tracer`: Tracer provider with the file exporter
//! - `span_formatter`: OTLP JSON encoding
//! - `file_writer`: Size-rotated trace file

mod file_writer;
mod init;
mod span_formatter;
mod tracer;

pub use init::{init_tracing, level_directive, TracingGuard};
