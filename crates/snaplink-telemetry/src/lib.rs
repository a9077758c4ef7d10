//! Telemetry sinks and `tracing` setup.
//!
//! Every sink implements [`snaplink_core::Telemetry`]: emitting never blocks
//! the caller and never fails. [`RemoteTelemetry`] ships events to an HTTP
//! log collector in the background and always keeps a local trace.

pub mod error;
pub mod remote;
pub mod subscriber;
pub mod tracing_sink;

pub use error::TelemetryError;
pub use remote::{RemoteSettings, RemoteTelemetry};
pub use snaplink_core::telemetry::{Category, Level, NoopTelemetry, Telemetry};
pub use subscriber::{init_tracing, LogFormat};
pub use tracing_sink::TracingTelemetry;
