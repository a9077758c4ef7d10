use snaplink_core::telemetry::{Category, Level, Telemetry};
use tracing::{debug, error, info, warn};

/// Writes telemetry events to the local `tracing` subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingTelemetry;

impl Telemetry for TracingTelemetry {
    fn emit(&self, stack: &str, level: Level, category: Category, message: &str) {
        let category = category.as_str();
        match level {
            Level::Debug => debug!(stack, category, "{message}"),
            Level::Info => info!(stack, category, "{message}"),
            Level::Warn => warn!(stack, category, "{message}"),
            Level::Error => error!(stack, category, "{message}"),
            Level::Fatal => error!(stack, category, fatal = true, "{message}"),
        }
    }
}
