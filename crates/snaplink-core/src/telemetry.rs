use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Severity of a telemetry event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
            Level::Fatal => "fatal",
        }
    }
}

impl Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The part of the system an event originates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Api,
    Handler,
    Service,
    State,
    Storage,
    Config,
    Utils,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Api => "api",
            Category::Handler => "handler",
            Category::Service => "service",
            Category::State => "state",
            Category::Storage => "storage",
            Category::Config => "config",
            Category::Utils => "utils",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fire-and-forget observability sink.
///
/// `emit` must return promptly and must never panic, whatever the state of
/// the underlying transport. Core operations never wait on it.
pub trait Telemetry: Send + Sync + 'static {
    fn emit(&self, stack: &str, level: Level, category: Category, message: &str);
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTelemetry;

impl Telemetry for NoopTelemetry {
    fn emit(&self, _stack: &str, _level: Level, _category: Category, _message: &str) {}
}

impl<T: Telemetry + ?Sized> Telemetry for std::sync::Arc<T> {
    fn emit(&self, stack: &str, level: Level, category: Category, message: &str) {
        (**self).emit(stack, level, category, message)
    }
}
