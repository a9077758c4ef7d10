use thiserror::Error;

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("failed to build telemetry http client: {0}")]
    Client(#[from] reqwest::Error),
    #[error("failed to install tracing subscriber: {0}")]
    Subscriber(String),
}
