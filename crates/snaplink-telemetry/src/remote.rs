use crate::error::TelemetryError;
use crate::tracing_sink::TracingTelemetry;
use jiff::Timestamp;
use serde::Serialize;
use snaplink_core::telemetry::{Category, Level, Telemetry};
use std::time::Duration;
use tokio::runtime::Handle;
use tracing::debug;
use typed_builder::TypedBuilder;
use uuid::Uuid;

/// Connection settings for the remote log collector.
#[derive(Debug, Clone, TypedBuilder)]
pub struct RemoteSettings {
    /// Base URL of the collector; events are POSTed to `<endpoint>/logs`.
    #[builder(setter(into))]
    pub endpoint: String,
    #[builder(default, setter(strip_option, into))]
    pub bearer_token: Option<String>,
    /// Upper bound on a single delivery attempt.
    #[builder(default = Duration::from_secs(5))]
    pub timeout: Duration,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LogPayload<'a> {
    stack: &'a str,
    level: Level,
    package: Category,
    message: &'a str,
    timestamp: Timestamp,
    session_id: Uuid,
}

/// Ships events to an HTTP log collector without ever blocking the caller.
///
/// Every event is first written to the local trace. Delivery then happens
/// on a spawned task, and failures are swallowed after a debug trace. With
/// no tokio runtime around, only the local trace is written.
#[derive(Debug, Clone)]
pub struct RemoteTelemetry {
    client: reqwest::Client,
    logs_url: String,
    bearer_token: Option<String>,
    session_id: Uuid,
    local: TracingTelemetry,
}

impl RemoteTelemetry {
    pub fn new(settings: RemoteSettings) -> Result<Self, TelemetryError> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()?;

        Ok(Self {
            client,
            logs_url: format!("{}/logs", settings.endpoint.trim_end_matches('/')),
            bearer_token: settings.bearer_token,
            session_id: Uuid::new_v4(),
            local: TracingTelemetry,
        })
    }

    pub fn logs_url(&self) -> &str {
        &self.logs_url
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    fn payload<'a>(
        &self,
        stack: &'a str,
        level: Level,
        category: Category,
        message: &'a str,
    ) -> LogPayload<'a> {
        LogPayload {
            stack,
            level,
            package: category,
            message,
            timestamp: Timestamp::now(),
            session_id: self.session_id,
        }
    }
}

impl Telemetry for RemoteTelemetry {
    fn emit(&self, stack: &str, level: Level, category: Category, message: &str) {
        self.local.emit(stack, level, category, message);

        let Ok(handle) = Handle::try_current() else {
            return;
        };

        let mut request = self
            .client
            .post(&self.logs_url)
            .json(&self.payload(stack, level, category, message));
        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token);
        }

        handle.spawn(async move {
            match request.send().await {
                Ok(response) if !response.status().is_success() => {
                    debug!(status = %response.status(), "log collector rejected event");
                }
                Ok(_) => {}
                Err(err) => {
                    debug!(error = %err, "log collector unavailable; kept local trace only");
                }
            }
        });
    }
}
