use crate::countdown::{Countdown, CountdownHandle};
use crate::geo::{Geolocator, MockGeolocator};
use jiff::Timestamp;
use snaplink_core::validate::is_valid_short_code;
use snaplink_core::{Category, Clock, Level, Telemetry};
use snaplink_shortener::{Registry, ShortenerError};
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, trace};
use typed_builder::TypedBuilder;

/// Source recorded for visits without a referrer.
pub const DIRECT_SOURCE: &str = "direct";
/// Location recorded when geolocation fails or times out.
pub const UNKNOWN_LOCATION: &str = "unknown";

#[derive(Debug, Clone, TypedBuilder)]
pub struct ResolverSettings {
    #[builder(default = Duration::from_secs(3))]
    pub geo_timeout: Duration,
    #[builder(default = 3)]
    pub countdown_secs: u64,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Request details attached to a resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClickContext {
    pub referrer: Option<String>,
    pub client_ip: Option<IpAddr>,
}

impl ClickContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_referrer(mut self, referrer: impl Into<String>) -> Self {
        self.referrer = Some(referrer.into());
        self
    }

    pub fn with_client_ip(mut self, ip: IpAddr) -> Self {
        self.client_ip = Some(ip);
        self
    }

    /// The referrer, or [`DIRECT_SOURCE`] when it is absent or blank.
    pub fn source(&self) -> String {
        self.referrer
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .unwrap_or(DIRECT_SOURCE)
            .to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Redirect { url: String, click_count: u64 },
    NotFound,
    Expired { expires_at: Timestamp },
}

impl Resolution {
    /// Text shown to a visitor who cannot be redirected.
    pub fn message(&self) -> Option<String> {
        match self {
            Resolution::Redirect { .. } => None,
            Resolution::NotFound => {
                Some("This short URL does not exist or has been removed.".to_string())
            }
            Resolution::Expired { expires_at } => Some(format!(
                "This short URL expired at {}.",
                expires_at.strftime("%Y-%m-%d %H:%M:%S UTC")
            )),
        }
    }
}

/// Turns short codes into redirect decisions and records the clicks.
pub struct Resolver {
    registry: Arc<Registry>,
    geolocator: Arc<dyn Geolocator>,
    clock: Arc<dyn Clock>,
    telemetry: Arc<dyn Telemetry>,
    settings: ResolverSettings,
}

impl Resolver {
    /// Creates a resolver sharing the registry's clock and telemetry, with
    /// [`MockGeolocator`] and default settings.
    pub fn new(registry: Arc<Registry>) -> Self {
        Self {
            clock: registry.clock(),
            telemetry: registry.telemetry(),
            registry,
            geolocator: Arc::new(MockGeolocator),
            settings: ResolverSettings::default(),
        }
    }

    pub fn with_geolocator(mut self, geolocator: Arc<dyn Geolocator>) -> Self {
        self.geolocator = geolocator;
        self
    }

    pub fn with_settings(mut self, settings: ResolverSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &ResolverSettings {
        &self.settings
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Starts the auto-navigate countdown shown before a redirect.
    pub fn countdown(&self) -> CountdownHandle {
        Countdown::start(self.settings.countdown_secs)
    }

    /// Resolves `code`, recording a click when it redirects.
    ///
    /// Only a live record produces [`Resolution::Redirect`], and the reported
    /// click count is the one stored. Problems with the geolocator or the
    /// store never turn a live record into anything else.
    pub async fn resolve(&self, code: &str, ctx: ClickContext) -> Resolution {
        trace!(code = %code, "resolving short code");
        self.emit(
            Level::Info,
            Category::Handler,
            &format!("Handling redirect for shortCode: {code}"),
        );

        if !is_valid_short_code(code) {
            debug!(code = %code, "malformed short code");
            self.emit(
                Level::Warn,
                Category::Handler,
                &format!("Short URL not found: {code}"),
            );
            return Resolution::NotFound;
        }

        let Some(record) = self.registry.find_by_code(code).await else {
            debug!(code = %code, "short code not found");
            self.emit(
                Level::Warn,
                Category::Handler,
                &format!("Short URL not found: {code}"),
            );
            return Resolution::NotFound;
        };

        if record.is_expired(self.clock.now()) {
            return self.expired(code, record.expires_at);
        }

        let location = self.locate(ctx.client_ip).await;
        // expiry is checked again when the click is stamped, after geolocation
        let clicked = match self
            .registry
            .record_click(&record.id, ctx.source(), location)
            .await
        {
            Ok(clicked) => clicked,
            Err(ShortenerError::Expired { expires_at, .. }) => {
                return self.expired(code, expires_at);
            }
            Err(e) => {
                error!(code = %code, error = %e, "failed to record click");
                self.emit(
                    Level::Error,
                    Category::Handler,
                    &format!("Failed to record click for {code}: {e}"),
                );
                return Resolution::NotFound;
            }
        };

        debug!(code = %code, url = %clicked.original_url, clicks = clicked.click_count, "resolved short code");
        self.emit(
            Level::Info,
            Category::Handler,
            &format!(
                "Recorded click for {code}, total clicks: {}",
                clicked.click_count
            ),
        );

        Resolution::Redirect {
            url: clicked.original_url,
            click_count: clicked.click_count,
        }
    }

    fn expired(&self, code: &str, expires_at: Timestamp) -> Resolution {
        debug!(code = %code, expires_at = %expires_at, "short code expired");
        self.emit(
            Level::Warn,
            Category::Handler,
            &format!("Short URL expired: {code} (expired at {expires_at})"),
        );
        Resolution::Expired { expires_at }
    }

    async fn locate(&self, ip: Option<IpAddr>) -> String {
        match tokio::time::timeout(self.settings.geo_timeout, self.geolocator.locate(ip)).await {
            Ok(Some(location)) => location,
            Ok(None) => UNKNOWN_LOCATION.to_string(),
            Err(_) => {
                debug!(ip = ?ip, "geolocation timed out");
                UNKNOWN_LOCATION.to_string()
            }
        }
    }

    fn emit(&self, level: Level, category: Category, message: &str) {
        self.telemetry
            .emit(&self.registry.settings().stack, level, category, message);
    }
}
