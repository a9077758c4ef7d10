use crate::error::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use rand::seq::SliceRandom;
use serde::Deserialize;
use std::net::IpAddr;
use std::time::Duration;
use tracing::debug;

/// City labels reported by [`MockGeolocator`].
pub const MOCK_CITIES: [&str; 8] = [
    "New York, US",
    "London, UK",
    "Tokyo, JP",
    "Sydney, AU",
    "Berlin, DE",
    "Toronto, CA",
    "Mumbai, IN",
    "São Paulo, BR",
];

const IP_API_URL: &str = "http://ip-api.com/json";
const IP_API_TIMEOUT: Duration = Duration::from_secs(3);

/// Produces a coarse location label for a click.
///
/// `None` means the location is not known; the resolver records it as
/// `"unknown"`.
#[async_trait]
pub trait Geolocator: Send + Sync + 'static {
    async fn locate(&self, ip: Option<IpAddr>) -> Option<String>;
}

/// Picks a random city, ignoring the address.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockGeolocator;

#[async_trait]
impl Geolocator for MockGeolocator {
    async fn locate(&self, _ip: Option<IpAddr>) -> Option<String> {
        MOCK_CITIES
            .choose(&mut rand::thread_rng())
            .map(|city| city.to_string())
    }
}

/// Always reports the same label.
#[derive(Debug, Clone)]
pub struct FixedGeolocator(pub String);

impl FixedGeolocator {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }
}

#[async_trait]
impl Geolocator for FixedGeolocator {
    async fn locate(&self, _ip: Option<IpAddr>) -> Option<String> {
        Some(self.0.clone())
    }
}

#[derive(Deserialize)]
struct IpApiResponse {
    status: String,
    country: Option<String>,
    city: Option<String>,
}

impl IpApiResponse {
    fn label(self) -> Option<String> {
        if self.status != "success" {
            return None;
        }
        let country = self.country.filter(|s| !s.is_empty());
        let city = self.city.filter(|s| !s.is_empty());
        match (city, country) {
            (Some(city), Some(country)) => Some(format!("{city}, {country}")),
            (city, country) => city.or(country),
        }
    }
}

/// Looks addresses up on ip-api.com.
///
/// Private and loopback addresses are never sent. Every answer, including
/// a miss, is cached per address for the lifetime of the geolocator.
#[derive(Debug)]
pub struct IpApiGeolocator {
    client: reqwest::Client,
    base_url: String,
    cache: DashMap<IpAddr, Option<String>>,
}

impl IpApiGeolocator {
    pub fn new() -> Result<Self> {
        Self::with_base_url(IP_API_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(IP_API_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            cache: DashMap::new(),
        })
    }

    async fn fetch(&self, ip: IpAddr) -> Option<String> {
        let url = format!("{}/{ip}?fields=status,country,city", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| debug!(ip = %ip, error = %e, "geo lookup failed"))
            .ok()?;

        let body: IpApiResponse = response
            .json()
            .await
            .map_err(|e| debug!(ip = %ip, error = %e, "geo lookup returned unreadable body"))
            .ok()?;

        body.label()
    }
}

#[async_trait]
impl Geolocator for IpApiGeolocator {
    async fn locate(&self, ip: Option<IpAddr>) -> Option<String> {
        let ip = ip.filter(|ip| !is_private(ip))?;

        if let Some(hit) = self.cache.get(&ip) {
            return hit.clone();
        }

        let label = self.fetch(ip).await;
        self.cache.insert(ip, label.clone());
        label
    }
}

/// Addresses that a public geolocation service cannot place.
pub fn is_private(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(addr) => {
            addr.is_private()
                || addr.is_loopback()
                || addr.is_link_local()
                || addr.is_unspecified()
                || addr.is_broadcast()
        }
        IpAddr::V6(addr) => {
            if let Some(v4) = addr.to_ipv4_mapped() {
                return is_private(&IpAddr::V4(v4));
            }
            let first = addr.segments()[0];
            addr.is_loopback()
                || addr.is_unspecified()
                // fe80::/10
                || (first & 0xffc0) == 0xfe80
                // fc00::/7
                || (first & 0xfe00) == 0xfc00
        }
    }
}
