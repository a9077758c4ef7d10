use clap::{Parser, Subcommand, ValueEnum};
use snaplink_shortener::{StatsFilter, StatsSort};
use snaplink_telemetry::LogFormat;
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;
use std::path::PathBuf;

pub const LISTEN_ADDR_ENV: &str = "SNAPLINK_LISTEN_ADDR";
pub const BASE_URL_ENV: &str = "SNAPLINK_BASE_URL";
pub const STORE_ENV: &str = "SNAPLINK_STORE";
pub const STORE_PATH_ENV: &str = "SNAPLINK_STORE_PATH";
pub const GEOLOCATION_ENV: &str = "SNAPLINK_GEOLOCATION";
pub const TELEMETRY_ENDPOINT_ENV: &str = "SNAPLINK_TELEMETRY_ENDPOINT";
pub const TELEMETRY_TOKEN_ENV: &str = "SNAPLINK_TELEMETRY_TOKEN";
pub const LOG_FORMAT_ENV: &str = "SNAPLINK_LOG_FORMAT";

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080";
pub const DEFAULT_STORE_PATH: &str = "snaplink.json";
pub const DEFAULT_LOG_FORMAT: &str = "pretty";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StoreArg {
    #[value(name = "memory")]
    Memory,
    #[value(name = "json")]
    Json,
}

impl Display for StoreArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreArg::Memory => write!(f, "memory"),
            StoreArg::Json => write!(f, "json"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GeolocationArg {
    #[value(name = "mock")]
    Mock,
    #[value(name = "ip-api")]
    IpApi,
}

impl Display for GeolocationArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            GeolocationArg::Mock => write!(f, "mock"),
            GeolocationArg::IpApi => write!(f, "ip-api"),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "snaplink", about = "Shorten URLs with a limited validity window")]
pub struct CLI {
    #[arg(long, global = true, env = LISTEN_ADDR_ENV, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,

    #[arg(long, global = true, env = BASE_URL_ENV, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    #[arg(
        long,
        global = true,
        env = STORE_ENV,
        value_enum,
        default_value_t = StoreArg::Json
    )]
    pub store: StoreArg,

    #[arg(long, global = true, env = STORE_PATH_ENV, default_value = DEFAULT_STORE_PATH)]
    pub store_path: PathBuf,

    #[arg(
        long,
        global = true,
        env = GEOLOCATION_ENV,
        value_enum,
        default_value_t = GeolocationArg::Mock
    )]
    pub geolocation: GeolocationArg,

    /// Log collector base URL; events are only traced locally when unset.
    #[arg(long, global = true, env = TELEMETRY_ENDPOINT_ENV)]
    pub telemetry_endpoint: Option<String>,

    #[arg(long, global = true, env = TELEMETRY_TOKEN_ENV, requires = "telemetry_endpoint")]
    pub telemetry_token: Option<String>,

    #[arg(long, global = true, env = LOG_FORMAT_ENV, default_value = DEFAULT_LOG_FORMAT)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP gateway.
    Serve,
    /// Shorten one or more URLs.
    Shorten {
        #[arg(required = true, num_args = 1..=5)]
        urls: Vec<String>,
        /// Validity window in minutes.
        #[arg(long)]
        validity: Option<i64>,
        /// Custom short code; only allowed with a single URL.
        #[arg(long)]
        code: Option<String>,
    },
    /// Resolve a short code and count down to the redirect.
    Open {
        code: String,
        #[arg(long)]
        referrer: Option<String>,
    },
    /// Print click statistics.
    Stats {
        #[arg(long, default_value = "created")]
        sort: StatsSort,
        #[arg(long, default_value = "all")]
        filter: StatsFilter,
    },
}
