mod cli;

use crate::cli::{Command, GeolocationArg, StoreArg, CLI};
use anyhow::{bail, Context};
use clap::Parser;
use snaplink_core::{Clock, CreateRequest, RecordStore, Telemetry};
use snaplink_gateway::{App, AppState};
use snaplink_redirector::{
    ClickContext, CountdownOutcome, Geolocator, IpApiGeolocator, MockGeolocator, Resolution,
    Resolver,
};
use snaplink_shortener::{Registry, StatsFilter, StatsQuery, StatsSort};
use snaplink_storage::{InMemoryStore, JsonFileStore};
use snaplink_telemetry::{init_tracing, RemoteSettings, RemoteTelemetry, TracingTelemetry};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CLI::parse();
    init_tracing(config.log_format)?;

    info!(
        store = %config.store,
        geolocation = %config.geolocation,
        remote_telemetry = config.telemetry_endpoint.is_some(),
        "starting snaplink"
    );

    let registry = Arc::new(
        Registry::builder(build_store(&config))
            .telemetry(build_telemetry(&config)?)
            .open()
            .await,
    );
    let resolver =
        Arc::new(Resolver::new(registry.clone()).with_geolocator(build_geolocator(&config)?));

    match config.command {
        Command::Serve => serve(config.listen_addr, resolver, config.base_url).await,
        Command::Shorten {
            urls,
            validity,
            code,
        } => shorten(&registry, &config.base_url, urls, validity, code).await,
        Command::Open { code, referrer } => open(&resolver, &code, referrer).await,
        Command::Stats { sort, filter } => stats(&registry, sort, filter).await,
    }
}

fn build_store(config: &CLI) -> Arc<dyn RecordStore> {
    match config.store {
        StoreArg::Memory => Arc::new(InMemoryStore::new()),
        StoreArg::Json => Arc::new(JsonFileStore::new(config.store_path.clone())),
    }
}

fn build_telemetry(config: &CLI) -> anyhow::Result<Arc<dyn Telemetry>> {
    let Some(endpoint) = &config.telemetry_endpoint else {
        return Ok(Arc::new(TracingTelemetry));
    };

    let settings = match &config.telemetry_token {
        Some(token) => RemoteSettings::builder()
            .endpoint(endpoint)
            .bearer_token(token)
            .build(),
        None => RemoteSettings::builder().endpoint(endpoint).build(),
    };
    let telemetry = RemoteTelemetry::new(settings).context("failed to build telemetry client")?;
    Ok(Arc::new(telemetry))
}

fn build_geolocator(config: &CLI) -> anyhow::Result<Arc<dyn Geolocator>> {
    Ok(match config.geolocation {
        GeolocationArg::Mock => Arc::new(MockGeolocator),
        GeolocationArg::IpApi => {
            Arc::new(IpApiGeolocator::new().context("failed to build geolocation client")?)
        }
    })
}

async fn serve(
    listen_addr: SocketAddr,
    resolver: Arc<Resolver>,
    base_url: String,
) -> anyhow::Result<()> {
    let app = App::router(AppState::new(resolver, base_url));

    let listener = tokio::net::TcpListener::bind(listen_addr).await?;
    info!(listen_addr = %listener.local_addr()?, "starting gateway server");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}

async fn shorten(
    registry: &Registry,
    base_url: &str,
    urls: Vec<String>,
    validity: Option<i64>,
    code: Option<String>,
) -> anyhow::Result<()> {
    if code.is_some() && urls.len() > 1 {
        bail!("--code can only be used with a single URL");
    }

    let requests = urls
        .into_iter()
        .map(|url| {
            let mut request = CreateRequest::new(url);
            request.validity_minutes = validity;
            request.custom_short_code = code.clone();
            request
        })
        .collect();

    let created = registry.create(requests).await?;
    for record in created {
        println!(
            "{}  ->  {}  (expires {})",
            record.short_code.to_url(base_url),
            record.original_url,
            record.expires_at
        );
    }
    Ok(())
}

async fn open(resolver: &Resolver, code: &str, referrer: Option<String>) -> anyhow::Result<()> {
    let mut ctx = ClickContext::new();
    if let Some(referrer) = referrer {
        ctx = ctx.with_referrer(referrer);
    }

    let url = match resolver.resolve(code, ctx).await {
        Resolution::Redirect { url, click_count } => {
            println!("{url} (click #{click_count})");
            url
        }
        other => bail!(other.message().unwrap_or_default()),
    };

    let mut countdown = resolver.countdown();
    let mut remaining = countdown.remaining();
    let ticker = tokio::spawn(async move {
        while remaining.changed().await.is_ok() {
            let left = *remaining.borrow();
            if left > 0 {
                println!("redirecting in {left}s...");
            }
        }
    });

    let outcome = tokio::select! {
        outcome = countdown.finished() => Some(outcome),
        _ = tokio::signal::ctrl_c() => None,
    };
    let outcome = match outcome {
        Some(outcome) => outcome,
        None => {
            countdown.cancel();
            countdown.finished().await
        }
    };
    ticker.abort();

    match outcome {
        CountdownOutcome::Elapsed => println!("{url}"),
        CountdownOutcome::Cancelled => println!("redirect cancelled"),
    }
    Ok(())
}

async fn stats(registry: &Registry, sort: StatsSort, filter: StatsFilter) -> anyhow::Result<()> {
    let summary = registry.summary().await;
    println!(
        "{} urls ({} active, {} expired), {} clicks",
        summary.total_urls, summary.active_urls, summary.expired_urls, summary.total_clicks
    );

    let now = registry.clock().now();
    for record in registry.list(StatsQuery::new(filter, sort)).await {
        let status = if record.is_expired(now) {
            "expired"
        } else {
            "active"
        };
        println!(
            "{:<20} {:>6} {:<8} {}",
            record.short_code.as_str(),
            record.click_count,
            status,
            record.original_url
        );
    }
    Ok(())
}
