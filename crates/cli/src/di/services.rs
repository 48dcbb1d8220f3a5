use anyhow::Context;
use dnstoys_application::ports::{Clock, GeoResolver, SystemClock, ToyHandler};
use dnstoys_application::services::RateTableStore;
use dnstoys_application::use_cases::{
    FxHandler, HelpHandler, MyIpHandler, RefreshRatesUseCase, TimeHandler, WeatherHandler,
    ZoneRouter,
};
use dnstoys_domain::config::required;
use dnstoys_domain::{Config, ServiceKind};
use dnstoys_infrastructure::geo::{load_geo_file, GeoIndex};
use dnstoys_infrastructure::upstream::{
    CachedWeatherProvider, MetNorwayClient, OpenExchangeRatesClient,
};
use dnstoys_jobs::FxRefreshJob;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Handlers for the enabled services, wired into the zone router.
pub struct ToyServices {
    pub router: Arc<ZoneRouter>,
    pub fx_refresh: Option<FxRefreshJob>,
}

impl ToyServices {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let enabled = config.enabled_services();
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let geo = if config.needs_geo() {
            Some(load_geo_index(config)?)
        } else {
            None
        };

        let help = Arc::new(HelpHandler::new(&enabled, &config.server.domain));
        let mut router = ZoneRouter::new(help);
        let mut fx_refresh = None;

        for kind in &enabled {
            let handler: Arc<dyn ToyHandler> = match kind {
                ServiceKind::Time => Arc::new(TimeHandler::new(
                    require_geo(&geo, *kind)?,
                    Arc::clone(&clock),
                )),
                ServiceKind::Fx => {
                    let (handler, job) = build_fx(config)?;
                    fx_refresh = Some(job);
                    Arc::new(handler)
                }
                ServiceKind::MyIp => Arc::new(MyIpHandler),
                ServiceKind::Weather => Arc::new(build_weather(
                    config,
                    require_geo(&geo, *kind)?,
                    Arc::clone(&clock),
                )?),
            };
            router.register_service(*kind, handler);
        }

        info!(zones = ?router.zones(), "Services ready");

        Ok(Self {
            router: Arc::new(router),
            fx_refresh,
        })
    }
}

fn load_geo_index(config: &Config) -> anyhow::Result<Arc<dyn GeoResolver>> {
    let path = config
        .timezones
        .geo_filepath
        .as_deref()
        .context("timezones.geo_filepath is required for time and weather")?;
    let locations = load_geo_file(Path::new(path))?;
    let index = GeoIndex::new(locations);
    info!(locations = index.count(), "Geo index ready");
    Ok(Arc::new(index))
}

fn require_geo(
    geo: &Option<Arc<dyn GeoResolver>>,
    kind: ServiceKind,
) -> anyhow::Result<Arc<dyn GeoResolver>> {
    geo.clone()
        .with_context(|| format!("{} service needs the geo dataset", kind))
}

fn build_fx(config: &Config) -> anyhow::Result<(FxHandler, FxRefreshJob)> {
    let api_key = config
        .fx
        .api_key
        .as_deref()
        .context("fx.api_key is required when fx is enabled")?;

    let store = Arc::new(RateTableStore::new());
    let source = OpenExchangeRatesClient::new(
        api_key,
        &config.server.domain,
        Duration::from_secs(config.fx.request_timeout),
    )?;
    let refresh = Arc::new(RefreshRatesUseCase::new(Arc::new(source), Arc::clone(&store)));
    let refresh_interval = required(config.fx.refresh_interval, "fx.refresh_interval")?;
    let job = FxRefreshJob::new(refresh).with_interval(Duration::from_secs(refresh_interval));

    Ok((FxHandler::new(store), job))
}

fn build_weather(
    config: &Config,
    geo: Arc<dyn GeoResolver>,
    clock: Arc<dyn Clock>,
) -> anyhow::Result<WeatherHandler> {
    let timeout = Duration::from_secs(config.weather.request_timeout);
    let source = MetNorwayClient::new(&config.server.domain, timeout)?;
    let provider = CachedWeatherProvider::new(
        Arc::new(source),
        required(config.weather.max_entries, "weather.max_entries")?,
        Duration::from_secs(required(config.weather.cache_ttl, "weather.cache_ttl")?),
        timeout,
    );

    Ok(WeatherHandler::new(
        geo,
        Arc::new(provider),
        clock,
        config.weather.forecast_entries,
    ))
}
