use dnstoys_domain::Config;
use tracing_subscriber::EnvFilter;

/// `RUST_LOG` wins over `logging.level`; noisy HTTP internals are capped at
/// warn either way.
pub fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "{},hyper=warn,hyper_util=warn,reqwest=warn,rustls=warn",
            config.logging.level
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
