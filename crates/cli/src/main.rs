use anyhow::Context;
use clap::Parser;
use dnstoys_domain::CliOverrides;
use dnstoys_jobs::JobRunner;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

mod bootstrap;
mod di;
mod server;

#[derive(Parser)]
#[command(name = "dnstoys")]
#[command(version)]
#[command(about = "dnstoys - useful little services over DNS")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// UDP listen address, e.g. 0.0.0.0:53
    #[arg(short = 'a', long)]
    address: Option<String>,

    /// Server domain used in help examples and as the weather User-Agent
    #[arg(short = 'd', long)]
    domain: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        address: cli.address,
        domain: cli.domain,
        log_level: cli.log_level,
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;
    bootstrap::init_logging(&config);

    info!("Starting dnstoys v{}", env!("CARGO_PKG_VERSION"));

    let services = di::ToyServices::new(&config)?;
    let dns = di::DnsServices::new(&config, &services)?;

    let shutdown = CancellationToken::new();

    let mut jobs = JobRunner::new().with_shutdown_token(shutdown.clone());
    if let Some(fx_refresh) = services.fx_refresh {
        jobs = jobs.with_fx_refresh(fx_refresh);
    }
    let job_handles = jobs.start();

    let server_shutdown = shutdown.clone();
    let address = config
        .server
        .address
        .clone()
        .context("server.address is required")?;
    let server = tokio::spawn(async move {
        let result = server::start_dns_server(
            address,
            dns.handler,
            server::worker_count(),
            server_shutdown.clone(),
        )
        .await;
        // a server that cannot run takes the whole process down
        server_shutdown.cancel();
        result
    });

    tokio::select! {
        result = tokio::signal::ctrl_c() => match result {
            Ok(()) => info!("Received Ctrl-C, shutting down"),
            Err(e) => {
                error!(error = %e, "Failed to listen for Ctrl-C");
                shutdown.cancelled().await;
            }
        },
        _ = shutdown.cancelled() => {}
    }
    shutdown.cancel();

    let server_result = match server.await {
        Ok(result) => result,
        Err(e) => Err(e.into()),
    };
    for handle in job_handles {
        let _ = handle.await;
    }
    if let Err(e) = server_result {
        error!(error = %e, "DNS server stopped with an error");
        return Err(e);
    }

    info!("Server shutdown complete");
    Ok(())
}
