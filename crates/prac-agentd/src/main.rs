mod local;
mod settings;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use envconfig::Envconfig;
use tokio_util::sync::CancellationToken;
use tracing::info;

use prac_api::{HttpApi, PracApiAdapter};
use prac_core::memory::{MemoryDns, MemoryFleet, MemoryParameters, MemoryQueue};
use prac_core::{
    HostnameResolver, LifecycleController, PracConfig, QueryProbe, StatusAggregator, SystemClock,
    run_worker,
};
use prac_observe::{LoggerConfig, LoggerFormat, LoggerLevel, init_logger};
use prac_version::{SteamVersionSource, VersionChecker, VersionConfig};

use crate::settings::AgentSettings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1) Settings
    let settings = AgentSettings::init_from_env().context("reading agent settings")?;

    // 2) Logger
    let format: LoggerFormat = settings.log_format.parse()?;
    let level: LoggerLevel = settings.log_level.parse()?;
    init_logger(&LoggerConfig::new(format, level))?;
    info!("logger initialized");

    // 3) Server configuration
    let config = PracConfig::from_env().context("reading server configuration")?;
    info!(
        cluster = %config.fleet.cluster,
        task_definition = %config.fleet.task_definition,
        hostname_binding = config.hostname.is_some(),
        "configuration loaded"
    );

    // 4) Collaborators
    let fleet = MemoryFleet::new();
    let dns = MemoryDns::new();
    let queue = MemoryQueue::new(
        config
            .hostname
            .as_ref()
            .map(|h| h.queue.clone())
            .unwrap_or_else(|| "get-hostname".to_string()),
    );
    let params = match &settings.local_server_version {
        Some(version) => MemoryParameters::with(&config.version.parameter, version),
        None => MemoryParameters::new(),
    };
    let clock = Arc::new(SystemClock);

    // 5) Components
    let lifecycle = LifecycleController::new(
        config.fleet.clone(),
        config.hostname.clone(),
        Arc::new(fleet.clone()),
        Arc::new(dns.clone()),
        Arc::new(queue.clone()),
        clock.clone(),
    );
    let status = StatusAggregator::new(
        config.fleet.clone(),
        config.hostname.clone(),
        Arc::new(fleet.clone()),
        Arc::new(dns.clone()),
        Arc::new(QueryProbe::udp(config.probe)),
    );
    let resolver = config.hostname.clone().map(|hostname| {
        Arc::new(HostnameResolver::new(
            config.fleet.clone(),
            hostname,
            Arc::new(fleet.clone()),
            Arc::new(dns.clone()),
            Arc::new(queue.clone()),
            clock.clone(),
        ))
    });
    let version_config = VersionConfig::from(&config.version);
    let version = VersionChecker::new(
        version_config.clone(),
        Arc::new(params),
        Arc::new(SteamVersionSource::new(version_config)?),
        lifecycle.clone(),
    );

    // 6) Background loops
    let cancel = CancellationToken::new();
    let mut background = Vec::new();

    if let Some(resolver) = &resolver {
        let delay = resolver.config().redelivery_delay;
        background.push(tokio::spawn(run_worker(
            Arc::new(queue.clone()),
            Arc::clone(resolver),
            delay,
            cancel.child_token(),
        )));
    }

    if let Some(address) = settings.local_task_address {
        background.push(tokio::spawn(local::run_provisioner(
            fleet.clone(),
            address,
            Duration::from_millis(settings.local_attach_delay_ms),
            cancel.child_token(),
        )));
    }

    // 7) HTTP API
    let adapter = PracApiAdapter::new(lifecycle, Arc::new(status), resolver, Arc::new(version));
    let router = HttpApi::new(Arc::new(adapter)).router();

    let addr = format!("0.0.0.0:{}", settings.http_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, "http api listening");
    info!("press Ctrl+C to stop");

    let shutdown = cancel.clone();
    prac_api::axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutting down...");
            shutdown.cancel();
        })
        .await?;

    cancel.cancel();
    for task in background {
        let _ = task.await;
    }

    Ok(())
}
