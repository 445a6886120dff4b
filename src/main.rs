//! The `edgerelay` daemon: wires the spool, the dispatch loops, the periodic
//! tasks and the two inbound listeners together and runs until interrupted.

use edgerelay::config::load_config;
use edgerelay::delivery::DeliveryAttempter;
use edgerelay::ingest::{IngestSink, run_http_listener, run_udp_listener};
use edgerelay::pipeline::{
    DeliveryCounters, reconcile_on_startup, run_counter_reporter, run_deliverer, run_promoter,
    run_retry_sweeper,
};
use edgerelay::spool::SpoolStore;
use edgerelay::utils::logging;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    if let Err(e) = run().await {
        // The subscriber may not be up yet if configuration loading failed.
        eprintln!("relay failed: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    logging::init(&config.log.level);

    info!("Starting: {}", config.device.name);
    info!("HTTP on {}", config.server.http_port);
    info!("UDP on {}", config.server.udp_port);
    info!("Spool directory: {}", config.spool.directory);
    match &config.delivery.gateway_url {
        Some(url) => info!("Gateway: {url}"),
        None => info!("Gateway: disabled"),
    }
    match &config.delivery.mqtt_host {
        Some(host) => info!("MQTT broker: {host}:{}", config.delivery.mqtt_port),
        None => info!("MQTT broker: disabled"),
    }

    let store = SpoolStore::open(&config.spool.directory)?;
    reconcile_on_startup(&store);

    let attempter = Arc::new(DeliveryAttempter::from_settings(
        &config.delivery,
        &config.device.name,
    )?);
    if attempter.transport_count() == 0 {
        warn!("no outbound transports configured; records will be marked done without forwarding");
    }

    let counters = Arc::new(DeliveryCounters::default());
    let (arrival_tx, arrival_rx) = mpsc::unbounded_channel();
    let (inflight_tx, inflight_rx) = mpsc::unbounded_channel();
    let sink = IngestSink::new(store.clone(), arrival_tx);

    tokio::spawn(run_promoter(store.clone(), arrival_rx, inflight_tx.clone()));
    tokio::spawn(run_deliverer(
        store.clone(),
        inflight_rx,
        attempter,
        counters.clone(),
    ));
    tokio::spawn(run_retry_sweeper(
        store.clone(),
        inflight_tx,
        Duration::from_secs(config.schedule.sweep_interval_secs),
    ));
    tokio::spawn(run_counter_reporter(
        sink.clone(),
        counters,
        config.device.name.clone(),
        Duration::from_secs(config.schedule.report_interval_secs),
    ));

    let http_addr = format!("{}:{}", config.server.host, config.server.http_port);
    let udp_addr = format!("{}:{}", config.server.host, config.server.udp_port);

    tokio::select! {
        result = run_http_listener(http_addr, sink.clone()) => {
            error!("HTTP listener exited unexpectedly: {result:?}");
        }
        result = run_udp_listener(udp_addr, sink) => {
            error!("UDP listener exited unexpectedly: {result:?}");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received. Exiting gracefully.");
        }
    }

    Ok(())
}
