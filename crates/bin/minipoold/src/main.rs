//! `minipoold` entry point.
//!
//! Loads the configuration, builds the pool, runs one acquisition cycle on
//! the virtual hardware and reports every group's state before and after.

use std::sync::Arc;

use anyhow::Context;
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::EnvFilter;

use minipool_app::event_bus::InProcessEventBus;
use minipool_app::ports::Element;
use minipool_domain::id::ListenerId;
use minipoold::config::Config;
use minipoold::pool::Pool;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    let pool = Pool::build(&config).context("failed to build pool")?;

    // Event bus
    let bus = Arc::new(InProcessEventBus::new(256));
    let mut events = bus.subscribe();
    for entry in pool.groups() {
        entry.group.subscribe(ListenerId::new(), bus.clone());
    }
    drop(bus);

    let reporter = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => tracing::info!(
                    source = %event.source,
                    event_type = ?event.event_type,
                    value = %event.value,
                    "element changed"
                ),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "event reporter lagged");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    report(&pool);

    for (position, motor) in (1_u32..).zip(pool.motors()) {
        if let Err(err) = motor.move_to(f64::from(position)) {
            tracing::warn!(error = %err, "motion refused");
        }
    }
    for counter in pool.counters() {
        if let Err(err) = counter.start() {
            tracing::warn!(error = %err, "acquisition refused");
        }
    }
    report(&pool);

    for motor in pool.motors() {
        motor.stop();
    }
    for counter in pool.counters() {
        counter.stop();
    }
    report(&pool);

    // Dropping the groups releases the last handles on the bus.
    drop(pool);
    reporter.await.context("event reporter panicked")?;
    Ok(())
}

fn report(pool: &Pool) {
    for entry in pool.groups() {
        let name = &entry.group.info().name;
        match entry.group.aggregate_state() {
            Ok(aggregation) => {
                tracing::info!(group = %name, state = %aggregation.state, "group state");
                for line in &aggregation.status {
                    tracing::info!(group = %name, "{line}");
                }
            }
            Err(err) => tracing::error!(group = %name, error = %err, "state inspection failed"),
        }
    }
}
