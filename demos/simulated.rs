// SPDX-License-Identifier: MPL-2.0

//! Simulated purifier walkthrough.
//!
//! Runs a coordinator against an in-memory purifier, injects a short and a
//! long outage, and prints what subscribers see.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example simulated
//!
//! # Show every link attempt
//! RUST_LOG=purifier_link=debug cargo run --example simulated
//! ```

use std::time::Duration;

use purifier_link::protocol::{LinkCall, SimulatedLink};
use purifier_link::subscription::Subscribable;
use purifier_link::types::Mode;
use purifier_link::{Coordinator, DeviceConfig, PollInterval, RetryPolicy};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("purifier_link=info")),
        )
        .init();

    let link = SimulatedLink::new(false, Mode::Auto);
    let peer = link.clone();

    // Short delays so the demo finishes in seconds.
    let policy = RetryPolicy::new().with_retry_delay(Duration::from_millis(200));
    let config = DeviceConfig::new()
        .with_friendly_name("Demo purifier")
        .with_poll_interval(PollInterval::MIN)
        .with_retry_policy(policy);
    let coordinator = Coordinator::new(link, config);

    coordinator.on_state_changed(|state| {
        println!("  state: power={} mode={}", state.power(), state.mode_name());
    });
    coordinator.on_availability_changed(|availability| {
        println!("  availability: {availability}");
    });

    println!("Initial refresh");
    coordinator.first_refresh().await?;

    println!("Turning on in Silent mode");
    coordinator.set_power(true).await?;
    coordinator.set_mode_by_name("Silent").await?;

    println!("Short outage: two failed reads are retried within one cycle");
    peer.fail_next(LinkCall::Connect, 2);
    peer.drop_connection();
    coordinator.refresh().await?;

    println!("Long outage: cached state is served until the threshold");
    peer.fail_always(LinkCall::Connect);
    peer.drop_connection();
    for cycle in 1..=5 {
        match coordinator.refresh().await {
            Ok(state) => println!("  cycle {cycle}: cached {}", state.mode_name()),
            Err(err) => println!("  cycle {cycle}: {err}"),
        }
    }

    println!("Peer back, polling in the background");
    peer.recover();
    coordinator.spawn_poller();
    tokio::time::sleep(PollInterval::MIN.as_duration() + Duration::from_secs(1)).await;

    let diagnostics = coordinator.diagnostics();
    println!(
        "Diagnostics: availability={} failures={} interval={}",
        diagnostics.availability, diagnostics.consecutive_failures, diagnostics.poll_interval
    );

    coordinator.shutdown().await;
    Ok(())
}
