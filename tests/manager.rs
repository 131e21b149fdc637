// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device manager tests using simulated purifiers.

use std::time::Duration;

use purifier_link::event::DeviceEvent;
use purifier_link::manager::DeviceManager;
use purifier_link::protocol::{AttributeId, LinkCall, SimulatedLink};
use purifier_link::{Availability, DeviceConfig, Error, Mode, PollError, PollInterval, StateChange};
use tokio::sync::broadcast::Receiver;
use tokio::time::sleep;

fn config(name: &str) -> DeviceConfig {
    DeviceConfig::new()
        .with_friendly_name(name)
        .with_poll_interval(PollInterval::new(10).unwrap())
}

fn drain(events: &mut Receiver<DeviceEvent>) -> Vec<DeviceEvent> {
    std::iter::from_fn(|| events.try_recv().ok()).collect()
}

#[tokio::test(start_paused = true)]
async fn added_device_is_polled_in_background() {
    let manager = DeviceManager::new();
    let mut events = manager.subscribe();
    let link = SimulatedLink::new(true, Mode::Silent);

    let id = manager.add_device(config("bedroom"), link.clone()).await.unwrap();

    assert_eq!(drain(&mut events), vec![DeviceEvent::DeviceAdded { device_id: id }]);
    assert_eq!(manager.device_ids().await, vec![id]);
    assert_eq!(
        manager.state(id).await.unwrap().and_then(|s| s.mode()),
        Some(Mode::Silent)
    );

    sleep(Duration::from_secs(25)).await;
    assert_eq!(link.count(LinkCall::Read(AttributeId::Power)), 3);

    manager.shutdown_all().await;
}

#[tokio::test(start_paused = true)]
async fn device_without_first_data_is_not_ready() {
    let manager = DeviceManager::new();
    let mut events = manager.subscribe();
    let link = SimulatedLink::new(true, Mode::Auto);
    link.fail_always(LinkCall::Connect);

    let err = manager.add_device(config("garage"), link.clone()).await.unwrap_err();

    assert!(matches!(err, Error::NotReady(PollError::NoDataYet)));
    assert_eq!(manager.device_count().await, 0);
    assert!(drain(&mut events).is_empty());

    sleep(Duration::from_secs(60)).await;
    assert_eq!(link.count(LinkCall::Connect), 3);
}

#[tokio::test(start_paused = true)]
async fn peer_side_changes_become_events() {
    let manager = DeviceManager::new();
    let link = SimulatedLink::new(false, Mode::Auto);
    let id = manager.add_device(config("office"), link.clone()).await.unwrap();
    let mut events = manager.subscribe();

    link.set_power_raw(0x01);
    sleep(Duration::from_secs(11)).await;

    let events = drain(&mut events);
    assert_eq!(events.len(), 1);
    match &events[0] {
        DeviceEvent::StateChanged {
            device_id,
            change,
            new_state,
        } => {
            assert_eq!(*device_id, id);
            assert_eq!(*change, StateChange::Power(true));
            assert!(new_state.power());
            assert_eq!(new_state.mode(), Some(Mode::Auto));
        }
        other => panic!("unexpected event: {other:?}"),
    }

    manager.shutdown_all().await;
}

#[tokio::test(start_paused = true)]
async fn persistent_outage_is_reported_once() {
    let manager = DeviceManager::new();
    let link = SimulatedLink::new(true, Mode::Auto);
    let id = manager.add_device(config("hall"), link.clone()).await.unwrap();
    let mut events = manager.subscribe();

    link.fail_always(LinkCall::Connect);
    link.drop_connection();

    // Four failed ticks are masked.
    sleep(Duration::from_secs(45)).await;
    assert!(drain(&mut events).is_empty());
    assert_eq!(manager.state(id).await.unwrap().map(|s| s.power()), Some(true));

    sleep(Duration::from_secs(30)).await;
    assert_eq!(
        drain(&mut events),
        vec![DeviceEvent::AvailabilityChanged {
            device_id: id,
            availability: Availability::Unavailable,
        }]
    );

    link.recover();
    sleep(Duration::from_secs(10)).await;
    assert_eq!(
        drain(&mut events),
        vec![DeviceEvent::AvailabilityChanged {
            device_id: id,
            availability: Availability::Available,
        }]
    );

    manager.shutdown_all().await;
}

#[tokio::test(start_paused = true)]
async fn remove_device_disconnects_and_announces() {
    let manager = DeviceManager::new();
    let link = SimulatedLink::new(true, Mode::Auto);
    let id = manager.add_device(config("study"), link.clone()).await.unwrap();
    let coordinator = manager.coordinator(id).await.unwrap();
    let mut events = manager.subscribe();

    assert!(manager.remove_device(id).await);
    assert!(!manager.remove_device(id).await);

    assert_eq!(drain(&mut events), vec![DeviceEvent::DeviceRemoved { device_id: id }]);
    assert!(coordinator.is_shut_down());
    assert_eq!(link.calls().last(), Some(&LinkCall::Disconnect));
    assert!(matches!(manager.set_power(id, false).await, Err(Error::DeviceNotFound)));
}

#[tokio::test(start_paused = true)]
async fn shutdown_all_removes_every_device() {
    let manager = DeviceManager::with_capacity(8);
    let first = SimulatedLink::new(true, Mode::Auto);
    let second = SimulatedLink::new(false, Mode::Strong);
    manager.add_device(config("one"), first.clone()).await.unwrap();
    manager.add_device(config("two"), second.clone()).await.unwrap();
    let mut events = manager.subscribe();

    manager.shutdown_all().await;

    assert_eq!(manager.device_count().await, 0);
    let removed = drain(&mut events)
        .iter()
        .filter(|event| matches!(event, DeviceEvent::DeviceRemoved { .. }))
        .count();
    assert_eq!(removed, 2);
    assert_eq!(first.count(LinkCall::Disconnect), 1);
    assert_eq!(second.count(LinkCall::Disconnect), 1);
}

#[tokio::test(start_paused = true)]
async fn commands_are_routed_by_id() {
    let manager = DeviceManager::new();
    let first = SimulatedLink::new(false, Mode::Auto);
    let second = SimulatedLink::new(false, Mode::Auto);
    let first_id = manager.add_device(config("one"), first.clone()).await.unwrap();
    manager.add_device(config("two"), second.clone()).await.unwrap();

    manager.set_mode(first_id, Mode::Standard).await.unwrap();
    let refreshed = manager.refresh(first_id).await.unwrap();

    assert_eq!(refreshed.mode(), Some(Mode::Standard));
    assert_eq!(
        first.writes(),
        vec![(AttributeId::Mode, vec![0x02, 0x00, 0x0F, 0x18])]
    );
    assert!(second.writes().is_empty());

    manager.shutdown_all().await;
}
