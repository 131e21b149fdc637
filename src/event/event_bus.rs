// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Broadcast channel for device events.

use tokio::sync::broadcast;

use super::DeviceEvent;

const DEFAULT_CAPACITY: usize = 64;

/// Fan-out of [`DeviceEvent`]s to any number of receivers.
///
/// Each receiver gets its own copy of every event published after it
/// subscribed. A receiver that falls more than the channel capacity behind
/// gets `RecvError::Lagged` and skips the oldest events.
///
/// Clones publish into the same channel.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<DeviceEvent>,
}

impl EventBus {
    /// Creates a bus with the default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates a bus buffering up to `capacity` events per receiver.
    ///
    /// A capacity of 0 is raised to 1.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Returns a receiver for future events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<DeviceEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of live receivers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Publishes an event, returning how many receivers got it.
    ///
    /// Events published without receivers are dropped.
    pub fn publish(&self, event: DeviceEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::DeviceId;

    #[test]
    fn publish_without_receivers_is_dropped() {
        let bus = EventBus::new();
        assert_eq!(bus.publish(DeviceEvent::DeviceAdded { device_id: DeviceId::new() }), 0);
    }

    #[test]
    fn receiver_count_follows_subscriptions() {
        let bus = EventBus::new();
        let first = bus.subscribe();
        let _second = bus.clone().subscribe();
        assert_eq!(bus.subscriber_count(), 2);

        drop(first);
        assert_eq!(bus.subscriber_count(), 1);
    }

    #[tokio::test]
    async fn every_receiver_gets_a_copy() {
        let bus = EventBus::with_capacity(4);
        let mut first = bus.subscribe();
        let mut second = bus.subscribe();

        let device_id = DeviceId::new();
        assert_eq!(bus.publish(DeviceEvent::DeviceRemoved { device_id }), 2);

        assert_eq!(first.recv().await.unwrap().device_id(), device_id);
        assert_eq!(second.recv().await.unwrap().device_id(), device_id);
    }

    #[tokio::test]
    async fn slow_receiver_lags() {
        let bus = EventBus::with_capacity(1);
        let mut rx = bus.subscribe();

        bus.publish(DeviceEvent::DeviceAdded { device_id: DeviceId::new() });
        bus.publish(DeviceEvent::DeviceAdded { device_id: DeviceId::new() });

        assert!(matches!(
            rx.recv().await,
            Err(broadcast::error::RecvError::Lagged(1))
        ));
    }
}
