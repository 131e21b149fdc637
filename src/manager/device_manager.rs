// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device manager owning one coordinator per purifier.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tokio::sync::{RwLock, broadcast};

use crate::coordinator::{Coordinator, DeviceConfig};
use crate::error::Error;
use crate::event::{DeviceEvent, DeviceId, EventBus};
use crate::protocol::DeviceLink;
use crate::state::DeviceState;
use crate::subscription::Subscribable;
use crate::types::Mode;

/// Registry of coordinated purifiers.
///
/// Each device gets its own [`Coordinator`] and background poller. Their
/// notifications are forwarded onto a shared [`EventBus`].
///
/// # Examples
///
/// ```
/// use purifier_link::DeviceConfig;
/// use purifier_link::event::DeviceEvent;
/// use purifier_link::manager::DeviceManager;
/// use purifier_link::protocol::SimulatedLink;
/// use purifier_link::types::Mode;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> purifier_link::Result<()> {
/// let manager = DeviceManager::new();
/// let mut events = manager.subscribe();
///
/// let link = SimulatedLink::new(false, Mode::Auto);
/// let id = manager.add_device(DeviceConfig::new(), link).await?;
/// assert!(matches!(events.recv().await, Ok(DeviceEvent::DeviceAdded { .. })));
///
/// manager.set_power(id, true).await?;
/// assert!(manager.state(id).await?.is_some_and(|s| s.power()));
///
/// manager.shutdown_all().await;
/// # Ok(())
/// # }
/// ```
pub struct DeviceManager<L: DeviceLink> {
    devices: RwLock<HashMap<DeviceId, Arc<Coordinator<L>>>>,
    event_bus: EventBus,
}

impl<L: DeviceLink + 'static> DeviceManager<L> {
    /// Creates an empty manager.
    #[must_use]
    pub fn new() -> Self {
        Self::with_event_bus(EventBus::new())
    }

    /// Creates an empty manager whose event bus buffers `capacity` events.
    ///
    /// A capacity of 0 is raised to 1.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_event_bus(EventBus::with_capacity(capacity))
    }

    fn with_event_bus(event_bus: EventBus) -> Self {
        Self {
            devices: RwLock::new(HashMap::new()),
            event_bus,
        }
    }

    /// Subscribes to events from every managed device.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<DeviceEvent> {
        self.event_bus.subscribe()
    }

    /// Registers a purifier reachable through `link`.
    ///
    /// The device is polled once before registration. On success its
    /// poller is started and `DeviceEvent::DeviceAdded` is published.
    ///
    /// Requires a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotReady` if the first poll failed. The link is
    /// disconnected and nothing is registered.
    pub async fn add_device(&self, config: DeviceConfig, link: L) -> Result<DeviceId, Error> {
        let coordinator = Arc::new(Coordinator::new(link, config));
        let initial = match coordinator.first_refresh().await {
            Ok(state) => state,
            Err(err) => {
                coordinator.shutdown().await;
                return Err(err);
            }
        };

        let device_id = DeviceId::new();
        self.forward_events(device_id, &coordinator, initial);
        coordinator.spawn_poller();

        tracing::info!(%device_id, device = coordinator.label(), "device added");
        self.devices.write().await.insert(device_id, coordinator);
        self.event_bus.publish(DeviceEvent::DeviceAdded { device_id });
        Ok(device_id)
    }

    /// Shuts a device down and forgets it.
    ///
    /// Returns `true` if the device was registered.
    pub async fn remove_device(&self, device_id: DeviceId) -> bool {
        let Some(coordinator) = self.devices.write().await.remove(&device_id) else {
            return false;
        };
        coordinator.shutdown().await;
        tracing::info!(%device_id, device = coordinator.label(), "device removed");
        self.event_bus.publish(DeviceEvent::DeviceRemoved { device_id });
        true
    }

    /// Returns the coordinator of a device.
    pub async fn coordinator(&self, device_id: DeviceId) -> Option<Arc<Coordinator<L>>> {
        self.devices.read().await.get(&device_id).cloned()
    }

    /// Returns the best known state of a device.
    ///
    /// # Errors
    ///
    /// Returns `Error::DeviceNotFound` for an unknown id.
    pub async fn state(&self, device_id: DeviceId) -> Result<Option<DeviceState>, Error> {
        Ok(self.get(device_id).await?.state())
    }

    /// Polls a device now.
    ///
    /// # Errors
    ///
    /// Returns `Error::DeviceNotFound` for an unknown id, or `Error::Poll`
    /// if the poll could not be masked.
    pub async fn refresh(&self, device_id: DeviceId) -> Result<DeviceState, Error> {
        Ok(self.get(device_id).await?.refresh().await?)
    }

    /// Turns a device on or off.
    ///
    /// # Errors
    ///
    /// Returns `Error::DeviceNotFound` for an unknown id, or
    /// `Error::Command` if the write failed.
    pub async fn set_power(&self, device_id: DeviceId, on: bool) -> Result<(), Error> {
        self.get(device_id).await?.set_power(on).await?;
        Ok(())
    }

    /// Sets the mode of a device.
    ///
    /// # Errors
    ///
    /// Returns `Error::DeviceNotFound` for an unknown id, or
    /// `Error::Command` if the write failed.
    pub async fn set_mode(&self, device_id: DeviceId, mode: Mode) -> Result<(), Error> {
        self.get(device_id).await?.set_mode(mode).await?;
        Ok(())
    }

    /// Returns the ids of all registered devices.
    pub async fn device_ids(&self) -> Vec<DeviceId> {
        self.devices.read().await.keys().copied().collect()
    }

    /// Returns the number of registered devices.
    pub async fn device_count(&self) -> usize {
        self.devices.read().await.len()
    }

    /// Shuts down and removes every device.
    pub async fn shutdown_all(&self) {
        let drained: Vec<_> = self.devices.write().await.drain().collect();
        for (device_id, coordinator) in drained {
            coordinator.shutdown().await;
            self.event_bus.publish(DeviceEvent::DeviceRemoved { device_id });
        }
        tracing::debug!("all devices shut down");
    }

    async fn get(&self, device_id: DeviceId) -> Result<Arc<Coordinator<L>>, Error> {
        self.coordinator(device_id)
            .await
            .ok_or(Error::DeviceNotFound)
    }

    fn forward_events(&self, device_id: DeviceId, coordinator: &Coordinator<L>, initial: DeviceState) {
        let bus = self.event_bus.clone();
        coordinator.on_availability_changed(move |availability| {
            bus.publish(DeviceEvent::AvailabilityChanged {
                device_id,
                availability,
            });
        });

        // Diffed here rather than per attribute so each event carries the
        // full state it belongs to.
        let bus = self.event_bus.clone();
        let last_seen = parking_lot::Mutex::new(Some(initial));
        coordinator.on_state_changed(move |state| {
            let previous = last_seen.lock().replace(*state);
            for change in state.changes_since(previous.as_ref()) {
                bus.publish(DeviceEvent::StateChanged {
                    device_id,
                    change,
                    new_state: *state,
                });
            }
        });
    }
}

impl<L: DeviceLink + 'static> Default for DeviceManager<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: DeviceLink> fmt::Debug for DeviceManager<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceManager")
            .field("event_bus", &self.event_bus)
            .finish_non_exhaustive()
    }
}
