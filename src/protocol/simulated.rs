// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory purifier for tests and demos.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::error::LinkError;
use crate::types::{Mode, ModePayload, PowerState};

use super::{AttributeId, DeviceLink};

/// A call observed by a [`SimulatedLink`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkCall {
    /// `connect()`
    Connect,
    /// `disconnect()`
    Disconnect,
    /// `read_attribute(id)`
    Read(AttributeId),
    /// `write_attribute(id, _)`
    Write(AttributeId),
}

#[derive(Debug, Clone, Copy)]
enum Fault {
    Next(u32),
    Always,
}

#[derive(Debug)]
struct Peer {
    connected: bool,
    power: Vec<u8>,
    mode: Vec<u8>,
    latency: Duration,
    faults: HashMap<LinkCall, Fault>,
    journal: Vec<LinkCall>,
    writes: Vec<(AttributeId, Vec<u8>)>,
}

impl Peer {
    /// Consumes one injected fault for `call`, if any.
    fn take_fault(&mut self, call: LinkCall) -> bool {
        match self.faults.get_mut(&call) {
            Some(Fault::Always) => true,
            Some(Fault::Next(remaining)) => {
                *remaining -= 1;
                if *remaining == 0 {
                    self.faults.remove(&call);
                }
                true
            }
            None => false,
        }
    }
}

/// A [`DeviceLink`] backed by an in-memory device.
///
/// Clones share the same simulated peer, so a test can keep one handle to
/// inject faults and inspect the call journal while the coordinator owns
/// the other.
///
/// # Examples
///
/// ```
/// use purifier_link::protocol::{AttributeId, LinkCall, SimulatedLink};
/// use purifier_link::types::Mode;
///
/// let link = SimulatedLink::new(true, Mode::Auto);
/// let peer = link.clone();
///
/// peer.fail_next(LinkCall::Connect, 2);
/// peer.fail_always(LinkCall::Read(AttributeId::Mode));
/// assert!(peer.calls().is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct SimulatedLink {
    peer: Arc<Mutex<Peer>>,
}

impl SimulatedLink {
    /// Creates a disconnected simulated purifier in the given state.
    #[must_use]
    pub fn new(power: bool, mode: Mode) -> Self {
        Self::from_raw(
            vec![PowerState::from(power).as_byte()],
            ModePayload::from(mode).as_bytes().to_vec(),
        )
    }

    /// Creates a simulated purifier that reports the given raw payloads.
    #[must_use]
    pub fn from_raw(power: Vec<u8>, mode: Vec<u8>) -> Self {
        Self {
            peer: Arc::new(Mutex::new(Peer {
                connected: false,
                power,
                mode,
                latency: Duration::ZERO,
                faults: HashMap::new(),
                journal: Vec::new(),
                writes: Vec::new(),
            })),
        }
    }

    /// Delays every connect, read and write by `latency`.
    #[must_use]
    pub fn with_latency(self, latency: Duration) -> Self {
        self.peer.lock().latency = latency;
        self
    }

    /// Makes the next `times` occurrences of `call` fail.
    ///
    /// `LinkCall::Disconnect` cannot fail and is ignored.
    pub fn fail_next(&self, call: LinkCall, times: u32) {
        if times == 0 || call == LinkCall::Disconnect {
            return;
        }
        self.peer.lock().faults.insert(call, Fault::Next(times));
    }

    /// Makes every occurrence of `call` fail until [`recover`](Self::recover).
    pub fn fail_always(&self, call: LinkCall) {
        if call != LinkCall::Disconnect {
            self.peer.lock().faults.insert(call, Fault::Always);
        }
    }

    /// Removes all injected faults.
    pub fn recover(&self) {
        self.peer.lock().faults.clear();
    }

    /// Simulates the peer dropping the connection.
    pub fn drop_connection(&self) {
        self.peer.lock().connected = false;
    }

    /// Sets the raw power byte reported by the peer.
    pub fn set_power_raw(&self, byte: u8) {
        self.peer.lock().power = vec![byte];
    }

    /// Sets the raw mode payload reported by the peer.
    pub fn set_mode_raw(&self, payload: Vec<u8>) {
        self.peer.lock().mode = payload;
    }

    /// Returns every call made so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<LinkCall> {
        self.peer.lock().journal.clone()
    }

    /// Returns how many times `call` was made.
    #[must_use]
    pub fn count(&self, call: LinkCall) -> usize {
        self.peer
            .lock()
            .journal
            .iter()
            .filter(|made| **made == call)
            .count()
    }

    /// Clears the call journal and the write log.
    pub fn clear_calls(&self) {
        let mut peer = self.peer.lock();
        peer.journal.clear();
        peer.writes.clear();
    }

    /// Returns the payloads of successful writes, in order.
    #[must_use]
    pub fn writes(&self) -> Vec<(AttributeId, Vec<u8>)> {
        self.peer.lock().writes.clone()
    }

    async fn delay(&self) {
        let latency = self.peer.lock().latency;
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
    }
}

impl DeviceLink for SimulatedLink {
    async fn connect(&mut self) -> Result<(), LinkError> {
        self.delay().await;
        let mut peer = self.peer.lock();
        peer.journal.push(LinkCall::Connect);
        if peer.take_fault(LinkCall::Connect) {
            return Err(LinkError::ConnectFailed("peer not reachable".to_string()));
        }
        peer.connected = true;
        Ok(())
    }

    async fn disconnect(&mut self) {
        let mut peer = self.peer.lock();
        peer.journal.push(LinkCall::Disconnect);
        peer.connected = false;
    }

    fn is_connected(&self) -> bool {
        self.peer.lock().connected
    }

    async fn read_attribute(&mut self, attribute: AttributeId) -> Result<Vec<u8>, LinkError> {
        self.delay().await;
        let call = LinkCall::Read(attribute);
        let mut peer = self.peer.lock();
        peer.journal.push(call);
        if !peer.connected {
            return Err(LinkError::NotConnected);
        }
        if peer.take_fault(call) {
            return Err(LinkError::ReadFailed {
                attribute,
                message: "simulated read fault".to_string(),
            });
        }
        Ok(match attribute {
            AttributeId::Power => peer.power.clone(),
            AttributeId::Mode => peer.mode.clone(),
        })
    }

    async fn write_attribute(
        &mut self,
        attribute: AttributeId,
        payload: &[u8],
    ) -> Result<(), LinkError> {
        self.delay().await;
        let call = LinkCall::Write(attribute);
        let mut peer = self.peer.lock();
        peer.journal.push(call);
        if !peer.connected {
            return Err(LinkError::NotConnected);
        }
        if peer.take_fault(call) {
            return Err(LinkError::WriteFailed {
                attribute,
                message: "simulated write fault".to_string(),
            });
        }
        match attribute {
            AttributeId::Power => peer.power = payload.to_vec(),
            AttributeId::Mode => peer.mode = payload.to_vec(),
        }
        peer.writes.push((attribute, payload.to_vec()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reads_require_connection() {
        let mut link = SimulatedLink::new(true, Mode::Silent);
        assert_eq!(
            link.read_attribute(AttributeId::Power).await,
            Err(LinkError::NotConnected)
        );

        link.connect().await.unwrap();
        assert_eq!(link.read_attribute(AttributeId::Power).await.unwrap(), [0x01]);
        assert_eq!(
            link.read_attribute(AttributeId::Mode).await.unwrap(),
            [0x01, 0x00, 0x0F, 0x18]
        );
    }

    #[tokio::test]
    async fn fail_next_is_consumed() {
        let mut link = SimulatedLink::new(false, Mode::Auto);
        link.fail_next(LinkCall::Connect, 2);

        assert!(link.connect().await.is_err());
        assert!(link.connect().await.is_err());
        assert!(link.connect().await.is_ok());
        assert_eq!(link.count(LinkCall::Connect), 3);
    }

    #[tokio::test]
    async fn fail_always_until_recover() {
        let mut link = SimulatedLink::new(false, Mode::Auto);
        link.connect().await.unwrap();
        link.fail_always(LinkCall::Write(AttributeId::Power));

        for _ in 0..5 {
            assert!(link.write_attribute(AttributeId::Power, &[0x01]).await.is_err());
        }
        link.recover();
        link.write_attribute(AttributeId::Power, &[0x01]).await.unwrap();
        assert_eq!(link.writes(), vec![(AttributeId::Power, vec![0x01])]);
    }

    #[tokio::test]
    async fn writes_change_reported_state() {
        let mut link = SimulatedLink::new(false, Mode::Auto);
        link.connect().await.unwrap();
        link.write_attribute(AttributeId::Mode, &[0x03, 0x00, 0x0F, 0x18])
            .await
            .unwrap();
        assert_eq!(
            link.read_attribute(AttributeId::Mode).await.unwrap(),
            [0x03, 0x00, 0x0F, 0x18]
        );
    }

    #[tokio::test]
    async fn clones_share_the_peer() {
        let mut link = SimulatedLink::new(false, Mode::Auto);
        let peer = link.clone();

        link.connect().await.unwrap();
        assert!(peer.is_connected());
        peer.drop_connection();
        assert!(!link.is_connected());
        assert_eq!(peer.calls(), vec![LinkCall::Connect]);
    }
}
