// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Link abstraction and attribute encoding.
//!
//! The transport driver itself lives outside this crate. Anything that can
//! connect to the purifier and read/write its two attributes implements
//! [`DeviceLink`]; the coordinator takes care of serialization and retries.
//!
//! - [`DeviceLink`]: transport capability consumed by the coordinator
//! - [`AttributeId`]: the power and mode attributes
//! - [`codec`]: bit-exact payload encoding
//! - [`SimulatedLink`]: in-memory link with fault injection

mod attribute;
pub mod codec;
mod simulated;

pub use attribute::{AttributeId, SERVICE_UUID};
pub use simulated::{LinkCall, SimulatedLink};

use std::future::Future;

use crate::error::LinkError;

/// Transport capability for a single remote purifier.
///
/// Implementations are not required to be safe for concurrent use: the
/// coordinator owns the link exclusively and never issues two calls at once.
/// Calls are expected to carry their own I/O timeout.
///
/// # Examples
///
/// ```
/// use purifier_link::error::LinkError;
/// use purifier_link::protocol::{AttributeId, DeviceLink};
///
/// struct Loopback {
///     connected: bool,
///     power: u8,
/// }
///
/// impl DeviceLink for Loopback {
///     async fn connect(&mut self) -> Result<(), LinkError> {
///         self.connected = true;
///         Ok(())
///     }
///
///     async fn disconnect(&mut self) {
///         self.connected = false;
///     }
///
///     fn is_connected(&self) -> bool {
///         self.connected
///     }
///
///     async fn read_attribute(&mut self, attribute: AttributeId) -> Result<Vec<u8>, LinkError> {
///         match attribute {
///             AttributeId::Power => Ok(vec![self.power]),
///             AttributeId::Mode => Ok(vec![0x00, 0x00, 0x0F, 0x18]),
///         }
///     }
///
///     async fn write_attribute(
///         &mut self,
///         attribute: AttributeId,
///         payload: &[u8],
///     ) -> Result<(), LinkError> {
///         if attribute == AttributeId::Power {
///             self.power = payload[0];
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait DeviceLink: Send {
    /// Establishes the connection.
    fn connect(&mut self) -> impl Future<Output = Result<(), LinkError>> + Send;

    /// Tears the connection down. Best-effort: failures are the
    /// implementation's to log, never to return.
    fn disconnect(&mut self) -> impl Future<Output = ()> + Send;

    /// Returns `true` while the link is connected.
    fn is_connected(&self) -> bool;

    /// Reads the raw payload of an attribute.
    fn read_attribute(
        &mut self,
        attribute: AttributeId,
    ) -> impl Future<Output = Result<Vec<u8>, LinkError>> + Send;

    /// Writes a raw payload to an attribute.
    fn write_attribute(
        &mut self,
        attribute: AttributeId,
        payload: &[u8],
    ) -> impl Future<Output = Result<(), LinkError>> + Send;
}
