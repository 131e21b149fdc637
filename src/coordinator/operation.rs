// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Single-attempt link operations retried by the coordinator.

use std::future::Future;

use crate::error::LinkError;
use crate::protocol::{AttributeId, DeviceLink, codec};
use crate::state::DeviceState;

/// One attempt of work against a connected link.
pub(crate) trait LinkOperation<L: DeviceLink>: Sync {
    type Output: Send;

    /// Name used in logs.
    fn name(&self) -> &'static str;

    fn perform(&self, link: &mut L) -> impl Future<Output = Result<Self::Output, LinkError>> + Send;
}

/// Reads both attributes into a snapshot.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ReadState;

impl<L: DeviceLink> LinkOperation<L> for ReadState {
    type Output = DeviceState;

    fn name(&self) -> &'static str {
        "poll"
    }

    async fn perform(&self, link: &mut L) -> Result<DeviceState, LinkError> {
        let power = link.read_attribute(AttributeId::Power).await?;
        let power = codec::decode_power(&power)?;
        let mode = link.read_attribute(AttributeId::Mode).await?;
        let mode = codec::decode_mode(&mode)?;
        Ok(DeviceState::new(power.is_on(), mode))
    }
}

/// Writes one attribute.
#[derive(Debug, Clone)]
pub(crate) struct WriteAttribute {
    pub attribute: AttributeId,
    pub payload: Vec<u8>,
}

impl<L: DeviceLink> LinkOperation<L> for WriteAttribute {
    type Output = ();

    fn name(&self) -> &'static str {
        match self.attribute {
            AttributeId::Power => "set_power",
            AttributeId::Mode => "set_mode",
        }
    }

    async fn perform(&self, link: &mut L) -> Result<(), LinkError> {
        debug_assert_eq!(self.payload.len(), self.attribute.payload_len());
        link.write_attribute(self.attribute, &self.payload).await
    }
}
