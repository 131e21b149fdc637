// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wire encoding of the power and mode attributes.
//!
//! | Attribute | Payload                        |
//! |-----------|--------------------------------|
//! | power     | `[0x01]` on, `[0x00]` off      |
//! | mode      | `[code, 0x00, 0x0F, 0x18]`     |

use crate::error::LinkError;
use crate::types::{MODE_PADDING, ModePayload, PowerState};

use super::AttributeId;

/// Encodes a power state for writing.
#[must_use]
pub fn encode_power(state: PowerState) -> [u8; 1] {
    [state.as_byte()]
}

/// Decodes a power attribute read.
///
/// Only the first byte is significant; any non-zero value means on.
///
/// # Errors
///
/// Returns `LinkError::MalformedPayload` if the payload is empty.
pub fn decode_power(payload: &[u8]) -> Result<PowerState, LinkError> {
    payload
        .first()
        .map(|byte| PowerState::from_byte(*byte))
        .ok_or(LinkError::MalformedPayload {
            attribute: AttributeId::Power,
            len: 0,
        })
}

/// Encodes a mode payload for writing.
#[must_use]
pub fn encode_mode(payload: ModePayload) -> [u8; 4] {
    *payload.as_bytes()
}

/// Decodes a mode attribute read.
///
/// Short reads keep the mode code and take the fixed padding for the
/// missing bytes; bytes past the fourth are ignored.
///
/// # Errors
///
/// Returns `LinkError::MalformedPayload` if the payload is empty.
pub fn decode_mode(payload: &[u8]) -> Result<ModePayload, LinkError> {
    let Some(&code) = payload.first() else {
        return Err(LinkError::MalformedPayload {
            attribute: AttributeId::Mode,
            len: 0,
        });
    };

    let mut bytes = [code, MODE_PADDING[0], MODE_PADDING[1], MODE_PADDING[2]];
    for (slot, byte) in bytes.iter_mut().zip(payload).skip(1) {
        *slot = *byte;
    }
    Ok(ModePayload::from_bytes(bytes))
}
