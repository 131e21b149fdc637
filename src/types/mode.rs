// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fan mode types.
//!
//! The purifier accepts four fan modes. A mode is written as a 4-byte
//! payload `[code, 0x00, 0x0F, 0x18]` where only the first byte varies; the
//! trailing three bytes are fixed protocol padding.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;

/// Name reported for mode codes outside the known table.
pub const UNKNOWN_MODE_NAME: &str = "Unknown";

/// Trailing bytes that accompany every mode code on the wire.
pub const MODE_PADDING: [u8; 3] = [0x00, 0x0F, 0x18];

/// Fan modes supported by the purifier.
///
/// # Examples
///
/// ```
/// use purifier_link::types::Mode;
///
/// let mode: Mode = "Strong".parse().unwrap();
/// assert_eq!(mode, Mode::Strong);
/// assert_eq!(mode.code(), 0x03);
/// assert_eq!(Mode::from_code(0x01), Some(Mode::Silent));
/// assert!("Turbo".parse::<Mode>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    /// Automatic speed selection.
    Auto,
    /// Lowest speed.
    Silent,
    /// Medium speed.
    Standard,
    /// Highest speed.
    Strong,
}

impl Mode {
    /// All modes in wire-code order.
    pub const ALL: [Self; 4] = [Self::Auto, Self::Silent, Self::Standard, Self::Strong];

    /// Returns the wire code of the mode.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Auto => 0x00,
            Self::Silent => 0x01,
            Self::Standard => 0x02,
            Self::Strong => 0x03,
        }
    }

    /// Looks up a mode by wire code.
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0x00 => Some(Self::Auto),
            0x01 => Some(Self::Silent),
            0x02 => Some(Self::Standard),
            0x03 => Some(Self::Strong),
            _ => None,
        }
    }

    /// Returns the display name of the mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "Auto",
            Self::Silent => "Silent",
            Self::Standard => "Standard",
            Self::Strong => "Strong",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = ValueError;

    /// Parses a mode name. Matching is exact, as the names are user-facing
    /// preset labels.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| ValueError::InvalidMode(s.to_string()))
    }
}

/// Raw mode attribute payload as read from or written to the device.
///
/// Unrecognized codes are kept verbatim so the payload can be written back
/// unchanged.
///
/// # Examples
///
/// ```
/// use purifier_link::types::{Mode, ModePayload};
///
/// let payload = ModePayload::from(Mode::Strong);
/// assert_eq!(payload.as_bytes(), &[0x03, 0x00, 0x0F, 0x18]);
///
/// let unknown = ModePayload::from_bytes([0x07, 0x00, 0x0F, 0x18]);
/// assert_eq!(unknown.mode(), None);
/// assert_eq!(unknown.name(), "Unknown");
/// assert_eq!(unknown.code(), 0x07);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModePayload([u8; 4]);

impl ModePayload {
    /// Wraps four raw payload bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    /// Builds the canonical payload for a mode code.
    #[must_use]
    pub const fn from_code(code: u8) -> Self {
        Self([code, MODE_PADDING[0], MODE_PADDING[1], MODE_PADDING[2]])
    }

    /// Returns the mode code (first byte).
    #[must_use]
    pub const fn code(&self) -> u8 {
        self.0[0]
    }

    /// Returns the decoded mode, or `None` for unrecognized codes.
    #[must_use]
    pub const fn mode(&self) -> Option<Mode> {
        Mode::from_code(self.code())
    }

    /// Returns the mode name, or `"Unknown"` for unrecognized codes.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.mode().map_or(UNKNOWN_MODE_NAME, Mode::as_str)
    }

    /// Returns the raw payload bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl From<Mode> for ModePayload {
    fn from(mode: Mode) -> Self {
        Self::from_code(mode.code())
    }
}

impl fmt::Display for ModePayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (0x{:02x})", self.name(), self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_codes_match_table() {
        assert_eq!(Mode::Auto.code(), 0x00);
        assert_eq!(Mode::Silent.code(), 0x01);
        assert_eq!(Mode::Standard.code(), 0x02);
        assert_eq!(Mode::Strong.code(), 0x03);
    }

    #[test]
    fn mode_from_code_inverts_code() {
        for mode in Mode::ALL {
            assert_eq!(Mode::from_code(mode.code()), Some(mode));
        }
        assert_eq!(Mode::from_code(0x04), None);
        assert_eq!(Mode::from_code(0xFF), None);
    }

    #[test]
    fn mode_from_str() {
        assert_eq!("Auto".parse::<Mode>().unwrap(), Mode::Auto);
        assert_eq!("Silent".parse::<Mode>().unwrap(), Mode::Silent);
        assert_eq!("Standard".parse::<Mode>().unwrap(), Mode::Standard);
        assert_eq!("Strong".parse::<Mode>().unwrap(), Mode::Strong);
    }

    #[test]
    fn mode_from_str_rejects_unknown_names() {
        let err = "Bogus".parse::<Mode>().unwrap_err();
        assert_eq!(err, ValueError::InvalidMode("Bogus".to_string()));
        assert!("Unknown".parse::<Mode>().is_err());
        assert!("auto".parse::<Mode>().is_err());
    }

    #[test]
    fn strong_payload_is_bit_exact() {
        let payload = ModePayload::from(Mode::Strong);
        assert_eq!(payload.as_bytes(), &[0x03, 0x00, 0x0F, 0x18]);
    }

    #[test]
    fn payload_keeps_unknown_codes() {
        let payload = ModePayload::from_bytes([0x09, 0x01, 0x02, 0x03]);
        assert_eq!(payload.mode(), None);
        assert_eq!(payload.name(), UNKNOWN_MODE_NAME);
        assert_eq!(payload.as_bytes(), &[0x09, 0x01, 0x02, 0x03]);
    }

    #[test]
    fn payload_display() {
        assert_eq!(
            ModePayload::from(Mode::Silent).to_string(),
            "Silent (0x01)"
        );
        assert_eq!(ModePayload::from_code(0x2A).to_string(), "Unknown (0x2a)");
    }
}
