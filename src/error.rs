// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `purifier_link` library.
//!
//! Errors are layered the same way failures are classified by the
//! coordinator:
//!
//! - [`LinkError`] - a single transport call failed; always transient
//! - [`PollError`] - a whole poll cycle failed and could not be masked
//! - [`CommandError`] - a power/mode command failed
//! - [`ValueError`] - a constrained value was rejected before any I/O

use thiserror::Error;

use crate::protocol::AttributeId;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred during value validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// A poll cycle failed.
    #[error("poll error: {0}")]
    Poll(#[from] PollError),

    /// A command failed.
    #[error("command error: {0}")]
    Command(#[from] CommandError),

    /// Device was not found in the manager.
    #[error("device not found")]
    DeviceNotFound,

    /// The initial refresh of a new device failed.
    #[error("device not ready: {0}")]
    NotReady(#[source] PollError),
}

/// Errors reported by a [`DeviceLink`](crate::protocol::DeviceLink).
///
/// Every link error is treated as transient by the coordinator and retried
/// within the current cycle.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LinkError {
    /// Connecting to the peer failed.
    #[error("connection failed: {0}")]
    ConnectFailed(String),

    /// An operation was attempted while disconnected.
    #[error("link is not connected")]
    NotConnected,

    /// Reading an attribute failed.
    #[error("failed to read {attribute}: {message}")]
    ReadFailed {
        /// The attribute being read.
        attribute: AttributeId,
        /// Transport-specific description.
        message: String,
    },

    /// Writing an attribute failed.
    #[error("failed to write {attribute}: {message}")]
    WriteFailed {
        /// The attribute being written.
        attribute: AttributeId,
        /// Transport-specific description.
        message: String,
    },

    /// The peer returned a payload that cannot be decoded.
    #[error("malformed {attribute} payload ({len} bytes)")]
    MalformedPayload {
        /// The attribute whose payload was malformed.
        attribute: AttributeId,
        /// Length of the received payload.
        len: usize,
    },
}

/// Errors escalated by a poll cycle.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PollError {
    /// Too many consecutive poll cycles failed; the device is unreachable.
    #[error("device unavailable after {consecutive_failures} consecutive failed polls")]
    Unavailable {
        /// Number of consecutive failed cycles at the time of the error.
        consecutive_failures: u32,
    },

    /// No poll has ever succeeded, so there is no cached state to serve.
    #[error("no data received from device yet")]
    NoDataYet,

    /// The coordinator has been shut down.
    #[error("coordinator is shut down")]
    ShutDown,
}

/// Errors returned by power and mode commands.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// The command argument was rejected before any I/O was attempted.
    #[error("invalid argument: {0}")]
    InvalidArgument(#[from] ValueError),

    /// All write attempts failed.
    #[error("command failed after {attempts} attempts: {source}")]
    LinkExhausted {
        /// Number of attempts made.
        attempts: u32,
        /// The error from the final attempt.
        #[source]
        source: LinkError,
    },

    /// The coordinator has been shut down.
    #[error("coordinator is shut down")]
    ShutDown,
}

/// Errors related to value validation and constraints.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A numeric value is outside the allowed range.
    #[error("value {actual} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Minimum allowed value.
        min: u64,
        /// Maximum allowed value.
        max: u64,
        /// The actual value that was provided.
        actual: u64,
    },

    /// A mode name outside the known set was provided.
    #[error("invalid mode: {0}")]
    InvalidMode(String),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
