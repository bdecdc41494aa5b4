// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `StromR` library.
//!
//! Two error families live here: the library-level [`Error`] hierarchy
//! returned by fallible setup operations, and [`ReadError`], the per-device
//! failure taxonomy carried inside snapshots. A failed read never propagates
//! out of a poll cycle; it is recorded on the device's snapshot instead.

use serde::Serialize;
use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred during protocol communication or client setup.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}

/// Errors related to HTTP communication and client construction.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// HTTP client error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid device address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

/// The cause of a failed device read.
///
/// One of these is attached to a [`DeviceSnapshot`](crate::DeviceSnapshot)
/// when every probe endpoint was exhausted without a usable body. The
/// variant reflects the last failure observed across the endpoint attempts.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum ReadError {
    /// The request did not complete within the configured timeout.
    #[error("request timed out after {0} ms")]
    RequestTimeout(u64),

    /// The device could not be reached at all (connection-level failure).
    #[error("no response from device")]
    NoResponse,

    /// The device answered with a non-success HTTP status.
    #[error("HTTP status {0}")]
    HttpStatus(u16),

    /// Fallback for failures that fit no other category.
    #[error("{0}")]
    Unknown(String),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
