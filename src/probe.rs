// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP device probing across candidate status endpoints.
//!
//! Different myStrom device generations expose their status under different
//! paths. The prober walks a fixed candidate list until one endpoint yields
//! a parseable JSON object; a failure on one endpoint only moves it to the
//! next. Only when every candidate is exhausted does the probe fail, carrying
//! the last observed failure cause.

use std::time::Duration;

use reqwest::Client;
use serde_json::{Map, Value};

use crate::error::{ProtocolError, ReadError};

/// Status endpoint paths, tried strictly in this order.
const ENDPOINT_CANDIDATES: [&str; 4] = [
    "/api/v1/device",
    "/report",
    "/api/v1/sensors",
    "/rest?get=report",
];

/// Issues status requests to devices.
///
/// Cloning is cheap; the underlying HTTP client is shared.
#[derive(Debug, Clone)]
pub struct Prober {
    client: Client,
    timeout: Duration,
}

impl Prober {
    /// Creates a prober with the given per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn new(timeout: Duration) -> Result<Self, ProtocolError> {
        let client = Client::builder().build().map_err(ProtocolError::Http)?;
        Ok(Self { client, timeout })
    }

    /// Returns the per-request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Retrieves a status body from `address`, trying each candidate
    /// endpoint in order.
    ///
    /// The first endpoint returning a JSON object wins. A one-key wrapper
    /// object whose sole value is itself an object is unwrapped, since some
    /// firmwares key the response by device ID.
    ///
    /// # Errors
    ///
    /// Returns the last failure observed across the candidates when none of
    /// them produced a usable body.
    pub async fn probe(&self, address: &str) -> Result<Map<String, Value>, ReadError> {
        let base = base_url(address);
        let mut last_error: Option<ReadError> = None;

        for path in ENDPOINT_CANDIDATES {
            let url = format!("{base}{path}");
            tracing::trace!(url = %url, "probing endpoint");

            let response = match self.client.get(&url).timeout(self.timeout).send().await {
                Ok(response) => response,
                Err(e) => {
                    last_error = Some(self.classify_request_error(&e));
                    continue;
                }
            };

            if !response.status().is_success() {
                last_error = Some(ReadError::HttpStatus(response.status().as_u16()));
                continue;
            }

            let text = match response.text().await {
                Ok(text) => text,
                Err(e) => {
                    last_error = Some(self.classify_request_error(&e));
                    continue;
                }
            };

            match serde_json::from_str::<Value>(&text) {
                Ok(Value::Object(map)) => return Ok(unwrap_keyed(map)),
                // Not a status object; try the next candidate.
                Ok(_) | Err(_) => {}
            }
        }

        Err(last_error
            .unwrap_or_else(|| ReadError::Unknown("no usable response body".to_string())))
    }

    fn classify_request_error(&self, err: &reqwest::Error) -> ReadError {
        if err.is_timeout() {
            ReadError::RequestTimeout(u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX))
        } else if err.is_connect() {
            ReadError::NoResponse
        } else {
            ReadError::Unknown(err.to_string())
        }
    }
}

/// Builds the base URL for a configured address, defaulting to plain HTTP.
fn base_url(address: &str) -> String {
    if address.starts_with("http://") || address.starts_with("https://") {
        address.trim_end_matches('/').to_string()
    } else {
        format!("http://{address}")
    }
}

/// Unwraps a single top-level wrapper key when the body is a one-key mapping
/// whose sole value is itself a mapping.
fn unwrap_keyed(map: Map<String, Value>) -> Map<String, Value> {
    if map.len() == 1
        && let Some((_, Value::Object(inner))) = map.iter().next()
    {
        return inner.clone();
    }
    map
}
