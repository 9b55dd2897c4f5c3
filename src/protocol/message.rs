// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Outbound message envelopes.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::ProtocolError;

/// Message kind for state changes.
pub const STATE_SET: &str = "STATE-SET";

/// Message kind asking the device for its full state.
pub const REQUEST_CURRENT_STATE: &str = "REQUEST-CURRENT-STATE";

/// Message kind asking the device for its sensor readings.
pub const REQUEST_ENVIRONMENT: &str = "REQUEST-PRODUCT-ENVIRONMENT-CURRENT-SENSOR-DATA";

/// Reason reported for changes made by a client application.
const MODE_REASON: &str = "LAPP";

const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

#[derive(Debug, Serialize)]
struct Envelope<'a> {
    msg: &'static str,
    time: String,
    #[serde(rename = "mode-reason", skip_serializing_if = "Option::is_none")]
    mode_reason: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a Map<String, Value>>,
}

impl Envelope<'_> {
    fn to_json(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }
}

fn timestamp(now: DateTime<Utc>) -> String {
    now.format(TIME_FORMAT).to_string()
}

/// Builds a `STATE-SET` message carrying `data`.
///
/// # Examples
///
/// ```
/// use purehumid::protocol::message;
/// use serde_json::{Map, Value};
///
/// let mut data = Map::new();
/// data.insert("hume".into(), Value::from("HUMD"));
///
/// let json = message::state_set(&data)?;
/// assert!(json.starts_with(r#"{"msg":"STATE-SET","time":""#));
/// assert!(json.ends_with(r#""mode-reason":"LAPP","data":{"hume":"HUMD"}}"#));
/// # Ok::<(), purehumid::ProtocolError>(())
/// ```
///
/// # Errors
///
/// Returns `ProtocolError::Serialization` if the envelope cannot be
/// serialized.
pub fn state_set(data: &Map<String, Value>) -> Result<String, ProtocolError> {
    state_set_at(data, Utc::now())
}

/// Builds a `REQUEST-CURRENT-STATE` message.
///
/// # Errors
///
/// Returns `ProtocolError::Serialization` if the envelope cannot be
/// serialized.
pub fn request_current_state() -> Result<String, ProtocolError> {
    request_at(REQUEST_CURRENT_STATE, Utc::now())
}

/// Builds a request for the environmental sensor readings.
///
/// # Errors
///
/// Returns `ProtocolError::Serialization` if the envelope cannot be
/// serialized.
pub fn request_environment() -> Result<String, ProtocolError> {
    request_at(REQUEST_ENVIRONMENT, Utc::now())
}

fn state_set_at(
    data: &Map<String, Value>,
    now: DateTime<Utc>,
) -> Result<String, ProtocolError> {
    Envelope {
        msg: STATE_SET,
        time: timestamp(now),
        mode_reason: Some(MODE_REASON),
        data: Some(data),
    }
    .to_json()
}

fn request_at(msg: &'static str, now: DateTime<Utc>) -> Result<String, ProtocolError> {
    Envelope {
        msg,
        time: timestamp(now),
        mode_reason: None,
        data: None,
    }
    .to_json()
}
