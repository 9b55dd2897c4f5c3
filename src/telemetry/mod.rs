// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Parsing of messages published by the fan.
//!
//! The device publishes JSON messages on its `status/current` topic. The
//! `msg` member tells them apart:
//!
//! - `CURRENT-STATE` - full state, every field a plain string
//! - `STATE-CHANGE` - delta, every field an `[old, new]` pair
//! - `ENVIRONMENTAL-CURRENT-SENSOR-DATA` - sensor readings under `data`
//!
//! Either value shape is accepted in `product-state`; for a pair the second
//! element is the new value.
//!
//! # Examples
//!
//! ```
//! use purehumid::telemetry::{parse_message, InboundMessage};
//!
//! let payload = r#"{"msg":"STATE-CHANGE","product-state":{"oson":["ON","OFF"]}}"#;
//!
//! match parse_message(payload).unwrap() {
//!     InboundMessage::State { full, change } => {
//!         assert!(!full);
//!         assert_eq!(change.get("oson"), Some("OFF"));
//!     }
//!     _ => unreachable!(),
//! }
//! ```

mod environment;

pub use environment::EnvironmentalData;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::DecodeError;
use crate::state::StateChange;

const CURRENT_STATE: &str = "CURRENT-STATE";
const STATE_CHANGE: &str = "STATE-CHANGE";
const ENVIRONMENTAL_DATA: &str = "ENVIRONMENTAL-CURRENT-SENSOR-DATA";

/// A parsed message from the fan.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundMessage {
    /// Product state, full or delta.
    State {
        /// `true` for a `CURRENT-STATE` snapshot, `false` for a delta.
        full: bool,
        /// The reported field values.
        change: StateChange,
    },

    /// Environmental sensor readings.
    Environment(EnvironmentalData),

    /// A message kind this library does not track.
    Other {
        /// The `msg` member.
        kind: String,
    },
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    msg: Option<String>,
    #[serde(rename = "product-state", default)]
    product_state: Option<Map<String, Value>>,
    #[serde(default)]
    data: Option<Map<String, Value>>,
}

/// Parses a JSON payload received from the fan.
///
/// A message without `msg` but with `product-state` is treated as a delta.
///
/// # Errors
///
/// Returns `DecodeError` if the JSON is malformed, a state message has no
/// `product-state`, or a field value is neither a string nor a pair of
/// strings.
pub fn parse_message(payload: &str) -> Result<InboundMessage, DecodeError> {
    let envelope: Envelope = serde_json::from_str(payload)?;

    match envelope.msg.as_deref() {
        Some(kind @ (CURRENT_STATE | STATE_CHANGE)) => {
            let product_state = envelope
                .product_state
                .ok_or_else(|| DecodeError::MissingField("product-state".to_string()))?;
            Ok(InboundMessage::State {
                full: kind == CURRENT_STATE,
                change: parse_product_state(&product_state)?,
            })
        }
        Some(ENVIRONMENTAL_DATA) => {
            let data = envelope
                .data
                .ok_or_else(|| DecodeError::MissingField("data".to_string()))?;
            Ok(InboundMessage::Environment(EnvironmentalData::from_map(
                &data,
            )?))
        }
        Some(kind) => Ok(InboundMessage::Other {
            kind: kind.to_string(),
        }),
        None => match envelope.product_state {
            Some(product_state) => Ok(InboundMessage::State {
                full: false,
                change: parse_product_state(&product_state)?,
            }),
            None => Err(DecodeError::MissingField("msg".to_string())),
        },
    }
}

/// Converts a `product-state` object into a change batch, keeping the order
/// in which the device listed the fields.
///
/// # Errors
///
/// Returns `DecodeError::UnexpectedFormat` for values that are neither a
/// string nor a two-element array of strings.
pub fn parse_product_state(product_state: &Map<String, Value>) -> Result<StateChange, DecodeError> {
    product_state
        .iter()
        .map(|(field, value)| current_value(field, value).map(|v| (field.as_str(), v)))
        .collect()
}

fn current_value<'a>(field: &str, value: &'a Value) -> Result<&'a str, DecodeError> {
    match value {
        Value::String(s) => Ok(s),
        Value::Array(pair) => match pair.as_slice() {
            [Value::String(_), Value::String(new)] => Ok(new),
            _ => Err(DecodeError::UnexpectedFormat(format!(
                "field {field} is not an [old, new] pair of strings"
            ))),
        },
        _ => Err(DecodeError::UnexpectedFormat(format!(
            "field {field} has a non-string value"
        ))),
    }
}
