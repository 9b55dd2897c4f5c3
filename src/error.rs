// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `purehumid` library.
//!
//! The hierarchy separates the ways an interaction with the fan can fail:
//! a caller argument outside its domain, a typed value that has no wire
//! encoding, a wire token that cannot be decoded, a transport failure, and a
//! command that was published but never confirmed.

use thiserror::Error;

use crate::codec::Field;
use crate::types::OscillationMode;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// A command argument failed validation. Nothing was published.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A typed value could not be encoded for the wire. Nothing was published.
    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),

    /// A wire value could not be decoded.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// The transport failed.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// The command was published but the device never reported the
    /// commanded values.
    #[error("command not confirmed after {timeout_ms} ms (fields: {fields})")]
    CommandTimeout {
        /// How long the command waited, in milliseconds.
        timeout_ms: u64,
        /// Wire names of the fields that were awaited, comma separated.
        fields: String,
    },
}

/// Errors raised when a caller supplies an out-of-domain argument.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A numeric value is outside the allowed range.
    #[error("value {actual} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Minimum allowed value.
        min: i64,
        /// Maximum allowed value.
        max: i64,
        /// The value that was provided.
        actual: i64,
    },

    /// The oscillation mode cannot be requested from the device.
    #[error("oscillation mode {0} cannot be enabled")]
    UnsupportedOscillationMode(OscillationMode),
}

/// Errors raised when a typed value has no representation on the wire.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// The value is of the right type but has no wire code for this field.
    #[error("value {value} cannot be encoded for field {field}")]
    OutOfDomain {
        /// The target field.
        field: Field,
        /// Display form of the rejected value.
        value: String,
    },

    /// The value is of a different type than the field holds.
    #[error("field {field} expects a {expected} value")]
    TypeMismatch {
        /// The target field.
        field: Field,
        /// Name of the type the field holds.
        expected: &'static str,
    },
}

/// Errors raised while decoding payloads received from the device.
///
/// These indicate protocol drift: the device sent something this library
/// does not understand.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The token is not part of the field's vocabulary.
    #[error("unrecognized value {value:?} for field {field}")]
    UnknownToken {
        /// Wire name of the field.
        field: String,
        /// The raw value received.
        value: String,
    },

    /// The value is not a fixed-width decimal number.
    #[error("malformed number {value:?} for field {field}")]
    InvalidNumber {
        /// Wire name of the field.
        field: String,
        /// The raw value received.
        value: String,
    },

    /// The number parsed but is outside the field's domain.
    #[error("value {value:?} is out of range for field {field}")]
    OutOfRange {
        /// Wire name of the field.
        field: String,
        /// The raw value received.
        value: String,
    },

    /// Expected member is missing from the message.
    #[error("missing member in message: {0}")]
    MissingField(String),

    /// The message does not have the expected shape.
    #[error("unexpected message format: {0}")]
    UnexpectedFormat(String),
}

/// Errors related to the transport carrying messages to and from the device.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// MQTT client failure.
    #[cfg(feature = "mqtt")]
    #[error("MQTT error: {0}")]
    Mqtt(#[from] rumqttc::ClientError),

    /// The transport could not reach the device.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Invalid broker URL or address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Waiting for the device timed out.
    #[error("timed out after {0} ms")]
    Timeout(u64),

    /// Internal channel was closed.
    #[error("channel closed: {0}")]
    ChannelClosed(String),

    /// An outbound message could not be serialized.
    #[error("message serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_display() {
        let err = ValidationError::OutOfRange {
            min: 0,
            max: 100,
            actual: 101,
        };
        assert_eq!(err.to_string(), "value 101 is out of range [0, 100]");
    }

    #[test]
    fn error_from_validation_error() {
        let err: Error = ValidationError::UnsupportedOscillationMode(OscillationMode::Off).into();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::UnsupportedOscillationMode(
                OscillationMode::Off
            ))
        ));
    }

    #[test]
    fn decode_error_display() {
        let err = DecodeError::UnknownToken {
            field: "wath".to_string(),
            value: "9999".to_string(),
        };
        assert_eq!(err.to_string(), "unrecognized value \"9999\" for field wath");
    }

    #[test]
    fn encode_error_display() {
        let err = EncodeError::TypeMismatch {
            field: Field::HumidityTarget,
            expected: "percentage",
        };
        assert_eq!(err.to_string(), "field humt expects a percentage value");
    }

    #[test]
    fn command_timeout_display() {
        let err = Error::CommandTimeout {
            timeout_ms: 10_000,
            fields: "oson,fpwr,ancp".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "command not confirmed after 10000 ms (fields: oson,fpwr,ancp)"
        );
    }

    #[test]
    fn serialization_error_is_a_protocol_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = Error::from(ProtocolError::from(json_err));

        assert!(matches!(err, Error::Protocol(ProtocolError::Serialization(_))));
        assert!(err.to_string().contains("message serialization failed"));
    }
}
