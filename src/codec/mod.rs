// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Translation between raw wire values and typed properties.
//!
//! The device protocol carries every property as a short string:
//!
//! - switches use `"ON"`/`"OFF"`, except humidification which uses
//!   `"HUMD"`/`"OFF"`
//! - enumerations use fixed uppercase tokens (`"BRZE"`, `"0045"`, `"2025"`)
//! - percentages are 4-digit zero-padded decimals (`50` is `"0050"`)
//!
//! Matching is exact. A token outside a field's vocabulary is a
//! [`DecodeError`]; it is never coerced.
//!
//! # Examples
//!
//! ```
//! use purehumid::codec::{decode_field, encode_field, Field, PropertyValue};
//! use purehumid::types::{HumidityTarget, WaterHardness};
//!
//! let value = decode_field(Field::WaterHardness, "1350").unwrap();
//! assert_eq!(value, PropertyValue::WaterHardness(WaterHardness::Medium));
//!
//! let target = PropertyValue::Humidity(HumidityTarget::new(50).unwrap());
//! assert_eq!(encode_field(Field::HumidityTarget, &target).unwrap(), "0050");
//!
//! assert!(decode_field(Field::Oscillation, "1").is_err());
//! ```

mod field;
mod value;

pub use field::Field;
pub use value::PropertyValue;

use field::{FieldKind, OFF};

use crate::error::{DecodeError, EncodeError};
use crate::types::{HumidityTarget, OscillationMode, WaterHardness};

/// Digits in a percentage field.
const PERCENT_WIDTH: usize = 4;

/// Decodes a raw wire value for `field`.
///
/// # Errors
///
/// Returns `DecodeError` if `raw` is not a token of the field's vocabulary,
/// is not exactly four decimal digits for a percentage field, or is a
/// percentage above 100.
pub fn decode_field(field: Field, raw: &str) -> Result<PropertyValue, DecodeError> {
    match field.kind() {
        FieldKind::Switch { on } if raw == on => Ok(PropertyValue::Bool(true)),
        FieldKind::Switch { .. } if raw == OFF => Ok(PropertyValue::Bool(false)),
        FieldKind::Switch { .. } => Err(unknown_token(field, raw)),
        FieldKind::Percent => decode_percent(field, raw).map(PropertyValue::Humidity),
        FieldKind::Oscillation => OscillationMode::from_wire(raw)
            .map(PropertyValue::Oscillation)
            .ok_or_else(|| unknown_token(field, raw)),
        FieldKind::WaterHardness => WaterHardness::from_wire(raw)
            .map(PropertyValue::WaterHardness)
            .ok_or_else(|| unknown_token(field, raw)),
    }
}

/// Encodes a typed value for `field`.
///
/// # Errors
///
/// Returns `EncodeError::TypeMismatch` if the value's type does not match
/// the field, or `EncodeError::OutOfDomain` if the value has no wire code
/// (e.g. [`OscillationMode::Off`] for the angle field).
pub fn encode_field(field: Field, value: &PropertyValue) -> Result<String, EncodeError> {
    match (field.kind(), value) {
        (FieldKind::Switch { on }, PropertyValue::Bool(enabled)) => {
            Ok(if *enabled { on } else { OFF }.to_string())
        }
        (FieldKind::Percent, PropertyValue::Humidity(target)) => Ok(format!(
            "{:0width$}",
            target.value(),
            width = PERCENT_WIDTH
        )),
        (FieldKind::Oscillation, PropertyValue::Oscillation(mode)) => mode
            .wire_code()
            .map(str::to_string)
            .ok_or_else(|| EncodeError::OutOfDomain {
                field,
                value: mode.to_string(),
            }),
        (FieldKind::WaterHardness, PropertyValue::WaterHardness(hardness)) => {
            Ok(hardness.wire_code().to_string())
        }
        (kind, _) => Err(EncodeError::TypeMismatch {
            field,
            expected: kind.type_name(),
        }),
    }
}

/// Parses a fixed-width percentage; width mismatches are errors, not
/// truncations.
fn decode_percent(field: Field, raw: &str) -> Result<HumidityTarget, DecodeError> {
    if raw.len() != PERCENT_WIDTH || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DecodeError::InvalidNumber {
            field: field.as_wire().to_string(),
            value: raw.to_string(),
        });
    }

    raw.parse::<u8>()
        .ok()
        .and_then(|v| HumidityTarget::new(v).ok())
        .ok_or_else(|| DecodeError::OutOfRange {
            field: field.as_wire().to_string(),
            value: raw.to_string(),
        })
}

fn unknown_token(field: Field, raw: &str) -> DecodeError {
    DecodeError::UnknownToken {
        field: field.as_wire().to_string(),
        value: raw.to_string(),
    }
}
