// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device command definitions.
//!
//! Each [`Command`] maps to one `STATE-SET` message whose `data` object sets
//! a fixed group of fields. A command is confirmed when every one of those
//! fields reads back the commanded value.
//!
//! | Command | Published data |
//! |---------|----------------|
//! | [`Command::EnableOscillation`] | `oson=ON`, `fpwr=ON`, `ancp=<mode>` |
//! | [`Command::DisableOscillation`] | `oson=OFF` |
//! | [`Command::EnableHumidification`] | `hume=HUMD` |
//! | [`Command::DisableHumidification`] | `hume=OFF` |
//! | [`Command::EnableHumidificationAutoMode`] | `haut=ON` |
//! | [`Command::DisableHumidificationAutoMode`] | `haut=OFF` |
//! | [`Command::SetHumidityTarget`] | `humt=<4 digits>` |
//! | [`Command::SetWaterHardness`] | `wath=<code>` |
//!
//! # Examples
//!
//! ```
//! use purehumid::command::Command;
//! use purehumid::types::OscillationMode;
//!
//! let cmd = Command::enable_oscillation(OscillationMode::Degree90).unwrap();
//! let data = cmd.encode().unwrap();
//!
//! assert_eq!(data["oson"], "ON");
//! assert_eq!(data["fpwr"], "ON");
//! assert_eq!(data["ancp"], "0090");
//!
//! // Off is not an angle the device can be told to sweep.
//! assert!(Command::enable_oscillation(OscillationMode::Off).is_err());
//! ```

use std::fmt;

use serde_json::{Map, Value};

use crate::codec::{self, Field, PropertyValue};
use crate::error::{EncodeError, ValidationError};
use crate::types::{HumidityTarget, OscillationMode, WaterHardness};

/// A command that changes device state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Turn oscillation on with the given sweep.
    EnableOscillation(OscillationMode),
    /// Turn oscillation off.
    DisableOscillation,
    /// Turn the humidifier on.
    EnableHumidification,
    /// Turn the humidifier off.
    DisableHumidification,
    /// Let the device pick its own humidity target.
    EnableHumidificationAutoMode,
    /// Use the manual humidity target.
    DisableHumidificationAutoMode,
    /// Set the manual humidity target.
    SetHumidityTarget(HumidityTarget),
    /// Declare the hardness of the water in the tank.
    SetWaterHardness(WaterHardness),
}

impl Command {
    /// Creates an oscillation command for one of the sweep angles.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::UnsupportedOscillationMode` for
    /// [`OscillationMode::Off`]; use [`Command::DisableOscillation`] instead.
    pub fn enable_oscillation(mode: OscillationMode) -> Result<Self, ValidationError> {
        match mode {
            OscillationMode::Off => Err(ValidationError::UnsupportedOscillationMode(mode)),
            angle => Ok(Self::EnableOscillation(angle)),
        }
    }

    /// Creates a humidity target command.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::OutOfRange` if `percent` is outside 0-100.
    pub fn set_humidity_target(percent: i32) -> Result<Self, ValidationError> {
        HumidityTarget::try_from(percent).map(Self::SetHumidityTarget)
    }

    /// Returns the command name used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::EnableOscillation(_) => "enable_oscillation",
            Self::DisableOscillation => "disable_oscillation",
            Self::EnableHumidification => "enable_humidification",
            Self::DisableHumidification => "disable_humidification",
            Self::EnableHumidificationAutoMode => "enable_humidification_auto_mode",
            Self::DisableHumidificationAutoMode => "disable_humidification_auto_mode",
            Self::SetHumidityTarget(_) => "set_humidity_target",
            Self::SetWaterHardness(_) => "set_water_hardness",
        }
    }

    /// Returns the fields this command sets, in publish order.
    ///
    /// These are also the values that must be read back before the command
    /// counts as confirmed.
    #[must_use]
    pub fn fields(&self) -> Vec<(Field, PropertyValue)> {
        match *self {
            Self::EnableOscillation(mode) => vec![
                (Field::Oscillation, PropertyValue::Bool(true)),
                (Field::Power, PropertyValue::Bool(true)),
                (Field::OscillationAngle, PropertyValue::Oscillation(mode)),
            ],
            Self::DisableOscillation => vec![(Field::Oscillation, PropertyValue::Bool(false))],
            Self::EnableHumidification => vec![(Field::Humidification, PropertyValue::Bool(true))],
            Self::DisableHumidification => {
                vec![(Field::Humidification, PropertyValue::Bool(false))]
            }
            Self::EnableHumidificationAutoMode => {
                vec![(Field::HumidificationAutoMode, PropertyValue::Bool(true))]
            }
            Self::DisableHumidificationAutoMode => {
                vec![(Field::HumidificationAutoMode, PropertyValue::Bool(false))]
            }
            Self::SetHumidityTarget(target) => {
                vec![(Field::HumidityTarget, PropertyValue::Humidity(target))]
            }
            Self::SetWaterHardness(hardness) => {
                vec![(Field::WaterHardness, PropertyValue::WaterHardness(hardness))]
            }
        }
    }

    /// Encodes the fields into the `data` object of a `STATE-SET` message.
    ///
    /// # Errors
    ///
    /// Returns `EncodeError` if a value cannot be represented on the wire,
    /// for example an oscillation angle of `Off` built directly through the
    /// enum variant.
    pub fn encode(&self) -> Result<Map<String, Value>, EncodeError> {
        self.fields()
            .iter()
            .map(|(field, value)| {
                let raw = codec::encode_field(*field, value)?;
                Ok((field.as_wire().to_string(), Value::String(raw)))
            })
            .collect()
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EnableOscillation(mode) => write!(f, "{}({mode})", self.name()),
            Self::SetHumidityTarget(target) => write!(f, "{}({target})", self.name()),
            Self::SetWaterHardness(hardness) => write!(f, "{}({hardness})", self.name()),
            _ => f.write_str(self.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded(cmd: Command) -> Vec<(String, String)> {
        cmd.encode()
            .unwrap()
            .into_iter()
            .map(|(k, v)| (k, v.as_str().unwrap().to_string()))
            .collect()
    }

    fn pairs(expected: &[(&str, &str)]) -> Vec<(String, String)> {
        expected
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn enable_oscillation_sets_power_and_angle() {
        for (mode, code) in [
            (OscillationMode::Breeze, "BRZE"),
            (OscillationMode::Degree45, "0045"),
            (OscillationMode::Degree90, "0090"),
        ] {
            let cmd = Command::enable_oscillation(mode).unwrap();
            assert_eq!(
                encoded(cmd),
                pairs(&[("oson", "ON"), ("fpwr", "ON"), ("ancp", code)])
            );
        }
    }

    #[test]
    fn enable_oscillation_rejects_off() {
        assert_eq!(
            Command::enable_oscillation(OscillationMode::Off),
            Err(ValidationError::UnsupportedOscillationMode(
                OscillationMode::Off
            ))
        );
    }

    #[test]
    fn off_angle_built_directly_fails_to_encode() {
        let err = Command::EnableOscillation(OscillationMode::Off)
            .encode()
            .unwrap_err();
        assert!(matches!(
            err,
            EncodeError::OutOfDomain {
                field: Field::OscillationAngle,
                ..
            }
        ));
    }

    #[test]
    fn disable_oscillation_only_touches_oson() {
        assert_eq!(
            encoded(Command::DisableOscillation),
            pairs(&[("oson", "OFF")])
        );
    }

    #[test]
    fn humidification_switches() {
        assert_eq!(
            encoded(Command::EnableHumidification),
            pairs(&[("hume", "HUMD")])
        );
        assert_eq!(
            encoded(Command::DisableHumidification),
            pairs(&[("hume", "OFF")])
        );
        assert_eq!(
            encoded(Command::EnableHumidificationAutoMode),
            pairs(&[("haut", "ON")])
        );
        assert_eq!(
            encoded(Command::DisableHumidificationAutoMode),
            pairs(&[("haut", "OFF")])
        );
    }

    #[test]
    fn humidity_target_is_zero_padded() {
        for (percent, raw) in [(0, "0000"), (5, "0005"), (50, "0050"), (100, "0100")] {
            let cmd = Command::set_humidity_target(percent).unwrap();
            assert_eq!(encoded(cmd), pairs(&[("humt", raw)]));
        }
    }

    #[test]
    fn humidity_target_out_of_range() {
        for percent in [-1, 101, 1000] {
            assert!(matches!(
                Command::set_humidity_target(percent),
                Err(ValidationError::OutOfRange { min: 0, max: 100, .. })
            ));
        }
    }

    #[test]
    fn water_hardness_codes() {
        for (hardness, code) in [
            (WaterHardness::Soft, "2025"),
            (WaterHardness::Medium, "1350"),
            (WaterHardness::Hard, "0675"),
        ] {
            assert_eq!(
                encoded(Command::SetWaterHardness(hardness)),
                pairs(&[("wath", code)])
            );
        }
    }

    #[test]
    fn every_command_writes_settable_fields_only() {
        let commands = [
            Command::EnableOscillation(OscillationMode::Breeze),
            Command::DisableOscillation,
            Command::EnableHumidification,
            Command::DisableHumidification,
            Command::EnableHumidificationAutoMode,
            Command::DisableHumidificationAutoMode,
            Command::SetHumidityTarget(HumidityTarget::MAX),
            Command::SetWaterHardness(WaterHardness::Hard),
        ];
        for cmd in commands {
            assert!(cmd.fields().iter().all(|(field, _)| field.is_settable()));
        }
    }

    #[test]
    fn display() {
        assert_eq!(Command::DisableOscillation.to_string(), "disable_oscillation");
        assert_eq!(
            Command::set_humidity_target(40).unwrap().to_string(),
            "set_humidity_target(40%)"
        );
        assert_eq!(
            Command::SetWaterHardness(WaterHardness::Soft).to_string(),
            "set_water_hardness(soft)"
        );
    }
}
