// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wire field table.

use std::fmt;

/// Token the device uses for "off" in every switch field.
pub(crate) const OFF: &str = "OFF";

/// A device property, identified on the wire by a short field token.
///
/// | variant | token | domain |
/// |---|---|---|
/// | `Oscillation` | `oson` | `ON` / `OFF` |
/// | `OscillationAngle` | `ancp` | `BRZE`, `0045`, `0090` |
/// | `Humidification` | `hume` | `HUMD` / `OFF` |
/// | `HumidificationAutoMode` | `haut` | `ON` / `OFF` |
/// | `HumidityTarget` | `humt` | 4-digit percentage |
/// | `AutoHumidityTarget` | `rect` | 4-digit percentage |
/// | `WaterHardness` | `wath` | `2025`, `1350`, `0675` |
/// | `Power` | `fpwr` | `ON` / `OFF` |
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    /// Oscillation enabled.
    Oscillation,
    /// Oscillation angle.
    OscillationAngle,
    /// Humidification enabled.
    Humidification,
    /// Humidification auto mode.
    HumidificationAutoMode,
    /// Manual humidity target.
    HumidityTarget,
    /// Humidity target chosen in auto mode.
    AutoHumidityTarget,
    /// Water hardness.
    WaterHardness,
    /// Fan power.
    Power,
}

/// Shape of the values a field carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FieldKind {
    /// Two-token switch; `on` is the token for `true`, "OFF" for `false`.
    Switch { on: &'static str },
    /// Fixed-width zero-padded percentage.
    Percent,
    /// Oscillation angle table.
    Oscillation,
    /// Water hardness table.
    WaterHardness,
}

impl FieldKind {
    pub(crate) const fn type_name(self) -> &'static str {
        match self {
            Self::Switch { .. } => "boolean",
            Self::Percent => "percentage",
            Self::Oscillation => "oscillation mode",
            Self::WaterHardness => "water hardness",
        }
    }
}

impl Field {
    /// Every known field.
    pub const ALL: [Self; 8] = [
        Self::Oscillation,
        Self::OscillationAngle,
        Self::Humidification,
        Self::HumidificationAutoMode,
        Self::HumidityTarget,
        Self::AutoHumidityTarget,
        Self::WaterHardness,
        Self::Power,
    ];

    /// Returns the wire token.
    #[must_use]
    pub const fn as_wire(&self) -> &'static str {
        match self {
            Self::Oscillation => "oson",
            Self::OscillationAngle => "ancp",
            Self::Humidification => "hume",
            Self::HumidificationAutoMode => "haut",
            Self::HumidityTarget => "humt",
            Self::AutoHumidityTarget => "rect",
            Self::WaterHardness => "wath",
            Self::Power => "fpwr",
        }
    }

    /// Looks up a field by its wire token.
    #[must_use]
    pub fn from_wire(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_wire() == token)
    }

    /// Returns the property name, e.g. `"humidity_target"`.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Oscillation => "oscillation",
            Self::OscillationAngle => "oscillation_angle",
            Self::Humidification => "humidification",
            Self::HumidificationAutoMode => "humidification_auto_mode",
            Self::HumidityTarget => "humidity_target",
            Self::AutoHumidityTarget => "auto_humidity_target",
            Self::WaterHardness => "water_hardness",
            Self::Power => "power",
        }
    }

    /// Returns `true` if commands may write this field.
    ///
    /// The auto humidity target is chosen by the device.
    #[must_use]
    pub const fn is_settable(&self) -> bool {
        !matches!(self, Self::AutoHumidityTarget)
    }

    pub(crate) const fn kind(self) -> FieldKind {
        match self {
            Self::Oscillation | Self::HumidificationAutoMode | Self::Power => {
                FieldKind::Switch { on: "ON" }
            }
            Self::Humidification => FieldKind::Switch { on: "HUMD" },
            Self::HumidityTarget | Self::AutoHumidityTarget => FieldKind::Percent,
            Self::OscillationAngle => FieldKind::Oscillation,
            Self::WaterHardness => FieldKind::WaterHardness,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_tokens_round_trip() {
        for field in Field::ALL {
            assert_eq!(Field::from_wire(field.as_wire()), Some(field));
        }
    }

    #[test]
    fn unknown_token() {
        assert_eq!(Field::from_wire("fnsp"), None);
        assert_eq!(Field::from_wire("OSON"), None);
    }

    #[test]
    fn humidification_uses_humd_token() {
        assert_eq!(
            Field::Humidification.kind(),
            FieldKind::Switch { on: "HUMD" }
        );
    }

    #[test]
    fn auto_target_is_read_only() {
        assert!(!Field::AutoHumidityTarget.is_settable());
        assert!(Field::HumidityTarget.is_settable());
    }
}
