// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device state tracking.

use std::collections::BTreeMap;

use crate::codec::{self, Field, PropertyValue};
use crate::error::DecodeError;
use crate::telemetry::EnvironmentalData;
use crate::types::{HumidityTarget, OscillationMode, WaterHardness};

use super::{PropertyChange, StateChange};

/// Tracked state of a fan.
///
/// Holds the status snapshot (every raw field value last reported, including
/// fields this library does not interpret) and the decoded value of each
/// known property. Everything starts unknown and is filled in by the first
/// `CURRENT-STATE` message.
///
/// # Examples
///
/// ```
/// use purehumid::state::{DeviceState, StateChange};
/// use purehumid::types::WaterHardness;
///
/// let mut state = DeviceState::new();
/// state.apply(&StateChange::new().with("wath", "0675")).unwrap();
///
/// assert_eq!(state.water_hardness(), Some(WaterHardness::Hard));
/// assert_eq!(state.raw("wath"), Some("0675"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeviceState {
    /// Raw wire values by field token.
    snapshot: BTreeMap<String, String>,
    /// Decoded values of known fields.
    properties: BTreeMap<Field, PropertyValue>,
    /// Last environmental readings.
    environment: Option<EnvironmentalData>,
}

impl DeviceState {
    /// Creates a new empty device state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` until the device has reported any field.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshot.is_empty()
    }

    /// Returns the raw value last reported for a field token.
    #[must_use]
    pub fn raw(&self, field: &str) -> Option<&str> {
        self.snapshot.get(field).map(String::as_str)
    }

    /// Returns the full status snapshot.
    #[must_use]
    pub fn snapshot(&self) -> &BTreeMap<String, String> {
        &self.snapshot
    }

    /// Returns the decoded value of a property.
    #[must_use]
    pub fn get(&self, field: Field) -> Option<PropertyValue> {
        self.properties.get(&field).copied()
    }

    /// Returns `true` if every given property currently holds the given value.
    #[must_use]
    pub fn matches(&self, expected: &[(Field, PropertyValue)]) -> bool {
        expected
            .iter()
            .all(|(field, value)| self.get(*field) == Some(*value))
    }

    // ========== Properties ==========

    /// Whether oscillation is enabled.
    #[must_use]
    pub fn oscillation(&self) -> Option<bool> {
        self.get(Field::Oscillation)?.as_bool()
    }

    /// The configured oscillation angle, reported even while oscillation is off.
    #[must_use]
    pub fn oscillation_angle(&self) -> Option<OscillationMode> {
        self.get(Field::OscillationAngle)?.as_oscillation()
    }

    /// The effective oscillation mode: [`OscillationMode::Off`] when
    /// oscillation is disabled, otherwise the configured angle.
    #[must_use]
    pub fn oscillation_mode(&self) -> Option<OscillationMode> {
        if self.oscillation()? {
            self.oscillation_angle()
        } else {
            Some(OscillationMode::Off)
        }
    }

    /// Whether humidification is enabled.
    #[must_use]
    pub fn humidification(&self) -> Option<bool> {
        self.get(Field::Humidification)?.as_bool()
    }

    /// Whether humidification runs in auto mode.
    #[must_use]
    pub fn humidification_auto_mode(&self) -> Option<bool> {
        self.get(Field::HumidificationAutoMode)?.as_bool()
    }

    /// The manual humidity target.
    #[must_use]
    pub fn humidity_target(&self) -> Option<HumidityTarget> {
        self.get(Field::HumidityTarget)?.as_humidity()
    }

    /// The humidity target chosen by the device in auto mode.
    #[must_use]
    pub fn auto_humidity_target(&self) -> Option<HumidityTarget> {
        self.get(Field::AutoHumidityTarget)?.as_humidity()
    }

    /// The configured water hardness.
    #[must_use]
    pub fn water_hardness(&self) -> Option<WaterHardness> {
        self.get(Field::WaterHardness)?.as_water_hardness()
    }

    /// Whether the fan is powered.
    #[must_use]
    pub fn power(&self) -> Option<bool> {
        self.get(Field::Power)?.as_bool()
    }

    // ========== Environment ==========

    /// Returns the last environmental readings.
    #[must_use]
    pub fn environment(&self) -> Option<&EnvironmentalData> {
        self.environment.as_ref()
    }

    /// Replaces the environmental readings.
    pub fn set_environment(&mut self, data: EnvironmentalData) {
        self.environment = Some(data);
    }

    // ========== State Changes ==========

    /// Merges a batch of raw field values into the state.
    ///
    /// Only the fields in the batch are touched. A field repeated in the
    /// batch takes its last value. Known fields are decoded first; if any of
    /// them fails, nothing is stored. Unknown fields are kept in the snapshot
    /// as-is.
    ///
    /// # Returns
    ///
    /// One [`PropertyChange`] per known field whose decoded value differs
    /// from the value held before the batch, in arrival order.
    ///
    /// # Errors
    ///
    /// Returns `DecodeError` if a known field carries an invalid value.
    pub fn apply(&mut self, change: &StateChange) -> Result<Vec<PropertyChange>, DecodeError> {
        let decoded = change
            .latest()
            .into_iter()
            .map(|(name, raw)| -> Result<_, DecodeError> {
                let property = match Field::from_wire(name) {
                    Some(field) => Some((field, codec::decode_field(field, raw)?)),
                    None => None,
                };
                Ok((name, raw, property))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut changes = Vec::new();
        for (name, raw, property) in decoded {
            self.snapshot.insert(name.to_string(), raw.to_string());

            if let Some((field, new)) = property {
                let old = self.properties.insert(field, new);
                if old != Some(new) {
                    changes.push(PropertyChange { field, old, new });
                }
            }
        }

        Ok(changes)
    }

    /// Clears all state, resetting to unknown.
    pub fn clear(&mut self) {
        *self = Self::new();
    }
}
