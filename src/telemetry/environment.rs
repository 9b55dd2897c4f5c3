// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Parser for environmental sensor data.

use serde_json::{Map, Value};

use crate::error::DecodeError;

/// Readings reported as unavailable while sensors warm up or are disabled.
const UNAVAILABLE: [&str; 2] = ["OFF", "INIT"];

/// Sensor readings from an `ENVIRONMENTAL-CURRENT-SENSOR-DATA` message.
///
/// Every reading is optional: the device reports `OFF` or `INIT` for sensors
/// that are not ready, and older firmware omits some of them.
///
/// # Examples
///
/// ```
/// use purehumid::telemetry::EnvironmentalData;
///
/// let json = r#"{"hact":"0030","tact":"2950","pm25":"0005","va10":"INIT"}"#;
/// let data = EnvironmentalData::from_json(json).unwrap();
///
/// assert_eq!(data.humidity(), Some(30));
/// assert_eq!(data.temperature_kelvin(), Some(295.0));
/// assert_eq!(data.pm25(), Some(5));
/// assert_eq!(data.voc(), None);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnvironmentalData {
    humidity: Option<u16>,
    temperature: Option<u16>,
    pm25: Option<u16>,
    pm10: Option<u16>,
    voc: Option<u16>,
    nox: Option<u16>,
}

impl EnvironmentalData {
    /// Parses the `data` member of an environmental message.
    ///
    /// # Errors
    ///
    /// Returns `DecodeError` if a reading is neither a decimal number nor an
    /// "unavailable" marker.
    pub fn from_map(data: &Map<String, Value>) -> Result<Self, DecodeError> {
        Ok(Self {
            humidity: reading(data, "hact")?,
            temperature: reading(data, "tact")?,
            pm25: reading(data, "pm25")?,
            pm10: reading(data, "pm10")?,
            voc: reading(data, "va10")?,
            nox: reading(data, "noxl")?,
        })
    }

    /// Parses a JSON object of readings.
    ///
    /// # Errors
    ///
    /// Returns `DecodeError` if the JSON is malformed or a reading is invalid.
    pub fn from_json(json: &str) -> Result<Self, DecodeError> {
        let data: Map<String, Value> = serde_json::from_str(json)?;
        Self::from_map(&data)
    }

    /// Relative humidity in percent.
    #[must_use]
    pub fn humidity(&self) -> Option<u16> {
        self.humidity
    }

    /// Temperature in kelvin. The device reports tenths of a kelvin.
    #[must_use]
    pub fn temperature_kelvin(&self) -> Option<f32> {
        self.temperature.map(|t| f32::from(t) / 10.0)
    }

    /// Temperature in degrees Celsius.
    #[must_use]
    pub fn temperature_celsius(&self) -> Option<f32> {
        self.temperature_kelvin().map(|k| k - 273.15)
    }

    /// PM2.5 concentration in µg/m³.
    #[must_use]
    pub fn pm25(&self) -> Option<u16> {
        self.pm25
    }

    /// PM10 concentration in µg/m³.
    #[must_use]
    pub fn pm10(&self) -> Option<u16> {
        self.pm10
    }

    /// Volatile organic compounds index.
    #[must_use]
    pub fn voc(&self) -> Option<u16> {
        self.voc
    }

    /// Nitrogen dioxide index.
    #[must_use]
    pub fn nox(&self) -> Option<u16> {
        self.nox
    }
}

fn reading(data: &Map<String, Value>, key: &str) -> Result<Option<u16>, DecodeError> {
    let Some(value) = data.get(key) else {
        return Ok(None);
    };
    let Value::String(raw) = value else {
        return Err(DecodeError::UnexpectedFormat(format!(
            "sensor reading {key} is not a string"
        )));
    };

    if UNAVAILABLE.contains(&raw.as_str()) {
        return Ok(None);
    }
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DecodeError::InvalidNumber {
            field: key.to_string(),
            value: raw.clone(),
        });
    }
    raw.parse().map(Some).map_err(|_| DecodeError::OutOfRange {
        field: key.to_string(),
        value: raw.clone(),
    })
}
