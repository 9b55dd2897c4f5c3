// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Typed property values.

use std::fmt;

use crate::types::{HumidityTarget, OscillationMode, WaterHardness};

/// A decoded property value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyValue {
    /// Switch state.
    Bool(bool),
    /// Humidity percentage.
    Humidity(HumidityTarget),
    /// Oscillation angle.
    Oscillation(OscillationMode),
    /// Water hardness.
    WaterHardness(WaterHardness),
}

impl PropertyValue {
    /// Returns the switch state, if this is one.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the humidity percentage, if this is one.
    #[must_use]
    pub const fn as_humidity(&self) -> Option<HumidityTarget> {
        match self {
            Self::Humidity(h) => Some(*h),
            _ => None,
        }
    }

    /// Returns the oscillation mode, if this is one.
    #[must_use]
    pub const fn as_oscillation(&self) -> Option<OscillationMode> {
        match self {
            Self::Oscillation(m) => Some(*m),
            _ => None,
        }
    }

    /// Returns the water hardness, if this is one.
    #[must_use]
    pub const fn as_water_hardness(&self) -> Option<WaterHardness> {
        match self {
            Self::WaterHardness(h) => Some(*h),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Humidity(h) => write!(f, "{h}"),
            Self::Oscillation(m) => write!(f, "{m}"),
            Self::WaterHardness(h) => write!(f, "{h}"),
        }
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<HumidityTarget> for PropertyValue {
    fn from(value: HumidityTarget) -> Self {
        Self::Humidity(value)
    }
}

impl From<OscillationMode> for PropertyValue {
    fn from(value: OscillationMode) -> Self {
        Self::Oscillation(value)
    }
}

impl From<WaterHardness> for PropertyValue {
    fn from(value: WaterHardness) -> Self {
        Self::WaterHardness(value)
    }
}
