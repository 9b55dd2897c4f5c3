// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Oscillation mode of the fan head.

use std::fmt;

/// Oscillation pattern of the fan.
///
/// The device reports the angle in the `ancp` field and whether oscillation
/// is running at all in the separate `oson` field. [`OscillationMode::Off`]
/// has no `ancp` code; it is what the combined reading yields when `oson` is
/// `OFF`.
///
/// # Examples
///
/// ```
/// use purehumid::types::OscillationMode;
///
/// assert_eq!(OscillationMode::Degree45.wire_code(), Some("0045"));
/// assert_eq!(OscillationMode::from_wire("BRZE"), Some(OscillationMode::Breeze));
/// assert_eq!(OscillationMode::Off.wire_code(), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OscillationMode {
    /// Breeze pattern, the device's default.
    #[default]
    Breeze,
    /// Sweep over 45 degrees.
    Degree45,
    /// Sweep over 90 degrees.
    Degree90,
    /// Oscillation disabled.
    Off,
}

impl OscillationMode {
    /// Modes that have a wire code.
    pub const ANGLES: [Self; 3] = [Self::Breeze, Self::Degree45, Self::Degree90];

    /// Returns the `ancp` wire code, or `None` for [`OscillationMode::Off`].
    #[must_use]
    pub const fn wire_code(&self) -> Option<&'static str> {
        match self {
            Self::Breeze => Some("BRZE"),
            Self::Degree45 => Some("0045"),
            Self::Degree90 => Some("0090"),
            Self::Off => None,
        }
    }

    /// Looks up a mode by its `ancp` wire code. Matching is exact.
    #[must_use]
    pub fn from_wire(code: &str) -> Option<Self> {
        Self::ANGLES
            .into_iter()
            .find(|mode| mode.wire_code() == Some(code))
    }
}

impl fmt::Display for OscillationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Breeze => "breeze",
            Self::Degree45 => "45°",
            Self::Degree90 => "90°",
            Self::Off => "off",
        };
        f.write_str(name)
    }
}
