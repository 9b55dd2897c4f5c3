// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Water hardness setting used by the humidifier's descaling logic.

use std::fmt;

/// Hardness of the water poured into the tank.
///
/// The wire codes are opaque tokens; their numeric look does not imply an
/// ordering.
///
/// # Examples
///
/// ```
/// use purehumid::types::WaterHardness;
///
/// assert_eq!(WaterHardness::Medium.wire_code(), "1350");
/// assert_eq!(WaterHardness::from_wire("0675"), Some(WaterHardness::Hard));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WaterHardness {
    /// Soft water.
    Soft,
    /// Medium water.
    Medium,
    /// Hard water.
    Hard,
}

impl WaterHardness {
    /// All hardness levels.
    pub const ALL: [Self; 3] = [Self::Soft, Self::Medium, Self::Hard];

    /// Returns the `wath` wire code.
    #[must_use]
    pub const fn wire_code(&self) -> &'static str {
        match self {
            Self::Soft => "2025",
            Self::Medium => "1350",
            Self::Hard => "0675",
        }
    }

    /// Looks up a hardness level by its wire code.
    #[must_use]
    pub fn from_wire(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|h| h.wire_code() == code)
    }
}

impl fmt::Display for WaterHardness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Soft => "soft",
            Self::Medium => "medium",
            Self::Hard => "hard",
        };
        f.write_str(name)
    }
}
