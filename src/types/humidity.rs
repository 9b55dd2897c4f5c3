// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Relative humidity target.

use std::fmt;

use crate::error::ValidationError;

/// Relative humidity target as a percentage (0-100).
///
/// Used for both the manual target (`humt`) and the target the device picks
/// in auto mode (`rect`).
///
/// # Examples
///
/// ```
/// use purehumid::types::HumidityTarget;
///
/// let target = HumidityTarget::new(50).unwrap();
/// assert_eq!(target.value(), 50);
///
/// assert!(HumidityTarget::new(101).is_err());
/// assert!(HumidityTarget::try_from(-1_i32).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HumidityTarget(u8);

impl HumidityTarget {
    /// Lowest target (0%).
    pub const MIN: Self = Self(0);

    /// Highest target (100%).
    pub const MAX: Self = Self(100);

    /// Creates a new humidity target.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::OutOfRange` if value exceeds 100.
    pub fn new(value: u8) -> Result<Self, ValidationError> {
        if value > Self::MAX.0 {
            return Err(ValidationError::OutOfRange {
                min: 0,
                max: 100,
                actual: i64::from(value),
            });
        }
        Ok(Self(value))
    }

    /// Returns the percentage.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for HumidityTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl TryFrom<u8> for HumidityTarget {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<i32> for HumidityTarget {
    type Error = ValidationError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .ok()
            .and_then(|v| Self::new(v).ok())
            .ok_or(ValidationError::OutOfRange {
                min: 0,
                max: 100,
                actual: i64::from(value),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_values() {
        for v in 0..=100 {
            assert_eq!(HumidityTarget::new(v).unwrap().value(), v);
        }
    }

    #[test]
    fn out_of_range() {
        assert_eq!(
            HumidityTarget::try_from(101_i32),
            Err(ValidationError::OutOfRange {
                min: 0,
                max: 100,
                actual: 101
            })
        );
        assert_eq!(
            HumidityTarget::try_from(-1_i32),
            Err(ValidationError::OutOfRange {
                min: 0,
                max: 100,
                actual: -1
            })
        );
        assert!(HumidityTarget::try_from(300_i32).is_err());
    }

    #[test]
    fn display() {
        assert_eq!(HumidityTarget::new(45).unwrap().to_string(), "45%");
    }
}
