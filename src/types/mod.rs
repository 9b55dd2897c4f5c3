// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for fan control.
//!
//! Each type only admits values the device accepts, so commands built from
//! them cannot carry out-of-domain arguments.
//!
//! # Types
//!
//! - [`OscillationMode`] - Breeze, 45°, 90° or off
//! - [`WaterHardness`] - Soft, medium or hard water
//! - [`HumidityTarget`] - Relative humidity target (0-100%)

mod humidity;
mod oscillation;
mod water_hardness;

pub use humidity::HumidityTarget;
pub use oscillation::OscillationMode;
pub use water_hardness::WaterHardness;
