// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `purehumid` - state sync and control for Dyson Pure Humidify+Cool fans.
//!
//! The fan speaks JSON over MQTT. It reports its state as a map of short
//! field codes (`oson`, `hume`, `humt`, ...) with string values, and accepts
//! `STATE-SET` messages carrying the same codes. This library keeps a typed
//! mirror of that state and turns method calls into confirmed state changes.
//!
//! # Supported Features
//!
//! - **Oscillation**: on/off, breeze or a fixed 45°/90° sweep
//! - **Humidification**: on/off, auto mode, target humidity (0-100%)
//! - **Water hardness**: soft, medium, hard
//! - **Environment**: humidity, temperature, particulates, VOC and NO2
//! - **Observers**: per-property change callbacks
//!
//! # Quick Start
//!
//! ```no_run
//! use std::time::Duration;
//! use purehumid::{Device, DeviceConfig};
//! use purehumid::types::OscillationMode;
//!
//! #[tokio::main]
//! async fn main() -> purehumid::Result<()> {
//!     let config = DeviceConfig::new("NK6-EU-MHA0000A").with_credential("device-password");
//!     let device = Device::mqtt("mqtt://192.168.1.50:1883", config).build().await?;
//!
//!     device.wait_for_state(Duration::from_secs(5)).await?;
//!
//!     // Returns once the fan reports oson=ON, fpwr=ON and ancp=0090.
//!     device.enable_oscillation(OscillationMode::Degree90).await?;
//!     device.set_humidity_target(50).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Event Subscriptions
//!
//! ```no_run
//! use purehumid::{Device, DeviceConfig, Subscribable};
//!
//! # async fn example() -> purehumid::Result<()> {
//! let device = Device::mqtt("mqtt://192.168.1.50:1883", DeviceConfig::new("NK6-EU-MHA0000A"))
//!     .build()
//!     .await?;
//!
//! device.on_property_changed(|field, _old, new| {
//!     println!("{} is now {new}", field.name());
//! });
//!
//! device.on_environment_updated(|data| {
//!     println!("humidity: {:?}%", data.humidity());
//! });
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod command;
mod device;
pub mod error;
pub mod protocol;
pub mod state;
pub mod subscription;
pub mod telemetry;
pub mod types;

pub use codec::{Field, PropertyValue};
pub use command::Command;
#[cfg(feature = "mqtt")]
pub use device::MqttDeviceBuilder;
pub use device::{DEFAULT_COMMAND_TIMEOUT, Device, DeviceConfig, PURE_HUMIDIFY_COOL};
pub use error::{DecodeError, EncodeError, Error, ProtocolError, Result, ValidationError};
pub use protocol::Transport;
pub use state::{DeviceState, PropertyChange, StateChange, StateStore};
pub use subscription::{CallbackRegistry, Subscribable, SubscriptionId};
pub use telemetry::EnvironmentalData;
pub use types::{HumidityTarget, OscillationMode, WaterHardness};
