// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Transports carrying messages to and from the device.
//!
//! A [`Transport`] only publishes. Delivery runs the other way: whatever
//! receives the device's status messages hands them to a
//! [`StateStore`](crate::state::StateStore), which the command layer watches
//! for confirmation.
//!
//! - [`MqttTransport`]: talks to the device through an MQTT broker (feature
//!   `mqtt`, enabled by default)

pub mod message;
#[cfg(feature = "mqtt")]
mod mqtt;

#[cfg(feature = "mqtt")]
pub use mqtt::{MqttTransport, MqttTransportBuilder};

use crate::error::ProtocolError;

/// Trait for transports that can deliver messages to the device.
///
/// Implementations own the destination (for MQTT, the device's command
/// topic), so callers only supply the JSON payload.
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// Publishes one message to the device.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the message could not be handed to the
    /// underlying connection.
    async fn publish(&self, payload: &str) -> Result<(), ProtocolError>;
}
