// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! MQTT device builder.

use std::sync::Arc;
use std::time::Duration;

use crate::device::{Device, DeviceConfig};
use crate::error::Error;
use crate::protocol::{MqttTransport, MqttTransportBuilder};
use crate::state::StateStore;

/// Builder for devices reached through an MQTT broker.
///
/// The broker is usually the one running on the fan itself. When the config
/// carries a credential, the serial number and credential are used as
/// username and password.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use purehumid::{Device, DeviceConfig};
///
/// # async fn example() -> purehumid::Result<()> {
/// let config = DeviceConfig::new("NK6-EU-MHA0000A").with_credential("device-password");
/// let device = Device::mqtt("mqtt://192.168.1.50:1883", config)
///     .with_keep_alive(Duration::from_secs(15))
///     .build()
///     .await?;
///
/// device.wait_for_state(Duration::from_secs(5)).await?;
/// device.enable_humidification().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct MqttDeviceBuilder {
    broker: String,
    config: DeviceConfig,
    client_id: Option<String>,
    keep_alive: Option<Duration>,
}

impl MqttDeviceBuilder {
    /// Creates a new builder for the specified broker and device.
    pub(crate) fn new(broker: impl Into<String>, config: DeviceConfig) -> Self {
        Self {
            broker: broker.into(),
            config,
            client_id: None,
            keep_alive: None,
        }
    }

    /// Sets a custom MQTT client ID.
    #[must_use]
    pub fn with_client_id(mut self, id: impl Into<String>) -> Self {
        self.client_id = Some(id.into());
        self
    }

    /// Sets the MQTT keep-alive interval.
    #[must_use]
    pub fn with_keep_alive(mut self, duration: Duration) -> Self {
        self.keep_alive = Some(duration);
        self
    }

    /// Connects to the broker and starts tracking the device.
    ///
    /// The device starts with an empty state; the full state is requested as
    /// soon as the connection is up. Use
    /// [`Device::wait_for_state`] to wait for it.
    ///
    /// # Errors
    ///
    /// Returns `Error::Protocol` if the broker URL is invalid or the MQTT
    /// client cannot subscribe.
    pub async fn build(self) -> Result<Device<MqttTransport>, Error> {
        let store = Arc::new(StateStore::new());
        let transport = self.transport_builder().build(Arc::clone(&store)).await?;

        Ok(Device::new(transport, store, self.config))
    }

    fn transport_builder(&self) -> MqttTransportBuilder {
        let mut builder = MqttTransportBuilder::new()
            .broker(&self.broker)
            .topics(self.config.command_topic(), self.config.status_topic());

        if let Some(credential) = &self.config.credential {
            builder = builder.credentials(&self.config.serial, credential);
        }
        if let Some(client_id) = &self.client_id {
            builder = builder.client_id(client_id);
        }
        if let Some(keep_alive) = self.keep_alive {
            builder = builder.keep_alive(keep_alive);
        }

        builder
    }
}

// Entry point for MQTT devices
impl Device<MqttTransport> {
    /// Creates a builder for a device reached through an MQTT broker.
    ///
    /// # Arguments
    ///
    /// * `broker` - The MQTT broker URL (e.g., `mqtt://192.168.1.50:1883`)
    /// * `config` - Serial number, credential and timeouts of the device
    #[must_use]
    pub fn mqtt(broker: impl Into<String>, config: DeviceConfig) -> MqttDeviceBuilder {
        MqttDeviceBuilder::new(broker, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_new() {
        let builder = MqttDeviceBuilder::new("mqtt://localhost:1883", DeviceConfig::new("SERIAL"));
        assert_eq!(builder.broker, "mqtt://localhost:1883");
        assert_eq!(builder.config.serial, "SERIAL");
        assert!(builder.client_id.is_none());
        assert!(builder.keep_alive.is_none());
    }

    #[test]
    fn builder_options() {
        let builder = Device::mqtt("mqtt://localhost:1883", DeviceConfig::new("SERIAL"))
            .with_client_id("client")
            .with_keep_alive(Duration::from_secs(5));
        assert_eq!(builder.client_id, Some("client".to_string()));
        assert_eq!(builder.keep_alive, Some(Duration::from_secs(5)));
    }

    #[tokio::test]
    async fn build_rejects_bad_broker() {
        let result = Device::mqtt("mqtt://localhost:notaport", DeviceConfig::new("SERIAL"))
            .build()
            .await;

        assert!(matches!(result, Err(Error::Protocol(_))));
    }
}
