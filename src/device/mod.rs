// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! High-level device abstraction.
//!
//! A [`Device`] pairs a [`Transport`] with the [`StateStore`] that the
//! transport's inbound messages are applied to. Every command method
//! publishes one `STATE-SET` message and then waits until the device reports
//! all commanded values back, or fails with
//! [`Error::CommandTimeout`](crate::Error::CommandTimeout).
//!
//! ```no_run
//! use purehumid::{Device, DeviceConfig};
//! use purehumid::types::{OscillationMode, WaterHardness};
//!
//! # async fn example() -> purehumid::Result<()> {
//! let config = DeviceConfig::new("NK6-EU-MHA0000A").with_credential("device-password");
//! let device = Device::mqtt("mqtt://192.168.1.50:1883", config).build().await?;
//!
//! device.enable_oscillation(OscillationMode::Degree45).await?;
//! device.set_humidity_target(45).await?;
//! device.set_water_hardness(WaterHardness::Hard).await?;
//!
//! println!("oscillation: {:?}", device.oscillation_mode());
//! # Ok(())
//! # }
//! ```

mod config;
#[cfg(feature = "mqtt")]
mod mqtt_builder;

pub use config::{DEFAULT_COMMAND_TIMEOUT, DeviceConfig, PURE_HUMIDIFY_COOL};
#[cfg(feature = "mqtt")]
pub use mqtt_builder::MqttDeviceBuilder;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use crate::codec::{Field, PropertyValue};
use crate::command::Command;
use config::duration_ms;
use crate::error::{Error, ProtocolError};
use crate::protocol::{Transport, message};
use crate::state::{DeviceState, StateStore};
use crate::subscription::{Subscribable, SubscriptionId};
use crate::telemetry::EnvironmentalData;
use crate::types::{HumidityTarget, OscillationMode, WaterHardness};

/// A Pure Humidify+Cool fan.
///
/// Cloning the device is not supported; share it behind an `Arc` instead.
/// Reads are served from the local state and never touch the network.
#[derive(Debug)]
pub struct Device<T: Transport> {
    transport: Arc<T>,
    store: Arc<StateStore>,
    config: DeviceConfig,
}

impl<T: Transport> Device<T> {
    /// Creates a device from a transport and the store it delivers into.
    ///
    /// The transport is expected to apply every status message it receives
    /// to `store`; without that no command can ever be confirmed.
    #[must_use]
    pub fn new(transport: T, store: Arc<StateStore>, config: DeviceConfig) -> Self {
        Self {
            transport: Arc::new(transport),
            store,
            config,
        }
    }

    /// Returns the device configuration.
    #[must_use]
    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    /// Returns the transport.
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Returns the shared state store.
    #[must_use]
    pub fn store(&self) -> &Arc<StateStore> {
        &self.store
    }

    /// Returns a snapshot of the current device state.
    #[must_use]
    pub fn state(&self) -> DeviceState {
        self.store.state()
    }

    /// Returns the decoded value of a property, if reported.
    #[must_use]
    pub fn get(&self, field: Field) -> Option<PropertyValue> {
        self.store.get(field)
    }

    // ========== State Accessors ==========

    /// Returns whether oscillation is on.
    #[must_use]
    pub fn oscillation(&self) -> Option<bool> {
        self.store.read(DeviceState::oscillation)
    }

    /// Returns the effective oscillation mode, [`OscillationMode::Off`] when
    /// oscillation is disabled.
    #[must_use]
    pub fn oscillation_mode(&self) -> Option<OscillationMode> {
        self.store.read(DeviceState::oscillation_mode)
    }

    /// Returns whether the humidifier is on.
    #[must_use]
    pub fn humidification(&self) -> Option<bool> {
        self.store.read(DeviceState::humidification)
    }

    /// Returns whether the device picks its own humidity target.
    #[must_use]
    pub fn humidification_auto_mode(&self) -> Option<bool> {
        self.store.read(DeviceState::humidification_auto_mode)
    }

    /// Returns the manual humidity target.
    #[must_use]
    pub fn humidity_target(&self) -> Option<HumidityTarget> {
        self.store.read(DeviceState::humidity_target)
    }

    /// Returns the target the device chose in auto mode.
    #[must_use]
    pub fn auto_humidity_target(&self) -> Option<HumidityTarget> {
        self.store.read(DeviceState::auto_humidity_target)
    }

    /// Returns the configured water hardness.
    #[must_use]
    pub fn water_hardness(&self) -> Option<WaterHardness> {
        self.store.read(DeviceState::water_hardness)
    }

    /// Returns whether the fan is powered.
    #[must_use]
    pub fn power(&self) -> Option<bool> {
        self.store.read(DeviceState::power)
    }

    /// Returns the latest environmental readings.
    #[must_use]
    pub fn environment(&self) -> Option<EnvironmentalData> {
        self.store.read(|state| state.environment().copied())
    }

    // ========== Commands ==========

    /// Turns oscillation on with the given sweep, breeze when `None`.
    ///
    /// Also powers the fan on.
    ///
    /// # Errors
    ///
    /// Returns `Error::Validation` for [`OscillationMode::Off`] without
    /// publishing, a protocol error if publishing fails, or
    /// `Error::CommandTimeout` if the device does not confirm in time.
    pub async fn enable_oscillation(
        &self,
        mode: impl Into<Option<OscillationMode>>,
    ) -> Result<(), Error> {
        let command = Command::enable_oscillation(mode.into().unwrap_or_default())?;
        self.execute(&command).await
    }

    /// Turns oscillation off.
    ///
    /// # Errors
    ///
    /// Returns a protocol error if publishing fails, or
    /// `Error::CommandTimeout` if the device does not confirm in time.
    pub async fn disable_oscillation(&self) -> Result<(), Error> {
        self.execute(&Command::DisableOscillation).await
    }

    /// Turns the humidifier on.
    ///
    /// # Errors
    ///
    /// Returns a protocol error if publishing fails, or
    /// `Error::CommandTimeout` if the device does not confirm in time.
    pub async fn enable_humidification(&self) -> Result<(), Error> {
        self.execute(&Command::EnableHumidification).await
    }

    /// Turns the humidifier off.
    ///
    /// # Errors
    ///
    /// Returns a protocol error if publishing fails, or
    /// `Error::CommandTimeout` if the device does not confirm in time.
    pub async fn disable_humidification(&self) -> Result<(), Error> {
        self.execute(&Command::DisableHumidification).await
    }

    /// Lets the device pick its own humidity target.
    ///
    /// # Errors
    ///
    /// Returns a protocol error if publishing fails, or
    /// `Error::CommandTimeout` if the device does not confirm in time.
    pub async fn enable_humidification_auto_mode(&self) -> Result<(), Error> {
        self.execute(&Command::EnableHumidificationAutoMode).await
    }

    /// Switches back to the manual humidity target.
    ///
    /// # Errors
    ///
    /// Returns a protocol error if publishing fails, or
    /// `Error::CommandTimeout` if the device does not confirm in time.
    pub async fn disable_humidification_auto_mode(&self) -> Result<(), Error> {
        self.execute(&Command::DisableHumidificationAutoMode).await
    }

    /// Sets the manual humidity target in percent.
    ///
    /// # Errors
    ///
    /// Returns `Error::Validation` if `percent` is outside 0-100 without
    /// publishing, a protocol error if publishing fails, or
    /// `Error::CommandTimeout` if the device does not confirm in time.
    pub async fn set_humidity_target(&self, percent: i32) -> Result<(), Error> {
        let command = Command::set_humidity_target(percent)?;
        self.execute(&command).await
    }

    /// Declares the hardness of the water in the tank.
    ///
    /// # Errors
    ///
    /// Returns a protocol error if publishing fails, or
    /// `Error::CommandTimeout` if the device does not confirm in time.
    pub async fn set_water_hardness(&self, hardness: WaterHardness) -> Result<(), Error> {
        self.execute(&Command::SetWaterHardness(hardness)).await
    }

    /// Publishes a command and waits until the device confirms every field.
    ///
    /// If the state already holds the commanded values, the command completes
    /// as soon as it is published. Otherwise it completes inside the first
    /// update that makes all of them hold, even if a later update changes
    /// them again before this task resumes.
    ///
    /// # Errors
    ///
    /// Returns `Error::Encode` without publishing if the command has no wire
    /// form, `Error::Protocol` if the message cannot be built or published,
    /// or
    /// `Error::CommandTimeout` if the device does not confirm within the
    /// configured timeout.
    pub async fn execute(&self, command: &Command) -> Result<(), Error> {
        let data = command.encode()?;
        let expected = command.fields();
        let payload = message::state_set(&data)?;

        // Registered before publishing so a fast echo is never missed.
        let confirmation = self.store.expect(expected.clone());

        tracing::debug!(command = %command, "Command pending");
        self.transport.publish(&payload).await?;
        tracing::debug!(command = %command, payload = %payload, "Command sent");

        let timeout = self.config.command_timeout();
        match tokio::time::timeout(timeout, confirmation).await {
            Ok(Ok(())) => {
                tracing::debug!(command = %command, "Command confirmed");
                Ok(())
            }
            Ok(Err(_)) => Err(closed().into()),
            Err(_) => {
                let fields = expected
                    .iter()
                    .map(|(field, _)| field.as_wire())
                    .collect::<Vec<_>>()
                    .join(",");
                tracing::warn!(
                    command = %command,
                    timeout_ms = self.config.command_timeout_ms,
                    fields = %fields,
                    "Command timed out"
                );
                Err(Error::CommandTimeout {
                    timeout_ms: self.config.command_timeout_ms,
                    fields,
                })
            }
        }
    }

    /// Asks the device to report its full state.
    ///
    /// Returns once the request is published; the answer arrives through the
    /// transport like any other status message.
    ///
    /// # Errors
    ///
    /// Returns `Error::Protocol` if publishing fails.
    pub async fn request_current_state(&self) -> Result<(), Error> {
        let payload = message::request_current_state()?;
        self.transport.publish(&payload).await?;
        Ok(())
    }

    /// Asks the device to report its sensor readings.
    ///
    /// # Errors
    ///
    /// Returns `Error::Protocol` if publishing fails.
    pub async fn request_environment(&self) -> Result<(), Error> {
        let payload = message::request_environment()?;
        self.transport.publish(&payload).await?;
        Ok(())
    }

    /// Waits until the device has reported any state.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::Timeout` if nothing arrives within `timeout`.
    pub async fn wait_for_state(&self, timeout: Duration) -> Result<DeviceState, Error> {
        let revision = self.store.watch();

        let state = tokio::time::timeout(timeout, self.first_state(revision))
            .await
            .map_err(|_| ProtocolError::Timeout(duration_ms(timeout)))??;

        Ok(state)
    }

    async fn first_state(
        &self,
        mut revision: watch::Receiver<u64>,
    ) -> Result<DeviceState, ProtocolError> {
        loop {
            if !self.store.read(DeviceState::is_empty) {
                return Ok(self.store.state());
            }
            revision.changed().await.map_err(|_| closed())?;
        }
    }
}

fn closed() -> ProtocolError {
    ProtocolError::ChannelClosed("state store dropped".to_string())
}

impl<T: Transport> Subscribable for Device<T> {
    fn on_property_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(Field, Option<PropertyValue>, PropertyValue) + Send + Sync + 'static,
    {
        self.store.callbacks().on_property_changed(callback)
    }

    fn on_environment_updated<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&EnvironmentalData) + Send + Sync + 'static,
    {
        self.store.callbacks().on_environment_updated(callback)
    }

    fn on_connected<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&DeviceState) + Send + Sync + 'static,
    {
        self.store.callbacks().on_connected(callback)
    }

    fn on_disconnected<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.store.callbacks().on_disconnected(callback)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.store.callbacks().unsubscribe(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use parking_lot::Mutex;

    /// Records payloads without answering.
    #[derive(Debug, Default)]
    struct Recorder {
        sent: Mutex<Vec<String>>,
    }

    impl Transport for Recorder {
        async fn publish(&self, payload: &str) -> Result<(), ProtocolError> {
            self.sent.lock().push(payload.to_string());
            Ok(())
        }
    }

    fn device(timeout: Duration) -> Device<Recorder> {
        Device::new(
            Recorder::default(),
            Arc::new(StateStore::new()),
            DeviceConfig::new("SERIAL").with_command_timeout(timeout),
        )
    }

    #[tokio::test]
    async fn already_matching_state_confirms_without_echo() {
        let device = device(Duration::from_secs(1));
        device
            .store()
            .apply_payload(r#"{"msg":"CURRENT-STATE","product-state":{"hume":"HUMD"}}"#)
            .unwrap();

        device.enable_humidification().await.unwrap();

        assert_eq!(device.transport().sent.lock().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn unanswered_command_times_out() {
        let device = device(Duration::from_secs(10));

        let err = device.disable_oscillation().await.unwrap_err();

        assert!(matches!(
            err,
            Error::CommandTimeout { timeout_ms: 10_000, ref fields } if fields == "oson"
        ));
    }

    #[tokio::test]
    async fn encode_failure_publishes_nothing() {
        let device = device(Duration::from_secs(1));

        let err = device
            .execute(&Command::EnableOscillation(OscillationMode::Off))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Encode(_)));
        assert!(device.transport().sent.lock().is_empty());
    }

    #[tokio::test]
    async fn requests_are_published() {
        let device = device(Duration::from_secs(1));

        device.request_current_state().await.unwrap();
        device.request_environment().await.unwrap();

        let sent = device.transport().sent.lock();
        assert!(sent[0].contains("REQUEST-CURRENT-STATE"));
        assert!(sent[1].contains("REQUEST-PRODUCT-ENVIRONMENT-CURRENT-SENSOR-DATA"));
    }

    #[tokio::test(start_paused = true)]
    async fn wait_for_state_times_out_when_silent() {
        let device = device(Duration::from_secs(1));

        let err = device
            .wait_for_state(Duration::from_millis(500))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Protocol(ProtocolError::Timeout(500))));
    }

    #[tokio::test]
    async fn wait_for_state_returns_first_report() {
        let device = device(Duration::from_secs(1));
        let store = device.store().clone();

        tokio::spawn(async move {
            tokio::task::yield_now().await;
            store
                .apply_payload(r#"{"msg":"CURRENT-STATE","product-state":{"fpwr":"ON"}}"#)
                .unwrap();
        });

        let state = device.wait_for_state(Duration::from_secs(5)).await.unwrap();
        assert_eq!(state.power(), Some(true));
    }
}
