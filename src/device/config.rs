// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device configuration.

use std::time::Duration;

use serde::Deserialize;

/// Product type of the Pure Humidify+Cool family.
pub const PURE_HUMIDIFY_COOL: &str = "358";

/// Default time a command waits for the device to confirm it.
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(10);

/// Identity and behavior settings for one device.
///
/// Can be built in code or deserialized from any serde format.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use purehumid::DeviceConfig;
///
/// let config = DeviceConfig::new("NK6-EU-MHA0000A")
///     .with_credential("device-password")
///     .with_command_timeout(Duration::from_secs(5));
///
/// assert_eq!(config.command_topic(), "358/NK6-EU-MHA0000A/command");
/// assert_eq!(config.status_topic(), "358/NK6-EU-MHA0000A/status/current");
///
/// let config: DeviceConfig =
///     serde_json::from_str(r#"{"serial":"NK6-EU-MHA0000A","command_timeout_ms":2500}"#).unwrap();
/// assert_eq!(config.product_type, "358");
/// assert_eq!(config.command_timeout(), Duration::from_millis(2500));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeviceConfig {
    /// Device serial number, also the MQTT username.
    pub serial: String,
    /// Product type code used in topic names.
    #[serde(default = "default_product_type")]
    pub product_type: String,
    /// Device credential, the MQTT password.
    #[serde(default)]
    pub credential: Option<String>,
    /// Command confirmation timeout in milliseconds.
    #[serde(default = "default_command_timeout_ms")]
    pub command_timeout_ms: u64,
}

fn default_product_type() -> String {
    PURE_HUMIDIFY_COOL.to_string()
}

fn default_command_timeout_ms() -> u64 {
    duration_ms(DEFAULT_COMMAND_TIMEOUT)
}

/// Converts a duration to whole milliseconds, saturating at `u64::MAX`.
pub(crate) fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

impl DeviceConfig {
    /// Creates a configuration with default settings.
    #[must_use]
    pub fn new(serial: impl Into<String>) -> Self {
        Self {
            serial: serial.into(),
            product_type: default_product_type(),
            credential: None,
            command_timeout_ms: default_command_timeout_ms(),
        }
    }

    /// Sets the product type code.
    #[must_use]
    pub fn with_product_type(mut self, product_type: impl Into<String>) -> Self {
        self.product_type = product_type.into();
        self
    }

    /// Sets the device credential.
    #[must_use]
    pub fn with_credential(mut self, credential: impl Into<String>) -> Self {
        self.credential = Some(credential.into());
        self
    }

    /// Sets how long a command waits for confirmation.
    #[must_use]
    pub fn with_command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout_ms = duration_ms(timeout);
        self
    }

    /// Returns how long a command waits for confirmation.
    #[must_use]
    pub fn command_timeout(&self) -> Duration {
        Duration::from_millis(self.command_timeout_ms)
    }

    /// Returns the topic commands are published to.
    #[must_use]
    pub fn command_topic(&self) -> String {
        format!("{}/{}/command", self.product_type, self.serial)
    }

    /// Returns the topic the device reports its status on.
    #[must_use]
    pub fn status_topic(&self) -> String {
        format!("{}/{}/status/current", self.product_type, self.serial)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = DeviceConfig::new("SERIAL");
        assert_eq!(config.product_type, PURE_HUMIDIFY_COOL);
        assert_eq!(config.credential, None);
        assert_eq!(config.command_timeout(), DEFAULT_COMMAND_TIMEOUT);
    }

    #[test]
    fn command_timeout_in_millis() {
        let config = DeviceConfig::new("SERIAL").with_command_timeout(Duration::from_millis(2500));
        assert_eq!(config.command_timeout_ms, 2500);
        assert_eq!(config.command_timeout(), Duration::from_millis(2500));

        let config = DeviceConfig::new("SERIAL").with_command_timeout(Duration::MAX);
        assert_eq!(config.command_timeout_ms, u64::MAX);
    }

    #[test]
    fn duration_ms_saturates() {
        assert_eq!(duration_ms(DEFAULT_COMMAND_TIMEOUT), 10_000);
        assert_eq!(duration_ms(Duration::from_micros(1500)), 1);
        assert_eq!(duration_ms(Duration::MAX), u64::MAX);
    }

    #[test]
    fn topics_follow_product_type() {
        let config = DeviceConfig::new("SERIAL").with_product_type("527");
        assert_eq!(config.command_topic(), "527/SERIAL/command");
        assert_eq!(config.status_topic(), "527/SERIAL/status/current");
    }

    #[test]
    fn deserialize_full() {
        let config: DeviceConfig = serde_json::from_str(
            r#"{"serial":"SERIAL","product_type":"527","credential":"pw","command_timeout_ms":100}"#,
        )
        .unwrap();

        assert_eq!(
            config,
            DeviceConfig::new("SERIAL")
                .with_product_type("527")
                .with_credential("pw")
                .with_command_timeout(Duration::from_millis(100))
        );
    }

    #[test]
    fn deserialize_requires_serial() {
        assert!(serde_json::from_str::<DeviceConfig>("{}").is_err());
    }
}
