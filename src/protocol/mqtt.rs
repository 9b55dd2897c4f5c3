// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! MQTT transport for the device's local broker connection.

use std::sync::Arc;
use std::time::Duration;

use rumqttc::{AsyncClient, EventLoop, MqttOptions, QoS};
use uuid::Uuid;

use crate::error::ProtocolError;
use crate::protocol::{Transport, message};
use crate::state::StateStore;

const DEFAULT_PORT: u16 = 1883;
const DEFAULT_KEEP_ALIVE: Duration = Duration::from_secs(30);
const REQUEST_CAPACITY: usize = 10;

/// MQTT connection to one device.
///
/// Uses the device's topic structure:
/// - Commands: `<product_type>/<serial>/command`
/// - Status: `<product_type>/<serial>/status/current`
///
/// Every message received on the status topic is applied to the
/// [`StateStore`] given at build time. On each (re)connection the transport
/// asks the device for its full state.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use purehumid::protocol::{MqttTransportBuilder, Transport};
/// use purehumid::state::StateStore;
///
/// # async fn example() -> Result<(), purehumid::error::ProtocolError> {
/// let store = Arc::new(StateStore::new());
/// let transport = MqttTransportBuilder::new()
///     .broker("mqtt://192.168.1.50:1883")
///     .topics("358/NK6-EU-MHA0000A/command", "358/NK6-EU-MHA0000A/status/current")
///     .credentials("NK6-EU-MHA0000A", "device-password")
///     .build(store)
///     .await?;
///
/// transport.publish(&purehumid::protocol::message::request_current_state()?).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct MqttTransport {
    client: AsyncClient,
    command_topic: String,
}

impl MqttTransport {
    /// Returns the topic commands are published to.
    #[must_use]
    pub fn command_topic(&self) -> &str {
        &self.command_topic
    }

    /// Disconnects from the broker.
    ///
    /// The background event loop stops once the broker closes the
    /// connection.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the disconnect request cannot be queued.
    pub async fn disconnect(&self) -> Result<(), ProtocolError> {
        self.client.disconnect().await.map_err(ProtocolError::Mqtt)
    }
}

impl Transport for MqttTransport {
    async fn publish(&self, payload: &str) -> Result<(), ProtocolError> {
        tracing::debug!(topic = %self.command_topic, payload = %payload, "Publishing MQTT message");

        self.client
            .publish(&self.command_topic, QoS::AtLeastOnce, false, payload)
            .await
            .map_err(ProtocolError::Mqtt)
    }
}

/// Parses an MQTT URL into host and port.
fn parse_mqtt_url(url: &str) -> Result<(String, u16), ProtocolError> {
    let url = url
        .strip_prefix("mqtt://")
        .or_else(|| url.strip_prefix("tcp://"))
        .unwrap_or(url);

    if url.is_empty() {
        return Err(ProtocolError::InvalidAddress("empty broker host".to_string()));
    }

    let (host, port) = if let Some((h, p)) = url.rsplit_once(':') {
        let port = p
            .parse()
            .map_err(|_| ProtocolError::InvalidAddress(format!("Invalid port: {p}")))?;
        (h.to_string(), port)
    } else {
        (url.to_string(), DEFAULT_PORT)
    };

    Ok((host, port))
}

/// Handles MQTT events in the background.
async fn handle_mqtt_events(
    mut event_loop: EventLoop,
    client: AsyncClient,
    topics: Topics,
    store: Arc<StateStore>,
) {
    use rumqttc::{Event, Packet};

    loop {
        match event_loop.poll().await {
            Ok(Event::Incoming(Packet::ConnAck(connack))) => {
                tracing::debug!(?connack, "MQTT connected");

                // The event loop is not polling while we run, so never await
                // on the request channel here.
                let request = message::request_current_state().and_then(|payload| {
                    client
                        .try_publish(&topics.command, QoS::AtLeastOnce, false, payload)
                        .map_err(ProtocolError::from)
                });
                if let Err(e) = request {
                    tracing::warn!(error = %e, "Failed to request current state");
                }

                let state = store.state();
                store.callbacks().dispatch_connected(&state);
            }
            Ok(Event::Incoming(Packet::SubAck(suback))) => {
                tracing::debug!(?suback, "MQTT subscription acknowledged");
            }
            Ok(Event::Incoming(Packet::Publish(publish))) if publish.topic == topics.status => {
                let Ok(payload) = std::str::from_utf8(&publish.payload) else {
                    tracing::warn!(topic = %publish.topic, "Dropping non UTF-8 status message");
                    continue;
                };

                tracing::debug!(topic = %publish.topic, payload = %payload, "Received MQTT message");

                if let Err(e) = store.apply_payload(payload) {
                    tracing::warn!(error = %e, payload = %payload, "Dropping malformed status message");
                }
            }
            Ok(_) => {}
            Err(e) => {
                tracing::error!(error = %e, "MQTT event loop error");
                connection_lost(&store);
                break;
            }
        }
    }
}

/// Forgets the reported state, then tells observers the device is gone.
fn connection_lost(store: &StateStore) {
    store.clear();
    store.callbacks().dispatch_disconnected();
}

#[derive(Debug, Clone)]
struct Topics {
    command: String,
    status: String,
}

/// Builder for an [`MqttTransport`].
#[derive(Debug, Default)]
pub struct MqttTransportBuilder {
    broker: Option<String>,
    command_topic: Option<String>,
    status_topic: Option<String>,
    username: Option<String>,
    password: Option<String>,
    client_id: Option<String>,
    keep_alive: Option<Duration>,
}

impl MqttTransportBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the MQTT broker URL (`mqtt://host:port`, `tcp://host:port` or
    /// a bare host).
    #[must_use]
    pub fn broker(mut self, broker: impl Into<String>) -> Self {
        self.broker = Some(broker.into());
        self
    }

    /// Sets the command and status topics.
    #[must_use]
    pub fn topics(mut self, command: impl Into<String>, status: impl Into<String>) -> Self {
        self.command_topic = Some(command.into());
        self.status_topic = Some(status.into());
        self
    }

    /// Sets authentication credentials for the broker.
    ///
    /// The device's own broker expects the serial number as username and
    /// the device credential as password.
    #[must_use]
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Sets a custom client ID.
    #[must_use]
    pub fn client_id(mut self, id: impl Into<String>) -> Self {
        self.client_id = Some(id.into());
        self
    }

    /// Sets the keep-alive interval.
    #[must_use]
    pub fn keep_alive(mut self, duration: Duration) -> Self {
        self.keep_alive = Some(duration);
        self
    }

    /// Connects, subscribes to the status topic and starts the event loop.
    ///
    /// Status messages are applied to `store` from the event-loop task.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::InvalidAddress` if the broker or a topic is
    /// missing or the broker URL is malformed, and `ProtocolError::Mqtt` if
    /// the subscription cannot be queued.
    pub async fn build(self, store: Arc<StateStore>) -> Result<MqttTransport, ProtocolError> {
        let broker = self
            .broker
            .ok_or_else(|| ProtocolError::InvalidAddress("broker is required".to_string()))?;

        let topics = match (self.command_topic, self.status_topic) {
            (Some(command), Some(status)) => Topics { command, status },
            _ => {
                return Err(ProtocolError::InvalidAddress(
                    "topics are required".to_string(),
                ));
            }
        };

        let (host, port) = parse_mqtt_url(&broker)?;

        let client_id = self
            .client_id
            .unwrap_or_else(|| format!("purehumid_{}", Uuid::new_v4().simple()));

        let mut mqtt_options = MqttOptions::new(&client_id, host, port);
        mqtt_options.set_keep_alive(self.keep_alive.unwrap_or(DEFAULT_KEEP_ALIVE));
        mqtt_options.set_clean_session(true);

        if let (Some(username), Some(password)) = (self.username, self.password) {
            mqtt_options.set_credentials(username, password);
        }

        let (client, event_loop) = AsyncClient::new(mqtt_options, REQUEST_CAPACITY);

        client
            .subscribe(&topics.status, QoS::AtLeastOnce)
            .await
            .map_err(ProtocolError::Mqtt)?;

        tracing::debug!(
            client_id = %client_id,
            broker = %broker,
            status_topic = %topics.status,
            "MQTT transport started"
        );

        let command_topic = topics.command.clone();
        let loop_client = client.clone();
        tokio::spawn(async move {
            handle_mqtt_events(event_loop, loop_client, topics, store).await;
        });

        Ok(MqttTransport {
            client,
            command_topic,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use parking_lot::Mutex;

    use crate::codec::Field;
    use crate::state::DeviceState;

    #[test]
    fn parse_mqtt_url_with_port() {
        let (host, port) = parse_mqtt_url("mqtt://192.168.1.50:1883").unwrap();
        assert_eq!(host, "192.168.1.50");
        assert_eq!(port, 1883);
    }

    #[test]
    fn parse_mqtt_url_default_port() {
        let (host, port) = parse_mqtt_url("192.168.1.50").unwrap();
        assert_eq!(host, "192.168.1.50");
        assert_eq!(port, 1883);
    }

    #[test]
    fn parse_mqtt_url_tcp_scheme() {
        let (host, port) = parse_mqtt_url("tcp://broker.local:8883").unwrap();
        assert_eq!(host, "broker.local");
        assert_eq!(port, 8883);
    }

    #[test]
    fn parse_mqtt_url_rejects_bad_port() {
        assert!(matches!(
            parse_mqtt_url("mqtt://broker:port"),
            Err(ProtocolError::InvalidAddress(_))
        ));
        assert!(parse_mqtt_url("mqtt://").is_err());
    }

    #[test]
    fn builder_with_credentials() {
        let builder = MqttTransportBuilder::new()
            .broker("mqtt://broker:1883")
            .topics("358/SERIAL/command", "358/SERIAL/status/current")
            .credentials("SERIAL", "secret")
            .client_id("my_client")
            .keep_alive(Duration::from_secs(60));

        assert_eq!(builder.broker, Some("mqtt://broker:1883".to_string()));
        assert_eq!(builder.command_topic, Some("358/SERIAL/command".to_string()));
        assert_eq!(
            builder.status_topic,
            Some("358/SERIAL/status/current".to_string())
        );
        assert_eq!(builder.username, Some("SERIAL".to_string()));
        assert_eq!(builder.password, Some("secret".to_string()));
        assert_eq!(builder.client_id, Some("my_client".to_string()));
        assert_eq!(builder.keep_alive, Some(Duration::from_secs(60)));
    }

    #[tokio::test]
    async fn build_requires_topics() {
        let result = MqttTransportBuilder::new()
            .broker("mqtt://broker:1883")
            .build(Arc::new(StateStore::new()))
            .await;

        assert!(matches!(result, Err(ProtocolError::InvalidAddress(_))));
    }

    #[test]
    fn connection_lost_clears_state_before_notifying() {
        let store = Arc::new(StateStore::new());
        store
            .apply_payload(r#"{"msg":"CURRENT-STATE","product-state":{"hume":"HUMD","humt":"0050"}}"#)
            .unwrap();

        let empty_when_notified = Arc::new(Mutex::new(None));
        let store_clone = Arc::clone(&store);
        let seen = Arc::clone(&empty_when_notified);
        store.callbacks().on_disconnected(move || {
            *seen.lock() = Some(store_clone.read(DeviceState::is_empty));
        });

        connection_lost(&store);

        assert_eq!(*empty_when_notified.lock(), Some(true));
        assert!(store.get(Field::Humidification).is_none());
        assert!(store.get(Field::HumidityTarget).is_none());
    }
}
