// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory transports standing in for the fan.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use purehumid::state::StateStore;
use purehumid::{Device, DeviceConfig, ProtocolError, Transport};
use serde_json::{Value, json};

pub const SERIAL: &str = "NK6-EU-MHA0000A";

/// A full state report with oscillation on in breeze mode.
pub const CURRENT_STATE: &str = r#"{
    "msg": "CURRENT-STATE",
    "time": "2024-03-01T12:00:00.000Z",
    "mode-reason": "LAPP",
    "product-state": {
        "fpwr": "ON",
        "oson": "ON",
        "ancp": "BRZE",
        "hume": "OFF",
        "haut": "OFF",
        "humt": "0040",
        "rect": "0060",
        "wath": "1350",
        "fnsp": "AUTO"
    }
}"#;

/// How the fake device answers a `STATE-SET`.
#[derive(Debug, Clone, Copy)]
pub enum Reply {
    /// Reports the requested values back immediately.
    Echo,
    /// Reports the requested values back after a delay.
    Delayed(Duration),
    /// Never answers.
    Silent,
}

/// Records every published message and answers like the device would.
#[derive(Debug)]
pub struct FakeDevice {
    store: Arc<StateStore>,
    reply: Reply,
    published: Mutex<Vec<Value>>,
}

impl FakeDevice {
    pub fn new(store: Arc<StateStore>, reply: Reply) -> Self {
        Self {
            store,
            reply,
            published: Mutex::new(Vec::new()),
        }
    }

    /// Returns the parsed messages published so far.
    pub fn published(&self) -> Vec<Value> {
        self.published.lock().clone()
    }

    /// Returns the `data` objects of every `STATE-SET` published so far.
    pub fn state_sets(&self) -> Vec<Value> {
        self.published
            .lock()
            .iter()
            .filter(|m| m["msg"] == "STATE-SET")
            .map(|m| m["data"].clone())
            .collect()
    }
}

impl Transport for FakeDevice {
    async fn publish(&self, payload: &str) -> Result<(), ProtocolError> {
        let message: Value = serde_json::from_str(payload)
            .map_err(|e| ProtocolError::ConnectionFailed(e.to_string()))?;
        self.published.lock().push(message.clone());

        if message["msg"] != "STATE-SET" {
            return Ok(());
        }

        let answer = json!({
            "msg": "STATE-CHANGE",
            "product-state": message["data"],
        })
        .to_string();

        match self.reply {
            Reply::Echo => {
                self.store.apply_payload(&answer).map_err(|e| {
                    ProtocolError::ConnectionFailed(format!("echo rejected: {e}"))
                })?;
            }
            Reply::Delayed(delay) => {
                let store = Arc::clone(&self.store);
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    let _ = store.apply_payload(&answer);
                });
            }
            Reply::Silent => {}
        }

        Ok(())
    }
}

/// Builds a device backed by a [`FakeDevice`].
pub fn device(reply: Reply) -> Device<FakeDevice> {
    device_with_config(reply, DeviceConfig::new(SERIAL))
}

pub fn device_with_config(reply: Reply, config: DeviceConfig) -> Device<FakeDevice> {
    let store = Arc::new(StateStore::new());
    let transport = FakeDevice::new(Arc::clone(&store), reply);
    Device::new(transport, store, config)
}
