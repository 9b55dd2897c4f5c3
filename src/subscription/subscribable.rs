// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscribable trait for types that expose device events.

use crate::codec::{Field, PropertyValue};
use crate::state::DeviceState;
use crate::subscription::SubscriptionId;
use crate::telemetry::EnvironmentalData;

/// Trait for types that support event subscriptions.
///
/// # Examples
///
/// ```no_run
/// use purehumid::{Device, DeviceConfig};
/// use purehumid::subscription::Subscribable;
///
/// # async fn example() -> purehumid::Result<()> {
/// let device = Device::mqtt("mqtt://192.168.1.50:1883", DeviceConfig::new("NK6-EU-MHA0000A"))
///     .build()
///     .await?;
///
/// let sub_id = device.on_property_changed(|field, old, new| {
///     println!("{} changed from {old:?} to {new}", field.name());
/// });
///
/// device.unsubscribe(sub_id);
/// # Ok(())
/// # }
/// ```
pub trait Subscribable {
    /// Subscribes to property changes.
    ///
    /// Called once per changed property, in the order the device listed the
    /// fields, with the previous and the new value.
    fn on_property_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(Field, Option<PropertyValue>, PropertyValue) + Send + Sync + 'static;

    /// Subscribes to environmental sensor readings.
    fn on_environment_updated<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&EnvironmentalData) + Send + Sync + 'static;

    /// Subscribes to connection events.
    ///
    /// The callback receives the state known when the connection came up.
    fn on_connected<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&DeviceState) + Send + Sync + 'static;

    /// Subscribes to disconnection events.
    fn on_disconnected<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn() + Send + Sync + 'static;

    /// Unsubscribes a callback by its subscription ID.
    ///
    /// Returns `true` if the subscription was found and removed.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}
