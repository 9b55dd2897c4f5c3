// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Callback management for device state subscriptions.
//!
//! This module provides the core types for managing subscription callbacks:
//!
//! - [`SubscriptionId`] - Unique identifier for unsubscribing
//! - [`CallbackRegistry`] - Registry storing and dispatching callbacks

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::codec::{Field, PropertyValue};
use crate::state::{DeviceState, PropertyChange};
use crate::telemetry::EnvironmentalData;

/// Unique identifier for a subscription.
///
/// Returned when registering a callback and used to unsubscribe later. IDs
/// are unique within a registry's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    #[must_use]
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", self.0)
    }
}

/// Callback for property changes: property, old value, new value.
type PropertyCallback = Arc<dyn Fn(Field, Option<PropertyValue>, PropertyValue) + Send + Sync>;

/// Callback for environmental readings.
type EnvironmentCallback = Arc<dyn Fn(&EnvironmentalData) + Send + Sync>;

/// Callback for connection, receives the state known at that time.
type ConnectedCallback = Arc<dyn Fn(&DeviceState) + Send + Sync>;

/// Callback for disconnection.
type DisconnectedCallback = Arc<dyn Fn() + Send + Sync>;

/// Listeners of one kind, in registration order.
type Listeners<C> = RwLock<Vec<(SubscriptionId, C)>>;

/// Registry for device subscription callbacks.
///
/// Callbacks of each kind are invoked synchronously in registration order.
/// The listener list is copied before dispatch, so a callback may subscribe
/// or unsubscribe without deadlocking.
pub struct CallbackRegistry {
    next_id: AtomicU64,
    property_callbacks: Listeners<PropertyCallback>,
    environment_callbacks: Listeners<EnvironmentCallback>,
    connected_callbacks: Listeners<ConnectedCallback>,
    disconnected_callbacks: Listeners<DisconnectedCallback>,
}

impl CallbackRegistry {
    /// Creates a new empty callback registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            property_callbacks: RwLock::new(Vec::new()),
            environment_callbacks: RwLock::new(Vec::new()),
            connected_callbacks: RwLock::new(Vec::new()),
            disconnected_callbacks: RwLock::new(Vec::new()),
        }
    }

    fn next_id(&self) -> SubscriptionId {
        SubscriptionId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    fn register<C>(&self, listeners: &Listeners<C>, callback: C) -> SubscriptionId {
        let id = self.next_id();
        listeners.write().push((id, callback));
        id
    }

    // =========================================================================
    // Registration methods
    // =========================================================================

    /// Registers a callback for property changes.
    ///
    /// The callback receives the property, its previous value (`None` if it
    /// was never reported) and its new value.
    pub fn on_property_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(Field, Option<PropertyValue>, PropertyValue) + Send + Sync + 'static,
    {
        let callback: PropertyCallback = Arc::new(callback);
        self.register(&self.property_callbacks, callback)
    }

    /// Registers a callback for environmental readings.
    pub fn on_environment_updated<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&EnvironmentalData) + Send + Sync + 'static,
    {
        let callback: EnvironmentCallback = Arc::new(callback);
        self.register(&self.environment_callbacks, callback)
    }

    /// Registers a callback for when the device becomes connected.
    pub fn on_connected<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&DeviceState) + Send + Sync + 'static,
    {
        let callback: ConnectedCallback = Arc::new(callback);
        self.register(&self.connected_callbacks, callback)
    }

    /// Registers a callback for when the device becomes disconnected.
    pub fn on_disconnected<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn() + Send + Sync + 'static,
    {
        let callback: DisconnectedCallback = Arc::new(callback);
        self.register(&self.disconnected_callbacks, callback)
    }

    // =========================================================================
    // Unsubscription
    // =========================================================================

    /// Unregisters a callback by its subscription ID.
    ///
    /// Returns `true` if a callback was found and removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        remove(&self.property_callbacks, id)
            || remove(&self.environment_callbacks, id)
            || remove(&self.connected_callbacks, id)
            || remove(&self.disconnected_callbacks, id)
    }

    /// Clears all callbacks.
    pub fn clear(&self) {
        self.property_callbacks.write().clear();
        self.environment_callbacks.write().clear();
        self.connected_callbacks.write().clear();
        self.disconnected_callbacks.write().clear();
    }

    // =========================================================================
    // Dispatch methods
    // =========================================================================

    /// Dispatches a property change to every property callback.
    pub fn dispatch(&self, change: &PropertyChange) {
        for callback in snapshot(&self.property_callbacks) {
            callback(change.field, change.old, change.new);
        }
    }

    /// Dispatches environmental readings.
    pub fn dispatch_environment(&self, data: &EnvironmentalData) {
        for callback in snapshot(&self.environment_callbacks) {
            callback(data);
        }
    }

    /// Dispatches the connected event with the current device state.
    pub fn dispatch_connected(&self, state: &DeviceState) {
        for callback in snapshot(&self.connected_callbacks) {
            callback(state);
        }
    }

    /// Dispatches the disconnected event.
    pub fn dispatch_disconnected(&self) {
        for callback in snapshot(&self.disconnected_callbacks) {
            callback();
        }
    }

    // =========================================================================
    // Statistics
    // =========================================================================

    /// Returns the total number of registered callbacks.
    #[must_use]
    pub fn callback_count(&self) -> usize {
        self.property_callbacks.read().len()
            + self.environment_callbacks.read().len()
            + self.connected_callbacks.read().len()
            + self.disconnected_callbacks.read().len()
    }

    /// Returns `true` if there are no registered callbacks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.callback_count() == 0
    }
}

fn remove<C>(listeners: &Listeners<C>, id: SubscriptionId) -> bool {
    let mut listeners = listeners.write();
    let before = listeners.len();
    listeners.retain(|(sub, _)| *sub != id);
    listeners.len() != before
}

fn snapshot<C: Clone>(listeners: &Listeners<C>) -> Vec<C> {
    listeners.read().iter().map(|(_, c)| c.clone()).collect()
}

impl Default for CallbackRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("callback_count", &self.callback_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU32;

    use parking_lot::Mutex;

    use crate::types::WaterHardness;

    fn hardness_change() -> PropertyChange {
        PropertyChange {
            field: Field::WaterHardness,
            old: Some(WaterHardness::Soft.into()),
            new: WaterHardness::Hard.into(),
        }
    }

    #[test]
    fn subscription_id_display() {
        let id = SubscriptionId::new(42);
        assert_eq!(id.to_string(), "Sub(42)");
    }

    #[test]
    fn registry_new_is_empty() {
        let registry = CallbackRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.callback_count(), 0);
    }

    #[test]
    fn registry_property_callback() {
        let registry = CallbackRegistry::new();
        let received = Arc::new(Mutex::new(Vec::new()));
        let received_clone = received.clone();

        let id = registry.on_property_changed(move |field, old, new| {
            received_clone.lock().push((field, old, new));
        });

        registry.dispatch(&hardness_change());
        assert_eq!(
            *received.lock(),
            [(
                Field::WaterHardness,
                Some(PropertyValue::WaterHardness(WaterHardness::Soft)),
                PropertyValue::WaterHardness(WaterHardness::Hard),
            )]
        );

        assert!(registry.unsubscribe(id));
        assert!(registry.is_empty());

        registry.dispatch(&hardness_change());
        assert_eq!(received.lock().len(), 1);
    }

    #[test]
    fn registry_calls_in_registration_order() {
        let registry = CallbackRegistry::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for n in 0..3 {
            let order = order.clone();
            registry.on_property_changed(move |_, _, _| order.lock().push(n));
        }

        registry.dispatch(&hardness_change());
        assert_eq!(*order.lock(), [0, 1, 2]);
    }

    #[test]
    fn registry_callback_may_unsubscribe_itself() {
        let registry = Arc::new(CallbackRegistry::new());
        let counter = Arc::new(AtomicU32::new(0));
        let id_slot = Arc::new(Mutex::new(None));

        let registry_clone = registry.clone();
        let counter_clone = counter.clone();
        let id_clone = id_slot.clone();
        let id = registry.on_property_changed(move |_, _, _| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
            if let Some(id) = *id_clone.lock() {
                registry_clone.unsubscribe(id);
            }
        });
        *id_slot.lock() = Some(id);

        registry.dispatch(&hardness_change());
        registry.dispatch(&hardness_change());

        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn registry_environment_callback() {
        let registry = CallbackRegistry::new();
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        registry.on_environment_updated(move |_data| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });

        registry.dispatch_environment(&EnvironmentalData::default());
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn registry_connection_callbacks() {
        let registry = CallbackRegistry::new();
        let connected = Arc::new(AtomicU32::new(0));
        let disconnected = Arc::new(AtomicU32::new(0));
        let c = connected.clone();
        let d = disconnected.clone();

        registry.on_connected(move |_state| {
            c.fetch_add(1, Ordering::SeqCst);
        });
        registry.on_disconnected(move || {
            d.fetch_add(1, Ordering::SeqCst);
        });

        registry.dispatch_connected(&DeviceState::new());
        registry.dispatch_disconnected();

        assert_eq!(connected.load(Ordering::SeqCst), 1);
        assert_eq!(disconnected.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn registry_unsubscribe_nonexistent() {
        let registry = CallbackRegistry::new();
        assert!(!registry.unsubscribe(SubscriptionId::new(999)));
    }

    #[test]
    fn registry_clear() {
        let registry = CallbackRegistry::new();

        registry.on_property_changed(|_, _, _| {});
        registry.on_environment_updated(|_| {});
        registry.on_connected(|_| {});

        assert_eq!(registry.callback_count(), 3);

        registry.clear();
        assert!(registry.is_empty());
    }

    #[test]
    fn registry_unique_ids() {
        let registry = CallbackRegistry::new();

        let id1 = registry.on_property_changed(|_, _, _| {});
        let id2 = registry.on_environment_updated(|_| {});
        let id3 = registry.on_disconnected(|| {});

        assert_ne!(id1, id2);
        assert_ne!(id2, id3);
        assert_ne!(id1, id3);
    }

    #[test]
    fn registry_debug() {
        let registry = CallbackRegistry::new();
        registry.on_property_changed(|_, _, _| {});

        let debug = format!("{registry:?}");
        assert!(debug.contains("CallbackRegistry"));
        assert!(debug.contains("callback_count"));
    }
}
