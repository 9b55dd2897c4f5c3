// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shared, observable device state.

use parking_lot::{Mutex, RwLock};
use tokio::sync::{oneshot, watch};

use crate::codec::{Field, PropertyValue};
use crate::error::DecodeError;
use crate::subscription::CallbackRegistry;
use crate::telemetry::{self, EnvironmentalData, InboundMessage};

use super::{DeviceState, PropertyChange, StateChange};

/// Device state shared between the transport's delivery path and callers.
///
/// The transport feeds updates in with [`apply_payload`](Self::apply_payload)
/// or [`update`](Self::update); readers use [`get`](Self::get) or
/// [`state`](Self::state) concurrently. Every applied update bumps a revision
/// counter that [`watch`](Self::watch) receivers are woken on.
///
/// [`expect`](Self::expect) registers a set of property values; it resolves
/// inside the update that makes them all hold, so a later update cannot hide
/// it.
///
/// # Examples
///
/// ```
/// use purehumid::state::StateStore;
/// use purehumid::codec::{Field, PropertyValue};
///
/// let store = StateStore::new();
/// store
///     .apply_payload(r#"{"msg":"CURRENT-STATE","product-state":{"hume":"HUMD"}}"#)
///     .unwrap();
///
/// assert_eq!(store.get(Field::Humidification), Some(PropertyValue::Bool(true)));
/// ```
#[derive(Debug)]
pub struct StateStore {
    state: RwLock<DeviceState>,
    callbacks: CallbackRegistry,
    revision: watch::Sender<u64>,
    pending: Mutex<Vec<Expectation>>,
}

/// Property values a caller is waiting for.
#[derive(Debug)]
struct Expectation {
    values: Vec<(Field, PropertyValue)>,
    done: oneshot::Sender<()>,
}

impl StateStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            state: RwLock::new(DeviceState::new()),
            callbacks: CallbackRegistry::new(),
            revision,
            pending: Mutex::new(Vec::new()),
        }
    }

    /// Merges a batch of raw field values and notifies property observers.
    ///
    /// Observers are called after the state lock is released, once per
    /// changed property, in arrival order.
    ///
    /// # Errors
    ///
    /// Returns `DecodeError` if a known field carries an invalid value; the
    /// state is then left untouched and nobody is notified.
    pub fn update(&self, change: &StateChange) -> Result<Vec<PropertyChange>, DecodeError> {
        let changes = {
            let mut state = self.state.write();
            let changes = state.apply(change)?;
            self.settle(&state);
            changes
        };
        self.bump();

        for property_change in &changes {
            tracing::debug!(
                property = property_change.field.name(),
                new = %property_change.new,
                "Property changed"
            );
            self.callbacks.dispatch(property_change);
        }

        Ok(changes)
    }

    /// Replaces the environmental readings and notifies observers.
    pub fn update_environment(&self, data: EnvironmentalData) {
        self.state.write().set_environment(data);
        self.bump();
        self.callbacks.dispatch_environment(&data);
    }

    /// Parses a payload received from the device and applies it.
    ///
    /// # Errors
    ///
    /// Returns `DecodeError` if the payload cannot be parsed or carries an
    /// invalid field value.
    pub fn apply_payload(&self, payload: &str) -> Result<InboundMessage, DecodeError> {
        let message = telemetry::parse_message(payload)?;

        match &message {
            InboundMessage::State { full, change } => {
                tracing::debug!(full, fields = change.len(), "Received product state");
                self.update(change)?;
            }
            InboundMessage::Environment(data) => self.update_environment(*data),
            InboundMessage::Other { kind } => {
                tracing::debug!(kind = %kind, "Ignoring message");
            }
        }

        Ok(message)
    }

    /// Returns the decoded value of a property.
    #[must_use]
    pub fn get(&self, field: Field) -> Option<PropertyValue> {
        self.state.read().get(field)
    }

    /// Returns a copy of the current state.
    #[must_use]
    pub fn state(&self) -> DeviceState {
        self.state.read().clone()
    }

    /// Runs `f` against the current state under the read lock.
    pub fn read<R>(&self, f: impl FnOnce(&DeviceState) -> R) -> R {
        f(&self.state.read())
    }

    /// Returns a receiver woken on every applied update.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    /// Registers property values to wait for.
    ///
    /// The receiver resolves as soon as every value holds at once, either
    /// right now or right after the update that brings the last of them in.
    /// Dropping the receiver withdraws the expectation.
    #[must_use]
    pub fn expect(&self, values: Vec<(Field, PropertyValue)>) -> oneshot::Receiver<()> {
        let (done, receiver) = oneshot::channel();
        let state = self.state.read();
        let mut pending = self.pending.lock();
        pending.retain(|expectation| !expectation.done.is_closed());

        if state.matches(&values) {
            let _ = done.send(());
        } else {
            pending.push(Expectation { values, done });
        }

        receiver
    }

    /// Returns the observer registry.
    #[must_use]
    pub fn callbacks(&self) -> &CallbackRegistry {
        &self.callbacks
    }

    /// Forgets everything the device reported.
    pub fn clear(&self) {
        self.state.write().clear();
        self.bump();
    }

    // Called with the state write lock held; lock order is state, then pending.
    fn settle(&self, state: &DeviceState) {
        let mut pending = self.pending.lock();
        for expectation in std::mem::take(&mut *pending) {
            if expectation.done.is_closed() {
                continue;
            }
            if state.matches(&expectation.values) {
                let _ = expectation.done.send(());
            } else {
                pending.push(expectation);
            }
        }
    }

    fn bump(&self) {
        self.revision.send_modify(|revision| *revision += 1);
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}
