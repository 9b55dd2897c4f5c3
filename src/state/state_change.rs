// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! State change representation.
//!
//! A [`StateChange`] is a batch of raw field values as received from the
//! device, in arrival order. Applying it to a
//! [`DeviceState`](super::DeviceState) yields one [`PropertyChange`] per
//! property whose decoded value actually changed.
//!
//! # Examples
//!
//! ```
//! use purehumid::state::{DeviceState, StateChange};
//!
//! let mut state = DeviceState::new();
//!
//! let change = StateChange::new().with("oson", "ON").with("humt", "0050");
//! let changes = state.apply(&change).unwrap();
//! assert_eq!(changes.len(), 2);
//!
//! // Applying the same values again changes nothing
//! assert!(state.apply(&change).unwrap().is_empty());
//! ```

use crate::codec::{Field, PropertyValue};

/// A batch of raw field updates, in arrival order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateChange {
    fields: Vec<(String, String)>,
}

impl StateChange {
    /// Creates an empty batch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a raw field value.
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(field, value);
        self
    }

    /// Appends a raw field value.
    pub fn push(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.fields.push((field.into(), value.into()));
    }

    /// Iterates over `(field, raw value)` pairs in arrival order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(f, v)| (f.as_str(), v.as_str()))
    }

    /// Returns the raw value carried for `field`, the last one if repeated.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .rev()
            .find(|(f, _)| f == field)
            .map(|(_, v)| v.as_str())
    }

    /// Returns one `(field, raw value)` pair per distinct field.
    ///
    /// A repeated field keeps the position of its first occurrence and the
    /// value of its last.
    #[must_use]
    pub fn latest(&self) -> Vec<(&str, &str)> {
        let mut merged: Vec<(&str, &str)> = Vec::with_capacity(self.fields.len());
        for (field, value) in self.iter() {
            match merged.iter_mut().find(|(f, _)| *f == field) {
                Some(entry) => entry.1 = value,
                None => merged.push((field, value)),
            }
        }
        merged
    }

    /// Returns the number of field values in the batch.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the batch carries no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for StateChange
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// A property whose decoded value changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyChange {
    /// The property.
    pub field: Field,
    /// The previous value, `None` if it was never reported.
    pub old: Option<PropertyValue>,
    /// The new value.
    pub new: PropertyValue,
}
