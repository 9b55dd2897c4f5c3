// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device state management types.
//!
//! - [`DeviceState`] holds the status snapshot and decoded properties
//! - [`StateChange`] is a batch of raw field values received from the device
//! - [`PropertyChange`] records one property whose value changed
//! - [`StateStore`] shares a `DeviceState` between the transport and callers
//!   and notifies observers
//!
//! # Examples
//!
//! ```
//! use purehumid::state::{DeviceState, StateChange};
//!
//! let mut state = DeviceState::new();
//! state.apply(&StateChange::new().with("oson", "ON")).unwrap();
//!
//! assert_eq!(state.oscillation(), Some(true));
//! ```

mod device_state;
mod state_change;
mod store;

pub use device_state::DeviceState;
pub use state_change::{PropertyChange, StateChange};
pub use store::StateStore;
