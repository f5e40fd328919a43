// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::sync::Arc;

use super::state::PlayerState;

/// Trait for being told about player state changes.
///
/// Observers are called synchronously, in subscription order, right after
/// an operation has updated the state. Rendering layers use this to redraw.
pub trait PlayerObserver: Send + Sync {
    /// Called with the state as it is after the change
    fn state_changed(&self, state: &PlayerState);
}

impl<F> PlayerObserver for F
where
    F: Fn(&PlayerState) + Send + Sync,
{
    fn state_changed(&self, state: &PlayerState) {
        self(state)
    }
}

/// A shared reference to a player observer
pub type SharedPlayerObserver = Arc<dyn PlayerObserver>;

/// Handle returned by `PlayerStore::subscribe`, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub(crate) u64);
