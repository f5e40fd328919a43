// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

use crate::episode::Episode;
use crate::error::PlayerError;

use super::observer::{SharedPlayerObserver, SubscriptionId};
use super::state::PlayerState;

/// Owner of the player state
///
/// All mutation goes through the methods below. Each one updates every
/// field it touches before notifying observers, and operations that end up
/// changing nothing do not notify at all.
pub struct PlayerStore<R = StdRng> {
    state: PlayerState,
    observers: Vec<(SubscriptionId, SharedPlayerObserver)>,
    next_subscription: u64,
    rng: R,
}

impl PlayerStore<StdRng> {
    /// Create an empty store whose shuffle picks are seeded from the OS
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }
}

impl Default for PlayerStore<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> fmt::Debug for PlayerStore<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlayerStore")
            .field("state", &self.state)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

impl<R: Rng> PlayerStore<R> {
    /// Create an empty store drawing shuffle picks from `rng`
    pub fn with_rng(rng: R) -> Self {
        Self {
            state: PlayerState::default(),
            observers: Vec::new(),
            next_subscription: 0,
            rng,
        }
    }

    /// The current state
    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    pub fn has_previous(&self) -> bool {
        self.state.has_previous()
    }

    pub fn has_next(&self) -> bool {
        self.state.has_next()
    }

    pub fn current_episode(&self) -> Option<&Episode> {
        self.state.current_episode()
    }

    /// Register an observer for future state changes
    pub fn subscribe(&mut self, observer: SharedPlayerObserver) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, observer));
        id
    }

    /// Remove an observer. Returns false if it was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() != before
    }

    /// Play a single episode, replacing the playlist
    pub fn play(&mut self, episode: Episode) {
        self.state.episode_list = vec![episode];
        self.state.current_episode_index = 0;
        self.state.is_playing = true;
        self.commit("play");
    }

    /// Replace the playlist and start playing the episode at `index`
    ///
    /// Rejects an `index` outside the list and leaves the state as it was.
    pub fn play_list(&mut self, list: Vec<Episode>, index: usize) -> Result<(), PlayerError> {
        if index >= list.len() {
            warn!(index, len = list.len(), "rejecting playlist with out of range index");
            return Err(PlayerError::InvalidIndex {
                index,
                len: list.len(),
            });
        }

        self.state.episode_list = list;
        self.state.current_episode_index = index;
        self.state.is_playing = true;
        self.commit("play_list");
        Ok(())
    }

    pub fn toggle_play(&mut self) {
        self.state.is_playing = !self.state.is_playing;
        self.commit("toggle_play");
    }

    pub fn toggle_loop(&mut self) {
        self.state.is_looping = !self.state.is_looping;
        self.commit("toggle_loop");
    }

    pub fn toggle_shuffle(&mut self) {
        self.state.is_shuffling = !self.state.is_shuffling;
        self.commit("toggle_shuffle");
    }

    /// Record the play state reported by the media element
    pub fn set_playing_state(&mut self, playing: bool) {
        if self.state.is_playing != playing {
            self.state.is_playing = playing;
            self.commit("set_playing_state");
        }
    }

    /// Move to the next episode
    ///
    /// While shuffling this jumps to a uniformly random position, which may
    /// be the current one. Otherwise it advances by one if possible.
    pub fn play_next(&mut self) {
        let len = self.state.episode_list.len();

        if self.state.is_shuffling {
            if len == 0 {
                return;
            }
            let index = self.rng.random_range(0..len);
            if index != self.state.current_episode_index {
                self.state.current_episode_index = index;
                self.commit("play_next");
            }
        } else if self.state.has_next() {
            self.state.current_episode_index += 1;
            self.commit("play_next");
        }
    }

    /// Move to the previous episode, if there is one
    pub fn play_previous(&mut self) {
        if self.state.has_previous() {
            self.state.current_episode_index -= 1;
            self.commit("play_previous");
        }
    }

    /// Empty the playlist. Playback flags are left alone.
    pub fn clear_player_state(&mut self) {
        if self.state.episode_list.is_empty() && self.state.current_episode_index == 0 {
            return;
        }
        self.state.episode_list.clear();
        self.state.current_episode_index = 0;
        self.commit("clear_player_state");
    }

    fn commit(&self, operation: &'static str) {
        debug!(
            operation,
            index = self.state.current_episode_index,
            len = self.state.episode_list.len(),
            playing = self.state.is_playing,
            looping = self.state.is_looping,
            shuffling = self.state.is_shuffling,
            "player state changed"
        );

        for (_, observer) in &self.observers {
            observer.state_changed(&self.state);
        }
    }
}
