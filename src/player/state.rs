// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use serde::Serialize;

use crate::episode::Episode;

/// Snapshot of what the player is doing
///
/// `current_episode_index` is always a valid index into `episode_list`
/// while the list is non-empty, and `0` once it has been cleared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerState {
    /// Episodes in playback order
    pub episode_list: Vec<Episode>,
    pub current_episode_index: usize,
    pub is_playing: bool,
    pub is_looping: bool,
    pub is_shuffling: bool,
}

impl PlayerState {
    /// Whether stepping back is possible
    pub fn has_previous(&self) -> bool {
        self.current_episode_index > 0
    }

    /// Whether stepping forward is possible
    ///
    /// Always true while shuffling, since the next pick is random.
    pub fn has_next(&self) -> bool {
        self.is_shuffling || self.current_episode_index + 1 < self.episode_list.len()
    }

    pub fn current_episode(&self) -> Option<&Episode> {
        self.episode_list.get(self.current_episode_index)
    }

    pub fn is_empty(&self) -> bool {
        self.episode_list.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::episode::fixtures::episode;

    fn state_with(len: usize, index: usize) -> PlayerState {
        PlayerState {
            episode_list: (0..len).map(|i| episode(&i.to_string())).collect(),
            current_episode_index: index,
            ..Default::default()
        }
    }

    #[test]
    fn initial_state_is_empty_and_idle() {
        let state = PlayerState::default();

        assert!(state.is_empty());
        assert_eq!(state.current_episode_index, 0);
        assert!(!state.is_playing && !state.is_looping && !state.is_shuffling);
        assert!(!state.has_previous());
        assert!(!state.has_next());
        assert!(state.current_episode().is_none());
    }

    #[test]
    fn derived_flags_follow_the_index() {
        let first = state_with(3, 0);
        assert!(!first.has_previous());
        assert!(first.has_next());

        let middle = state_with(3, 1);
        assert!(middle.has_previous());
        assert!(middle.has_next());

        let last = state_with(3, 2);
        assert!(last.has_previous());
        assert!(!last.has_next());
        assert_eq!(last.current_episode().map(|e| e.id.as_str()), Some("2"));
    }

    #[test]
    fn shuffling_always_has_next() {
        let mut last = state_with(3, 2);
        last.is_shuffling = true;
        assert!(last.has_next());

        let mut empty = PlayerState::default();
        empty.is_shuffling = true;
        assert!(empty.has_next());
    }
}
