// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use rand::Rng;
use url::Url;

use super::store::PlayerStore;

/// Events reported by the media element doing the actual playback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaEvent {
    Played,
    Paused,
    Ended,
}

/// What the media element should do after an event was handled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaDirective {
    /// Keep going with the current source
    Continue,
    /// Seek to the start of the current source and play it again
    Restart,
    /// Switch to a new source and play it
    Load(Url),
    /// Nothing left to play
    Stop,
}

/// Feed a media element event into the store
///
/// The store only records the loop flag; this is where it takes effect.
/// An ended episode is restarted while looping, otherwise playback moves
/// on to the next episode or, with none left, the playlist is cleared.
pub fn handle_media_event<R: Rng>(store: &mut PlayerStore<R>, event: MediaEvent) -> MediaDirective {
    match event {
        MediaEvent::Played => {
            store.set_playing_state(true);
            MediaDirective::Continue
        }
        MediaEvent::Paused => {
            store.set_playing_state(false);
            MediaDirective::Continue
        }
        MediaEvent::Ended if store.state().is_looping => MediaDirective::Restart,
        MediaEvent::Ended if store.has_next() => {
            store.play_next();
            match store.current_episode() {
                Some(episode) => MediaDirective::Load(episode.url.clone()),
                None => {
                    store.clear_player_state();
                    MediaDirective::Stop
                }
            }
        }
        MediaEvent::Ended => {
            store.clear_player_state();
            MediaDirective::Stop
        }
    }
}
