// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

pub mod config;
pub mod episode;
pub mod error;
pub mod http;
pub mod loader;
pub mod player;

// Re-export main types for convenience
pub use config::Config;
pub use episode::{Episode, Locale, RawEpisode, format_duration, format_published_at};
pub use error::{ConfigError, LoaderError, PlayerError};
pub use http::{HttpClient, HttpResponse, ReqwestClient};
pub use loader::{EpisodeLoader, LoadedEpisode};
pub use player::{
    MediaDirective, MediaEvent, PlayerObserver, PlayerState, PlayerStore, SharedPlayerObserver,
    SubscriptionId, handle_media_event,
};
