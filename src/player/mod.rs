// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

mod media;
mod observer;
mod state;
mod store;

pub use media::{MediaDirective, MediaEvent, handle_media_event};
pub use observer::{PlayerObserver, SharedPlayerObserver, SubscriptionId};
pub use state::PlayerState;
pub use store::PlayerStore;
