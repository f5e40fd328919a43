// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

pub mod format;
mod model;
mod raw;

#[cfg(test)]
pub(crate) use model::fixtures;

pub use format::{Locale, format_duration, format_published_at};
pub use model::Episode;
pub use raw::{RawDuration, RawEpisode, RawFile};
