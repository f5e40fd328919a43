// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use serde::Deserialize;
use url::Url;

use crate::error::LoaderError;

use super::format::{Locale, format_duration, format_published_at};
use super::model::Episode;

/// Episode as returned by the `/episodes` API
#[derive(Debug, Clone, Deserialize)]
pub struct RawEpisode {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub members: String,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default)]
    pub description: String,
    pub published_at: String,
    pub file: RawFile,
}

/// The media file attached to a raw episode
#[derive(Debug, Clone, Deserialize)]
pub struct RawFile {
    pub url: String,
    pub duration: RawDuration,
}

/// Durations arrive either as JSON numbers or as numeric strings
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawDuration {
    Seconds(u64),
    Fractional(f64),
    Text(String),
}

impl RawDuration {
    /// Whole seconds, rounding fractional values down
    pub fn to_seconds(&self) -> Result<u64, LoaderError> {
        match self {
            RawDuration::Seconds(secs) => Ok(*secs),
            RawDuration::Fractional(secs) => whole_seconds(*secs, || secs.to_string()),
            RawDuration::Text(text) => {
                let trimmed = text.trim();
                if let Ok(secs) = trimmed.parse::<u64>() {
                    return Ok(secs);
                }
                let secs = trimmed
                    .parse::<f64>()
                    .map_err(|_| LoaderError::InvalidDuration {
                        value: text.clone(),
                    })?;
                whole_seconds(secs, || text.clone())
            }
        }
    }
}

fn whole_seconds(secs: f64, describe: impl FnOnce() -> String) -> Result<u64, LoaderError> {
    if secs.is_finite() && secs >= 0.0 {
        Ok(secs.floor() as u64)
    } else {
        Err(LoaderError::InvalidDuration { value: describe() })
    }
}

impl RawEpisode {
    /// Normalize into a display-ready Episode
    pub fn normalize(self, locale: Locale) -> Result<Episode, LoaderError> {
        let duration = self.file.duration.to_seconds()?;
        let published_at = format_published_at(&self.published_at, locale)?;
        let url = Url::parse(&self.file.url)?;

        Ok(Episode {
            id: self.id,
            title: self.title,
            members: self.members,
            thumbnail: self.thumbnail,
            description: self.description,
            duration,
            duration_as_string: format_duration(duration),
            url,
            published_at,
        })
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(u64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(text) => text,
        Id::Number(n) => n.to_string(),
    })
}
