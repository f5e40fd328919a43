// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, LoaderError};

/// Locale used for human-readable episode dates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "pt-BR")]
    PtBr,
    #[serde(rename = "en-US")]
    EnUs,
}

impl Locale {
    /// Abbreviated month names, January first
    fn short_months(self) -> [&'static str; 12] {
        match self {
            Locale::PtBr => [
                "jan", "fev", "mar", "abr", "mai", "jun", "jul", "ago", "set", "out", "nov", "dez",
            ],
            Locale::EnUs => [
                "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
            ],
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Locale::PtBr => "pt-BR",
            Locale::EnUs => "en-US",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Locale {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "pt-br" | "pt" => Ok(Locale::PtBr),
            "en-us" | "en" => Ok(Locale::EnUs),
            _ => Err(ConfigError::UnknownLocale(s.to_string())),
        }
    }
}

/// Format a duration in seconds as `HH:MM:SS`
///
/// Every component is zero-padded to two digits. Hours are not wrapped,
/// so a 100 hour episode renders as `100:00:00`.
pub fn format_duration(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

/// Format an ISO-8601 publish date as a short `d MMM yy` string
///
/// Timestamps carrying an offset are rendered in that offset, so the
/// calendar day shown is the one the API wrote down.
pub fn format_published_at(raw: &str, locale: Locale) -> Result<String, LoaderError> {
    let date = parse_iso_date(raw)?;
    let month = locale.short_months()[date.month0() as usize];

    Ok(format!(
        "{} {} {:02}",
        date.day(),
        month,
        date.year().rem_euclid(100)
    ))
}

/// Parse the calendar date out of an ISO-8601 date or date-time string
fn parse_iso_date(raw: &str) -> Result<NaiveDate, LoaderError> {
    let trimmed = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.date_naive());
    }

    // Offset-less variants, as emitted by json-server style backends
    let formats = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ];

    for format in formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(dt.date());
        }
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|e| LoaderError::InvalidDate {
        date_str: raw.to_string(),
        reason: e.to_string(),
    })
}
